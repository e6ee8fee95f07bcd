// Standard Library Imports
use std::{collections::hash_map::Entry, ops::Deref, str::FromStr};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use itertools::Itertools;
use knuffel::{
    Decode, DecodeScalar,
    ast::{Literal, TypeName},
    decode::{Context, Kind},
    errors::{DecodeError, ExpectedType},
    span::{Span, Spanned},
    traits::ErrorSpan,
};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use rust_decimal::Decimal;
use thiserror::Error;

// Local Module Imports
use super::errors::AtomicLookupError;

pub const DEFAULT_KDL: &str = include_str!("../../data/atomic_database.kdl");

// Public API ==========================================================================================================

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AtomicDatabase {
    elements: HashMap<String, ElementDescription>,
    symbols_by_name: HashMap<String, String>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ElementDescription {
    pub symbol: String,
    pub name: String,
    pub average_mass: Decimal,
    pub monoisotopic_mass: Decimal,
}

impl AtomicDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: AtomicDatabaseKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let db = parsed_db
            .validate()
            .map_err(|e| e.finalize(file_name, kdl_text))?;

        log::debug!("loaded {} elements into the atomic database", db.len());
        Ok(db)
    }

    /// Looks up an element by its symbol (e.g. `"Na"`)
    pub fn element(&self, symbol: &str) -> Result<&ElementDescription, AtomicLookupError> {
        self.elements
            .get(symbol)
            .ok_or_else(|| AtomicLookupError::element(symbol))
    }

    /// Looks up an element by its full name (e.g. `"Sodium"`)
    pub fn element_named(&self, name: &str) -> Result<&ElementDescription, AtomicLookupError> {
        self.symbols_by_name
            .get(name)
            .and_then(|symbol| self.elements.get(symbol))
            .ok_or_else(|| AtomicLookupError::element_name(name))
    }

    /// Every element in the database, sorted by symbol
    pub fn elements(&self) -> impl Iterator<Item = &ElementDescription> {
        self.elements.values().sorted_by(|a, b| a.symbol.cmp(&b.symbol))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for AtomicDatabase {
    fn default() -> Self {
        // SAFETY: The bundled database is checked by `build_default_atomic_database` in the tests below
        Self::from_kdl("atomic_database.kdl", DEFAULT_KDL).unwrap()
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct AtomicDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    elements: Vec<ElementKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ElementKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    symbol: ElementSymbol,
    #[knuffel(argument)]
    name: String,
    #[knuffel(child, unwrap(argument))]
    average: DecimalKdl,
    #[knuffel(child, unwrap(argument))]
    monoisotopic: DecimalKdl,
}

// Lossless Parsing of KDL Numbers to Decimal ==========================================================================

#[derive(Debug, Default)]
struct DecimalKdl(Decimal);

impl<S: ErrorSpan> DecodeScalar<S> for DecimalKdl {
    fn type_check(type_name: &Option<Spanned<TypeName, S>>, ctx: &mut Context<S>) {
        if let Some(t) = type_name {
            ctx.emit_error(DecodeError::TypeName {
                span: t.span().clone(),
                found: Some(t.deref().clone()),
                expected: ExpectedType::no_type(),
                rust_type: "Decimal",
            });
        }
    }

    fn raw_decode(
        value: &Spanned<Literal, S>,
        ctx: &mut Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        match &**value {
            Literal::String(s) => {
                let res = if s.contains(['e', 'E']) {
                    Decimal::from_scientific(s)
                } else {
                    Decimal::from_str_exact(s)
                };
                match res {
                    Ok(d) => Ok(Self(d)),
                    Err(e) => {
                        ctx.emit_error(DecodeError::conversion(value, e));
                        Ok(Self::default())
                    }
                }
            }
            Literal::Int(i) => match i64::try_from(i) {
                Ok(i) => Ok(Self(Decimal::from(i))),
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(value, e));
                    Ok(Self::default())
                }
            },
            Literal::Decimal(_) => {
                ctx.emit_error(DecodeError::unsupported(
                    value,
                    "decimal masses must be quoted (e.g. \"1.00794075\") to be read without rounding",
                ));
                Ok(Self::default())
            }
            unsupported => {
                ctx.emit_error(DecodeError::unsupported(
                    value,
                    format!(
                        "expected a quoted decimal or an integer, found {}",
                        Kind::from(unsupported)
                    ),
                ));
                Ok(Self::default())
            }
        }
    }
}

// Element Symbol Validation ===========================================================================================

#[derive(Debug)]
struct ElementSymbol(String);

impl FromStr for ElementSymbol {
    type Err = InvalidElementSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_owned();
        let chrs: Vec<_> = s.chars().collect();
        match chrs[..] {
            [f] if f.is_ascii_uppercase() => Ok(Self(s)),
            [f, l] if f.is_ascii_uppercase() && l.is_ascii_lowercase() => Ok(Self(s)),
            _ => Err(InvalidElementSymbolError(s)),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Diagnostic, Error)]
#[error(
    "expected a single uppercase ASCII letter optionally followed by a lowercase ASCII letter, got {0:?}"
)]
struct InvalidElementSymbolError(String);

// Atomic Database Validation ==========================================================================================

impl AtomicDatabaseKdl {
    fn validate(self) -> Result<AtomicDatabase, AtomicDatabaseErrorKind> {
        let mut elements: HashMap<String, (Span, ElementDescription)> = HashMap::new();
        let mut symbols_by_name: HashMap<String, (Span, String)> = HashMap::new();

        for ElementKdl {
            span,
            symbol: ElementSymbol(symbol),
            name,
            average,
            monoisotopic,
        } in self.elements
        {
            match symbols_by_name.entry(name.clone()) {
                Entry::Occupied(e) => {
                    let (name, (first_defined_at, _)) = e.remove_entry();
                    return Err(AtomicDatabaseErrorKind::DuplicateName(
                        first_defined_at,
                        span,
                        name,
                    ));
                }
                Entry::Vacant(e) => e.insert((span.clone(), symbol.clone())),
            };

            let description = ElementDescription {
                symbol: symbol.clone(),
                name,
                average_mass: average.0,
                monoisotopic_mass: monoisotopic.0,
            };
            match elements.entry(symbol) {
                Entry::Occupied(e) => {
                    let (symbol, (first_defined_at, _)) = e.remove_entry();
                    return Err(AtomicDatabaseErrorKind::DuplicateSymbol(
                        first_defined_at,
                        span,
                        symbol,
                    ));
                }
                Entry::Vacant(e) => e.insert((span, description)),
            };
        }

        Ok(AtomicDatabase {
            elements: elements.into_iter().map(|(k, (_, v))| (k, v)).collect(),
            symbols_by_name: symbols_by_name
                .into_iter()
                .map(|(k, (_, v))| (k, v))
                .collect(),
        })
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate atomic database file")]
struct AtomicDatabaseError {
    kdl: NamedSource,
    #[source]
    kind: AtomicDatabaseErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for AtomicDatabaseError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), s.clone())
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum AtomicDatabaseErrorKind {
    #[error("the element symbol {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate element, or double-check the symbol for typos"))]
    DuplicateSymbol(Span, Span, String),

    #[error("the element name {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate element, or double-check the name for typos"))]
    DuplicateName(Span, Span, String),
}

impl AtomicDatabaseErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateSymbol(s1, s2, _) | Self::DuplicateName(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> AtomicDatabaseError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        AtomicDatabaseError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
