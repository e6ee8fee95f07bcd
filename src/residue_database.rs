// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use elemental::{ElementalComposition, ElementalError};
use itertools::Itertools;
use knuffel::{
    Decode,
    span::{Span, Spanned},
};
use miette::{Diagnostic, Result};
use thiserror::Error;

// Local Crate Imports
use crate::{
    Monosaccharide,
    kdl::{Composition, ValidationErrorKind},
};

pub const DEFAULT_KDL: &str = include_str!("../data/residue_database.kdl");

// Public API ==========================================================================================================

/// Residue formulae for the amino acids that make up chains and the monosaccharides that make up glycans
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResidueDatabase {
    amino_acids: HashMap<char, AminoAcid>,
    monosaccharides: [ElementalComposition; Monosaccharide::COUNT],
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AminoAcid {
    pub code: char,
    /// The three-letter abbreviation, like `Lys`
    pub key: String,
    pub name: String,
    pub composition: ElementalComposition,
}

impl ResidueDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: ResidueDatabaseKdl =
            knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let db = parsed_db
            .validate()
            .map_err(|e| e.finalize("residue database", file_name, kdl_text))?;

        log::debug!(
            "loaded {} amino acids and {} monosaccharides into the residue database",
            db.amino_acids.len(),
            Monosaccharide::COUNT
        );
        Ok(db)
    }

    /// Looks up an amino acid by its (uppercase) one-letter code
    #[must_use]
    pub fn amino_acid(&self, code: char) -> Option<&AminoAcid> {
        self.amino_acids.get(&code)
    }

    /// Every amino acid, sorted by one-letter code
    pub fn amino_acids(&self) -> impl Iterator<Item = &AminoAcid> {
        self.amino_acids.values().sorted_by_key(|aa| aa.code)
    }

    #[must_use]
    pub const fn monosaccharide(&self, monosaccharide: Monosaccharide) -> ElementalComposition {
        self.monosaccharides[monosaccharide.index()]
    }
}

impl Default for ResidueDatabase {
    fn default() -> Self {
        // SAFETY: The bundled database is checked by `build_default_residue_database` in the tests below
        Self::from_kdl("residue_database.kdl", DEFAULT_KDL).unwrap()
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ResidueDatabaseKdl {
    #[knuffel(children(name = "amino-acid"))]
    amino_acids: Vec<AminoAcidKdl>,
    #[knuffel(children(name = "monosaccharide"))]
    monosaccharides: Vec<MonosaccharideKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct AminoAcidKdl {
    #[knuffel(argument)]
    code: Spanned<String, Span>,
    #[knuffel(argument)]
    key: String,
    #[knuffel(argument)]
    name: String,
    #[knuffel(child, unwrap(argument))]
    composition: Composition,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct MonosaccharideKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument, str)]
    abbreviation: Monosaccharide,
    #[knuffel(child, unwrap(argument))]
    composition: Composition,
}

// Residue Database Validation =========================================================================================

fn validate_composition(composition: &Composition) -> Result<ElementalComposition, ResidueErrorKind> {
    composition
        .parse()
        .map_err(|e: Box<ElementalError>| ResidueErrorKind::Composition(composition.span().clone(), *e))
}

impl ResidueDatabaseKdl {
    fn validate(self) -> Result<ResidueDatabase, ResidueErrorKind> {
        let mut amino_acids: HashMap<char, (Span, AminoAcid)> = HashMap::new();
        for AminoAcidKdl {
            code,
            key,
            name,
            composition,
        } in self.amino_acids
        {
            let code_span = code.span().clone();
            let code = match code.chars().collect_vec()[..] {
                [c] if c.is_ascii_uppercase() => c,
                _ => {
                    return Err(ResidueErrorKind::InvalidCode(code_span, (*code).clone()));
                }
            };

            let amino_acid = AminoAcid {
                code,
                key,
                name,
                composition: validate_composition(&composition)?,
            };
            match amino_acids.entry(code) {
                Entry::Occupied(e) => {
                    let (code, (first_defined_at, _)) = e.remove_entry();
                    return Err(ResidueErrorKind::DuplicateAminoAcid(
                        first_defined_at,
                        code_span,
                        code,
                    ));
                }
                Entry::Vacant(e) => e.insert((code_span, amino_acid)),
            };
        }

        let mut monosaccharides: [Option<(Span, ElementalComposition)>; Monosaccharide::COUNT] =
            Default::default();
        for MonosaccharideKdl {
            span,
            abbreviation,
            composition,
        } in self.monosaccharides
        {
            let slot = &mut monosaccharides[abbreviation.index()];
            if let Some((first_defined_at, _)) = slot {
                return Err(ResidueErrorKind::DuplicateMonosaccharide(
                    first_defined_at.clone(),
                    span,
                    abbreviation,
                ));
            }
            *slot = Some((span, validate_composition(&composition)?));
        }

        let missing = Monosaccharide::ALL
            .into_iter()
            .find(|m| monosaccharides[m.index()].is_none());
        if let Some(monosaccharide) = missing {
            return Err(ResidueErrorKind::MissingMonosaccharide(monosaccharide));
        }

        Ok(ResidueDatabase {
            amino_acids: amino_acids.into_iter().map(|(k, (_, v))| (k, v)).collect(),
            monosaccharides: monosaccharides.map(|m| m.map(|(_, c)| c).unwrap_or_default()),
        })
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Clone, Debug, Diagnostic, Error)]
enum ResidueErrorKind {
    #[error("the amino acid code {1:?} is not a single uppercase ASCII letter")]
    #[diagnostic(help("amino acids are identified by their one-letter codes, like \"K\""))]
    InvalidCode(Span, String),

    #[error("the amino acid {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate amino acid, or double-check the code for typos"))]
    DuplicateAminoAcid(Span, Span, char),

    #[error("the monosaccharide {2} has already been defined")]
    #[diagnostic(help("remove the duplicate monosaccharide"))]
    DuplicateMonosaccharide(Span, Span, Monosaccharide),

    #[error("the monosaccharide {0} was never defined")]
    #[diagnostic(help("every glycan is built from HexNAc, Hex, dHex, NeuAc, and NeuGc, so all must be defined"))]
    MissingMonosaccharide(Monosaccharide),

    #[error("residue database file contained an invalid composition")]
    Composition(
        Span,
        #[source]
        #[diagnostic_source]
        ElementalError,
    ),
}

impl ValidationErrorKind for ResidueErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::InvalidCode(s, _) => vec![(s, "invalid code")],
            Self::DuplicateAminoAcid(s1, s2, _) | Self::DuplicateMonosaccharide(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::MissingMonosaccharide(_) => Vec::new(),
            Self::Composition(s, _) => vec![(s, "invalid composition")],
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::testing_tools::render_diagnostic;

    fn render_error(kdl: &str) -> String {
        let error = ResidueDatabase::from_kdl("test", kdl).unwrap_err();
        render_diagnostic(&*error)
    }

    const MONOSACCHARIDES: &str = indoc! {r#"
        monosaccharide "HexNAc" { composition "C8H13NO5"; }
        monosaccharide "Hex" { composition "C6H10O5"; }
        monosaccharide "dHex" { composition "C6H10O4"; }
        monosaccharide "NeuAc" { composition "C11H17NO8"; }
        monosaccharide "NeuGc" { composition "C11H17NO9"; }
    "#};

    #[test]
    fn build_default_residue_database() {
        let db = ResidueDatabase::from_kdl("residue_database.kdl", DEFAULT_KDL).unwrap();
        assert_eq!(db.amino_acids().count(), 20);
        assert_eq!(db, ResidueDatabase::default());
    }

    #[test]
    fn amino_acid_lookup() {
        let db = ResidueDatabase::default();
        let lysine = db.amino_acid('K').unwrap();
        assert_eq!(lysine.key, "Lys");
        assert_eq!(lysine.name, "Lysine");
        assert_eq!(lysine.composition, ElementalComposition::new(6, 12, 2, 1, 0));
        assert!(db.amino_acid('k').is_none());
        assert!(db.amino_acid('X').is_none());

        let codes: String = db.amino_acids().map(|aa| aa.code).collect();
        assert_eq!(codes, "ACDEFGHIKLMNPQRSTVWY");
    }

    #[test]
    fn monosaccharide_lookup() {
        let db = ResidueDatabase::default();
        assert_eq!(
            db.monosaccharide(Monosaccharide::HexNAc),
            ElementalComposition::new(8, 13, 1, 5, 0)
        );
        assert_eq!(
            db.monosaccharide(Monosaccharide::NeuGc),
            ElementalComposition::new(11, 17, 1, 9, 0)
        );
    }

    #[test]
    fn invalid_amino_acid_code() {
        let kdl = format!(
            "{MONOSACCHARIDES}\namino-acid \"Lys\" \"Lys\" \"Lysine\" {{ composition \"C6H12N2O\"; }}"
        );
        let rendered = render_error(&kdl);
        assert!(rendered.contains("failed to validate residue database file"));
        assert!(rendered.contains(r#"the amino acid code "Lys" is not a single uppercase ASCII letter"#));
        assert!(rendered.contains("invalid code"));
    }

    #[test]
    fn duplicate_amino_acid() {
        let kdl = format!(
            "{MONOSACCHARIDES}{}",
            indoc! {r#"
                amino-acid "K" "Lys" "Lysine" { composition "C6H12N2O"; }
                amino-acid "K" "Lys" "Lysine" { composition "C6H12N2O"; }
            "#}
        );
        let rendered = render_error(&kdl);
        assert!(rendered.contains("the amino acid 'K' has already been defined"));
        assert!(rendered.contains("first defined here"));
        assert!(rendered.contains("then again here"));
    }

    #[test]
    fn invalid_composition() {
        let kdl = format!(
            "{MONOSACCHARIDES}\namino-acid \"U\" \"Sec\" \"Selenocysteine\" {{ composition \"C3H5NOSe\"; }}"
        );
        let rendered = render_error(&kdl);
        assert!(rendered.contains("residue database file contained an invalid composition"));
        assert!(rendered.contains(r#"the element "Se" cannot be part of an elemental composition"#));
    }

    #[test]
    fn missing_monosaccharide() {
        let kdl = indoc! {r#"
            monosaccharide "HexNAc" { composition "C8H13NO5"; }
            amino-acid "K" "Lys" "Lysine" { composition "C6H12N2O"; }
        "#};
        let rendered = render_error(kdl);
        assert!(rendered.contains("the monosaccharide Hex was never defined"));
    }

    #[test]
    fn duplicate_monosaccharide() {
        let kdl = format!(
            "{MONOSACCHARIDES}monosaccharide \"Hex\" {{ composition \"C6H10O5\"; }}"
        );
        let rendered = render_error(&kdl);
        assert!(rendered.contains("the monosaccharide Hex has already been defined"));
    }

    #[test]
    fn unknown_monosaccharide() {
        let kdl = r#"monosaccharide "Fuc" { composition "C6H10O4"; }"#;
        let error = ResidueDatabase::from_kdl("test", kdl).unwrap_err();
        let rendered = render_diagnostic(&*error);
        assert!(rendered.contains("Fuc"));
    }
}
