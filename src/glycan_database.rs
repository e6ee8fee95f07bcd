// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use elemental::Count;
use knuffel::{Decode, span::Span};
use miette::{Diagnostic, Result};
use thiserror::Error;

// Local Crate Imports
use crate::{ChainType, Glycan, GlycanLibrary, Monosaccharide, kdl::ValidationErrorKind};

pub const DEFAULT_KDL: &str = include_str!("../data/glycan_database.kdl");

// Public API ==========================================================================================================

/// The glycans that can be attached to heavy and light chains
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GlycanDatabase {
    heavy: GlycanLibrary,
    light: GlycanLibrary,
}

impl GlycanDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: GlycanDatabaseKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let db = parsed_db
            .validate()
            .map_err(|e| e.finalize("glycan database", file_name, kdl_text))?;

        log::debug!(
            "loaded {} heavy-chain and {} light-chain glycans into the glycan database",
            db.heavy.len(),
            db.light.len()
        );
        Ok(db)
    }

    /// The glycans that can be attached to `chain_type`, in display order
    #[must_use]
    pub const fn library(&self, chain_type: ChainType) -> &GlycanLibrary {
        match chain_type {
            ChainType::Heavy => &self.heavy,
            ChainType::Light => &self.light,
        }
    }
}

impl Default for GlycanDatabase {
    fn default() -> Self {
        // SAFETY: The bundled database is checked by `build_default_glycan_database` in the tests below
        Self::from_kdl("glycan_database.kdl", DEFAULT_KDL).unwrap()
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct GlycanDatabaseKdl {
    #[knuffel(children(name = "glycan"))]
    glycans: Vec<GlycanKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct GlycanKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    name: String,
    #[knuffel(property(name = "order"))]
    order: u32,
    #[knuffel(property(name = "heavy"), default)]
    heavy: bool,
    #[knuffel(property(name = "light"), default)]
    light: bool,
    #[knuffel(property(name = "HexNAc"), default)]
    hexnac: u32,
    #[knuffel(property(name = "Hex"), default)]
    hex: u32,
    #[knuffel(property(name = "dHex"), default)]
    dhex: u32,
    #[knuffel(property(name = "NeuAc"), default)]
    neuac: u32,
    #[knuffel(property(name = "NeuGc"), default)]
    neugc: u32,
}

// Glycan Database Validation ==========================================================================================

impl GlycanDatabaseKdl {
    fn validate(self) -> Result<GlycanDatabase, GlycanErrorKind> {
        let mut seen_names: HashMap<String, Span> = HashMap::new();
        let mut glycans = Vec::with_capacity(self.glycans.len());

        for glycan in self.glycans {
            match seen_names.entry(glycan.name.clone()) {
                Entry::Occupied(e) => {
                    let (name, first_defined_at) = e.remove_entry();
                    return Err(GlycanErrorKind::DuplicateGlycan(
                        first_defined_at,
                        glycan.span,
                        name,
                    ));
                }
                Entry::Vacant(e) => e.insert(glycan.span.clone()),
            };

            if glycan.heavy || glycan.light {
                glycans.push(glycan);
            } else {
                log::debug!("skipping the glycan {:?}, which is hidden from both chain types", glycan.name);
            }
        }

        // NOTE: The sort is stable, so glycans sharing an `order` keep the order they were defined in
        glycans.sort_by_key(|g| g.order);

        let library = |applies: fn(&GlycanKdl) -> bool| {
            GlycanLibrary::new(glycans.iter().filter(|g| applies(g)).map(Glycan::from).collect())
        };
        Ok(GlycanDatabase {
            heavy: library(|g| g.heavy),
            light: library(|g| g.light),
        })
    }
}

impl From<&GlycanKdl> for Glycan {
    fn from(value: &GlycanKdl) -> Self {
        let mut counts = [0; Monosaccharide::COUNT];
        for (monosaccharide, count) in [
            (Monosaccharide::HexNAc, value.hexnac),
            (Monosaccharide::Hex, value.hex),
            (Monosaccharide::DHex, value.dhex),
            (Monosaccharide::NeuAc, value.neuac),
            (Monosaccharide::NeuGc, value.neugc),
        ] {
            counts[monosaccharide.index()] = Count::from(count);
        }
        Self::new(value.name.clone(), counts)
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Clone, Debug, Diagnostic, Error)]
enum GlycanErrorKind {
    #[error("the glycan {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate glycan, or double-check the name for typos"))]
    DuplicateGlycan(Span, Span, String),
}

impl ValidationErrorKind for GlycanErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateGlycan(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::testing_tools::render_diagnostic;

    fn names(library: &GlycanLibrary) -> Vec<&str> {
        library.iter().map(Glycan::name).collect()
    }

    #[test]
    fn build_default_glycan_database() {
        let db = GlycanDatabase::from_kdl("glycan_database.kdl", DEFAULT_KDL).unwrap();
        assert_eq!(db, GlycanDatabase::default());
        assert_eq!(
            names(db.library(ChainType::Heavy)),
            ["Chitobiose core", "G0", "G0F", "G1F", "G2F", "Man5"]
        );
        assert_eq!(
            names(db.library(ChainType::Light)),
            ["G0F", "G2FS1", "G2FS2"]
        );
    }

    #[test]
    fn monosaccharide_counts() {
        let db = GlycanDatabase::default();
        let g2fs2 = db.library(ChainType::Light).iter().last().unwrap();
        assert_eq!(g2fs2.name(), "G2FS2");
        assert_eq!(g2fs2.count(Monosaccharide::HexNAc), 4);
        assert_eq!(g2fs2.count(Monosaccharide::Hex), 5);
        assert_eq!(g2fs2.count(Monosaccharide::DHex), 1);
        assert_eq!(g2fs2.count(Monosaccharide::NeuAc), 2);
        assert_eq!(g2fs2.count(Monosaccharide::NeuGc), 0);
    }

    #[test]
    fn sorted_by_display_order() {
        let kdl = indoc! {r#"
            glycan "Late" order=9 heavy=true Hex=1
            glycan "Early" order=1 heavy=true light=true HexNAc=1
            glycan "Tied" order=9 light=true NeuGc=1
        "#};
        let db = GlycanDatabase::from_kdl("test", kdl).unwrap();
        assert_eq!(names(db.library(ChainType::Heavy)), ["Early", "Late"]);
        assert_eq!(names(db.library(ChainType::Light)), ["Early", "Tied"]);
    }

    #[test]
    fn duplicate_glycan() {
        let kdl = indoc! {r#"
            glycan "G0F" order=1 heavy=true HexNAc=4 Hex=3 dHex=1
            glycan "G0F" order=2 light=true HexNAc=4 Hex=3 dHex=1
        "#};
        let error = GlycanDatabase::from_kdl("test", kdl).unwrap_err();
        let rendered = render_diagnostic(&*error);
        assert!(rendered.contains("failed to validate glycan database file"));
        assert!(rendered.contains(r#"the glycan "G0F" has already been defined"#));
        assert!(rendered.contains("then again here"));
    }

    #[test]
    fn hidden_glycans_are_skipped() {
        let kdl = indoc! {r#"
            glycan "Hidden" order=1 HexNAc=1
            glycan "Also hidden" order=2 heavy=false light=false Hex=1
            glycan "G0" order=3 heavy=true HexNAc=4 Hex=3
        "#};
        let db = GlycanDatabase::from_kdl("test", kdl).unwrap();
        assert_eq!(names(db.library(ChainType::Heavy)), ["G0"]);
        assert!(db.library(ChainType::Light).is_empty());
    }

    #[test]
    fn hidden_glycans_still_reserve_their_name() {
        let kdl = indoc! {r#"
            glycan "G0" order=1 HexNAc=4 Hex=3
            glycan "G0" order=2 heavy=true HexNAc=4 Hex=3
        "#};
        let error = GlycanDatabase::from_kdl("test", kdl).unwrap_err();
        let rendered = render_diagnostic(&*error);
        assert!(rendered.contains(r#"the glycan "G0" has already been defined"#));
    }

    #[test]
    fn missing_order() {
        let kdl = r#"glycan "G0" heavy=true HexNAc=4 Hex=3"#;
        assert!(GlycanDatabase::from_kdl("test", kdl).is_err());
    }

    #[test]
    fn negative_counts() {
        let kdl = r#"glycan "G0" order=1 heavy=true HexNAc=-4"#;
        assert!(GlycanDatabase::from_kdl("test", kdl).is_err());
    }
}
