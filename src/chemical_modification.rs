// External Crate Imports
use elemental::{
    AtomicDatabase, AverageMass, ChemicalComposition, Massive, MonoisotopicMass, OffsetKind,
};
use itertools::Itertools;

// Local Crate Imports
use crate::ChemicalModification;

impl ChemicalModification {
    /// Parses a free-form modification formula. A leading `-` marks atoms lost from the chain, and anything that
    /// isn't an element symbol (optionally followed by a count) is skipped
    #[must_use]
    pub fn new(formula: &str) -> Self {
        let formula = formula.trim();
        let kind = if formula.starts_with('-') {
            OffsetKind::Remove
        } else {
            OffsetKind::Add
        };
        Self {
            formula: formula.to_owned(),
            composition: ChemicalComposition::new(formula),
            kind,
        }
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The atoms added or removed, always with positive counts
    #[must_use]
    pub const fn composition(&self) -> &ChemicalComposition {
        &self.composition
    }

    #[must_use]
    pub const fn kind(&self) -> OffsetKind {
        self.kind
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formula.is_empty()
    }

    /// Joins the formulae of `modifications` with `"; "`, keeping a place for chains without one (e.g. `"; Na"`)
    pub fn describe<'m>(modifications: impl IntoIterator<Item = &'m Self>) -> String {
        modifications.into_iter().map(Self::formula).join("; ")
    }
}

// NOTE: Masses are signed, so removed atoms weigh in negatively
impl Massive for ChemicalModification {
    fn monoisotopic_mass(&self, db: &AtomicDatabase) -> elemental::Result<MonoisotopicMass> {
        Ok(self.kind.offset(self.composition.monoisotopic_mass(db)?))
    }

    fn average_mass(&self, db: &AtomicDatabase) -> elemental::Result<AverageMass> {
        Ok(self.kind.offset(self.composition.average_mass(db)?))
    }
}
