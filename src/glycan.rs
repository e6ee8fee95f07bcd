// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

// External Crate Imports
use ahash::{HashSet, HashSetExt};
use elemental::{Count, ElementalComposition};
use thiserror::Error;

// Local Crate Imports
use crate::{Glycan, GlycanLibrary, Monosaccharide, ResidueDatabase};

// Monosaccharides =====================================================================================================

impl Monosaccharide {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] =
        [Self::HexNAc, Self::Hex, Self::DHex, Self::NeuAc, Self::NeuGc];

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::HexNAc => "HexNAc",
            Self::Hex => "Hex",
            Self::DHex => "dHex",
            Self::NeuAc => "NeuAc",
            Self::NeuGc => "NeuGc",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Monosaccharide {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Monosaccharide {
    type Err = UnknownMonosaccharideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.abbreviation() == s)
            .ok_or_else(|| UnknownMonosaccharideError(s.to_owned()))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("expected one of HexNAc, Hex, dHex, NeuAc, or NeuGc, got {0:?}")]
pub struct UnknownMonosaccharideError(String);

// Glycans =============================================================================================================

impl Glycan {
    pub fn new(name: impl Into<String>, counts: [Count; Monosaccharide::COUNT]) -> Self {
        Self {
            name: name.into(),
            counts,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn count(&self, monosaccharide: Monosaccharide) -> Count {
        self.counts[monosaccharide.index()]
    }

    /// The sum of each monosaccharide's residue formula, weighted by how many times it occurs in this glycan.
    /// Residue formulae already account for the water lost to each glycosidic bond
    #[must_use]
    pub fn composition(&self, residues: &ResidueDatabase) -> ElementalComposition {
        Monosaccharide::ALL
            .into_iter()
            .map(|m| residues.monosaccharide(m) * self.count(m))
            .sum()
    }
}

/// A glycan from a [`GlycanLibrary`], paired with its composition
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ComposedGlycan<'g> {
    pub glycan: &'g Glycan,
    pub composition: ElementalComposition,
}

impl GlycanLibrary {
    #[must_use]
    pub const fn new(glycans: Vec<Glycan>) -> Self {
        Self { glycans }
    }

    /// All of the glycans in `self`, followed by any glycans in `other` not already present (by name)
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut seen = HashSet::new();
        let glycans = self
            .glycans
            .iter()
            .chain(&other.glycans)
            .filter(|g| seen.insert(g.name.as_str()))
            .cloned()
            .collect();
        Self { glycans }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glycan> {
        self.glycans.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glycans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glycans.is_empty()
    }

    #[must_use]
    pub fn compose(&self, residues: &ResidueDatabase) -> Vec<ComposedGlycan<'_>> {
        self.iter()
            .map(|glycan| ComposedGlycan {
                glycan,
                composition: glycan.composition(residues),
            })
            .collect()
    }
}
