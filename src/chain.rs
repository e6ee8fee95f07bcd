// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

// External Crate Imports
use elemental::ElementalComposition;
use serde::{Serialize, Serializer};
use thiserror::Error;

// Local Crate Imports
use crate::{
    Chain, ChainSlot, ChainType, Result, errors::UnknownResidueError,
    residue_database::{AminoAcid, ResidueDatabase},
};

// Chain Slots =========================================================================================================

impl ChainSlot {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::HeavyOne, Self::HeavyTwo, Self::LightOne, Self::LightTwo];

    #[must_use]
    pub const fn chain_type(self) -> ChainType {
        match self {
            Self::HeavyOne | Self::HeavyTwo => ChainType::Heavy,
            Self::LightOne | Self::LightTwo => ChainType::Light,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HeavyOne => "HC-1",
            Self::HeavyTwo => "HC-2",
            Self::LightOne => "LC-1",
            Self::LightTwo => "LC-2",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Display for ChainSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for ChainSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for ChainSlot {
    type Err = UnknownChainSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.label() == s)
            .ok_or_else(|| UnknownChainSlotError(s.to_owned()))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("expected one of HC-1, HC-2, LC-1, or LC-2, got {0:?}")]
pub struct UnknownChainSlotError(String);

// Chains ==============================================================================================================

impl Chain {
    /// Builds the chain in `slot` from its one-letter `sequence`. Surrounding whitespace is ignored, and lowercase
    /// codes are accepted
    pub fn new(residues: &ResidueDatabase, slot: ChainSlot, sequence: &str) -> Result<Self> {
        let sequence = normalise(sequence);
        let amino_acids = lookup_residues(residues, slot, &sequence)?;

        let residue_keys = amino_acids.iter().map(|aa| aa.key.clone()).collect();
        let composition = residue_sum(&amino_acids) + ElementalComposition::WATER;

        Ok(Self {
            slot,
            sequence,
            residues: residue_keys,
            composition,
        })
    }

    /// The sum of the residue formulae of `sequence`, without the water of the free termini
    pub fn sequence_composition(
        residues: &ResidueDatabase,
        slot: ChainSlot,
        sequence: &str,
    ) -> Result<ElementalComposition> {
        let sequence = normalise(sequence);
        let amino_acids = lookup_residues(residues, slot, &sequence)?;
        Ok(residue_sum(&amino_acids))
    }

    #[must_use]
    pub const fn slot(&self) -> ChainSlot {
        self.slot
    }

    #[must_use]
    pub const fn chain_type(&self) -> ChainType {
        self.slot.chain_type()
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The three-letter key of every residue, from N- to C-terminus
    #[must_use]
    pub fn residues(&self) -> &[String] {
        &self.residues
    }

    #[must_use]
    pub const fn composition(&self) -> ElementalComposition {
        self.composition
    }

    #[must_use]
    pub fn first_residue(&self) -> Option<char> {
        self.sequence.chars().next()
    }

    #[must_use]
    pub fn last_residue(&self) -> Option<char> {
        self.sequence.chars().next_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

fn normalise(sequence: &str) -> String {
    sequence.trim().to_uppercase()
}

fn lookup_residues<'r>(
    residues: &'r ResidueDatabase,
    slot: ChainSlot,
    sequence: &str,
) -> Result<Vec<&'r AminoAcid>> {
    let mut amino_acids = Vec::with_capacity(sequence.len());
    for (offset, code) in sequence.char_indices() {
        let amino_acid = residues
            .amino_acid(code)
            .ok_or_else(|| UnknownResidueError::new(slot, sequence, offset, code))?;
        amino_acids.push(amino_acid);
    }
    Ok(amino_acids)
}

fn residue_sum(amino_acids: &[&AminoAcid]) -> ElementalComposition {
    amino_acids.iter().map(|aa| aa.composition).sum()
}
