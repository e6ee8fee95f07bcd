//! Theoretical masses and elemental compositions of antibodies: their individual chains (partially and fully
//! reduced), half-bodies, and intact four-chain assemblies, along with every glycoform of each

pub mod assembly;
mod chain;
mod chemical_modification;
pub mod errors;
mod glycan;
pub mod glycan_database;
mod kdl;
pub mod parameters;
mod reduction;
pub mod report;
pub mod residue_database;
#[cfg(test)]
mod testing_tools;

// External Crate Imports
use derive_more::Display;
use elemental::{ChemicalComposition, Count, ElementalComposition, OffsetKind};
use serde::Serialize;

pub use chain::UnknownChainSlotError;
pub use errors::{MabscaleError, Result, UnknownResidueError};
pub use glycan::{ComposedGlycan, UnknownMonosaccharideError};
pub use glycan_database::GlycanDatabase;
pub use parameters::Parameters;
pub use report::Report;
pub use residue_database::ResidueDatabase;

// Chains ==============================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum ChainType {
    Heavy,
    Light,
}

/// One of the four chain positions of an antibody
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ChainSlot {
    HeavyOne,
    HeavyTwo,
    LightOne,
    LightTwo,
}

/// A single chain: its normalised sequence, the residue key of each position, and its composition (including the
/// water of its free termini)
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Chain {
    slot: ChainSlot,
    sequence: String,
    residues: Vec<String>,
    composition: ElementalComposition,
}

// Reduction ===========================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize)]
pub struct TerminalOptions {
    pub cyclization: bool,
    pub lysine_clipping: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Serialize)]
pub enum Cyclization {
    #[display("Pyro Q")]
    PyroQ,
    #[display("Pyro E")]
    PyroE,
    #[display("None")]
    Unmodified,
}

/// Which terminal modifications were actually applied to a heavy chain
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TerminalNote {
    cyclization: Cyclization,
    lysine_clipped: bool,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ReducedChain {
    slot: ChainSlot,
    partial: ElementalComposition,
    full: ElementalComposition,
    note: Option<TerminalNote>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Serialize)]
pub enum Reduction {
    #[display("Partially Reduced")]
    Partial,
    #[display("Fully Reduced")]
    Full,
}

// Chemical Modifications ==============================================================================================

/// A free-form formula added to (or, when prefixed with `-`, removed from) a chain
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ChemicalModification {
    formula: String,
    composition: ChemicalComposition,
    kind: OffsetKind,
}

// Glycans =============================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum Monosaccharide {
    HexNAc,
    Hex,
    #[serde(rename = "dHex")]
    DHex,
    NeuAc,
    NeuGc,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Glycan {
    name: String,
    counts: [Count; Monosaccharide::COUNT],
}

/// The glycans that may be attached to one type of chain, in display order
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct GlycanLibrary {
    glycans: Vec<Glycan>,
}

// Assemblies ==========================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Assembly {
    Chain(ChainSlot),
    HalfBody {
        heavy: ChainSlot,
        light: ChainSlot,
    },
    Intact {
        heavy: [ChainSlot; 2],
        light: [ChainSlot; 2],
    },
}

/// An assembly and the glycans attached to it. Displayed as the assembly (`HC-1`, `HC-1:LC-2`, or
/// `HC-1/HC-2:LC-1/LC-1`), followed by `|+ ` and the glycan names joined with ` + ` when there are any
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    assembly: Assembly,
    glycans: Vec<String>,
}

/// A labelled composition: a chain or assembly, possibly carrying glycans
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Glycoform {
    label: Label,
    composition: ElementalComposition,
}
