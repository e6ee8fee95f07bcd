//! Elemental compositions, lenient chemical formulae, and the atomic masses needed to weigh them

pub mod atoms;
pub mod errors;
pub mod parsers;
#[cfg(test)]
mod testing_tools;

use std::collections::BTreeMap;

// External Crate Imports
use derive_more::{Add, Display, From, Into, Neg, Sub, Sum};
use rust_decimal::Decimal;
use serde::Serialize;

pub use atoms::atomic_database::{AtomicDatabase, ElementDescription};
pub use errors::{ElementalError, Result};

// NOTE: Compositions don't borrow the `AtomicDatabase`, so formulae containing unknown symbols can be built (and
// added or subtracted) freely, with lookup failures only surfacing when they're weighed

// ---------------------------------------------------------------------------------------------------------------------

/// The five elements making up the residue formulae of amino acids and monosaccharides
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum Element {
    Carbon,
    Hydrogen,
    Nitrogen,
    Oxygen,
    Sulfur,
}

/// A signed count for each of the five organic [`Element`]s. Zero counts are always present, and negative counts
/// are perfectly legal intermediate (or final) values
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ElementalComposition {
    counts: [Count; Element::COUNT],
}

/// A signed count for any element symbol at all, as produced by parsing free-form modification formulae
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ChemicalComposition {
    counts: BTreeMap<String, Count>,
}

pub type Count = i64;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize)]
pub enum OffsetKind {
    #[default]
    Add,
    Remove,
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Serialize,
    Add,
    Sub,
    Neg,
    Sum,
    Display,
    From,
    Into,
)]
pub struct MonoisotopicMass(Decimal);

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Serialize,
    Add,
    Sub,
    Neg,
    Sum,
    Display,
    From,
    Into,
)]
pub struct AverageMass(Decimal);

// =====================================================================================================================

/// Anything that can be weighed using the masses stored in an [`AtomicDatabase`]
pub trait Massive {
    fn monoisotopic_mass(&self, db: &AtomicDatabase) -> Result<MonoisotopicMass>;
    fn average_mass(&self, db: &AtomicDatabase) -> Result<AverageMass>;
}

// Blanket impls

macro_rules! massive_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Massive> Massive for $ref_type {
                fn monoisotopic_mass(&self, db: &AtomicDatabase) -> Result<MonoisotopicMass> {
                    (**self).monoisotopic_mass(db)
                }

                fn average_mass(&self, db: &AtomicDatabase) -> Result<AverageMass> {
                    (**self).average_mass(db)
                }
            }
        )+
    };
}

massive_ref_impls!(&T, &mut T, Box<T>);
