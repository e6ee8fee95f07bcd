// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Index, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

// External Crate Imports
use serde::{Serialize, Serializer};

// Local Crate Imports
use super::errors::AtomicLookupError;
use crate::{
    AtomicDatabase, AverageMass, ChemicalComposition, Count, Element, ElementalComposition,
    ElementalError, Massive, MonoisotopicMass, Result,
};

// Public API ==========================================================================================================

impl ElementalComposition {
    pub const WATER: Self = Self::new(0, 2, 0, 1, 0);

    #[must_use]
    pub const fn new(
        carbon: Count,
        hydrogen: Count,
        nitrogen: Count,
        oxygen: Count,
        sulfur: Count,
    ) -> Self {
        Self {
            counts: [carbon, hydrogen, nitrogen, oxygen, sulfur],
        }
    }

    /// `count` atoms of a single `element`
    #[must_use]
    pub const fn of(element: Element, count: Count) -> Self {
        let mut counts = [0; Element::COUNT];
        counts[element.index()] = count;
        Self { counts }
    }

    #[must_use]
    pub const fn count(&self, element: Element) -> Count {
        self.counts[element.index()]
    }

    /// Every element and its count, zeroes included, in Hill order
    pub fn iter(&self) -> impl Iterator<Item = (Element, Count)> + '_ {
        Element::ALL.into_iter().map(|e| (e, self.count(e)))
    }
}

impl Massive for ElementalComposition {
    fn monoisotopic_mass(&self, db: &AtomicDatabase) -> Result<MonoisotopicMass> {
        self.iter()
            .map(|(element, count)| -> Result<_> {
                let mass = db.element_named(element.name())?.monoisotopic_mass;
                Ok(MonoisotopicMass::from(mass) * count)
            })
            .sum()
    }

    fn average_mass(&self, db: &AtomicDatabase) -> Result<AverageMass> {
        self.iter()
            .map(|(element, count)| -> Result<_> {
                let mass = db.element_named(element.name())?.average_mass;
                Ok(AverageMass::from(mass) * count)
            })
            .sum()
    }
}

// Conversions =========================================================================================================

impl TryFrom<&ChemicalComposition> for ElementalComposition {
    type Error = AtomicLookupError;

    fn try_from(value: &ChemicalComposition) -> Result<Self, Self::Error> {
        value.iter().try_fold(Self::default(), |acc, (symbol, count)| {
            let element =
                Element::from_symbol(symbol).ok_or_else(|| AtomicLookupError::unsupported(symbol))?;
            Ok(acc + Self::of(element, count))
        })
    }
}

impl From<ElementalComposition> for ChemicalComposition {
    fn from(value: ElementalComposition) -> Self {
        let mut composition = Self::default();
        for (element, count) in value.iter() {
            composition.add_atoms(element.symbol(), count);
        }
        composition
    }
}

impl FromStr for ElementalComposition {
    type Err = Box<ElementalError>;

    fn from_str(s: &str) -> Result<Self> {
        let composition = ChemicalComposition::new_strict(s)?;
        Ok(Self::try_from(&composition)?)
    }
}

// Composition Algebra =================================================================================================

impl Index<Element> for ElementalComposition {
    type Output = Count;

    fn index(&self, index: Element) -> &Self::Output {
        &self.counts[index.index()]
    }
}

impl Add for ElementalComposition {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for ElementalComposition {
    fn add_assign(&mut self, rhs: Self) {
        for (count, other) in self.counts.iter_mut().zip(rhs.counts) {
            *count += other;
        }
    }
}

impl Sub for ElementalComposition {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl SubAssign for ElementalComposition {
    fn sub_assign(&mut self, rhs: Self) {
        *self += -rhs;
    }
}

impl Neg for ElementalComposition {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1
    }
}

impl Mul<Count> for ElementalComposition {
    type Output = Self;

    fn mul(self, rhs: Count) -> Self::Output {
        Self {
            counts: self.counts.map(|c| c * rhs),
        }
    }
}

impl Sum for ElementalComposition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for ElementalComposition {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// Formatting and Serialization ========================================================================================

impl Display for ElementalComposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (element, count) in self.iter().filter(|&(_, c)| c != 0) {
            if count == 1 {
                write!(f, "{element}")?;
            } else {
                write!(f, "{element}{count}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for ElementalComposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(e, c)| (e.symbol(), c)))
    }
}

// Module Tests ========================================================================================================
