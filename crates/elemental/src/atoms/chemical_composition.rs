// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

// Local Crate Imports
use crate::{
    AtomicDatabase, AverageMass, ChemicalComposition, Count, Massive, MonoisotopicMass, Result,
    parsers::{chemical_formula, errors::CompositionError, strict_chemical_formula},
};

// Public API ==========================================================================================================

impl ChemicalComposition {
    /// Leniently parses `formula`, skipping any characters that aren't part of an element symbol or its count
    #[must_use]
    pub fn new(formula: &str) -> Self {
        chemical_formula(formula)
            .map(|(_, composition)| composition)
            .unwrap_or_default()
    }

    /// Parses `formula`, rejecting anything that isn't an element symbol or its count
    pub fn new_strict(formula: &str) -> Result<Self, CompositionError> {
        strict_chemical_formula(formula)
    }

    #[must_use]
    pub fn count(&self, symbol: &str) -> Count {
        self.counts.get(symbol).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Count)> {
        self.counts.iter().map(|(s, &c)| (s.as_str(), c))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub(crate) fn add_atoms(&mut self, symbol: &str, count: Count) {
        *self.counts.entry(symbol.to_owned()).or_default() += count;
    }
}

impl Massive for ChemicalComposition {
    fn monoisotopic_mass(&self, db: &AtomicDatabase) -> Result<MonoisotopicMass> {
        self.iter()
            .map(|(symbol, count)| -> Result<_> {
                let mass = db.element(symbol)?.monoisotopic_mass;
                Ok(MonoisotopicMass::from(mass) * count)
            })
            .sum()
    }

    fn average_mass(&self, db: &AtomicDatabase) -> Result<AverageMass> {
        self.iter()
            .map(|(symbol, count)| -> Result<_> {
                let mass = db.element(symbol)?.average_mass;
                Ok(AverageMass::from(mass) * count)
            })
            .sum()
    }
}

// Composition Algebra =================================================================================================

impl AddAssign<&Self> for ChemicalComposition {
    fn add_assign(&mut self, rhs: &Self) {
        for (symbol, count) in rhs.iter() {
            self.add_atoms(symbol, count);
        }
    }
}

impl Add for ChemicalComposition {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl Sub for ChemicalComposition {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl Neg for ChemicalComposition {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1
    }
}

impl Mul<Count> for ChemicalComposition {
    type Output = Self;

    fn mul(mut self, rhs: Count) -> Self::Output {
        for count in self.counts.values_mut() {
            *count *= rhs;
        }
        self
    }
}

impl Sum for ChemicalComposition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for ChemicalComposition {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, c| {
            acc += c;
            acc
        })
    }
}

// Formatting ==========================================================================================================

// NOTE: Written in Hill order: carbon, then hydrogen, then everything else alphabetically. Without any carbon, the
// whole formula is alphabetical. Zero counts are left out and counts of one are implicit
impl Display for ChemicalComposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let nonzero = || self.iter().filter(|&(_, c)| c != 0);
        let has_carbon = self.count("C") != 0;
        let hill_rank = |symbol: &str| match symbol {
            "C" if has_carbon => 0,
            "H" if has_carbon => 1,
            _ => 2,
        };

        let mut atoms: Vec<_> = nonzero().collect();
        // NOTE: The sort is stable and `BTreeMap` iteration is already alphabetical
        atoms.sort_by_key(|&(s, _)| hill_rank(s));
        for (symbol, count) in atoms {
            if count == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}{count}")?;
            }
        }
        Ok(())
    }
}

// Module Tests ========================================================================================================
