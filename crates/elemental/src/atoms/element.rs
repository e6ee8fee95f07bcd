use std::fmt::{self, Display, Formatter};

use crate::Element;

impl Element {
    pub const COUNT: usize = 5;

    /// Every element, in Hill order (carbon, then hydrogen, then the rest alphabetically by symbol)
    pub const ALL: [Self; Self::COUNT] = [
        Self::Carbon,
        Self::Hydrogen,
        Self::Nitrogen,
        Self::Oxygen,
        Self::Sulfur,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Carbon => "C",
            Self::Hydrogen => "H",
            Self::Nitrogen => "N",
            Self::Oxygen => "O",
            Self::Sulfur => "S",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Carbon => "Carbon",
            Self::Hydrogen => "Hydrogen",
            Self::Nitrogen => "Nitrogen",
            Self::Oxygen => "Oxygen",
            Self::Sulfur => "Sulfur",
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.symbol() == symbol)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for element in Element::ALL {
            assert_eq!(Element::from_symbol(element.symbol()), Some(element));
        }
        assert_eq!(Element::from_symbol("Na"), None);
        assert_eq!(Element::from_symbol("c"), None);
    }

    #[test]
    fn element_display() {
        assert_eq!(Element::Sulfur.to_string(), "S");
        assert_eq!(Element::Nitrogen.name(), "Nitrogen");
    }

    #[test]
    fn indices_follow_hill_order() {
        let indices: Vec<_> = Element::ALL.iter().map(|e| e.index()).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
    }
}
