use std::{
    fmt::{self, Display, Formatter},
    ops::Neg,
};

use crate::{Count, OffsetKind};

impl OffsetKind {
    /// Applies the sign of this offset to `value`
    pub fn offset<T: Neg<Output = T>>(self, value: T) -> T {
        match self {
            Self::Add => value,
            Self::Remove => -value,
        }
    }
}

impl Display for OffsetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Add => "+",
                Self::Remove => "-",
            }
        )
    }
}

impl From<OffsetKind> for Count {
    fn from(value: OffsetKind) -> Self {
        match value {
            OffsetKind::Add => 1,
            OffsetKind::Remove => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn offset_kind_display() {
        let add = OffsetKind::Add;
        assert_eq!(add.to_string(), "+");
        let remove = OffsetKind::Remove;
        assert_eq!(remove.to_string(), "-");
    }

    #[test]
    fn into_count() {
        assert_eq!(Count::from(OffsetKind::Add), 1);
        assert_eq!(Count::from(OffsetKind::Remove), -1);
    }

    #[test]
    fn offset_values() {
        assert_eq!(OffsetKind::Add.offset(dec!(18.0106)), dec!(18.0106));
        assert_eq!(OffsetKind::Remove.offset(dec!(18.0106)), dec!(-18.0106));
        assert_eq!(OffsetKind::Remove.offset(-3_i64), 3);
    }
}
