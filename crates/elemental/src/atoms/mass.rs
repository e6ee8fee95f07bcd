use std::ops::Mul;

use rust_decimal::Decimal;

use crate::{AverageMass, Count, MonoisotopicMass};

macro_rules! mass_impls {
    ($($mass_type:ident),+ $(,)?) => {
        $(
            impl $mass_type {
                #[must_use]
                pub const fn value(self) -> Decimal {
                    self.0
                }

                /// Rounds to `dp` decimal places, with midpoints rounded away from zero
                #[must_use]
                pub fn round_dp(self, dp: u32) -> Self {
                    Self(self.0.round_dp_with_strategy(
                        dp,
                        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                    ))
                }
            }

            impl Mul<Count> for $mass_type {
                type Output = Self;

                fn mul(self, rhs: Count) -> Self::Output {
                    Self(self.0 * Decimal::from(rhs))
                }
            }
        )+
    };
}

mass_impls!(MonoisotopicMass, AverageMass);
