use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const CURRENCY_CODE: &str = "INR";

/// Number of minor units (paise) in one major unit (rupee).
const MINOR_UNITS: i64 = 100;
const SCALE: u32 = 2;

//--------------------------------------       Money         ---------------------------------------------------------
/// A fixed-point monetary amount with a scale of 2, stored as an integer number of minor units (paise).
///
/// The integer representation is also what the payment gateway expects, so no conversion is needed when sending
/// amounts over the wire. Floating point is never used to represent money. On the JSON side, amounts are written as
/// decimal strings, e.g. `"150.00"`.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from_paise(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * MINOR_UNITS)
    }

    /// The amount in minor units (paise).
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Converts an arbitrary-precision decimal into `Money`, rounding half-up (away from zero on the midpoint) to two
    /// decimal places.
    pub fn from_decimal_rounded(value: Decimal) -> Result<Self, MoneyConversionError> {
        let rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        Self::try_from(rounded)
    }
}

/// Strict conversion. Values with more than two significant decimal places are rejected rather than silently rounded.
impl TryFrom<Decimal> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(MoneyConversionError(format!("{value} has more than {SCALE} decimal places")));
        }
        let minor = value * Decimal::from(MINOR_UNITS);
        i64::try_from(minor.trunc()).map(Self).map_err(|e| MoneyConversionError(format!("{value} is out of range. {e}")))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.to_decimal())
    }
}
