use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Operations store their `money_sum` with this type to avoid floating-point
/// drift; the wire format is a decimal number with at most two fractional
/// digits.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Converting from a decimal (rejects > 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::try_from(10.5).unwrap().cents(), 1050);
/// assert_eq!(MoneyCents::try_from(0.01).unwrap().cents(), 1);
/// assert!(MoneyCents::try_from(12.345).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// The amount as a decimal number, for the wire.
    #[must_use]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl TryFrom<f64> for MoneyCents {
    type Error = EngineError;

    /// Converts a decimal amount into cents.
    ///
    /// Validation rules:
    /// - the value must be finite
    /// - max 2 fractional digits (rejects `12.345`)
    /// - the result must fit in `i64` cents
    ///
    /// The sign is kept: whether a negative amount is acceptable is up to the
    /// caller.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(EngineError::Validation("invalid amount".to_string()));
        }

        let scaled = value * 100.0;
        let rounded = scaled.round();
        // Tolerate binary representation noise such as 0.29 * 100 = 28.999...
        if (scaled - rounded).abs() > 1e-6 {
            return Err(EngineError::Validation("too many decimals".to_string()));
        }
        // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
        if rounded >= i64::MAX as f64 || rounded < i64::MIN as f64 {
            return Err(EngineError::Validation("amount too large".to_string()));
        }

        Ok(MoneyCents(rounded as i64))
    }
}
