//! Canonical option contract definition used throughout the library.
//!
//! [`OptionContract`] stores side, strike, and expiration date. The
//! expiration is a calendar date rather than a year fraction because
//! mixed-expiration strategies (calendars, diagonals) need each leg's
//! remaining time derived from one shared valuation date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Instrument, OptionType, PricingError};
use crate::rates::{DayCountConvention, year_fraction};

/// Vanilla European option contract.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use ferrostrat::core::OptionType;
/// use ferrostrat::instruments::OptionContract;
///
/// let expiry = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
/// let call = OptionContract::call(100.0, expiry);
/// assert_eq!(call.option_type, OptionType::Call);
/// assert!(call.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike level.
    pub strike: f64,
    /// Expiration date.
    pub expiry: NaiveDate,
}

impl OptionContract {
    /// Builds a call contract.
    pub fn call(strike: f64, expiry: NaiveDate) -> Self {
        Self {
            option_type: OptionType::Call,
            strike,
            expiry,
        }
    }

    /// Builds a put contract.
    pub fn put(strike: f64, expiry: NaiveDate) -> Self {
        Self {
            option_type: OptionType::Put,
            strike,
            expiry,
        }
    }

    /// Validates contract fields.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidInput`] when the strike is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(
                "option strike must be a positive finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Intrinsic value at the given underlying price.
    #[inline]
    pub fn intrinsic(&self, spot: f64) -> f64 {
        match self.option_type {
            OptionType::Call => (spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - spot).max(0.0),
        }
    }

    /// Remaining time to expiry in years under Act/365F, floored at
    /// zero once the expiration has passed.
    #[inline]
    pub fn time_to_expiry(&self, valuation_date: NaiveDate) -> f64 {
        year_fraction(valuation_date, self.expiry, DayCountConvention::Act365Fixed).max(0.0)
    }
}

impl Instrument for OptionContract {
    fn instrument_type(&self) -> &str {
        "OptionContract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_non_positive_strike() {
        let contract = OptionContract::call(0.0, d(2026, 9, 18));
        assert!(matches!(
            contract.validate(),
            Err(PricingError::InvalidInput(_))
        ));
        let contract = OptionContract::put(f64::NAN, d(2026, 9, 18));
        assert!(contract.validate().is_err());
    }

    #[test]
    fn intrinsic_by_moneyness() {
        let call = OptionContract::call(100.0, d(2026, 9, 18));
        assert_relative_eq!(call.intrinsic(110.0), 10.0);
        assert_relative_eq!(call.intrinsic(90.0), 0.0);
        let put = OptionContract::put(100.0, d(2026, 9, 18));
        assert_relative_eq!(put.intrinsic(90.0), 10.0);
        assert_relative_eq!(put.intrinsic(110.0), 0.0);
    }

    #[test]
    fn time_to_expiry_floors_at_zero_after_expiration() {
        let contract = OptionContract::call(100.0, d(2026, 9, 18));
        assert!(contract.time_to_expiry(d(2026, 8, 19)) > 0.0);
        assert_eq!(contract.time_to_expiry(d(2026, 10, 1)), 0.0);
    }
}
