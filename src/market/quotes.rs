//! Market-data input boundary.
//!
//! The core does no fetching, caching, or retries; collaborators hand
//! it quotes in this shape. A quote without an implied volatility is
//! usable for chain display but not for model valuation, and that
//! absence surfaces as a distinct condition rather than a silent
//! default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// One option quote as supplied by a market-data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price.
    pub strike: f64,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Implied volatility, when the data source provides one.
    pub implied_vol: Option<f64>,
    /// Last traded premium, when available.
    pub last: Option<f64>,
}

impl OptionQuote {
    /// Returns the implied volatility or a [`PricingError::MissingVolatility`]
    /// so the caller can decide whether to substitute a fallback.
    pub fn implied_vol(&self) -> Result<f64, PricingError> {
        self.implied_vol.ok_or_else(|| {
            PricingError::MissingVolatility(format!(
                "no implied volatility for strike {} expiring {}",
                self.strike, self.expiry
            ))
        })
    }
}
