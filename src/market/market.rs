//! Market snapshot used by all valuation paths.
//!
//! A [`MarketState`] is never mutated in place: price/time/vol sweeps
//! derive fresh states through `with_spot`, `with_valuation_date`, and
//! `with_vol_shift`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Market snapshot at which a computation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Spot price of the underlying.
    pub spot: f64,
    /// Flat annualized volatility used for legs without their own
    /// implied vol.
    pub vol: f64,
    /// Continuously compounded annualized risk-free rate.
    pub rate: f64,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Parallel shift applied on top of per-leg implied vols, the
    /// optional third sweep dimension for IV-sensitivity views.
    pub vol_shift: f64,
}

impl MarketState {
    /// Starts a market-state builder.
    #[inline]
    pub fn builder() -> MarketStateBuilder {
        MarketStateBuilder::default()
    }

    /// Returns spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the flat volatility before any shift.
    #[inline]
    pub fn vol(&self) -> f64 {
        self.vol
    }

    /// Returns risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Flat volatility with the sweep shift applied, floored at zero.
    #[inline]
    pub fn shifted_vol(&self) -> f64 {
        (self.vol + self.vol_shift).max(0.0)
    }

    /// New state at a different underlying price.
    ///
    /// Sweeps may pass `spot == 0.0` for the bottom of a price axis;
    /// user-facing construction goes through the validating builder.
    #[inline]
    pub fn with_spot(&self, spot: f64) -> Self {
        debug_assert!(spot >= 0.0, "swept spot must be non-negative");
        Self { spot, ..*self }
    }

    /// New state at a different valuation date.
    #[inline]
    pub fn with_valuation_date(&self, valuation_date: NaiveDate) -> Self {
        Self {
            valuation_date,
            ..*self
        }
    }

    /// New state with a parallel volatility shift.
    #[inline]
    pub fn with_vol_shift(&self, vol_shift: f64) -> Self {
        Self { vol_shift, ..*self }
    }
}

/// Builder for [`MarketState`].
#[derive(Debug, Clone, Default)]
pub struct MarketStateBuilder {
    spot: Option<f64>,
    vol: Option<f64>,
    rate: Option<f64>,
    valuation_date: Option<NaiveDate>,
    vol_shift: Option<f64>,
}

impl MarketStateBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat volatility.
    #[inline]
    pub fn vol(mut self, vol: f64) -> Self {
        self.vol = Some(vol);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the valuation date.
    #[inline]
    pub fn valuation_date(mut self, valuation_date: NaiveDate) -> Self {
        self.valuation_date = Some(valuation_date);
        self
    }

    /// Sets the parallel volatility shift.
    #[inline]
    pub fn vol_shift(mut self, vol_shift: f64) -> Self {
        self.vol_shift = Some(vol_shift);
        self
    }

    /// Validates and builds a [`MarketState`].
    pub fn build(self) -> Result<MarketState, PricingError> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market spot must be > 0".to_string(),
            ));
        }

        let vol = self
            .vol
            .ok_or_else(|| PricingError::InvalidInput("market vol is required".to_string()))?;
        if !vol.is_finite() || vol < 0.0 {
            return Err(PricingError::InvalidInput(
                "market vol must be >= 0".to_string(),
            ));
        }

        let rate = self.rate.unwrap_or(0.0);
        if !rate.is_finite() {
            return Err(PricingError::InvalidInput(
                "market rate must be finite".to_string(),
            ));
        }

        let valuation_date = self.valuation_date.ok_or_else(|| {
            PricingError::InvalidInput("market valuation date is required".to_string())
        })?;

        let vol_shift = self.vol_shift.unwrap_or(0.0);
        if !vol_shift.is_finite() {
            return Err(PricingError::InvalidInput(
                "market vol shift must be finite".to_string(),
            ));
        }

        Ok(MarketState {
            spot,
            vol,
            rate,
            valuation_date,
            vol_shift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn builder_validates_domains() {
        let base = MarketState::builder()
            .spot(100.0)
            .vol(0.2)
            .rate(0.03)
            .valuation_date(d(2026, 8, 7));
        assert!(base.clone().build().is_ok());
        assert!(base.clone().spot(-1.0).build().is_err());
        assert!(base.clone().vol(-0.1).build().is_err());
        assert!(base.clone().rate(f64::NAN).build().is_err());
        assert!(MarketState::builder().spot(100.0).build().is_err());
    }

    #[test]
    fn derived_states_leave_the_original_untouched() {
        let state = MarketState::builder()
            .spot(100.0)
            .vol(0.2)
            .valuation_date(d(2026, 8, 7))
            .build()
            .unwrap();
        let bumped = state.with_spot(105.0).with_vol_shift(0.05);
        assert_eq!(state.spot, 100.0);
        assert_eq!(state.vol_shift, 0.0);
        assert_eq!(bumped.spot, 105.0);
        assert_eq!(bumped.shifted_vol(), 0.25);
    }
}
