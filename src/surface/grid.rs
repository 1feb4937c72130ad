//! P/L surface generation over a (price, time) grid.
//!
//! The generator drives the strategy aggregator across a price axis
//! and a valuation-date axis. Interior columns revalue the strategy
//! with the pricing kernel; the terminal column is the exact
//! expiration payoff rather than the `T ≈ 0` kernel path. The two
//! agree in the limit, and the tests hold the generator to it.
//!
//! Every grid point is a pure function of (strategy, state), so rows
//! are evaluated independently; the `parallel` feature fans them out
//! with rayon without changing results.

use chrono::{Duration, NaiveDate};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::PricingError;
use crate::market::MarketState;
use crate::strategy::Strategy;

/// Price/time domain for a surface request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Lower bound of the price axis (inclusive, >= 0).
    pub price_lo: f64,
    /// Upper bound of the price axis (inclusive).
    pub price_hi: f64,
    /// Number of price samples (>= 2).
    pub price_samples: usize,
    /// Number of valuation-date samples from "now" to the final
    /// expiration (>= 2; collapses to 1 when already at expiry).
    pub time_samples: usize,
}

impl SurfaceConfig {
    /// Symmetric default domain around a spot price: ±50% with a
    /// 100x40 grid.
    pub fn around_spot(spot: f64) -> Self {
        Self {
            price_lo: spot * 0.5,
            price_hi: spot * 1.5,
            price_samples: 100,
            time_samples: 40,
        }
    }

    /// Validates the domain.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.price_lo.is_finite() || !self.price_hi.is_finite() || self.price_lo < 0.0 {
            return Err(PricingError::InvalidInput(
                "price bounds must be finite and non-negative".to_string(),
            ));
        }
        if self.price_hi <= self.price_lo {
            return Err(PricingError::InvalidInput(
                "price upper bound must exceed lower bound".to_string(),
            ));
        }
        if self.price_samples < 2 || self.time_samples < 2 {
            return Err(PricingError::InvalidInput(
                "price and time axes need at least 2 samples".to_string(),
            ));
        }
        Ok(())
    }
}

/// Net P/L values over a (price, time) grid, row-major by price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffGrid {
    /// Price axis, ascending.
    pub prices: Vec<f64>,
    /// Valuation-date axis, ascending; the last entry is the final
    /// expiration.
    pub dates: Vec<NaiveDate>,
    /// `values[i * dates.len() + j]` is the P/L at price `i`, date `j`.
    pub values: Vec<f64>,
}

impl PayoffGrid {
    /// Number of price samples.
    #[inline]
    pub fn n_prices(&self) -> usize {
        self.prices.len()
    }

    /// Number of time samples.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.dates.len()
    }

    /// P/L at (price index, time index).
    #[inline]
    pub fn value_at(&self, price_idx: usize, time_idx: usize) -> f64 {
        self.values[price_idx * self.dates.len() + time_idx]
    }

    /// The terminal (expiration) P/L column.
    pub fn terminal_column(&self) -> Vec<f64> {
        let last = self.dates.len() - 1;
        (0..self.prices.len())
            .map(|i| self.value_at(i, last))
            .collect()
    }
}

/// Evenly spaced price axis, endpoints included.
fn price_axis(lo: f64, hi: f64, samples: usize) -> Vec<f64> {
    let step = (hi - lo) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            if i + 1 == samples {
                hi
            } else {
                lo + step * i as f64
            }
        })
        .collect()
}

/// Valuation-date axis from `start` to `end` inclusive. Dates are
/// whole days, so short horizons may yield fewer than `samples`
/// distinct dates; duplicates are dropped and both endpoints kept.
fn time_axis(start: NaiveDate, end: NaiveDate, samples: usize) -> Vec<NaiveDate> {
    let span = (end - start).num_days();
    if span <= 0 {
        return vec![start];
    }
    let mut dates: Vec<NaiveDate> = (0..samples)
        .map(|i| {
            let frac = i as f64 / (samples - 1) as f64;
            start + Duration::days((frac * span as f64).round() as i64)
        })
        .collect();
    dates.dedup();
    debug_assert_eq!(dates.first(), Some(&start));
    debug_assert_eq!(dates.last(), Some(&end));
    dates
}

/// Generates the P/L surface for a strategy.
///
/// The time axis sweeps valuation dates from the state's valuation
/// date to the latest leg expiration; volatility and rate are held at
/// the state's values (sweep vol separately via
/// [`vol_shifted_grids`]).
///
/// # Errors
/// [`PricingError::InvalidInput`] for an invalid domain or a
/// valuation date already past the final expiration.
pub fn payoff_grid(
    strategy: &Strategy,
    state: &MarketState,
    config: &SurfaceConfig,
) -> Result<PayoffGrid, PricingError> {
    config.validate()?;
    let final_date = strategy.latest_expiry().unwrap_or(state.valuation_date);
    if state.valuation_date > final_date {
        return Err(PricingError::InvalidInput(format!(
            "valuation date {} is after the final expiration {final_date}",
            state.valuation_date
        )));
    }

    let prices = price_axis(config.price_lo, config.price_hi, config.price_samples);
    let dates = time_axis(state.valuation_date, final_date, config.time_samples);
    let n_times = dates.len();

    let row = |price: f64| -> Vec<f64> {
        let mut out = Vec::with_capacity(n_times);
        for (j, &date) in dates.iter().enumerate() {
            if j + 1 == n_times {
                // Exact intrinsic payoff at expiration, by contract.
                out.push(strategy.net_payoff_at_expiry(price));
            } else {
                let swept = state.with_valuation_date(date).with_spot(price);
                out.push(strategy.net_pl(&swept));
            }
        }
        out
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = prices.par_iter().map(|&p| row(p)).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = prices.iter().map(|&p| row(p)).collect();

    debug!(
        strategy = strategy.name(),
        n_prices = prices.len(),
        n_times,
        "payoff grid generated"
    );
    Ok(PayoffGrid {
        prices,
        dates,
        values: rows.concat(),
    })
}

/// Generates one grid per volatility shift, the optional third sweep
/// dimension for IV-sensitivity views.
pub fn vol_shifted_grids(
    strategy: &Strategy,
    state: &MarketState,
    config: &SurfaceConfig,
    shifts: &[f64],
) -> Result<Vec<(f64, PayoffGrid)>, PricingError> {
    shifts
        .iter()
        .map(|&shift| {
            if !shift.is_finite() {
                return Err(PricingError::InvalidInput(
                    "volatility shift must be finite".to_string(),
                ));
            }
            let shifted = state.with_vol_shift(shift);
            Ok((shift, payoff_grid(strategy, &shifted, config)?))
        })
        .collect()
}
