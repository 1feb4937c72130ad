//! Analytic Black-Scholes kernel for European vanilla options.
//!
//! The free functions are the hot path used by leg valuation and grid
//! sweeps; they assume domain-valid inputs and resolve the degenerate
//! `expiry <= 0` and `vol <= 0` branches to exact limits instead of
//! dividing by zero. [`bs_price_and_greeks`] is the validated entry
//! point, and [`BlackScholesEngine`] adapts the kernel to the
//! instrument/engine traits.
//!
//! Greeks are the analytic partial derivatives, not finite
//! differences, so downstream sweeps stay noise-free.

use crate::core::{Greeks, OptionType, PricingEngine, PricingError, Valuation, ValuationMode};
use crate::instruments::OptionContract;
use crate::market::MarketState;
use crate::math::{normal_cdf, normal_pdf};

#[inline]
fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Terminal delta by moneyness. The at-the-money tie is resolved to
/// the in-the-money side: delta is 1 for a call and -1 for a put at
/// `spot == strike_level`.
#[inline]
fn terminal_delta(option_type: OptionType, spot: f64, strike_level: f64) -> f64 {
    match option_type {
        OptionType::Call => {
            if spot >= strike_level {
                1.0
            } else {
                0.0
            }
        }
        OptionType::Put => {
            if spot <= strike_level {
                -1.0
            } else {
                0.0
            }
        }
    }
}

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes price.
///
/// Edge cases:
/// - `expiry <= 0`: intrinsic value.
/// - `vol <= 0`: zero-volatility limit, `max(±(S - K e^{-rT}), 0)`.
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 {
        return intrinsic(option_type, spot, strike);
    }
    let df = (-rate * expiry).exp();
    if vol <= 0.0 {
        return match option_type {
            OptionType::Call => (spot - strike * df).max(0.0),
            OptionType::Put => (strike * df - spot).max(0.0),
        };
    }

    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// Black-Scholes delta.
///
/// At expiry the tie-break at the strike is in-the-money: 1 for a
/// call and -1 for a put at `S == K`. In the zero-volatility limit the
/// same convention applies against the discounted strike.
#[inline]
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 {
        return terminal_delta(option_type, spot, strike);
    }
    if vol <= 0.0 {
        return terminal_delta(option_type, spot, strike * (-rate * expiry).exp());
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    }
}

/// Black-Scholes gamma. Zero in the degenerate branches.
#[inline]
pub fn bs_gamma(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

/// Black-Scholes vega. Zero in the degenerate branches.
#[inline]
pub fn bs_vega(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    spot * normal_pdf(d1) * expiry.sqrt()
}

/// Black-Scholes theta (per year). Zero in the degenerate branches.
#[inline]
pub fn bs_theta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    let decay = -spot * normal_pdf(d1) * vol / (2.0 * expiry.sqrt());
    match option_type {
        OptionType::Call => decay - rate * strike * df * normal_cdf(d2),
        OptionType::Put => decay + rate * strike * df * normal_cdf(-d2),
    }
}

/// Black-Scholes rho. Zero in the degenerate branches.
#[inline]
pub fn bs_rho(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (_, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => strike * expiry * df * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df * normal_cdf(-d2),
    }
}

/// Unvalidated price-plus-Greeks evaluation for callers that have
/// already checked their domains (leg valuation, grid sweeps).
pub fn bs_valuation(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Valuation {
    let mode = if expiry <= 0.0 {
        ValuationMode::Intrinsic
    } else if vol <= 0.0 {
        ValuationMode::ZeroVol
    } else {
        ValuationMode::Model
    };
    Valuation {
        price: bs_price(option_type, spot, strike, rate, vol, expiry),
        greeks: Greeks {
            delta: bs_delta(option_type, spot, strike, rate, vol, expiry),
            gamma: bs_gamma(spot, strike, rate, vol, expiry),
            vega: bs_vega(spot, strike, rate, vol, expiry),
            theta: bs_theta(option_type, spot, strike, rate, vol, expiry),
            rho: bs_rho(option_type, spot, strike, rate, vol, expiry),
        },
        mode,
    }
}

/// Validated kernel entry point.
///
/// # Errors
/// [`PricingError::InvalidInput`] when `spot <= 0`, `strike <= 0`,
/// `expiry < 0`, `vol < 0`, or any input is non-finite. Degenerate
/// `expiry == 0` / `vol == 0` inputs are valid and flagged through
/// [`ValuationMode`].
///
/// # Examples
/// ```
/// use ferrostrat::core::{OptionType, ValuationMode};
/// use ferrostrat::engines::analytic::bs_price_and_greeks;
///
/// let v = bs_price_and_greeks(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
/// assert!(v.price > 10.0 && v.price < 11.0);
/// assert_eq!(v.mode, ValuationMode::Model);
/// assert!(v.greeks.delta > 0.0 && v.greeks.delta < 1.0);
/// ```
pub fn bs_price_and_greeks(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Result<Valuation, PricingError> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(PricingError::InvalidInput(
            "spot must be a positive finite number".to_string(),
        ));
    }
    if !strike.is_finite() || strike <= 0.0 {
        return Err(PricingError::InvalidInput(
            "strike must be a positive finite number".to_string(),
        ));
    }
    if !expiry.is_finite() || expiry < 0.0 {
        return Err(PricingError::InvalidInput(
            "time to expiry must be >= 0".to_string(),
        ));
    }
    if !vol.is_finite() || vol < 0.0 {
        return Err(PricingError::InvalidInput(
            "volatility must be >= 0".to_string(),
        ));
    }
    if !rate.is_finite() {
        return Err(PricingError::InvalidInput(
            "rate must be finite".to_string(),
        ));
    }
    Ok(bs_valuation(option_type, spot, strike, rate, vol, expiry))
}

/// Batched price evaluation over a spot axis, for grid hot loops.
///
/// The discount factor and d1/d2 drift terms are hoisted out of the
/// per-spot work. Summation/evaluation order carries no semantic
/// weight; results match the scalar [`bs_price`] exactly.
pub fn bs_price_slice(
    option_type: OptionType,
    spots: &[f64],
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Vec<f64> {
    if expiry <= 0.0 {
        return spots
            .iter()
            .map(|&s| intrinsic(option_type, s, strike))
            .collect();
    }
    let df = (-rate * expiry).exp();
    if vol <= 0.0 {
        let k_df = strike * df;
        return spots
            .iter()
            .map(|&s| match option_type {
                OptionType::Call => (s - k_df).max(0.0),
                OptionType::Put => (k_df - s).max(0.0),
            })
            .collect();
    }

    let inv_sig_sqrt_t = 1.0 / (vol * expiry.sqrt());
    let sig_sqrt_t = vol * expiry.sqrt();
    let drift = (rate + 0.5 * vol * vol) * expiry;
    let k_df = strike * df;
    spots
        .iter()
        .map(|&s| {
            let d1 = ((s / strike).ln() + drift) * inv_sig_sqrt_t;
            let d2 = d1 - sig_sqrt_t;
            match option_type {
                OptionType::Call => s * normal_cdf(d1) - k_df * normal_cdf(d2),
                OptionType::Put => k_df * normal_cdf(-d2) - s * normal_cdf(-d1),
            }
        })
        .collect()
}

/// Analytic Black-Scholes engine for [`OptionContract`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine<OptionContract> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &OptionContract,
        market: &MarketState,
    ) -> Result<Valuation, PricingError> {
        instrument.validate()?;
        let expiry = instrument.time_to_expiry(market.valuation_date);
        bs_price_and_greeks(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.shifted_vol(),
            expiry,
        )
    }
}
