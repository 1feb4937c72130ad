//! Probability-weighted outcome metrics.
//!
//! The terminal underlying price is modeled log-normally with drift at
//! the risk-free rate. Because the expiration payoff is
//! piecewise-linear, its sign is constant between consecutive
//! breakevens and the probability of profit is the exact sum of
//! log-normal interval masses over the profitable intervals; no Monte
//! Carlo is involved, so results are fully reproducible. The expected
//! P/L uses the same segment decomposition with closed-form partial
//! expectations.

use crate::market::MarketState;
use crate::math::LogNormalTerminal;
use crate::rates::{DayCountConvention, year_fraction};
use crate::strategy::Strategy;

/// Volatility used for outcome metrics: the mean of the option legs'
/// effective vols (per-leg implied vol or the state's flat vol, plus
/// the sweep shift), or the state's shifted vol for stock-only
/// strategies.
fn outcome_vol(strategy: &Strategy, state: &MarketState) -> f64 {
    let vols: Vec<f64> = strategy
        .legs()
        .iter()
        .filter(|leg| leg.is_option())
        .map(|leg| leg.effective_vol(state))
        .collect();
    if vols.is_empty() {
        state.shifted_vol()
    } else {
        vols.iter().sum::<f64>() / vols.len() as f64
    }
}

fn terminal_distribution(strategy: &Strategy, state: &MarketState) -> LogNormalTerminal {
    let t = strategy
        .latest_expiry()
        .map(|expiry| {
            year_fraction(state.valuation_date, expiry, DayCountConvention::Act365Fixed).max(0.0)
        })
        .unwrap_or(0.0);
    LogNormalTerminal::new(state.spot, state.rate, outcome_vol(strategy, state), t)
}

/// Probability that the strategy's expiration P/L is positive.
///
/// Exact under the log-normal terminal model: the profitable price
/// set is a union of intervals bounded by breakevens, and each
/// interval's mass comes from the log-normal CDF. Returns a value in
/// `[0, 1]`. Degenerate horizons (`σ√T = 0`) collapse to the
/// deterministic payoff sign at the forward price.
pub fn probability_of_profit(strategy: &Strategy, state: &MarketState) -> f64 {
    let dist = terminal_distribution(strategy, state);
    if dist.is_degenerate() {
        return if strategy.net_payoff_at_expiry(dist.forward()) > 0.0 {
            1.0
        } else {
            0.0
        };
    }

    let breakevens: Vec<f64> = strategy
        .expiry_breakevens()
        .into_iter()
        .filter(|&b| b > 0.0)
        .collect();
    if breakevens.is_empty() {
        // Constant payoff sign over the whole domain.
        return if strategy.net_payoff_at_expiry(state.spot) > 0.0 {
            1.0
        } else {
            0.0
        };
    }

    let mut bounds = vec![0.0];
    bounds.extend(&breakevens);
    bounds.push(f64::INFINITY);

    let mut prob = 0.0;
    for pair in bounds.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let mid = interval_midpoint(a, b);
        if strategy.net_payoff_at_expiry(mid) > 0.0 {
            prob += dist.mass(a, b);
        }
    }
    prob.clamp(0.0, 1.0)
}

/// Expected expiration P/L under the log-normal terminal model.
///
/// The payoff is linear on each segment between strikes, so the
/// expectation is the exact sum of `α·P(a < S ≤ b) + β·E[S·1{a < S ≤ b}]`
/// over segments, with the open tail handled through the asymptotic
/// slope.
pub fn expected_pl(strategy: &Strategy, state: &MarketState) -> f64 {
    let dist = terminal_distribution(strategy, state);
    if dist.is_degenerate() {
        return strategy.net_payoff_at_expiry(dist.forward());
    }

    let mut kinks = vec![0.0];
    kinks.extend(strategy.strikes());

    let mut expectation = 0.0;
    for pair in kinks.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (fa, fb) = (
            strategy.net_payoff_at_expiry(a),
            strategy.net_payoff_at_expiry(b),
        );
        let slope = (fb - fa) / (b - a);
        let alpha = fa - slope * a;
        expectation += alpha * dist.mass(a, b) + slope * dist.partial_mean(a, b);
    }

    let last = *kinks.last().expect("kinks always contains 0.0");
    let f_last = strategy.net_payoff_at_expiry(last);
    let (_, right_slope) = strategy.asymptotic_slopes();
    let alpha = f_last - right_slope * last;
    expectation += alpha * dist.mass(last, f64::INFINITY)
        + right_slope * dist.partial_mean(last, f64::INFINITY);
    expectation
}

fn interval_midpoint(a: f64, b: f64) -> f64 {
    if a <= 0.0 {
        0.5 * b
    } else if b.is_infinite() {
        2.0 * a
    } else {
        0.5 * (a + b)
    }
}
