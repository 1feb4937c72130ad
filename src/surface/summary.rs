//! Scalar strategy summary handed to the presentation layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Greeks;
use crate::market::MarketState;
use crate::strategy::Strategy;
use crate::surface::probability::{expected_pl, probability_of_profit};

/// Per-leg valuation snapshot for position tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegReport {
    /// Human-readable leg label.
    pub description: String,
    /// Signed market value under the summarized state, multiplier
    /// applied.
    pub market_value: f64,
    /// Signed theoretical P/L versus entry, multiplier applied.
    pub pl: f64,
    /// Unrealized P/L against the leg's attached market price, when
    /// one was supplied.
    pub unrealized_pl: Option<f64>,
    /// Quantity-weighted Greeks, multiplier applied.
    pub greeks: Greeks,
}

/// Strategy-level scalar summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub name: String,
    /// Signed net entry cost (positive = net debit).
    pub net_entry_cost: f64,
    /// Net theoretical value under the summarized state.
    pub net_value: f64,
    /// Net theoretical P/L under the summarized state.
    pub net_pl: f64,
    /// Expiration P/L at the current spot.
    pub profit_at_spot: f64,
    /// Maximum profit at expiration; `None` when unbounded.
    pub max_profit: Option<f64>,
    /// Maximum loss at expiration; `None` when unbounded.
    pub max_loss: Option<f64>,
    /// `|max profit| / |max loss|` when both are defined.
    pub risk_reward_ratio: Option<f64>,
    /// All expiration breakevens over non-negative prices.
    pub breakevens: Vec<f64>,
    /// Probability the expiration P/L is positive, in `[0, 1]`.
    pub probability_of_profit: f64,
    /// Expected expiration P/L under the log-normal terminal model.
    pub expected_pl: f64,
    /// Aggregate position Greeks under the summarized state.
    pub net_greeks: Greeks,
    /// Per-leg snapshots, in strategy order.
    pub legs: Vec<LegReport>,
}

/// Summarizes a strategy under a market state.
pub fn summarize(strategy: &Strategy, state: &MarketState) -> StrategySummary {
    let multiplier = strategy.contract_multiplier();
    let legs = strategy
        .legs()
        .iter()
        .map(|leg| LegReport {
            description: leg.describe(),
            market_value: multiplier * leg.market_value(state),
            pl: multiplier * leg.pl(state),
            unrealized_pl: leg.unrealized_pl().map(|pl| multiplier * pl),
            greeks: leg.greeks(state).scaled(multiplier),
        })
        .collect();

    let summary = StrategySummary {
        name: strategy.name().to_string(),
        net_entry_cost: strategy.net_entry_cost(),
        net_value: strategy.net_value(state),
        net_pl: strategy.net_pl(state),
        profit_at_spot: strategy.profit_at(state.spot),
        max_profit: strategy.max_profit(),
        max_loss: strategy.max_loss(),
        risk_reward_ratio: strategy.risk_reward_ratio(),
        breakevens: strategy.expiry_breakevens(),
        probability_of_profit: probability_of_profit(strategy, state),
        expected_pl: expected_pl(strategy, state),
        net_greeks: strategy.net_greeks(state),
        legs,
    };
    debug!(strategy = strategy.name(), "summary computed");
    summary
}
