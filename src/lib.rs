//! Ferrostrat is an options-strategy analytics library: a
//! Black-Scholes pricing kernel with analytic Greeks, a multi-leg
//! payoff aggregator, and a (price, time) P/L surface generator with
//! probability-weighted outcome metrics.
//!
//! The core is pure and stateless: every valuation is a deterministic
//! function of explicit inputs, there is no I/O, and grid points are
//! independently computable. Market-data retrieval, charting, and
//! caching live outside the library boundary; the core consumes
//! numeric snapshots ([`market::MarketState`], [`market::OptionQuote`])
//! and produces grids and scalar summaries.
//!
//! Scope notes:
//! - European exercise only; early exercise is out of scope.
//! - No dividend modeling; volatility is an input, never calibrated.
//! - Degenerate inputs (`T = 0`, `σ = 0`) price at exact limits and
//!   are flagged via [`core::ValuationMode`], not errors.
//!
//! # Feature Flags
//! - `parallel`: rayon-powered parallel surface generation.
//!
//! # Quick Start
//! Price a Black-Scholes call:
//! ```rust
//! use ferrostrat::core::OptionType;
//! use ferrostrat::engines::analytic::bs_price;
//!
//! let px = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0);
//! assert!(px > 10.0 && px < 11.0);
//! ```
//!
//! Analyze a strategy end to end:
//! ```rust
//! use chrono::NaiveDate;
//! use ferrostrat::market::MarketState;
//! use ferrostrat::strategy::StrategyTemplate;
//! use ferrostrat::surface::{SurfaceConfig, payoff_grid, summarize};
//!
//! let expiry = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
//! let strategy = StrategyTemplate::BullCallSpread {
//!     long_strike: 100.0,
//!     short_strike: 110.0,
//!     expiry,
//!     long_premium: 5.0,
//!     short_premium: 2.0,
//!     quantity: 1.0,
//!     implied_vol: None,
//! }
//! .build()
//! .unwrap();
//!
//! let state = MarketState::builder()
//!     .spot(104.0)
//!     .vol(0.25)
//!     .rate(0.02)
//!     .valuation_date(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let summary = summarize(&strategy, &state);
//! assert_eq!(summary.breakevens, vec![103.0]);
//! assert_eq!(summary.max_profit, Some(7.0));
//! assert_eq!(summary.max_loss, Some(-3.0));
//!
//! let grid = payoff_grid(&strategy, &state, &SurfaceConfig::around_spot(104.0)).unwrap();
//! assert_eq!(grid.values.len(), grid.n_prices() * grid.n_times());
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod rates;
pub mod strategy;
pub mod surface;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::strategy::*;
    pub use crate::surface::*;
}
