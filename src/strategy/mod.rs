//! Legs, the multi-leg strategy aggregator, and the strategy catalog.

mod catalog;
mod leg;
#[allow(clippy::module_inception)]
mod strategy;

pub use catalog::StrategyTemplate;
pub use leg::{Leg, LegKind};
pub use strategy::{DEFAULT_MAX_LEGS, HARD_MAX_LEGS, Strategy};
