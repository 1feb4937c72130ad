//! Shared domain types, error taxonomy, engine trait, and boundary
//! serialization helpers.

mod engine;
mod serialization;
mod types;

pub use engine::{Instrument, PricingEngine, PricingError};
pub use serialization::{from_json, to_json_pretty};
pub use types::{Greeks, OptionType, Valuation, ValuationMode};
