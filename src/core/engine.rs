//! Core traits and the library-wide error taxonomy.

use crate::core::Valuation;
use crate::market::MarketState;

/// Common trait implemented by every priceable instrument.
pub trait Instrument: std::fmt::Debug {
    /// Returns a short type identifier for diagnostics.
    fn instrument_type(&self) -> &str;
}

/// Pricing engine abstraction over an instrument type.
pub trait PricingEngine<I: Instrument> {
    /// Prices an instrument under the provided market state.
    fn price(&self, instrument: &I, market: &MarketState) -> Result<Valuation, PricingError>;
}

/// Errors surfaced by the API.
///
/// Degenerate-but-valid numeric inputs (`T = 0`, `σ = 0`) are not
/// errors; they are flagged via [`crate::core::ValuationMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Malformed numeric domain (negative strike, negative spot, ...).
    InvalidInput(String),
    /// Strategy-level constraint violation (zero legs, over the leg
    /// cap, inconsistent leg parameters).
    InvalidStrategy(String),
    /// Required implied volatility absent from market data.
    MissingVolatility(String),
    /// Boundary-payload serialization failure.
    Serialization(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidStrategy(msg) => write!(f, "invalid strategy: {msg}"),
            Self::MissingVolatility(msg) => write!(f, "missing volatility: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}
