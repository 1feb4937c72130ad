//! Market snapshots and the market-data input boundary.

mod market;
mod quotes;

pub use market::{MarketState, MarketStateBuilder};
pub use quotes::OptionQuote;
