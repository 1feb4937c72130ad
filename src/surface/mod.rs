//! P/L surfaces over (price, time), probability metrics, and the
//! strategy summary payload.

mod grid;
mod probability;
mod summary;

pub use grid::{PayoffGrid, SurfaceConfig, payoff_grid, vol_shifted_grids};
pub use probability::{expected_pl, probability_of_profit};
pub use summary::{LegReport, StrategySummary, summarize};
