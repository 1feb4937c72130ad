//! Day-count conventions bridging calendar dates to year fractions.

mod day_count;

pub use day_count::{DayCountConvention, year_fraction};
