use chrono::NaiveDate;

/// Supported day-count conventions for time-to-expiry measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCountConvention {
    /// Actual day count over a 360-day year.
    Act360,
    /// Actual day count over a 365-day year. The strategy layer's
    /// default.
    Act365Fixed,
}

/// Computes the year fraction between two dates under a day-count
/// convention.
///
/// Edge cases:
/// - If `start == end`, returns `0.0`.
/// - If `start > end`, the result is negative and antisymmetric.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use ferrostrat::rates::{DayCountConvention, year_fraction};
///
/// let s = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let e = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
/// let yf = year_fraction(s, e, DayCountConvention::Act365Fixed);
/// assert!((yf - 1.0).abs() < 1.0e-8);
/// ```
pub fn year_fraction(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> f64 {
    if start == end {
        return 0.0;
    }
    if start > end {
        return -year_fraction(end, start, convention);
    }

    match convention {
        DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
        DayCountConvention::Act365Fixed => (end - start).num_days() as f64 / 365.0,
    }
}
