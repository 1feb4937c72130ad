//! Multi-leg strategy aggregation.
//!
//! A [`Strategy`] owns an ordered collection of legs and derives
//! everything else: net entry cost, net value and P/L at a market
//! state, expiration payoff across a price axis, breakevens, and
//! analytic profit/loss bounds. Legs may expire on different dates;
//! "at expiration" is therefore parameterized by a reference date (see
//! [`Strategy::net_payoff_at_reference`]) with later-expiring legs
//! still valued by the pricing kernel at their positive remaining
//! time.
//!
//! The expiration payoff of any call/put/stock combination is
//! piecewise-linear with kinks only at leg strikes, so breakevens and
//! extrema are computed exactly from the kink set rather than from a
//! sampled grid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Greeks, OptionType, PricingError};
use crate::engines::analytic::bs_price;
use crate::market::MarketState;
use crate::rates::{DayCountConvention, year_fraction};
use crate::strategy::leg::{Leg, LegKind};

/// Default upper bound on legs per strategy.
pub const DEFAULT_MAX_LEGS: usize = 8;

/// Hard cap a configured bound may not exceed.
pub const HARD_MAX_LEGS: usize = 16;

/// An ordered collection of legs analyzed as one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    name: String,
    legs: Vec<Leg>,
    /// Units of underlying per quoted contract unit; 1.0 keeps
    /// per-share semantics, 100.0 matches US equity contracts.
    contract_multiplier: f64,
}

impl Strategy {
    /// Builds a strategy under the default leg cap.
    ///
    /// # Errors
    /// [`PricingError::InvalidStrategy`] for zero legs or more than
    /// [`DEFAULT_MAX_LEGS`].
    pub fn new<S: Into<String>>(name: S, legs: Vec<Leg>) -> Result<Self, PricingError> {
        Self::with_max_legs(name, legs, DEFAULT_MAX_LEGS)
    }

    /// Builds a strategy under a caller-configured leg cap.
    ///
    /// The cap itself is bounded by [`HARD_MAX_LEGS`].
    pub fn with_max_legs<S: Into<String>>(
        name: S,
        legs: Vec<Leg>,
        max_legs: usize,
    ) -> Result<Self, PricingError> {
        if max_legs == 0 || max_legs > HARD_MAX_LEGS {
            return Err(PricingError::InvalidStrategy(format!(
                "leg cap must be between 1 and {HARD_MAX_LEGS}, got {max_legs}"
            )));
        }
        if legs.is_empty() {
            return Err(PricingError::InvalidStrategy(
                "a strategy requires at least one leg".to_string(),
            ));
        }
        if legs.len() > max_legs {
            return Err(PricingError::InvalidStrategy(format!(
                "{} legs exceeds the cap of {max_legs}",
                legs.len()
            )));
        }
        let name = name.into();
        debug!(strategy = %name, legs = legs.len(), "strategy constructed");
        Ok(Self {
            name,
            legs,
            contract_multiplier: 1.0,
        })
    }

    /// Sets the contract multiplier (e.g. 100.0 for US equity
    /// options).
    pub fn with_contract_multiplier(mut self, multiplier: f64) -> Result<Self, PricingError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(PricingError::InvalidStrategy(
                "contract multiplier must be > 0".to_string(),
            ));
        }
        self.contract_multiplier = multiplier;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    #[inline]
    pub fn contract_multiplier(&self) -> f64 {
        self.contract_multiplier
    }

    /// Signed net entry cost: positive when the strategy was opened
    /// for a net debit.
    pub fn net_entry_cost(&self) -> f64 {
        self.contract_multiplier * self.legs.iter().map(Leg::entry_cost).sum::<f64>()
    }

    /// Latest expiration among option legs; `None` for stock-only
    /// strategies.
    pub fn latest_expiry(&self) -> Option<NaiveDate> {
        self.legs.iter().filter_map(Leg::expiry).max()
    }

    /// Earliest expiration among option legs.
    pub fn earliest_expiry(&self) -> Option<NaiveDate> {
        self.legs.iter().filter_map(Leg::expiry).min()
    }

    /// Distinct option expirations, ascending.
    pub fn expiries(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.legs.iter().filter_map(Leg::expiry).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Distinct leg strikes, ascending. These are the kinks of the
    /// expiration payoff.
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.legs.iter().filter_map(Leg::strike).collect();
        strikes.sort_unstable_by(f64::total_cmp);
        strikes.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON * a.abs().max(1.0));
        strikes
    }

    /// Net P/L at expiration for a terminal price, every option leg at
    /// its own terminal intrinsic value.
    pub fn net_payoff_at_expiry(&self, price: f64) -> f64 {
        self.contract_multiplier
            * self
                .legs
                .iter()
                .map(|leg| leg.payoff_at_expiry(price))
                .sum::<f64>()
    }

    /// Net P/L "at expiration" anchored to a reference expiry for
    /// mixed-expiration strategies.
    ///
    /// Legs expiring on or before `reference` are at terminal
    /// intrinsic value; legs expiring later are valued by the pricing
    /// kernel at their remaining time measured from `reference`, with
    /// vol/rate taken from `state`.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] when `reference` is not one of
    /// the legs' expirations.
    pub fn net_payoff_at_reference(
        &self,
        price: f64,
        reference: NaiveDate,
        state: &MarketState,
    ) -> Result<f64, PricingError> {
        if !self.expiries().contains(&reference) {
            return Err(PricingError::InvalidInput(format!(
                "reference date {reference} is not a leg expiration"
            )));
        }
        let sum: f64 = self
            .legs
            .iter()
            .map(|leg| match leg.kind() {
                LegKind::Option { contract, .. } if contract.expiry > reference => {
                    let t = year_fraction(reference, contract.expiry, DayCountConvention::Act365Fixed);
                    let value = bs_price(
                        contract.option_type,
                        price,
                        contract.strike,
                        state.rate,
                        leg.effective_vol(state),
                        t,
                    );
                    leg.quantity() * (value - leg.entry_price())
                }
                _ => leg.payoff_at_expiry(price),
            })
            .sum();
        Ok(self.contract_multiplier * sum)
    }

    /// Net theoretical value under `state`.
    pub fn net_value(&self, state: &MarketState) -> f64 {
        self.contract_multiplier
            * self
                .legs
                .iter()
                .map(|leg| leg.market_value(state))
                .sum::<f64>()
    }

    /// Net theoretical P/L under `state`: `net_value - net_entry_cost`.
    pub fn net_pl(&self, state: &MarketState) -> f64 {
        self.contract_multiplier * self.legs.iter().map(|leg| leg.pl(state)).sum::<f64>()
    }

    /// Aggregate position Greeks under `state`.
    pub fn net_greeks(&self, state: &MarketState) -> Greeks {
        let mut total = Greeks::zero();
        for leg in &self.legs {
            let g = leg.greeks(state);
            total.delta += g.delta;
            total.gamma += g.gamma;
            total.vega += g.vega;
            total.theta += g.theta;
            total.rho += g.rho;
        }
        total.scaled(self.contract_multiplier)
    }

    /// Expiration-payoff slopes below the lowest strike and above the
    /// highest strike: `(left, right)` in P/L units per unit of price.
    pub fn asymptotic_slopes(&self) -> (f64, f64) {
        let mut left = 0.0;
        let mut right = 0.0;
        for leg in &self.legs {
            match leg.kind() {
                LegKind::Option { contract, .. } => match contract.option_type {
                    OptionType::Call => right += leg.quantity(),
                    OptionType::Put => left -= leg.quantity(),
                },
                LegKind::Stock => {
                    left += leg.quantity();
                    right += leg.quantity();
                }
            }
        }
        (
            self.contract_multiplier * left,
            self.contract_multiplier * right,
        )
    }

    /// All breakevens of the expiration payoff within `[lo, hi]`.
    ///
    /// The payoff is piecewise-linear with kinks only at strikes, so
    /// each segment between consecutive kinks is solved exactly; no
    /// grid sampling is involved. Strategies without a zero crossing
    /// report an empty vector.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] unless `0 <= lo < hi` and both
    /// are finite.
    pub fn breakevens(&self, lo: f64, hi: f64) -> Result<Vec<f64>, PricingError> {
        if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi <= lo {
            return Err(PricingError::InvalidInput(
                "breakeven domain must satisfy 0 <= lo < hi".to_string(),
            ));
        }
        let mut points = vec![lo];
        points.extend(self.strikes().into_iter().filter(|&k| k > lo && k < hi));
        points.push(hi);
        Ok(self.scan_segment_roots(&points))
    }

    /// All breakevens of the expiration payoff over `[0, ∞)`.
    ///
    /// Same exact segment solve as [`Strategy::breakevens`], plus the
    /// open tail above the highest strike handled analytically via the
    /// asymptotic slope.
    pub fn expiry_breakevens(&self) -> Vec<f64> {
        let mut points = vec![0.0];
        points.extend(self.strikes());
        let mut roots = self.scan_segment_roots(&points);

        let last = *points.last().expect("points always contains 0.0");
        let f_last = self.net_payoff_at_expiry(last);
        let (_, right_slope) = self.asymptotic_slopes();
        if right_slope != 0.0 && f_last * right_slope < 0.0 {
            roots.push(last - f_last / right_slope);
            roots.sort_unstable_by(f64::total_cmp);
        }
        dedup_close(&mut roots);
        roots
    }

    fn scan_segment_roots(&self, points: &[f64]) -> Vec<f64> {
        let values: Vec<f64> = points
            .iter()
            .map(|&p| self.net_payoff_at_expiry(p))
            .collect();
        let mut roots = Vec::new();
        for i in 0..points.len() {
            if values[i] == 0.0 {
                // A plateau lying exactly on zero reports its first
                // point only.
                if i == 0 || values[i - 1] != 0.0 {
                    roots.push(points[i]);
                }
                continue;
            }
            if i + 1 < points.len() && values[i] * values[i + 1] < 0.0 {
                let (x0, x1) = (points[i], points[i + 1]);
                let (y0, y1) = (values[i], values[i + 1]);
                roots.push(x0 + (x1 - x0) * (-y0) / (y1 - y0));
            }
        }
        roots.sort_unstable_by(f64::total_cmp);
        dedup_close(&mut roots);
        roots
    }

    /// Maximum theoretical profit of the expiration payoff over
    /// non-negative prices; `None` when unbounded (net long calls or
    /// stock).
    ///
    /// Exact for piecewise-linear payoffs: the extremum sits at a
    /// strike, at `price = 0`, or escapes along the open tail.
    pub fn max_profit(&self) -> Option<f64> {
        let (_, right_slope) = self.asymptotic_slopes();
        if right_slope > 0.0 {
            return None;
        }
        Some(
            self.kink_payoffs()
                .fold(f64::NEG_INFINITY, f64::max),
        )
    }

    /// Maximum theoretical loss (most negative P/L) over non-negative
    /// prices; `None` when unbounded (net short calls or stock).
    pub fn max_loss(&self) -> Option<f64> {
        let (_, right_slope) = self.asymptotic_slopes();
        if right_slope < 0.0 {
            return None;
        }
        Some(self.kink_payoffs().fold(f64::INFINITY, f64::min))
    }

    /// Expiration P/L at a single price.
    #[inline]
    pub fn profit_at(&self, price: f64) -> f64 {
        self.net_payoff_at_expiry(price)
    }

    /// `|max profit| / |max loss|` when both are bounded, profit is
    /// positive, and loss is negative; `None` otherwise.
    pub fn risk_reward_ratio(&self) -> Option<f64> {
        match (self.max_profit(), self.max_loss()) {
            (Some(profit), Some(loss)) if profit > 0.0 && loss < 0.0 => Some(profit / -loss),
            _ => None,
        }
    }

    fn kink_payoffs(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(0.0)
            .chain(self.strikes())
            .map(|p| self.net_payoff_at_expiry(p))
    }
}

fn dedup_close(roots: &mut Vec<f64>) {
    roots.dedup_by(|a, b| (*a - *b).abs() <= 1.0e-9 * a.abs().max(1.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::OptionContract;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn state(spot: f64) -> MarketState {
        MarketState::builder()
            .spot(spot)
            .vol(0.3)
            .rate(0.01)
            .valuation_date(d(2026, 8, 7))
            .build()
            .unwrap()
    }

    fn long_call(strike: f64, premium: f64) -> Leg {
        Leg::option(OptionContract::call(strike, d(2026, 9, 18)), 1.0, premium).unwrap()
    }

    fn short_call(strike: f64, premium: f64) -> Leg {
        Leg::option(OptionContract::call(strike, d(2026, 9, 18)), -1.0, premium).unwrap()
    }

    fn long_put(strike: f64, premium: f64) -> Leg {
        Leg::option(OptionContract::put(strike, d(2026, 9, 18)), 1.0, premium).unwrap()
    }

    fn short_put(strike: f64, premium: f64) -> Leg {
        Leg::option(OptionContract::put(strike, d(2026, 9, 18)), -1.0, premium).unwrap()
    }

    #[test]
    fn leg_count_bounds_are_enforced() {
        assert!(matches!(
            Strategy::new("empty", vec![]),
            Err(PricingError::InvalidStrategy(_))
        ));
        let nine = (0..9).map(|i| long_call(90.0 + i as f64, 1.0)).collect();
        assert!(Strategy::new("nine legs", nine).is_err());
        let nine = (0..9).map(|i| long_call(90.0 + i as f64, 1.0)).collect();
        assert!(Strategy::with_max_legs("nine legs", nine, 12).is_ok());
        assert!(Strategy::with_max_legs("cap too high", vec![long_call(100.0, 1.0)], 64).is_err());
    }

    #[test]
    fn long_call_payoff_table() {
        let strategy = Strategy::new("long call", vec![long_call(100.0, 5.0)]).unwrap();
        let expected = [(90.0, -5.0), (100.0, -5.0), (105.0, 0.0), (110.0, 5.0), (120.0, 15.0)];
        for (price, pl) in expected {
            assert_abs_diff_eq!(strategy.net_payoff_at_expiry(price), pl, epsilon = 1e-12);
        }
    }

    #[test]
    fn long_put_payoff_table() {
        let strategy = Strategy::new("long put", vec![long_put(100.0, 5.0)]).unwrap();
        let expected = [(80.0, 15.0), (90.0, 5.0), (95.0, 0.0), (100.0, -5.0), (110.0, -5.0)];
        for (price, pl) in expected {
            assert_abs_diff_eq!(strategy.net_payoff_at_expiry(price), pl, epsilon = 1e-12);
        }
    }

    #[test]
    fn contract_multiplier_scales_payoffs() {
        let strategy = Strategy::new("long call", vec![long_call(100.0, 5.0)])
            .unwrap()
            .with_contract_multiplier(100.0)
            .unwrap();
        assert_abs_diff_eq!(strategy.net_payoff_at_expiry(120.0), 1500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(strategy.net_entry_cost(), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn offsetting_calls_cancel_everywhere() {
        let strategy = Strategy::new(
            "flat",
            vec![long_call(100.0, 5.0), short_call(100.0, 3.0)],
        )
        .unwrap();
        for &spot in &[60.0, 95.0, 100.0, 104.0, 180.0] {
            let s = state(spot);
            assert_abs_diff_eq!(strategy.net_value(&s), 0.0, epsilon = 1e-12);
            // Net P/L is the constant negative of the entry-cost difference.
            assert_abs_diff_eq!(strategy.net_pl(&s), -2.0, epsilon = 1e-12);
            let greeks = strategy.net_greeks(&s);
            assert_abs_diff_eq!(greeks.delta, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(greeks.vega, 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(strategy.net_entry_cost(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn bull_call_spread_reference_numbers() {
        // K1=100, K2=110, net debit 3: max loss 3, max profit 7,
        // breakeven 103.
        let strategy = Strategy::new(
            "bull call spread",
            vec![long_call(100.0, 5.0), short_call(110.0, 2.0)],
        )
        .unwrap();
        let expected = [(90.0, -3.0), (100.0, -3.0), (105.0, 2.0), (110.0, 7.0), (120.0, 7.0)];
        for (price, pl) in expected {
            assert_abs_diff_eq!(strategy.net_payoff_at_expiry(price), pl, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(strategy.max_loss().unwrap(), -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(strategy.max_profit().unwrap(), 7.0, epsilon = 1e-12);
        let breakevens = strategy.breakevens(50.0, 150.0).unwrap();
        assert_eq!(breakevens.len(), 1);
        assert_abs_diff_eq!(breakevens[0], 103.0, epsilon = 1e-9);
    }

    #[test]
    fn single_long_call_has_one_breakeven_and_open_upside() {
        let strategy = Strategy::new("long call", vec![long_call(50.0, 2.0)]).unwrap();
        let breakevens = strategy.expiry_breakevens();
        assert_eq!(breakevens.len(), 1);
        assert_abs_diff_eq!(breakevens[0], 52.0, epsilon = 1e-9);
        assert_eq!(strategy.max_profit(), None);
        assert_abs_diff_eq!(strategy.max_loss().unwrap(), -2.0, epsilon = 1e-12);
        assert_eq!(strategy.risk_reward_ratio(), None);
    }

    #[test]
    fn straddle_breakevens_bracket_the_strike() {
        let strategy = Strategy::new(
            "straddle",
            vec![long_call(100.0, 4.0), long_put(100.0, 3.0)],
        )
        .unwrap();
        let breakevens = strategy.expiry_breakevens();
        assert_eq!(breakevens.len(), 2);
        assert_abs_diff_eq!(breakevens[0], 93.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakevens[1], 107.0, epsilon = 1e-9);
    }

    #[test]
    fn iron_condor_has_two_breakevens() {
        let strategy = Strategy::new(
            "iron condor",
            vec![
                long_put(90.0, 0.8),
                short_put(95.0, 1.9),
                short_call(105.0, 1.9),
                long_call(110.0, 0.8),
            ],
        )
        .unwrap();
        // Net credit 2.2; profit between the short strikes.
        let credit = -strategy.net_entry_cost();
        assert_abs_diff_eq!(credit, 2.2, epsilon = 1e-12);
        let breakevens = strategy.expiry_breakevens();
        assert_eq!(breakevens.len(), 2);
        assert_abs_diff_eq!(breakevens[0], 95.0 - credit, epsilon = 1e-9);
        assert_abs_diff_eq!(breakevens[1], 105.0 + credit, epsilon = 1e-9);
        assert_abs_diff_eq!(strategy.max_profit().unwrap(), credit, epsilon = 1e-12);
        assert_abs_diff_eq!(strategy.max_loss().unwrap(), credit - 5.0, epsilon = 1e-12);
        assert_relative_eq!(
            strategy.risk_reward_ratio().unwrap(),
            credit / (5.0 - credit),
            epsilon = 1e-9
        );
    }

    #[test]
    fn covered_stock_breakeven_sits_at_entry_minus_credit() {
        let stock = Leg::stock(1.0, 50.0).unwrap();
        let strategy = Strategy::new(
            "covered call",
            vec![stock, short_call(55.0, 1.5)],
        )
        .unwrap();
        let breakevens = strategy.expiry_breakevens();
        assert_eq!(breakevens.len(), 1);
        assert_abs_diff_eq!(breakevens[0], 48.5, epsilon = 1e-9);
        // Upside capped at the short strike.
        assert_abs_diff_eq!(strategy.max_profit().unwrap(), 6.5, epsilon = 1e-12);
        // Stock to zero is the worst case.
        assert_abs_diff_eq!(strategy.max_loss().unwrap(), -48.5, epsilon = 1e-12);
    }

    #[test]
    fn strategies_without_a_crossing_report_empty() {
        // Premium larger than the strike: payoff is negative at every
        // non-negative price.
        let strategy = Strategy::new("overpaid put", vec![long_put(100.0, 150.0)]).unwrap();
        assert!(strategy.breakevens(0.0, 500.0).unwrap().is_empty());
        assert!(strategy.expiry_breakevens().is_empty());
    }

    #[test]
    fn zero_payoff_plateau_reports_its_first_point_only() {
        // Zero-premium long put: payoff is exactly zero at and above
        // the strike.
        let strategy = Strategy::new("free put", vec![long_put(100.0, 0.0)]).unwrap();
        let roots = strategy.breakevens(50.0, 150.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn mixed_expiry_reference_requires_a_leg_expiry() {
        let near = Leg::option(OptionContract::call(100.0, d(2026, 9, 18)), -1.0, 2.0).unwrap();
        let far = Leg::option(OptionContract::call(100.0, d(2026, 12, 18)), 1.0, 4.5).unwrap();
        let strategy = Strategy::new("calendar", vec![near, far]).unwrap();
        let s = state(100.0);

        assert!(matches!(
            strategy.net_payoff_at_reference(100.0, d(2026, 10, 16), &s),
            Err(PricingError::InvalidInput(_))
        ));

        // At the near expiry the far leg retains time value, so the
        // anchored payoff exceeds the all-intrinsic payoff.
        let anchored = strategy
            .net_payoff_at_reference(100.0, d(2026, 9, 18), &s)
            .unwrap();
        let all_intrinsic = strategy.net_payoff_at_expiry(100.0);
        assert!(anchored > all_intrinsic);

        // Anchoring at the far expiry values everything at intrinsic.
        let terminal = strategy
            .net_payoff_at_reference(100.0, d(2026, 12, 18), &s)
            .unwrap();
        assert_abs_diff_eq!(terminal, all_intrinsic, epsilon = 1e-12);
    }
}
