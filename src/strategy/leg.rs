//! One position within a strategy: an option contract or stock.
//!
//! A leg carries a signed quantity (positive long, negative short),
//! the entry price it was opened at, and optionally the latest market
//! price for unrealized-P/L display. Option legs may carry their own
//! implied volatility; legs without one are valued at the market
//! state's flat volatility. Legs are validated at construction and
//! immutable afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Greeks, OptionType, PricingError};
use crate::engines::analytic::{bs_price, bs_valuation};
use crate::instruments::OptionContract;
use crate::market::{MarketState, OptionQuote};

/// Instrument side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LegKind {
    /// Option position with an optional per-leg implied volatility.
    Option {
        contract: OptionContract,
        implied_vol: Option<f64>,
    },
    /// Plain stock position.
    Stock,
}

/// One position: option or stock, with direction, size, and cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    kind: LegKind,
    /// Signed quantity: positive long, negative short.
    quantity: f64,
    /// Entry price per unit: premium for options, share price for stock.
    entry_price: f64,
    /// Latest observed market price per unit, for unrealized P/L.
    current_price: Option<f64>,
}

impl Leg {
    /// Builds an option leg.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] for an invalid contract, zero or
    /// non-finite quantity, or a negative entry premium.
    pub fn option(
        contract: OptionContract,
        quantity: f64,
        entry_premium: f64,
    ) -> Result<Self, PricingError> {
        contract.validate()?;
        validate_quantity(quantity)?;
        validate_price(entry_premium, "entry premium")?;
        Ok(Self {
            kind: LegKind::Option {
                contract,
                implied_vol: None,
            },
            quantity,
            entry_price: entry_premium,
            current_price: None,
        })
    }

    /// Builds an option leg with its own implied volatility.
    pub fn option_with_vol(
        contract: OptionContract,
        quantity: f64,
        entry_premium: f64,
        implied_vol: f64,
    ) -> Result<Self, PricingError> {
        if !implied_vol.is_finite() || implied_vol < 0.0 {
            return Err(PricingError::InvalidInput(
                "leg implied vol must be >= 0".to_string(),
            ));
        }
        contract.validate()?;
        validate_quantity(quantity)?;
        validate_price(entry_premium, "entry premium")?;
        Ok(Self {
            kind: LegKind::Option {
                contract,
                implied_vol: Some(implied_vol),
            },
            quantity,
            entry_price: entry_premium,
            current_price: None,
        })
    }

    /// Builds an option leg from a market quote, requiring the quote's
    /// implied volatility.
    ///
    /// # Errors
    /// [`PricingError::MissingVolatility`] when the quote has none.
    pub fn from_quote(
        option_type: OptionType,
        quote: &OptionQuote,
        quantity: f64,
        entry_premium: f64,
    ) -> Result<Self, PricingError> {
        let implied_vol = quote.implied_vol()?;
        let contract = OptionContract {
            option_type,
            strike: quote.strike,
            expiry: quote.expiry,
        };
        Self::option_with_vol(contract, quantity, entry_premium, implied_vol)
    }

    /// Builds a stock leg.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] for a zero/non-finite quantity
    /// or a non-positive entry price (a stock leg without an entry
    /// price is inconsistent).
    pub fn stock(quantity: f64, entry_price: f64) -> Result<Self, PricingError> {
        validate_quantity(quantity)?;
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(PricingError::InvalidInput(
                "stock entry price must be > 0".to_string(),
            ));
        }
        Ok(Self {
            kind: LegKind::Stock,
            quantity,
            entry_price,
            current_price: None,
        })
    }

    /// Attaches the latest observed market price.
    pub fn with_current_price(mut self, current_price: f64) -> Result<Self, PricingError> {
        validate_price(current_price, "current price")?;
        self.current_price = Some(current_price);
        Ok(self)
    }

    #[inline]
    pub fn kind(&self) -> &LegKind {
        &self.kind
    }

    #[inline]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    #[inline]
    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    #[inline]
    pub fn current_price(&self) -> Option<f64> {
        self.current_price
    }

    /// True for option legs.
    #[inline]
    pub fn is_option(&self) -> bool {
        matches!(self.kind, LegKind::Option { .. })
    }

    /// Strike of an option leg.
    #[inline]
    pub fn strike(&self) -> Option<f64> {
        match &self.kind {
            LegKind::Option { contract, .. } => Some(contract.strike),
            LegKind::Stock => None,
        }
    }

    /// Expiration of an option leg.
    #[inline]
    pub fn expiry(&self) -> Option<NaiveDate> {
        match &self.kind {
            LegKind::Option { contract, .. } => Some(contract.expiry),
            LegKind::Stock => None,
        }
    }

    /// Signed entry cost: `quantity x entry price`. Premium paid is
    /// positive, premium received negative.
    #[inline]
    pub fn entry_cost(&self) -> f64 {
        self.quantity * self.entry_price
    }

    /// Volatility this leg is valued at under `state`: the leg's own
    /// implied vol when present, else the state's flat vol, plus the
    /// state's sweep shift, floored at zero.
    #[inline]
    pub fn effective_vol(&self, state: &MarketState) -> f64 {
        let base = match self.kind {
            LegKind::Option { implied_vol, .. } => implied_vol.unwrap_or(state.vol),
            LegKind::Stock => state.vol,
        };
        (base + state.vol_shift).max(0.0)
    }

    /// Theoretical value per unit under `state`. Option legs expired
    /// relative to the state's valuation date are worth intrinsic
    /// value (the kernel's `T = 0` branch).
    pub fn value(&self, state: &MarketState) -> f64 {
        match &self.kind {
            LegKind::Option { contract, .. } => {
                let expiry = contract.time_to_expiry(state.valuation_date);
                bs_price(
                    contract.option_type,
                    state.spot,
                    contract.strike,
                    state.rate,
                    self.effective_vol(state),
                    expiry,
                )
            }
            LegKind::Stock => state.spot,
        }
    }

    /// Signed market value: `quantity x value`.
    #[inline]
    pub fn market_value(&self, state: &MarketState) -> f64 {
        self.quantity * self.value(state)
    }

    /// Signed theoretical P/L versus the entry price. A short leg's
    /// P/L is the negative of the equivalent long leg at the same
    /// prices.
    #[inline]
    pub fn pl(&self, state: &MarketState) -> f64 {
        self.quantity * (self.value(state) - self.entry_price)
    }

    /// Signed P/L at expiration for the given terminal price. Option
    /// legs evaluate intrinsic value ignoring any remaining time;
    /// stock legs are linear in price.
    #[inline]
    pub fn payoff_at_expiry(&self, price: f64) -> f64 {
        match &self.kind {
            LegKind::Option { contract, .. } => {
                self.quantity * (contract.intrinsic(price) - self.entry_price)
            }
            LegKind::Stock => self.quantity * (price - self.entry_price),
        }
    }

    /// Unrealized P/L against the attached market price, when one was
    /// supplied.
    #[inline]
    pub fn unrealized_pl(&self) -> Option<f64> {
        self.current_price
            .map(|current| self.quantity * (current - self.entry_price))
    }

    /// Quantity-weighted Greeks under `state`. Stock legs contribute
    /// delta only.
    pub fn greeks(&self, state: &MarketState) -> Greeks {
        match &self.kind {
            LegKind::Option { contract, .. } => {
                let expiry = contract.time_to_expiry(state.valuation_date);
                bs_valuation(
                    contract.option_type,
                    state.spot,
                    contract.strike,
                    state.rate,
                    self.effective_vol(state),
                    expiry,
                )
                .greeks
                .scaled(self.quantity)
            }
            LegKind::Stock => Greeks {
                delta: self.quantity,
                ..Greeks::zero()
            },
        }
    }

    /// Short human-readable label for position reports.
    pub fn describe(&self) -> String {
        let side = if self.quantity >= 0.0 { "long" } else { "short" };
        let size = self.quantity.abs();
        match &self.kind {
            LegKind::Option { contract, .. } => {
                let kind = match contract.option_type {
                    OptionType::Call => "call",
                    OptionType::Put => "put",
                };
                format!(
                    "{side} {size} {kind} {strike} exp {expiry}",
                    strike = contract.strike,
                    expiry = contract.expiry
                )
            }
            LegKind::Stock => format!("{side} {size} stock @ {}", self.entry_price),
        }
    }
}

fn validate_quantity(quantity: f64) -> Result<(), PricingError> {
    if !quantity.is_finite() || quantity == 0.0 {
        return Err(PricingError::InvalidInput(
            "leg quantity must be finite and non-zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64, what: &str) -> Result<(), PricingError> {
    if !price.is_finite() || price < 0.0 {
        return Err(PricingError::InvalidInput(format!("{what} must be >= 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use approx::assert_relative_eq;

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

    #[test]
    fn construction_rejects_inconsistent_legs() {
        let contract = OptionContract::call(100.0, d(2026, 9, 18));
        assert!(Leg::option(contract, 0.0, 2.0).is_err());
        assert!(Leg::option(contract, 1.0, -2.0).is_err());
        assert!(Leg::option_with_vol(contract, 1.0, 2.0, -0.1).is_err());
        assert!(Leg::stock(100.0, 0.0).is_err());
        assert!(Leg::stock(f64::INFINITY, 50.0).is_err());
    }

    #[test]
    fn short_pl_mirrors_long_pl() {
        let contract = OptionContract::put(95.0, d(2026, 9, 18));
        let long = Leg::option(contract, 2.0, 1.5).unwrap();
        let short = Leg::option(contract, -2.0, 1.5).unwrap();
        let state = state(92.0);
        assert_relative_eq!(long.pl(&state), -short.pl(&state), epsilon = 1e-12);
        assert_relative_eq!(
            long.payoff_at_expiry(88.0),
            -short.payoff_at_expiry(88.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn expired_leg_values_at_intrinsic() {
        let contract = OptionContract::call(100.0, d(2026, 6, 19));
        let leg = Leg::option(contract, 1.0, 4.0).unwrap();
        // Valuation date is past the contract's expiration.
        let state = state(108.0);
        assert_relative_eq!(leg.value(&state), 8.0, epsilon = 1e-12);
        assert_relative_eq!(leg.pl(&state), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn per_leg_vol_overrides_state_vol() {
        let contract = OptionContract::call(100.0, d(2026, 11, 20));
        let flat = Leg::option(contract, 1.0, 2.0).unwrap();
        let own = Leg::option_with_vol(contract, 1.0, 2.0, 0.6).unwrap();
        let state = state(100.0);
        assert!(own.value(&state) > flat.value(&state));
        assert_relative_eq!(own.effective_vol(&state), 0.6);
        assert_relative_eq!(flat.effective_vol(&state), 0.3);
        let bumped = state.with_vol_shift(0.1);
        assert_relative_eq!(own.effective_vol(&bumped), 0.7);
        assert_relative_eq!(flat.effective_vol(&bumped), 0.4);
    }

    #[test]
    fn stock_leg_is_linear_and_delta_one() {
        let leg = Leg::stock(100.0, 50.0).unwrap();
        let state = state(53.0);
        assert_relative_eq!(leg.pl(&state), 300.0, epsilon = 1e-12);
        assert_relative_eq!(leg.payoff_at_expiry(47.5), -250.0, epsilon = 1e-12);
        let greeks = leg.greeks(&state);
        assert_relative_eq!(greeks.delta, 100.0);
        assert_eq!(greeks.gamma, 0.0);
    }

    #[test]
    fn unrealized_pl_uses_the_attached_market_price() {
        let contract = OptionContract::call(100.0, d(2026, 9, 18));
        let leg = Leg::option(contract, 1.0, 2.0)
            .unwrap()
            .with_current_price(3.25)
            .unwrap();
        assert_relative_eq!(leg.unrealized_pl().unwrap(), 1.25, epsilon = 1e-12);
        let bare = Leg::option(contract, 1.0, 2.0).unwrap();
        assert!(bare.unrealized_pl().is_none());
    }

    #[test]
    fn quote_without_vol_cannot_build_a_leg() {
        let quote = OptionQuote {
            strike: 100.0,
            expiry: d(2026, 9, 18),
            implied_vol: None,
            last: Some(2.0),
        };
        assert!(matches!(
            Leg::from_quote(OptionType::Call, &quote, 1.0, 2.0),
            Err(PricingError::MissingVolatility(_))
        ));
    }
}
