//! Declarative strategy catalog.
//!
//! Named strategy templates map user parameters (strikes, expiries,
//! premiums, size) to leg lists. The set of kinds is closed and known
//! at compile time, so dispatch is a tagged enum and a `match`, not
//! trait objects. Every constructor is pure; building the same
//! template twice yields identical strategies.
//!
//! All templates build on a per-share basis (contract multiplier 1.0);
//! callers wanting US equity contract sizing apply
//! `with_contract_multiplier(100.0)` to the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{OptionType, PricingError};
use crate::instruments::OptionContract;
use crate::strategy::leg::Leg;
use crate::strategy::strategy::Strategy;

/// A named strategy template plus its construction parameters.
///
/// `quantity` is the number of spreads/contract units and must be
/// positive; direction is encoded by the template itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyTemplate {
    /// Buy a call.
    LongCall {
        strike: f64,
        expiry: NaiveDate,
        premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy a put.
    LongPut {
        strike: f64,
        expiry: NaiveDate,
        premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Own stock, sell a call against it.
    CoveredCall {
        stock_price: f64,
        call_strike: f64,
        expiry: NaiveDate,
        call_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Sell a put backed by cash.
    CashSecuredPut {
        strike: f64,
        expiry: NaiveDate,
        premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy a call, sell a higher-strike call.
    BullCallSpread {
        long_strike: f64,
        short_strike: f64,
        expiry: NaiveDate,
        long_premium: f64,
        short_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy a put, sell a lower-strike put.
    BearPutSpread {
        long_strike: f64,
        short_strike: f64,
        expiry: NaiveDate,
        long_premium: f64,
        short_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Sell a put, buy a lower-strike put.
    BullPutSpread {
        short_strike: f64,
        long_strike: f64,
        expiry: NaiveDate,
        short_premium: f64,
        long_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Sell a call, buy a higher-strike call.
    BearCallSpread {
        short_strike: f64,
        long_strike: f64,
        expiry: NaiveDate,
        short_premium: f64,
        long_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Sell the near expiry, buy the far expiry at the same strike.
    CalendarSpread {
        strike: f64,
        near_expiry: NaiveDate,
        far_expiry: NaiveDate,
        near_premium: f64,
        far_premium: f64,
        option_type: OptionType,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Sell the near expiry, buy the far expiry at a different strike.
    DiagonalSpread {
        short_strike: f64,
        short_expiry: NaiveDate,
        long_strike: f64,
        long_expiry: NaiveDate,
        short_premium: f64,
        long_premium: f64,
        option_type: OptionType,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Bull put spread plus bear call spread around the spot.
    IronCondor {
        long_put_strike: f64,
        short_put_strike: f64,
        short_call_strike: f64,
        long_call_strike: f64,
        expiry: NaiveDate,
        long_put_premium: f64,
        short_put_premium: f64,
        short_call_premium: f64,
        long_call_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy one low strike, sell two middle, buy one high.
    Butterfly {
        low_strike: f64,
        mid_strike: f64,
        high_strike: f64,
        expiry: NaiveDate,
        low_premium: f64,
        mid_premium: f64,
        high_premium: f64,
        option_type: OptionType,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy a call and a put at the same strike.
    Straddle {
        strike: f64,
        expiry: NaiveDate,
        call_premium: f64,
        put_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Buy an out-of-the-money put and call.
    Strangle {
        put_strike: f64,
        call_strike: f64,
        expiry: NaiveDate,
        put_premium: f64,
        call_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Own stock, buy a protective put, sell a covered call.
    Collar {
        stock_price: f64,
        put_strike: f64,
        call_strike: f64,
        expiry: NaiveDate,
        put_premium: f64,
        call_premium: f64,
        quantity: f64,
        implied_vol: Option<f64>,
    },
    /// Fully manual leg list.
    Custom { name: String, legs: Vec<Leg> },
}

impl StrategyTemplate {
    /// Display name for this strategy kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::LongCall { .. } => "long call",
            Self::LongPut { .. } => "long put",
            Self::CoveredCall { .. } => "covered call",
            Self::CashSecuredPut { .. } => "cash-secured put",
            Self::BullCallSpread { .. } => "bull call spread",
            Self::BearPutSpread { .. } => "bear put spread",
            Self::BullPutSpread { .. } => "bull put spread",
            Self::BearCallSpread { .. } => "bear call spread",
            Self::CalendarSpread { .. } => "calendar spread",
            Self::DiagonalSpread { .. } => "diagonal spread",
            Self::IronCondor { .. } => "iron condor",
            Self::Butterfly { .. } => "butterfly",
            Self::Straddle { .. } => "straddle",
            Self::Strangle { .. } => "strangle",
            Self::Collar { .. } => "collar",
            Self::Custom { .. } => "custom",
        }
    }

    /// Builds the strategy this template describes.
    ///
    /// # Errors
    /// [`PricingError::InvalidStrategy`] for strike/expiry orderings
    /// that do not define the named shape, and
    /// [`PricingError::InvalidInput`] for malformed leg numerics.
    pub fn build(&self) -> Result<Strategy, PricingError> {
        let strategy = match self {
            Self::LongCall {
                strike,
                expiry,
                premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                let leg = option_leg(
                    OptionContract::call(*strike, *expiry),
                    *quantity,
                    *premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![leg])?
            }
            Self::LongPut {
                strike,
                expiry,
                premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                let leg = option_leg(
                    OptionContract::put(*strike, *expiry),
                    *quantity,
                    *premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![leg])?
            }
            Self::CoveredCall {
                stock_price,
                call_strike,
                expiry,
                call_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                let stock = Leg::stock(*quantity, *stock_price)?;
                let call = option_leg(
                    OptionContract::call(*call_strike, *expiry),
                    -*quantity,
                    *call_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![stock, call])?
            }
            Self::CashSecuredPut {
                strike,
                expiry,
                premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                let leg = option_leg(
                    OptionContract::put(*strike, *expiry),
                    -*quantity,
                    *premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![leg])?
            }
            Self::BullCallSpread {
                long_strike,
                short_strike,
                expiry,
                long_premium,
                short_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*long_strike, *short_strike, "long strike < short strike")?;
                let long = option_leg(
                    OptionContract::call(*long_strike, *expiry),
                    *quantity,
                    *long_premium,
                    *implied_vol,
                )?;
                let short = option_leg(
                    OptionContract::call(*short_strike, *expiry),
                    -*quantity,
                    *short_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![long, short])?
            }
            Self::BearPutSpread {
                long_strike,
                short_strike,
                expiry,
                long_premium,
                short_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*short_strike, *long_strike, "short strike < long strike")?;
                let long = option_leg(
                    OptionContract::put(*long_strike, *expiry),
                    *quantity,
                    *long_premium,
                    *implied_vol,
                )?;
                let short = option_leg(
                    OptionContract::put(*short_strike, *expiry),
                    -*quantity,
                    *short_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![long, short])?
            }
            Self::BullPutSpread {
                short_strike,
                long_strike,
                expiry,
                short_premium,
                long_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*long_strike, *short_strike, "long strike < short strike")?;
                let short = option_leg(
                    OptionContract::put(*short_strike, *expiry),
                    -*quantity,
                    *short_premium,
                    *implied_vol,
                )?;
                let long = option_leg(
                    OptionContract::put(*long_strike, *expiry),
                    *quantity,
                    *long_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![short, long])?
            }
            Self::BearCallSpread {
                short_strike,
                long_strike,
                expiry,
                short_premium,
                long_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*short_strike, *long_strike, "short strike < long strike")?;
                let short = option_leg(
                    OptionContract::call(*short_strike, *expiry),
                    -*quantity,
                    *short_premium,
                    *implied_vol,
                )?;
                let long = option_leg(
                    OptionContract::call(*long_strike, *expiry),
                    *quantity,
                    *long_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![short, long])?
            }
            Self::CalendarSpread {
                strike,
                near_expiry,
                far_expiry,
                near_premium,
                far_premium,
                option_type,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                if near_expiry >= far_expiry {
                    return Err(PricingError::InvalidStrategy(
                        "calendar spread requires near expiry < far expiry".to_string(),
                    ));
                }
                let contract = |expiry| OptionContract {
                    option_type: *option_type,
                    strike: *strike,
                    expiry,
                };
                let near = option_leg(contract(*near_expiry), -*quantity, *near_premium, *implied_vol)?;
                let far = option_leg(contract(*far_expiry), *quantity, *far_premium, *implied_vol)?;
                Strategy::new(self.kind_name(), vec![near, far])?
            }
            Self::DiagonalSpread {
                short_strike,
                short_expiry,
                long_strike,
                long_expiry,
                short_premium,
                long_premium,
                option_type,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                if short_expiry >= long_expiry {
                    return Err(PricingError::InvalidStrategy(
                        "diagonal spread requires short expiry < long expiry".to_string(),
                    ));
                }
                let short = option_leg(
                    OptionContract {
                        option_type: *option_type,
                        strike: *short_strike,
                        expiry: *short_expiry,
                    },
                    -*quantity,
                    *short_premium,
                    *implied_vol,
                )?;
                let long = option_leg(
                    OptionContract {
                        option_type: *option_type,
                        strike: *long_strike,
                        expiry: *long_expiry,
                    },
                    *quantity,
                    *long_premium,
                    *implied_vol,
                )?;
                Strategy::new(self.kind_name(), vec![short, long])?
            }
            Self::IronCondor {
                long_put_strike,
                short_put_strike,
                short_call_strike,
                long_call_strike,
                expiry,
                long_put_premium,
                short_put_premium,
                short_call_premium,
                long_call_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                if !(long_put_strike < short_put_strike
                    && short_put_strike < short_call_strike
                    && short_call_strike < long_call_strike)
                {
                    return Err(PricingError::InvalidStrategy(
                        "iron condor strikes must satisfy long put < short put < short call < long call"
                            .to_string(),
                    ));
                }
                let legs = vec![
                    option_leg(
                        OptionContract::put(*long_put_strike, *expiry),
                        *quantity,
                        *long_put_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::put(*short_put_strike, *expiry),
                        -*quantity,
                        *short_put_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::call(*short_call_strike, *expiry),
                        -*quantity,
                        *short_call_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::call(*long_call_strike, *expiry),
                        *quantity,
                        *long_call_premium,
                        *implied_vol,
                    )?,
                ];
                Strategy::new(self.kind_name(), legs)?
            }
            Self::Butterfly {
                low_strike,
                mid_strike,
                high_strike,
                expiry,
                low_premium,
                mid_premium,
                high_premium,
                option_type,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                if !(low_strike < mid_strike && mid_strike < high_strike) {
                    return Err(PricingError::InvalidStrategy(
                        "butterfly strikes must satisfy low < mid < high".to_string(),
                    ));
                }
                let contract = |strike| OptionContract {
                    option_type: *option_type,
                    strike,
                    expiry: *expiry,
                };
                let legs = vec![
                    option_leg(contract(*low_strike), *quantity, *low_premium, *implied_vol)?,
                    option_leg(contract(*mid_strike), -2.0 * *quantity, *mid_premium, *implied_vol)?,
                    option_leg(contract(*high_strike), *quantity, *high_premium, *implied_vol)?,
                ];
                Strategy::new(self.kind_name(), legs)?
            }
            Self::Straddle {
                strike,
                expiry,
                call_premium,
                put_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                let legs = vec![
                    option_leg(
                        OptionContract::call(*strike, *expiry),
                        *quantity,
                        *call_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::put(*strike, *expiry),
                        *quantity,
                        *put_premium,
                        *implied_vol,
                    )?,
                ];
                Strategy::new(self.kind_name(), legs)?
            }
            Self::Strangle {
                put_strike,
                call_strike,
                expiry,
                put_premium,
                call_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*put_strike, *call_strike, "put strike < call strike")?;
                let legs = vec![
                    option_leg(
                        OptionContract::put(*put_strike, *expiry),
                        *quantity,
                        *put_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::call(*call_strike, *expiry),
                        *quantity,
                        *call_premium,
                        *implied_vol,
                    )?,
                ];
                Strategy::new(self.kind_name(), legs)?
            }
            Self::Collar {
                stock_price,
                put_strike,
                call_strike,
                expiry,
                put_premium,
                call_premium,
                quantity,
                implied_vol,
            } => {
                require_positive_quantity(*quantity)?;
                require_order(*put_strike, *call_strike, "put strike < call strike")?;
                let legs = vec![
                    Leg::stock(*quantity, *stock_price)?,
                    option_leg(
                        OptionContract::put(*put_strike, *expiry),
                        *quantity,
                        *put_premium,
                        *implied_vol,
                    )?,
                    option_leg(
                        OptionContract::call(*call_strike, *expiry),
                        -*quantity,
                        *call_premium,
                        *implied_vol,
                    )?,
                ];
                Strategy::new(self.kind_name(), legs)?
            }
            Self::Custom { name, legs } => Strategy::new(name.clone(), legs.clone())?,
        };
        debug!(kind = self.kind_name(), legs = strategy.legs().len(), "template built");
        Ok(strategy)
    }
}

fn option_leg(
    contract: OptionContract,
    quantity: f64,
    premium: f64,
    implied_vol: Option<f64>,
) -> Result<Leg, PricingError> {
    match implied_vol {
        Some(vol) => Leg::option_with_vol(contract, quantity, premium, vol),
        None => Leg::option(contract, quantity, premium),
    }
}

fn require_positive_quantity(quantity: f64) -> Result<(), PricingError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(PricingError::InvalidStrategy(
            "template quantity must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn require_order(lower: f64, upper: f64, what: &str) -> Result<(), PricingError> {
    if lower >= upper {
        return Err(PricingError::InvalidStrategy(format!(
            "strike ordering violated: expected {what}"
        )));
    }
    Ok(())
}
