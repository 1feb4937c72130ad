//! End-to-end reference scenarios through the public API.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::NaiveDate;

use ferrostrat::core::{OptionType, PricingEngine, PricingError, ValuationMode};
use ferrostrat::engines::analytic::BlackScholesEngine;
use ferrostrat::instruments::OptionContract;
use ferrostrat::market::{MarketState, OptionQuote};
use ferrostrat::strategy::{Leg, Strategy, StrategyTemplate};
use ferrostrat::surface::{probability_of_profit, summarize};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn long_call_scenario_thirty_days_out() {
    // Strategy: single long call, K=50, expiration in 30 days,
    // premium 2, spot 55, vol 0.30, rate 0.01.
    let valuation = date(2026, 8, 7);
    let expiry = date(2026, 9, 6);
    assert_eq!((expiry - valuation).num_days(), 30);

    let state = MarketState::builder()
        .spot(55.0)
        .vol(0.30)
        .rate(0.01)
        .valuation_date(valuation)
        .build()
        .unwrap();

    let contract = OptionContract::call(50.0, expiry);
    let engine = BlackScholesEngine::new();
    let valuation_result = engine.price(&contract, &state).unwrap();

    // Worth intrinsic (5) plus a small time value.
    assert_eq!(valuation_result.mode, ValuationMode::Model);
    assert!(valuation_result.price > 5.0);
    assert!(valuation_result.price < 6.5);

    let strategy = Strategy::new(
        "long call",
        vec![Leg::option(contract, 1.0, 2.0).unwrap()],
    )
    .unwrap();
    assert_abs_diff_eq!(strategy.net_payoff_at_expiry(60.0), 8.0, epsilon = 1e-12);

    let breakevens = strategy.expiry_breakevens();
    assert_eq!(breakevens.len(), 1);
    assert_abs_diff_eq!(breakevens[0], 52.0, epsilon = 1e-9);
}

#[test]
fn engine_respects_put_call_parity() {
    let valuation = date(2026, 8, 7);
    let expiry = date(2027, 2, 5);
    let state = MarketState::builder()
        .spot(100.0)
        .vol(0.22)
        .rate(0.03)
        .valuation_date(valuation)
        .build()
        .unwrap();
    let t = OptionContract::call(95.0, expiry).time_to_expiry(valuation);

    let engine = BlackScholesEngine::new();
    let call = engine.price(&OptionContract::call(95.0, expiry), &state).unwrap();
    let put = engine.price(&OptionContract::put(95.0, expiry), &state).unwrap();

    let rhs = 100.0 - 95.0 * (-0.03 * t).exp();
    assert_relative_eq!(call.price - put.price, rhs, epsilon = 1e-9);
}

#[test]
fn vertical_spread_reference_numbers() {
    let template = StrategyTemplate::BullCallSpread {
        long_strike: 100.0,
        short_strike: 110.0,
        expiry: date(2026, 9, 18),
        long_premium: 5.0,
        short_premium: 2.0,
        quantity: 1.0,
        implied_vol: None,
    };
    let strategy = template.build().unwrap();
    let state = MarketState::builder()
        .spot(104.0)
        .vol(0.25)
        .rate(0.02)
        .valuation_date(date(2026, 8, 7))
        .build()
        .unwrap();

    let summary = summarize(&strategy, &state);
    assert_abs_diff_eq!(summary.net_entry_cost, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.max_loss.unwrap(), -3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.max_profit.unwrap(), 7.0, epsilon = 1e-12);
    assert_eq!(summary.breakevens.len(), 1);
    assert_abs_diff_eq!(summary.breakevens[0], 103.0, epsilon = 1e-9);
    assert_relative_eq!(summary.risk_reward_ratio.unwrap(), 7.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn straddle_breakevens_are_strike_plus_minus_total_premium() {
    let template = StrategyTemplate::Straddle {
        strike: 100.0,
        expiry: date(2026, 9, 18),
        call_premium: 4.0,
        put_premium: 3.0,
        quantity: 1.0,
        implied_vol: Some(0.3),
    };
    let strategy = template.build().unwrap();
    let breakevens = strategy.expiry_breakevens();
    assert_eq!(breakevens.len(), 2);
    assert_abs_diff_eq!(breakevens[0], 93.0, epsilon = 1e-9);
    assert_abs_diff_eq!(breakevens[1], 107.0, epsilon = 1e-9);
}

#[test]
fn iron_condor_has_exactly_two_breakevens() {
    let template = StrategyTemplate::IronCondor {
        long_put_strike: 90.0,
        short_put_strike: 95.0,
        short_call_strike: 105.0,
        long_call_strike: 110.0,
        expiry: date(2026, 9, 18),
        long_put_premium: 0.8,
        short_put_premium: 1.9,
        short_call_premium: 1.9,
        long_call_premium: 0.8,
        quantity: 1.0,
        implied_vol: Some(0.2),
    };
    let strategy = template.build().unwrap();
    let breakevens = strategy.expiry_breakevens();
    assert_eq!(breakevens.len(), 2);
    assert!(breakevens[0] > 90.0 && breakevens[0] < 95.0);
    assert!(breakevens[1] > 105.0 && breakevens[1] < 110.0);
}

#[test]
fn probability_limits_for_deep_itm_and_far_otm() {
    let valuation = date(2026, 8, 7);
    let expiry = date(2026, 8, 21);
    let state = MarketState::builder()
        .spot(150.0)
        .vol(0.08)
        .rate(0.01)
        .valuation_date(valuation)
        .build()
        .unwrap();

    let deep_itm = Strategy::new(
        "deep itm call",
        vec![Leg::option(OptionContract::call(50.0, expiry), 1.0, 0.25).unwrap()],
    )
    .unwrap();
    assert!(probability_of_profit(&deep_itm, &state) > 0.999);

    let far_otm = Strategy::new(
        "far otm call",
        vec![Leg::option(OptionContract::call(400.0, expiry), 1.0, 0.25).unwrap()],
    )
    .unwrap();
    assert!(probability_of_profit(&far_otm, &state) < 1e-3);
}

#[test]
fn quotes_without_vol_surface_a_missing_volatility_error() {
    let quote = OptionQuote {
        strike: 100.0,
        expiry: date(2026, 9, 18),
        implied_vol: None,
        last: Some(3.1),
    };
    let err = Leg::from_quote(OptionType::Call, &quote, 1.0, 3.1).unwrap_err();
    assert!(matches!(err, PricingError::MissingVolatility(_)));
    assert!(err.to_string().contains("missing volatility"));
}

#[test]
fn calendar_spread_anchors_payoff_to_the_near_expiry() {
    let template = StrategyTemplate::CalendarSpread {
        strike: 100.0,
        near_expiry: date(2026, 9, 18),
        far_expiry: date(2026, 12, 18),
        near_premium: 2.0,
        far_premium: 4.5,
        option_type: OptionType::Call,
        quantity: 1.0,
        implied_vol: Some(0.25),
    };
    let strategy = template.build().unwrap();
    let state = MarketState::builder()
        .spot(100.0)
        .vol(0.25)
        .rate(0.01)
        .valuation_date(date(2026, 8, 7))
        .build()
        .unwrap();

    // At the near expiration the far leg keeps its time value: the
    // anchored payoff beats the all-intrinsic payoff at the strike.
    let anchored = strategy
        .net_payoff_at_reference(100.0, date(2026, 9, 18), &state)
        .unwrap();
    assert!(anchored > strategy.net_payoff_at_expiry(100.0));

    // A date that is no leg's expiration is rejected.
    assert!(strategy
        .net_payoff_at_reference(100.0, date(2026, 10, 16), &state)
        .is_err());
}
