//! Closed-form pricing engines.

mod black_scholes;

pub use black_scholes::{
    BlackScholesEngine, bs_delta, bs_gamma, bs_price, bs_price_and_greeks, bs_price_slice, bs_rho,
    bs_theta, bs_valuation, bs_vega,
};
