use serde::{Deserialize, Serialize};

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

/// First-order sensitivities of an option price under Black-Scholes.
///
/// The fields correspond to:
/// - `delta = dV/dS`
/// - `gamma = d²V/dS²`
/// - `vega = dV/dσ`
/// - `theta = dV/dt`
/// - `rho = dV/dr`
///
/// All values are in raw analytic units (per year, per unit of vol).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

impl Greeks {
    /// All-zero sensitivities, the expired-contract result.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns these sensitivities scaled by a position weight.
    pub fn scaled(self, weight: f64) -> Self {
        Self {
            delta: weight * self.delta,
            gamma: weight * self.gamma,
            vega: weight * self.vega,
            theta: weight * self.theta,
            rho: weight * self.rho,
        }
    }
}

/// How a kernel valuation was produced.
///
/// Degenerate inputs (`T = 0`, `σ = 0`) are handled, not errors; this
/// flag lets callers distinguish exact-intrinsic results from
/// model-based results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationMode {
    /// Closed-form Black-Scholes value.
    Model,
    /// Expired contract priced at intrinsic value.
    Intrinsic,
    /// Zero-volatility limit, discounted forward intrinsic value.
    ZeroVol,
}

impl ValuationMode {
    /// True for the non-degenerate closed-form path.
    #[inline]
    pub fn is_model(self) -> bool {
        matches!(self, Self::Model)
    }
}

/// Kernel result payload: price plus analytic sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Present value per unit of underlying.
    pub price: f64,
    /// Analytic Greeks.
    pub greeks: Greeks,
    /// Degenerate-input flag.
    pub mode: ValuationMode,
}
