//! Scalar math used by the pricing kernel and the probability metrics.
//!
//! `normal_cdf` follows Abramowitz & Stegun 7.1.26, accurate to ~1e-7,
//! which is ample for strategy-level P/L work. [`LogNormalTerminal`]
//! models the risk-neutral terminal price distribution used for
//! probability-of-profit and expected-value integrals.

/// Standard normal probability density.
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution.
pub fn normal_cdf(x: f64) -> f64 {
    // Abramowitz & Stegun 7.1.26
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let approx = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { approx } else { 1.0 - approx }
}

/// Risk-neutral log-normal distribution of the terminal underlying price.
///
/// For spot `S0`, drift `r`, volatility `sigma`, and horizon `t` (years),
/// `ln S_T ~ N(ln S0 + (r - sigma^2/2) t, sigma^2 t)`. The degenerate
/// `sigma * sqrt(t) == 0` case collapses to a point mass at the forward
/// `S0 e^{r t}` and is handled without division by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalTerminal {
    /// Mean of `ln S_T`.
    mu: f64,
    /// Standard deviation of `ln S_T`.
    sd: f64,
    /// Forward price `E[S_T] = S0 e^{r t}`.
    forward: f64,
}

impl LogNormalTerminal {
    /// Builds the terminal distribution from market parameters.
    ///
    /// Callers are expected to pass `spot > 0`, `sigma >= 0`, `t >= 0`;
    /// these are validated upstream by the market-state constructors.
    pub fn new(spot: f64, rate: f64, sigma: f64, t: f64) -> Self {
        let sd = sigma * t.sqrt();
        Self {
            mu: spot.ln() + (rate - 0.5 * sigma * sigma) * t,
            sd,
            forward: spot * (rate * t).exp(),
        }
    }

    /// True when the distribution is a point mass at the forward.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.sd <= 0.0
    }

    /// Forward price `E[S_T]`.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// `P(S_T <= b)`. `b <= 0` has zero mass below it.
    pub fn cdf(&self, b: f64) -> f64 {
        if b <= 0.0 {
            return 0.0;
        }
        if self.is_degenerate() {
            return if self.forward <= b { 1.0 } else { 0.0 };
        }
        normal_cdf((b.ln() - self.mu) / self.sd)
    }

    /// Probability mass of the interval `(a, b]`, with `f64::INFINITY`
    /// accepted as an open upper bound.
    pub fn mass(&self, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }
        let upper = if b.is_finite() { self.cdf(b) } else { 1.0 };
        (upper - self.cdf(a)).max(0.0)
    }

    /// Partial expectation `E[S_T 1{a < S_T <= b}]`.
    ///
    /// Closed form: `F (Phi(d(b) - sd) - Phi(d(a) - sd))` with
    /// `d(x) = (ln x - mu) / sd` and `F` the forward.
    pub fn partial_mean(&self, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }
        if self.is_degenerate() {
            let inside = self.forward > a && (b.is_infinite() || self.forward <= b);
            return if inside { self.forward } else { 0.0 };
        }
        let shifted = |x: f64| -> f64 {
            if x <= 0.0 {
                0.0
            } else if x.is_finite() {
                normal_cdf((x.ln() - self.mu) / self.sd - self.sd)
            } else {
                1.0
            }
        };
        self.forward * (shifted(b) - shifted(a)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_cdf_reference_points() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-9);
        assert_relative_eq!(normal_cdf(1.0), 0.841_344_746, epsilon = 2e-5);
        assert_relative_eq!(normal_cdf(-1.0), 1.0 - normal_cdf(1.0), epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(3.0), 0.998_650_102, epsilon = 2e-5);
    }

    #[test]
    fn lognormal_masses_sum_to_one() {
        let dist = LogNormalTerminal::new(100.0, 0.03, 0.25, 0.5);
        let total = dist.mass(0.0, 80.0) + dist.mass(80.0, 120.0) + dist.mass(120.0, f64::INFINITY);
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn lognormal_partial_means_sum_to_forward() {
        let dist = LogNormalTerminal::new(100.0, 0.03, 0.25, 0.5);
        let total = dist.partial_mean(0.0, 90.0)
            + dist.partial_mean(90.0, 130.0)
            + dist.partial_mean(130.0, f64::INFINITY);
        assert_relative_eq!(total, dist.forward(), epsilon = 1e-6 * dist.forward());
    }

    #[test]
    fn degenerate_distribution_is_point_mass_at_forward() {
        let dist = LogNormalTerminal::new(100.0, 0.05, 0.0, 1.0);
        assert!(dist.is_degenerate());
        let fwd = 100.0 * (0.05_f64).exp();
        assert_relative_eq!(dist.forward(), fwd, epsilon = 1e-12);
        assert_relative_eq!(dist.mass(fwd - 1.0, fwd + 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(dist.mass(0.0, fwd - 1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(dist.partial_mean(0.0, f64::INFINITY), fwd, epsilon = 1e-12);
    }
}
