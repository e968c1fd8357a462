//! Pricing curves for option liquidity pools

use serde::{Deserialize, Serialize};

/// Generic interface for a pool's unit-price curve over utilization
pub trait Curve {
    /// Returns the name/type of this curve implementation
    fn name(&self) -> &'static str;

    /// Unit price at utilization u ∈ [0, max_utilization]
    fn evaluate(&self, u: f64) -> f64;

    /// Highest utilization the pool will accept
    fn max_utilization(&self) -> f64;

    /// Cumulative cost V(q) = q · P(q / capital) of filling q from empty
    fn cumulative_cost(&self, q: f64, capital: f64) -> f64 {
        if q == 0.0 { return 0.0; }
        q * self.evaluate(q / capital)
    }

    /// Average price per unit of filling `delta` starting at fill level `from`:
    /// (V(from + Δ) − V(from)) / Δ
    fn marginal_cost(&self, capital: f64, from: f64, delta: f64) -> f64 {
        (self.cumulative_cost(from + delta, capital) - self.cumulative_cost(from, capital)) / delta
    }
}

/// P(u) = a · u · cosh(b · u^c) + d
///
/// With b = 0 this is the linear price P(u) = a·u + d, whose cumulative cost is
/// quadratic in q. Growing b steepens the curve as u approaches max utilization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCurve {
    /// Linear scale
    pub a: f64,
    /// Convexity scale inside cosh
    pub b: f64,
    /// Convexity exponent
    pub c: f64,
    /// Price floor
    pub d: f64,
    /// Utilization cap in (0, 1]
    pub max_utilization: f64,
}

impl PricingCurve {
    /// Plain linear curve P(u) = a·u with full utilization allowed.
    pub fn linear(a: f64) -> Self {
        Self { a, b: 0.0, c: 1.0, d: 0.0, max_utilization: 1.0 }
    }

    /// True when every parameter is finite and the utilization cap is in (0, 1].
    pub fn is_well_formed(&self) -> bool {
        [self.a, self.b, self.c, self.d].iter().all(|x| x.is_finite())
            && self.max_utilization > 0.0
            && self.max_utilization <= 1.0
    }
}

impl Curve for PricingCurve {
    fn name(&self) -> &'static str { "a·u·cosh(b·u^c)+d" }
    fn evaluate(&self, u: f64) -> f64 {
        self.a * u * (self.b * u.powf(self.c)).cosh() + self.d
    }
    fn max_utilization(&self) -> f64 { self.max_utilization }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_curve_cost_is_quadratic() {
        let c = PricingCurve::linear(1.0);
        assert_relative_eq!(c.cumulative_cost(100.0, 1000.0), 10.0);
        assert_relative_eq!(c.marginal_cost(1000.0, 0.0, 50.0), 0.05);
        assert_relative_eq!(c.marginal_cost(1000.0, 50.0, 50.0), 0.15);
    }

    #[test]
    fn cosh_term_steepens_the_curve() {
        let flat = PricingCurve::linear(1.0);
        let steep = PricingCurve { b: 2.0, c: 2.0, ..flat };
        assert_eq!(flat.evaluate(0.0), steep.evaluate(0.0));
        assert!(steep.evaluate(0.9) > flat.evaluate(0.9));
    }

    #[test]
    fn floor_shifts_every_price() {
        let c = PricingCurve { d: 0.25, ..PricingCurve::linear(1.0) };
        assert_relative_eq!(c.evaluate(0.0), 0.25);
        assert_relative_eq!(c.evaluate(0.5), 0.75);
        assert_eq!(c.cumulative_cost(0.0, 10.0), 0.0);
    }

    #[test]
    fn malformed_parameters_are_detected() {
        assert!(PricingCurve::linear(1.0).is_well_formed());
        assert!(!PricingCurve { a: f64::NAN, ..PricingCurve::linear(1.0) }.is_well_formed());
        assert!(!PricingCurve { max_utilization: 0.0, ..PricingCurve::linear(1.0) }.is_well_formed());
        assert!(!PricingCurve { max_utilization: 1.5, ..PricingCurve::linear(1.0) }.is_well_formed());
    }
}
