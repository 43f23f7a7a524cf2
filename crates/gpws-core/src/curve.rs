//! Piecewise-linear threshold curves.
//!
//! Every altitude-to-threshold relationship in the engine (sink-rate
//! limits, terrain-closure limits, bank-angle limits) is authored as a
//! small set of control points and evaluated by linear interpolation.

/// A piecewise-linear scalar function over strictly increasing x.
///
/// Evaluation clamps to the first/last control point's y outside the
/// authored domain; thresholds flatten outside their tuned range rather
/// than extrapolating.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    points: Vec<(f32, f32)>,
}

impl Curve {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a curve from a slice of (x, y) control points.
    ///
    /// Points must already be sorted by strictly increasing x.
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Append a control point. Callers add points in increasing x; the
    /// curve performs no sort and evaluation is undefined otherwise.
    pub fn add(&mut self, x: f32, y: f32) {
        self.points.push((x, y));
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the curve at `x`.
    ///
    /// Clamps to the endpoint values outside the domain and linearly
    /// interpolates between the bracketing points inside it. An empty
    /// curve evaluates to 0.
    pub fn evaluate(&self, x: f32) -> f32 {
        let Some(&(first_x, first_y)) = self.points.first() else {
            return 0.0;
        };
        let &(last_x, last_y) = self.points.last().unwrap();

        if x <= first_x {
            return first_y;
        }
        if x >= last_x {
            return last_y;
        }

        for window in self.points.windows(2) {
            let (x0, y0) = window[0];
            let (x1, y1) = window[1];
            if x >= x0 && x <= x1 {
                let t = (x - x0) / (x1 - x0);
                return y0 + t * (y1 - y0);
            }
        }

        last_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_below_and_above_domain() {
        let curve = Curve::from_points(&[(50.0, -1000.0), (2500.0, -5000.0)]);
        assert_eq!(curve.evaluate(0.0), -1000.0);
        assert_eq!(curve.evaluate(50.0), -1000.0);
        assert_eq!(curve.evaluate(2500.0), -5000.0);
        assert_eq!(curve.evaluate(10_000.0), -5000.0);
    }

    #[test]
    fn test_interpolates_between_points() {
        let curve = Curve::from_points(&[(50.0, -1000.0), (2500.0, -5000.0)]);
        // Exact interpolation formula at 500:
        // -1000 + (500-50)/(2500-50) * (-5000 - (-1000)) = -1734.69...
        let y = curve.evaluate(500.0);
        assert!((y - (-1734.6939)).abs() < 0.01, "got {y}");
    }

    #[test]
    fn test_multi_segment_interpolation() {
        let mut curve = Curve::new();
        curve.add(0.0, 1.0);
        curve.add(1.2, 1.0);
        curve.add(1.5, 2.0);
        assert_eq!(curve.evaluate(0.6), 1.0);
        let mid = curve.evaluate(1.35);
        assert!((mid - 1.5).abs() < 1e-5, "got {mid}");
    }

    #[test]
    fn test_empty_curve_evaluates_to_zero() {
        let curve = Curve::new();
        assert_eq!(curve.evaluate(100.0), 0.0);
    }
}
