//! Cubic-spline resampling of a waveform segment onto a finer grid, used
//! to sharpen crossing times beyond the scope's native sampling period.

use super::{
    Real,
    error::{FeatureError, FeatureResult},
    signal::Signal,
};

/// Grid step (ns) the constant-fraction search resamples onto, 12.5 ps.
pub const DEFAULT_RESAMPLE_STEP_NS: Real = 0.0125;

/// Natural cubic spline through a set of knots, solved with the Thomas
/// algorithm on the tridiagonal second-derivative system.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<Real>,
    y: Vec<Real>,
    second_derivative: Vec<Real>,
}

impl CubicSpline {
    /// Fits the spline. Needs at least four knots with strictly increasing
    /// abscissae.
    pub fn fit(x: Vec<Real>, y: Vec<Real>) -> FeatureResult<Self> {
        if x.len() != y.len() {
            return Err(FeatureError::MismatchedLengths {
                time: x.len(),
                voltage: y.len(),
            });
        }
        let n = x.len();
        if n < 4 {
            return Err(FeatureError::InsufficientPoints { got: n, needed: 4 });
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FeatureError::NonMonotonicTime);
        }
        let h: Vec<Real> = x.windows(2).map(|w| w[1] - w[0]).collect();
        // Natural boundary: zero curvature at both ends, so only the n - 2
        // interior second derivatives are unknown.
        let mut diagonal = vec![0.0; n - 2];
        let mut rhs = vec![0.0; n - 2];
        for i in 0..n - 2 {
            diagonal[i] = 2.0 * (h[i] + h[i + 1]);
            rhs[i] = 6.0 * ((y[i + 2] - y[i + 1]) / h[i + 1] - (y[i + 1] - y[i]) / h[i]);
        }
        // Thomas forward sweep: the sub/super diagonals are h[1..] and the
        // system is diagonally dominant, so no pivoting is needed.
        for i in 1..n - 2 {
            let factor = h[i] / diagonal[i - 1];
            diagonal[i] -= factor * h[i];
            rhs[i] -= factor * rhs[i - 1];
        }
        let mut second_derivative = vec![0.0; n];
        for i in (0..n - 2).rev() {
            let above = if i + 1 < n - 2 {
                h[i + 1] * second_derivative[i + 2]
            } else {
                0.0
            };
            second_derivative[i + 1] = (rhs[i] - above) / diagonal[i];
        }
        Ok(Self {
            x,
            y,
            second_derivative,
        })
    }

    /// Evaluates the spline at `t`. Outside the knot span the polynomial
    /// of the nearest interval is extended, which keeps the grid overshoot
    /// of [`resample`] well behaved.
    pub fn evaluate(&self, t: Real) -> Real {
        let n = self.x.len();
        let segment = self.x.partition_point(|&k| k <= t).clamp(1, n - 1) - 1;
        let h = self.x[segment + 1] - self.x[segment];
        let a = (self.x[segment + 1] - t) / h;
        let b = (t - self.x[segment]) / h;
        a * self.y[segment]
            + b * self.y[segment + 1]
            + ((a * a * a - a) * self.second_derivative[segment]
                + (b * b * b - b) * self.second_derivative[segment + 1])
                * h
                * h
                / 6.0
    }
}

/// Resamples the waveform between the sample indices `first..=last` onto a
/// uniform grid of period `step_ns`. The grid starts at the first knot and
/// extends up to (but excluding) one step past the last, so the final
/// sample may overshoot the knot span by less than one step.
pub fn resample(
    signal: &Signal,
    first: usize,
    last: usize,
    step_ns: Real,
) -> FeatureResult<Signal> {
    if step_ns <= 0.0 {
        return Err(FeatureError::NonPositiveResampleStep(step_ns));
    }
    let last = last.min(signal.len().saturating_sub(1));
    if first > last {
        return Err(FeatureError::InsufficientPoints { got: 0, needed: 4 });
    }
    let x = signal.time()[first..=last].to_vec();
    let y = signal.voltage()[first..=last].to_vec();
    let (start, stop) = (x[0], x[x.len() - 1] + step_ns);
    let spline = CubicSpline::fit(x, y)?;
    let mut time = Vec::new();
    let mut voltage = Vec::new();
    let mut k = 0u64;
    loop {
        let t = start + k as Real * step_ns;
        if t >= stop {
            break;
        }
        time.push(t);
        voltage.push(spline.evaluate(t));
        k += 1;
    }
    Ok(Signal::from_raw_parts(time, voltage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn knots(n: usize, dt: Real, f: impl Fn(Real) -> Real) -> (Vec<Real>, Vec<Real>) {
        let x: Vec<Real> = (0..n).map(|i| i as Real * dt).collect();
        let y = x.iter().map(|&v| f(v)).collect();
        (x, y)
    }

    #[test]
    fn spline_passes_through_the_knots() {
        let (x, y) = knots(64, 0.25, |t| (t * 1.3).sin() * 40.0 + 70.0);
        let spline = CubicSpline::fit(x.clone(), y.clone()).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert_approx_eq!(spline.evaluate(*xi), *yi, 1e-9);
        }
    }

    #[test]
    fn interior_midpoints_track_a_smooth_curve() {
        let (x, y) = knots(101, 0.1, |t| (t * 0.8).sin() * 50.0);
        let spline = CubicSpline::fit(x, y).unwrap();
        for i in 10..90 {
            let t = (i as Real + 0.5) * 0.1;
            assert_approx_eq!(spline.evaluate(t), (t * 0.8).sin() * 50.0, 1e-3);
        }
    }

    #[test]
    fn linear_knots_interpolate_linearly() {
        let (x, y) = knots(16, 1.0, |t| 3.0 * t - 7.0);
        let spline = CubicSpline::fit(x, y).unwrap();
        assert_approx_eq!(spline.evaluate(4.5), 3.0 * 4.5 - 7.0, 1e-9);
        assert_approx_eq!(spline.evaluate(10.25), 3.0 * 10.25 - 7.0, 1e-9);
    }

    #[test]
    fn resampled_grid_covers_the_span() {
        let (x, y) = knots(11, 1.0, |t| t * t);
        let signal = Signal::new(x, y).unwrap();
        let fine = resample(&signal, 0, 10, 0.25).unwrap();
        assert_eq!(fine.len(), 41);
        assert_approx_eq!(fine.time()[0], 0.0);
        assert_approx_eq!(fine.time()[40], 10.0, 1e-9);
        assert_approx_eq!(fine.time()[1] - fine.time()[0], 0.25, 1e-12);
    }

    #[test]
    fn too_few_knots_are_rejected() {
        assert!(matches!(
            CubicSpline::fit(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]),
            Err(FeatureError::InsufficientPoints { got: 3, needed: 4 })
        ));
    }

    #[test]
    fn non_monotonic_knots_are_rejected() {
        assert!(matches!(
            CubicSpline::fit(vec![0.0, 2.0, 1.0, 3.0], vec![0.0; 4]),
            Err(FeatureError::NonMonotonicTime)
        ));
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let (x, y) = knots(8, 1.0, |t| t);
        let signal = Signal::new(x, y).unwrap();
        assert!(matches!(
            resample(&signal, 0, 7, 0.0),
            Err(FeatureError::NonPositiveResampleStep(_))
        ));
    }
}
