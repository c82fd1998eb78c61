//! Locates where a waveform crosses a given voltage level, with optional
//! sub-sample refinement by local linear interpolation.

use itertools::Itertools;

use super::{Real, signal::Signal};

/// Interpolated times further than this from the sampled crossing are
/// treated as fit artefacts and discarded.
pub(crate) const INTERPOLATION_TOLERANCE_NS: Real = 0.1;

/// Samples examined around the sign change when refining the crossing.
const REFINEMENT_STEPS: usize = 10;

/// Which end of the search window the crossing is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// First sign change after `xmin`, refined scanning rightwards.
    Forward,
    /// Last sign change before `xmax`, refined scanning leftwards.
    Backward,
}

/// Least-squares line through the `2 * points + 1` samples centred on
/// `index` (clamped to the trace). Returns slope and intercept.
fn fit_local_line(signal: &Signal, index: usize, points: usize) -> (Real, Real) {
    let left = index.saturating_sub(points);
    let right = (index + points + 1).min(signal.len());
    let x = &signal.time()[left..right];
    let y = &signal.voltage()[left..right];
    let n = x.len() as Real;
    let sum_x: Real = x.iter().sum();
    let sum_y: Real = y.iter().sum();
    let sum_xy: Real = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: Real = x.iter().map(|a| a * a).sum();
    let denominator = n * sum_x2 - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y * sum_x2 - sum_x * sum_xy) / denominator;
    (slope, intercept)
}

/// Interpolated crossing time from the local line fit at `index`, or
/// `None` when the fit is degenerate, projects outside `(xmin, xmax)`, or
/// lands further than [`INTERPOLATION_TOLERANCE_NS`] from the sampled
/// crossing time `x`.
fn interpolated_time(
    signal: &Signal,
    index: usize,
    points: usize,
    level: Real,
    xmin: Real,
    xmax: Real,
    x: Real,
) -> Option<Real> {
    let (slope, intercept) = fit_local_line(signal, index, points);
    let xinterp = (level - intercept) / slope;
    (xinterp.is_finite()
        && xinterp > xmin
        && xinterp < xmax
        && (xinterp - x).abs() < INTERPOLATION_TOLERANCE_NS)
        .then_some(xinterp)
}

/// Finds the time at which the waveform crosses `level` within the time
/// window `[xmin, xmax]`.
///
/// Sign changes of `voltage - level` are enumerated over the window;
/// `direction` selects the first or last one. The crossing is then refined
/// over a ten-sample scan for a strict bracket (a sample past the level
/// with its neighbour on the other side), interpolating with a local line
/// fit of half-width `interpolation_points`. Interpolations that fail the
/// tolerance check fall back to the raw sampled crossing time, as does
/// `interpolation_points == 0`.
///
/// `None` when the window contains no sign change.
pub fn find_on_graph(
    signal: &Signal,
    level: Real,
    xmin: Real,
    xmax: Real,
    interpolation_points: usize,
    direction: SearchDirection,
) -> Option<Real> {
    if signal.is_empty() {
        return None;
    }
    let len = signal.len();
    let idx_min = signal.nearest_index(xmin).saturating_sub(1);
    let idx_max = (signal.nearest_index(xmax) + 1).min(len - 1);
    let crossings: Vec<usize> = signal.voltage()[idx_min..=idx_max]
        .iter()
        .map(|v| (v - level).is_sign_negative())
        .tuple_windows()
        .enumerate()
        .filter_map(|(rel, (a, b))| (a != b).then_some(idx_min + rel + 1))
        .collect();
    let index = match direction {
        SearchDirection::Forward => *crossings.first()?,
        SearchDirection::Backward => *crossings.last()?,
    };
    let (start, dstep): (i64, i64) = match direction {
        SearchDirection::Forward => (index.saturating_sub(5) as i64, 1),
        SearchDirection::Backward => ((index + 5).min(len) as i64, -1),
    };
    let clamp = |j: i64| j.clamp(0, len as i64 - 1) as usize;
    for step in 0..REFINEMENT_STEPS as i64 {
        let j = start + dstep * step;
        let c = signal.voltage()[clamp(j)];
        let before = signal.voltage()[clamp(j - dstep)];
        let after = signal.voltage()[clamp(j + dstep)];
        let bracketed = match direction {
            SearchDirection::Forward => c < level && before > level && after < level,
            SearchDirection::Backward => c > level && before < level && after > level,
        };
        if !bracketed {
            continue;
        }
        let x = signal.time()[clamp(j)];
        if interpolation_points == 0 {
            return Some(x);
        }
        match interpolated_time(signal, clamp(j), interpolation_points, level, xmin, xmax, x) {
            Some(xinterp) => return Some(xinterp),
            None => continue,
        }
    }
    // No bracket within reach, settle for the raw sign change.
    let x = signal.time()[index];
    if interpolation_points == 0 {
        return Some(x);
    }
    Some(
        interpolated_time(signal, index, interpolation_points, level, xmin, xmax, x)
            .unwrap_or(x),
    )
}
