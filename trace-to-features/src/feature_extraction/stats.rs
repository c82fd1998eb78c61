use super::{
    Real,
    signal::{Signal, WindowSpec},
};

/// Leading samples used for the quick reference baseline in the threshold
/// edge search and the signal gate.
pub(crate) const DEFAULT_BASELINE_SAMPLES: usize = 50;

/// Arithmetic mean and population standard deviation of the voltages in
/// `window`. A window running off the end of the trace is silently rebased
/// to `start = 0` (see [`WindowSpec`]); this never fails. An empty window
/// yields `(0, 0)`.
pub fn window_stats(signal: &Signal, window: WindowSpec) -> (Real, Real) {
    let window = window.rebased(signal.len());
    let end = (window.start + window.length).min(signal.len());
    let values = &signal.voltage()[window.start..end];
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as Real;
    let mean = values.iter().sum::<Real>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<Real>() / n;
    (mean, variance.sqrt())
}

/// Quick amplitude gate: does the trace dip more than `threshold_mv` below
/// the level of its leading samples?
pub fn has_signal(signal: &Signal, threshold_mv: Real) -> bool {
    if signal.is_empty() {
        return false;
    }
    let (baseline, _) = window_stats(signal, WindowSpec::new(0, DEFAULT_BASELINE_SAMPLES));
    let minimum = signal
        .voltage()
        .iter()
        .copied()
        .fold(Real::INFINITY, Real::min);
    (baseline - minimum).abs() > threshold_mv
}
