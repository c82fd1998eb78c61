use super::super::{
    Real,
    signal::{Signal, WindowSpec},
    stats::{DEFAULT_BASELINE_SAMPLES, window_stats},
};

/// Parameters for the threshold edge search.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdEdge {
    /// Deviation from the baseline (mV) a sample must exceed to count
    /// towards a run.
    pub cut_mv: Real,
    /// Run length that must be exceeded before the edge is accepted.
    pub points_within_cut: usize,
    /// Lookback from the detection point to sit just before the edge.
    pub total_step: usize,
}

impl Default for ThresholdEdge {
    fn default() -> Self {
        Self {
            cut_mv: 7.0,
            points_within_cut: 1,
            total_step: 2,
        }
    }
}

/// Scans left-to-right up to the trace minimum, counting consecutive
/// samples that deviate from the leading-sample baseline by more than the
/// cut. Once the run exceeds `points_within_cut` the edge is placed
/// `total_step` samples before the current position. `None` when no such
/// run exists (or the lookback would fall before the trace).
pub fn find_edge(signal: &Signal, params: &ThresholdEdge) -> Option<usize> {
    let min_index = signal.min_index()?;
    let (baseline, _) = window_stats(signal, WindowSpec::new(0, DEFAULT_BASELINE_SAMPLES));
    let mut run = 0;
    for i in 0..min_index {
        if (signal.voltage()[i] - baseline).abs() > params.cut_mv {
            run += 1;
        } else {
            run = 0;
        }
        if run > params.points_within_cut {
            return i.checked_sub(params.total_step);
        }
    }
    None
}
