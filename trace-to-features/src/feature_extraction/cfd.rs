//! Constant-fraction timing of a falling pulse: locates t0, measures the
//! baseline and underline levels around it, then finds the times at which
//! the waveform crosses every 10% fraction of the pulse amplitude.

use tracing::debug;

use super::{
    Real,
    crossing::{SearchDirection, find_on_graph},
    edge::{DerivativeEdge, ThresholdEdge, derivative, threshold},
    error::{FeatureError, FeatureResult},
    levels::{LevelEstimate, amplitude_levels, baseline_near_t0, underline_near_t0},
    resample::resample,
    signal::Signal,
};

/// Amplitude fractions the discriminator reports, 10% through 90%.
pub const CFD_FRACTIONS: usize = 9;

/// How the pulse onset is located. The choice also selects the matching
/// level estimators: the threshold strategy evaluates baseline and
/// underline in windows placed relative to t0 on each side, while the
/// derivative strategy uses a symmetric pair of windows and fails hard if
/// either falls outside the trace.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeStrategy {
    Threshold(ThresholdEdge),
    Derivative(DerivativeEdge),
}

/// Placement of the level-evaluation windows relative to t0, in ns.
///
/// The baseline window ends `start_before_t0_ns` before t0 and the
/// underline window begins `start_after_t0_ns` after it; the same two
/// offsets bound the constant-fraction search range.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationWindows {
    pub baseline_evaluation_ns: Real,
    pub start_before_t0_ns: Real,
    pub underline_evaluation_ns: Real,
    pub start_after_t0_ns: Real,
}

impl Default for EvaluationWindows {
    fn default() -> Self {
        Self {
            baseline_evaluation_ns: 2.5,
            start_before_t0_ns: 15.0,
            underline_evaluation_ns: 1.25,
            start_after_t0_ns: 21.5,
        }
    }
}

/// The t0 time plus the nine constant-fraction crossing times, all in ns.
/// A missing crossing stays `None` only when no earlier fraction was
/// found; otherwise the repair in [`extract_features`] fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct CfdTimes {
    pub t0: Real,
    crossings: [Option<Real>; CFD_FRACTIONS],
}

impl CfdTimes {
    /// Crossing time for `tenths * 10` percent of the amplitude
    /// (`tenths` in `1..=9`).
    pub fn crossing(&self, tenths: usize) -> Option<Real> {
        self.crossings.get(tenths.wrapping_sub(1)).copied().flatten()
    }

    pub fn crossings(&self) -> &[Option<Real>; CFD_FRACTIONS] {
        &self.crossings
    }
}

/// Everything extracted from a single waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseFeatures {
    pub t0_index: usize,
    pub baseline: LevelEstimate,
    pub underline: LevelEstimate,
    pub cfd: CfdTimes,
}

impl PulseFeatures {
    /// Pulse amplitude (mV), baseline minus underline.
    pub fn amplitude(&self) -> Real {
        self.baseline.mean - self.underline.mean
    }

    /// Quadratic sum of the two level dispersions (mV).
    pub fn amplitude_rms(&self) -> Real {
        (self.baseline.rms * self.baseline.rms + self.underline.rms * self.underline.rms).sqrt()
    }

    /// Fall time from 10% to 50% of the amplitude (ns).
    pub fn fall_time_10_50(&self) -> Option<Real> {
        Some(self.cfd.crossing(5)? - self.cfd.crossing(1)?)
    }

    /// Fall time from 10% to 90% of the amplitude (ns).
    pub fn fall_time_10_90(&self) -> Option<Real> {
        Some(self.cfd.crossing(9)? - self.cfd.crossing(1)?)
    }
}

/// Runs the full extraction chain on one waveform.
///
/// The edge strategy locates t0 and its paired estimators measure the
/// levels on the raw samples. The constant-fraction search runs over
/// `[t0 - start_before, t0 + start_after]`, on a spline-resampled copy of
/// that range when `resample_step_ns` is given. Fractions up to 50% are
/// searched backward from the underline side, the rest forward, which
/// keeps each search away from the noise of the opposite plateau.
///
/// Crossing times must not decrease with the fraction on a falling pulse.
/// When noise produces an out-of-order or missing crossing it is snapped
/// to the first sampled point after the previous fraction's crossing.
pub fn extract_features(
    signal: &Signal,
    dt_ns: Real,
    strategy: &EdgeStrategy,
    windows: &EvaluationWindows,
    resample_step_ns: Option<Real>,
) -> FeatureResult<PulseFeatures> {
    let t0_index = match strategy {
        EdgeStrategy::Threshold(params) => threshold::find_edge(signal, params),
        EdgeStrategy::Derivative(params) => derivative::find_edge(signal, dt_ns, params),
    }
    .ok_or(FeatureError::EdgeNotFound)?;
    let t0_time = signal.time()[t0_index];
    let xmin = t0_time - windows.start_before_t0_ns;
    let xmax = t0_time + windows.start_after_t0_ns;

    let fine = resample_step_ns
        .map(|step| {
            resample(
                signal,
                signal.nearest_index(xmin),
                signal.nearest_index(xmax),
                step,
            )
        })
        .transpose()?;

    let (baseline, underline) = match strategy {
        EdgeStrategy::Threshold(_) => (
            baseline_near_t0(
                signal,
                t0_index,
                dt_ns,
                windows.baseline_evaluation_ns,
                windows.baseline_evaluation_ns + windows.start_before_t0_ns,
            )?,
            underline_near_t0(
                signal,
                t0_index,
                dt_ns,
                windows.underline_evaluation_ns,
                windows.start_after_t0_ns,
            )?,
        ),
        EdgeStrategy::Derivative(_) => amplitude_levels(
            signal,
            t0_index,
            dt_ns,
            windows.baseline_evaluation_ns + windows.start_before_t0_ns,
            windows.baseline_evaluation_ns,
        )?,
    };

    let search = fine.as_ref().unwrap_or(signal);
    let amplitude = baseline.mean - underline.mean;
    let mut crossings = [None; CFD_FRACTIONS];
    for tenths in 1..=CFD_FRACTIONS {
        let level = baseline.mean - tenths as Real / 10.0 * amplitude;
        let direction = if tenths <= 5 {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        };
        let mut found = find_on_graph(search, level, xmin, xmax, 1, direction);
        if tenths > 1 {
            if let Some(previous) = crossings[tenths - 2] {
                if found.is_none_or(|t| t < previous) {
                    let index = (search.nearest_index(previous) + 1).min(search.len() - 1);
                    let snapped = search.time()[index];
                    debug!(
                        fraction = tenths * 10,
                        snapped, "out-of-order crossing snapped past the previous fraction"
                    );
                    found = Some(snapped);
                }
            }
        }
        crossings[tenths - 1] = found;
    }

    Ok(PulseFeatures {
        t0_index,
        baseline,
        underline,
        cfd: CfdTimes {
            t0: t0_time,
            crossings,
        },
    })
}
