//! Per-channel batch driver. Each waveform is analysed independently and
//! deterministically; a failed waveform is skipped and counted, never
//! retried, and the output order always matches the input order.

use rayon::prelude::*;
use tracing::{debug, warn};
use waveform_common::{Channel, ChannelCalibration, Intensity};

use crate::{
    feature_extraction::{
        cfd::{PulseFeatures, extract_features},
        error::{FeatureError, FeatureResult},
        signal::Signal,
        stats::has_signal,
    },
    parameters::Mode,
};

/// Runs the extraction chain on one raw ADC waveform.
///
/// When the mode carries a minimum-amplitude gate, traces that never dip
/// far enough below their leading-sample level are rejected up front with
/// [`FeatureError::NoSignal`], before any edge search runs.
pub fn analyse_trace(
    adc: &[Intensity],
    calibration: &ChannelCalibration,
    mode: &Mode,
) -> FeatureResult<PulseFeatures> {
    let signal = Signal::from_adc(adc, calibration);
    if let Some(threshold_mv) = mode.min_amplitude_mv() {
        if !has_signal(&signal, threshold_mv) {
            return Err(FeatureError::NoSignal { threshold_mv });
        }
    }
    extract_features(
        &signal,
        calibration.dt_ns(),
        &mode.edge_strategy(),
        &mode.windows(),
        mode.resample_step_ns(),
    )
}

/// Analyses a batch of waveforms from one scope channel in parallel.
pub fn process_channel(
    channel: Channel,
    traces: &[Vec<Intensity>],
    calibration: &ChannelCalibration,
    mode: &Mode,
) -> Vec<FeatureResult<PulseFeatures>> {
    let results: Vec<_> = traces
        .par_iter()
        .map(|adc| {
            analyse_trace(adc, calibration, mode)
                .inspect_err(|error| debug!(channel, %error, "waveform skipped"))
        })
        .collect();
    let failures = results.iter().filter(|result| result.is_err()).count();
    if failures > 0 {
        warn!(
            channel,
            failures,
            total = results.len(),
            "waveforms skipped in batch"
        );
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feature_extraction::edge::{DerivativeEdge, ThresholdEdge},
        parameters::{
            DerivativeEdgeWrapper, DerivativeParameters, EvaluationWindowsWrapper, Mode,
            ThresholdEdgeWrapper, ThresholdParameters,
        },
    };
    use assert_approx_eq::assert_approx_eq;
    use std::str::FromStr;
    use waveform_simulator::{NoiseSource, PulseTemplate, TraceBuilder};

    fn calibration(dt_ns: f64) -> ChannelCalibration {
        ChannelCalibration {
            dt: dt_ns * 1e-9,
            t0: 0.0,
            dv: 0.1e-3,
            v0: 0.0,
        }
    }

    fn step_template() -> PulseTemplate {
        PulseTemplate::Step {
            baseline_mv: 100.0,
            underline_mv: 20.0,
            edge_ns: 100.0,
        }
    }

    fn threshold_mode(edge: ThresholdEdge) -> Mode {
        Mode::Threshold(ThresholdParameters {
            edge: ThresholdEdgeWrapper(edge),
            windows: EvaluationWindowsWrapper::from_str("2.5,15,1.25,21.5").unwrap(),
            resample_step_ns: None,
            min_amplitude_mv: None,
        })
    }

    fn derivative_mode(edge: DerivativeEdge) -> Mode {
        Mode::Derivative(DerivativeParameters {
            edge: DerivativeEdgeWrapper(edge),
            windows: EvaluationWindowsWrapper::from_str("2.5,15,1.25,21.5").unwrap(),
            resample_step_ns: None,
            min_amplitude_mv: None,
        })
    }

    #[test]
    fn noisy_step_t0_recovery_with_both_strategies() {
        let calibration = calibration(1.0);
        let modes = [
            threshold_mode(ThresholdEdge {
                cut_mv: 40.0,
                points_within_cut: 1,
                total_step: 2,
            }),
            derivative_mode(DerivativeEdge {
                integration_time_ns: 16.0,
                threshold_mv: 10.0,
            }),
        ];
        for mode in &modes {
            let mut recovered = 0;
            for seed in 0..20 {
                let adc = TraceBuilder::new(400, 1.0, step_template())
                    .with_noise(NoiseSource::gaussian(4.0, seed))
                    .digitise(&calibration);
                let Ok(features) = analyse_trace(&adc, &calibration, mode) else {
                    continue;
                };
                if (features.t0_index as i64 - 100).abs() <= 1 {
                    recovered += 1;
                }
            }
            assert!(recovered >= 19, "only {recovered}/20 seeds recovered t0");
        }
    }

    #[test]
    fn trapezoid_end_to_end() {
        // 200 samples at 62.5 ps, falling edge starting at sample 50 and
        // completing 1 ns later.
        let dt_ns = 0.0625;
        let calibration = calibration(dt_ns);
        let template = PulseTemplate::Trapezoid {
            baseline_mv: 100.0,
            underline_mv: 20.0,
            edge_start_ns: 50.0 * dt_ns,
            fall_time_ns: 1.0,
        };
        let adc = TraceBuilder::new(200, dt_ns, template.clone()).digitise(&calibration);
        let mode = Mode::Threshold(ThresholdParameters {
            edge: ThresholdEdgeWrapper(ThresholdEdge::default()),
            windows: EvaluationWindowsWrapper::from_str("0.625,1.25,0.625,2").unwrap(),
            resample_step_ns: Some(0.0125),
            min_amplitude_mv: Some(40.0),
        });
        let features = analyse_trace(&adc, &calibration, &mode).unwrap();
        assert!((49..=51).contains(&features.t0_index));
        assert_approx_eq!(features.amplitude(), 80.0, 0.1);
        let half = features.cfd.crossing(5).unwrap();
        assert_approx_eq!(half, template.crossing_time(0.5).unwrap(), 0.05);
        let fast = features.fall_time_10_50().unwrap();
        let full = features.fall_time_10_90().unwrap();
        assert_approx_eq!(fast, 0.4, 0.05);
        assert_approx_eq!(full, 0.8, 0.05);
        assert!(full > fast);
    }

    #[test]
    fn amplitude_gate_rejects_empty_triggers() {
        let calibration = calibration(1.0);
        let adc = TraceBuilder::new(400, 1.0, PulseTemplate::Flat { level_mv: 100.0 })
            .with_noise(NoiseSource::gaussian(2.0, 11))
            .digitise(&calibration);
        let mut mode = threshold_mode(ThresholdEdge::default());
        if let Mode::Threshold(parameters) = &mut mode {
            parameters.min_amplitude_mv = Some(40.0);
        }
        assert_eq!(
            analyse_trace(&adc, &calibration, &mode),
            Err(FeatureError::NoSignal { threshold_mv: 40.0 })
        );
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let calibration = calibration(1.0);
        let pulse = TraceBuilder::new(400, 1.0, step_template()).digitise(&calibration);
        let flat =
            TraceBuilder::new(400, 1.0, PulseTemplate::Flat { level_mv: 100.0 })
                .digitise(&calibration);
        let mode = threshold_mode(ThresholdEdge::default());
        let results = process_channel(0, &[pulse, flat], &calibration, &mode);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(FeatureError::EdgeNotFound));
    }
}
