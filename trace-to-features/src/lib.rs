//! This crate turns a digitised analogue pulse into a per-waveform feature
//! record: the edge position t0, the pre-pulse (baseline) and post-pulse
//! (underline) DC levels, and the constant-fraction-discriminator crossing
//! times at 10%..90% of the pulse amplitude.
//!
//! A raw trace takes the form of a slice of ADC codes plus the per-channel
//! scope calibration; [`processing::process_channel`] runs the whole chain
//! over a batch of traces. The components can also be driven one at a time
//! on a calibrated [`Signal`]:
//!
//! ```
//! use trace_to_features::feature_extraction::{
//!     Signal,
//!     cfd::{EdgeStrategy, EvaluationWindows, extract_features},
//!     edge::threshold::ThresholdEdge,
//! };
//!
//! // A falling pulse: 100 mV baseline, 20 mV underline, 5 ns edge.
//! let time: Vec<f64> = (0..200).map(|i| i as f64 * 0.25).collect();
//! let voltage: Vec<f64> = time
//!     .iter()
//!     .map(|&t| match t {
//!         t if t <= 25.0 => 100.0,
//!         t if t >= 30.0 => 20.0,
//!         t => 100.0 - 16.0 * (t - 25.0),
//!     })
//!     .collect();
//! let signal = Signal::new(time, voltage).unwrap();
//!
//! let features = extract_features(
//!     &signal,
//!     0.25,
//!     &EdgeStrategy::Threshold(ThresholdEdge::default()),
//!     &EvaluationWindows::default(),
//!     None,
//! )
//! .unwrap();
//! assert!(features.amplitude() > 75.0);
//! assert!(features.cfd.crossing(5).is_some());
//! ```

pub mod feature_extraction;
pub mod parameters;
pub mod processing;

pub use feature_extraction::{
    CfdTimes, FeatureError, FeatureResult, LevelEstimate, PulseFeatures, Real, Signal,
};
