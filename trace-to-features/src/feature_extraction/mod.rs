//! The waveform feature-extraction chain, leaf modules first:
//!
//! - [`stats`]: mean/RMS over an index window of a trace.
//! - [`edge`]: two alternative t0 locators, threshold-based and
//!   derivative-based.
//! - [`levels`]: pre-pulse (baseline) and post-pulse (underline) DC level
//!   estimators paired with each t0 strategy.
//! - [`resample`]: cubic-spline upsampling of a bounded sub-range.
//! - [`crossing`]: level-crossing search with local linear refinement.
//! - [`cfd`]: the orchestration producing a [`PulseFeatures`] record per
//!   waveform.
//!
//! Everything is synchronous and allocation-free apart from the resampler;
//! batch callers parallelise over waveforms without any shared state.

pub mod cfd;
pub mod crossing;
pub mod edge;
pub mod error;
pub mod levels;
pub mod resample;
pub mod signal;
pub mod stats;

pub use cfd::{CfdTimes, PulseFeatures, extract_features};
pub use error::{FeatureError, FeatureResult};
pub use levels::LevelEstimate;
pub use signal::{Signal, WindowSpec};

pub type Real = f64;
