use super::Real;
use thiserror::Error;

pub type FeatureResult<T> = Result<T, FeatureError>;

/// Per-waveform failure taxonomy. A failure marks that single waveform as
/// unusable; batch callers skip and count, they never abort or retry (the
/// computation is deterministic, a retry would reproduce the failure).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("time and voltage arrays differ in length ({time} vs {voltage})")]
    MismatchedLengths { time: usize, voltage: usize },
    #[error("no pulse edge found in trace")]
    EdgeNotFound,
    #[error("no signal above {threshold_mv} mV in trace")]
    NoSignal { threshold_mv: Real },
    #[error("level window [{start}, {end}) falls outside trace of length {len}")]
    InsufficientWindow { start: i64, end: i64, len: usize },
    #[error("{got} samples in resample range, cubic spline needs at least {needed}")]
    InsufficientPoints { got: usize, needed: usize },
    #[error("resample range times must be strictly increasing")]
    NonMonotonicTime,
    #[error("resample step must be positive, got {0} ns")]
    NonPositiveResampleStep(Real),
}
