use super::{
    Real,
    error::{FeatureError, FeatureResult},
    signal::{Signal, WindowSpec},
    stats::window_stats,
};

/// A DC level, its dispersion, and one reference sample adjacent to the
/// evaluation window. The reference sample (not the window's own RMS) is
/// what the downstream aggregation uses for per-event noise
/// characterisation, so it is carried explicitly rather than recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelEstimate {
    pub mean: Real,
    pub rms: Real,
    pub noise_sample: Real,
}

/// Pre-pulse level paired with the threshold t0 strategy. The evaluation
/// window starts `start_before_t0_ns` before t0 and spans
/// `evaluation_time_ns`; the noise sample sits at the window's far
/// boundary, the sampled point closest to the signal edge.
///
/// The window itself goes through [`window_stats`] and so inherits its
/// rebase recovery; a window that would begin before the trace, or a noise
/// sample past its end, is a hard failure instead.
pub fn baseline_near_t0(
    signal: &Signal,
    t0: usize,
    dt_ns: Real,
    evaluation_time_ns: Real,
    start_before_t0_ns: Real,
) -> FeatureResult<LevelEstimate> {
    let points = (evaluation_time_ns / dt_ns).round() as usize;
    let start = (t0 as Real - start_before_t0_ns / dt_ns).round() as i64;
    let noise_index = start + points as i64;
    if start < 0 || noise_index >= signal.len() as i64 {
        return Err(FeatureError::InsufficientWindow {
            start,
            end: noise_index + 1,
            len: signal.len(),
        });
    }
    let (mean, rms) = window_stats(signal, WindowSpec::new(start as usize, points));
    Ok(LevelEstimate {
        mean,
        rms,
        noise_sample: signal.voltage()[noise_index as usize],
    })
}

/// Post-pulse level paired with the threshold t0 strategy, mirroring
/// [`baseline_near_t0`] on the other side of the edge. Here the window's
/// near boundary is the point closest to the signal, so that is where the
/// noise sample is taken.
pub fn underline_near_t0(
    signal: &Signal,
    t0: usize,
    dt_ns: Real,
    evaluation_time_ns: Real,
    start_after_t0_ns: Real,
) -> FeatureResult<LevelEstimate> {
    let points = (evaluation_time_ns / dt_ns).round() as usize;
    let start = (t0 as Real + start_after_t0_ns / dt_ns).round() as i64;
    if start < 0 || start >= signal.len() as i64 {
        return Err(FeatureError::InsufficientWindow {
            start,
            end: start + points as i64,
            len: signal.len(),
        });
    }
    let (mean, rms) = window_stats(signal, WindowSpec::new(start as usize, points));
    Ok(LevelEstimate {
        mean,
        rms,
        noise_sample: signal.voltage()[start as usize],
    })
}

/// Baseline and underline paired with the derivative t0 strategy. Both
/// offsets are physical times; with `n = round(max/dt)` and
/// `p = round(min/dt)` the baseline is the mean over `[t0-n, t0-p)` and
/// the underline the mean over `[t0+p, t0+n)`, each with the sample at
/// the inner boundary as its noise reference.
///
/// Unlike the statistics window this never clamps: a window running off
/// the trace would change the physical meaning of "pre-/post-pulse", so
/// it fails with `InsufficientWindow` and the waveform is dropped.
pub fn amplitude_levels(
    signal: &Signal,
    t0: usize,
    dt_ns: Real,
    outer_offset_ns: Real,
    inner_offset_ns: Real,
) -> FeatureResult<(LevelEstimate, LevelEstimate)> {
    let n = (outer_offset_ns.max(inner_offset_ns) / dt_ns).round() as i64;
    let p = (outer_offset_ns.min(inner_offset_ns) / dt_ns).round() as i64;
    let t0 = t0 as i64;
    if t0 - n < 0 || t0 + n >= signal.len() as i64 {
        return Err(FeatureError::InsufficientWindow {
            start: t0 - n,
            end: t0 + n,
            len: signal.len(),
        });
    }
    let length = (n - p).max(0) as usize;
    let (baseline, baseline_rms) =
        window_stats(signal, WindowSpec::new((t0 - n) as usize, length));
    let (underline, underline_rms) =
        window_stats(signal, WindowSpec::new((t0 + p) as usize, length));
    Ok((
        LevelEstimate {
            mean: baseline,
            rms: baseline_rms,
            noise_sample: signal.voltage()[(t0 - p) as usize],
        },
        LevelEstimate {
            mean: underline,
            rms: underline_rms,
            noise_sample: signal.voltage()[(t0 + p) as usize],
        },
    ))
}
