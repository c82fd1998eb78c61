use super::{
    Real,
    error::{FeatureError, FeatureResult},
};
use waveform_common::{ChannelCalibration, Intensity};

/// A digitised waveform in physical units: time in ns, voltage in mV.
/// Both arrays always have the same length and time is non-decreasing.
/// The extraction chain only ever reads bounded windows of a signal; the
/// one exception is the resampler, which materialises a new owned signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    time: Vec<Real>,
    voltage: Vec<Real>,
}

impl Signal {
    pub fn new(time: Vec<Real>, voltage: Vec<Real>) -> FeatureResult<Self> {
        if time.len() != voltage.len() {
            return Err(FeatureError::MismatchedLengths {
                time: time.len(),
                voltage: voltage.len(),
            });
        }
        Ok(Self { time, voltage })
    }

    /// Build from raw ADC codes using the per-channel scope calibration.
    pub fn from_adc(adc: &[Intensity], calibration: &ChannelCalibration) -> Self {
        Self {
            time: (0..adc.len()).map(|i| calibration.time_ns(i)).collect(),
            voltage: adc.iter().map(|&v| calibration.voltage_mv(v)).collect(),
        }
    }

    pub(crate) fn from_raw_parts(time: Vec<Real>, voltage: Vec<Real>) -> Self {
        debug_assert_eq!(time.len(), voltage.len());
        Self { time, voltage }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn voltage(&self) -> &[Real] {
        &self.voltage
    }

    /// Index of the first sample with the minimum voltage.
    pub fn min_index(&self) -> Option<usize> {
        let mut best: Option<(usize, Real)> = None;
        for (i, &v) in self.voltage.iter().enumerate() {
            if best.map_or(true, |(_, min)| v < min) {
                best = Some((i, v));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the sample whose time is closest to `x` (first on ties).
    /// Returns 0 for an empty signal.
    pub fn nearest_index(&self, x: Real) -> usize {
        let mut best = 0;
        let mut best_distance = Real::INFINITY;
        for (i, &t) in self.time.iter().enumerate() {
            let distance = (t - x).abs();
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        best
    }
}

/// An index window into a signal.
///
/// Two recovery policies coexist deliberately when a window runs off the
/// array: the statistics window rebases itself to `start = 0` and carries
/// on, while the level estimators fail hard with `InsufficientWindow`
/// (an out-of-range pre-/post-pulse window changes the physical meaning of
/// the level). Both behaviours are tested; do not unify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub start: usize,
    pub length: usize,
}

impl WindowSpec {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// The rebase-to-start recovery used by `window_stats`.
    pub(crate) fn rebased(self, len: usize) -> Self {
        if self.start + self.length > len {
            Self {
                start: 0,
                length: self.length,
            }
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = Signal::new(vec![0.0, 1.0], vec![5.0]);
        assert_eq!(
            result,
            Err(FeatureError::MismatchedLengths {
                time: 2,
                voltage: 1
            })
        );
    }

    #[test]
    fn calibration_is_applied() {
        let calibration = ChannelCalibration {
            dt: 1.0e-9,
            t0: -2.0e-9,
            dv: 1.0e-3,
            v0: 0.0,
        };
        let signal = Signal::from_adc(&[0, 50, 100], &calibration);
        assert_approx_eq!(signal.time()[0], -2.0);
        assert_approx_eq!(signal.time()[2], 0.0);
        assert_approx_eq!(signal.voltage()[1], 50.0);
    }

    #[test]
    fn min_index_takes_first_minimum() {
        let signal = Signal::new(vec![0.0, 1.0, 2.0, 3.0], vec![5.0, 1.0, 1.0, 2.0]).unwrap();
        assert_eq!(signal.min_index(), Some(1));
        assert_eq!(Signal::new(vec![], vec![]).unwrap().min_index(), None);
    }

    #[test]
    fn nearest_index_clamps_to_ends() {
        let signal = Signal::new(vec![0.0, 1.0, 2.0], vec![0.0; 3]).unwrap();
        assert_eq!(signal.nearest_index(-10.0), 0);
        assert_eq!(signal.nearest_index(1.2), 1);
        assert_eq!(signal.nearest_index(99.0), 2);
    }

    #[test]
    fn window_rebases_only_on_overflow() {
        assert_eq!(WindowSpec::new(2, 3).rebased(10), WindowSpec::new(2, 3));
        assert_eq!(WindowSpec::new(8, 3).rebased(10), WindowSpec::new(0, 3));
    }
}
