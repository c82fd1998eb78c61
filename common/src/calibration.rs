use crate::Intensity;

/// Per-channel scope axis calibration delivered by the DAQ layer alongside
/// each raw sample array. Converts a sample index to seconds and an ADC code
/// to volts; the analysis works in ns and mV throughout, so the accessors
/// apply those scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCalibration {
    /// Time step between consecutive samples (s).
    pub dt: f64,
    /// Time of the first sample (s).
    pub t0: f64,
    /// Voltage step per ADC count (V).
    pub dv: f64,
    /// Voltage at ADC code zero (V).
    pub v0: f64,
}

impl ChannelCalibration {
    /// Time of the sample at `index`, in ns.
    pub fn time_ns(&self, index: usize) -> f64 {
        (self.t0 + self.dt * index as f64) * 1e9
    }

    /// Sample time step in ns.
    pub fn dt_ns(&self) -> f64 {
        self.dt * 1e9
    }

    /// Voltage of the given ADC code, in mV.
    pub fn voltage_mv(&self, adc: Intensity) -> f64 {
        (self.v0 + self.dv * adc as f64) * 1e3
    }

    /// Nearest ADC code for a voltage in mV, saturating at the code range.
    /// Inverse of [`Self::voltage_mv`], used to digitise synthetic traces.
    pub fn adc_code(&self, voltage_mv: f64) -> Intensity {
        let code = (voltage_mv * 1e-3 - self.v0) / self.dv;
        code.round().clamp(0.0, Intensity::MAX as f64) as Intensity
    }
}
