pub mod calibration;

pub use calibration::ChannelCalibration;

/// Raw ADC code as delivered by the digitiser.
pub type Intensity = u16;
/// Oscilloscope channel number.
pub type Channel = u32;
/// Trigger (waveform) number within an acquisition run.
pub type Trigger = u32;

pub const CHANNELS_PER_SCOPE: usize = 4;
