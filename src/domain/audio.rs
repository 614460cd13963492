use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Captured microphone audio, cleared from memory on drop.
///
/// PCM samples are 16-bit mono at the capture sample rate (16kHz by
/// default, which every backend here accepts).
#[derive(Debug, Zeroize)]
#[zeroize(drop)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn from_samples(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Little-endian PCM bytes, the wire format the recognition backend
    /// accepts as `audio/l16`.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

/// Tuning for one scoped listen: calibrate, wait for onset, record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Ambient-noise sampling window used to set the energy threshold.
    pub calibration_secs: f32,
    /// Maximum wait for speech onset before giving up.
    pub start_timeout_secs: f32,
    /// Hard cap on phrase duration once speech has started.
    pub phrase_limit_secs: f32,
    /// Trailing silence that ends the phrase early.
    pub pause_secs: f32,
    /// Lower bound on the energy threshold, so a dead-quiet room does not
    /// trigger on noise floor jitter. Normalized RMS, 0.0 - 1.0.
    pub energy_floor: f32,
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            calibration_secs: 1.0,
            start_timeout_secs: 8.0,
            phrase_limit_secs: 12.0,
            pause_secs: 0.8,
            energy_floor: 0.01,
            sample_rate: 16_000,
        }
    }
}

impl ListenConfig {
    /// Worst-case number of samples one listen can produce.
    pub fn buffer_capacity(&self) -> usize {
        let worst_case_secs =
            self.calibration_secs + self.start_timeout_secs + self.phrase_limit_secs + 1.0;
        (worst_case_secs * self.sample_rate as f32).ceil() as usize
    }
}

/// Input audio device information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Unique device identifier.
    pub id: String,
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the system default device.
    pub is_default: bool,
}
