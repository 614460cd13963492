use async_trait::async_trait;

use crate::domain::{AudioBuffer, AudioDevice, DomainError, ListenConfig};

/// Port for scoped microphone acquisition.
///
/// Implementations open the input device for one listen, run the
/// calibrate / wait-for-onset / record sequence, and guarantee the device
/// is released when the call returns, on success or failure.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Capture one phrase.
    ///
    /// Returns `CaptureTimeout` if no speech starts within the configured
    /// onset window. The returned buffer is mono PCM at the configured
    /// sample rate.
    async fn capture(&self, listen: &ListenConfig) -> Result<AudioBuffer, DomainError>;

    /// List available audio input devices.
    fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError>;

    /// Select an input device by id, or use the system default if None.
    fn select_input_device(&self, device_id: Option<&str>) -> Result<(), DomainError>;
}
