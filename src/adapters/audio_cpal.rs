use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::{Mutex, RwLock};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{AudioBuffer, AudioDevice, DomainError, ListenConfig};
use crate::ports::AudioCapture;

type RingProducer = ringbuf::HeapProd<i16>;

/// Analysis frame length. 30ms frames are short enough for a responsive
/// onset/pause decision and long enough for a stable RMS estimate.
const FRAME_MS: u32 = 30;

/// Calibrated ambient RMS is scaled by this factor to become the speech
/// onset threshold.
const THRESHOLD_GAIN: f32 = 1.75;

/// Audio kept from just before onset so the first syllable is not clipped.
const PREROLL_MS: u32 = 250;

/// Commands sent to the audio thread.
enum CaptureCommand {
    Capture {
        listen: ListenConfig,
        reply: oneshot::Sender<Result<Vec<i16>, DomainError>>,
    },
    Shutdown,
}

/// Linear phrase detection over fixed-size frames.
///
/// Calibrating -> WaitingForSpeech -> Recording, no transitions back.
/// Timing is derived from consumed sample counts, so the logic is
/// deterministic for a given input.
struct PhraseDetector {
    listen: ListenConfig,
    state: DetectorState,
    threshold: f32,
    calibration_energy: f64,
    calibrated_samples: usize,
    waited_samples: usize,
    silent_samples: usize,
    preroll: VecDeque<i16>,
    phrase: Vec<i16>,
}

#[derive(Debug, PartialEq, Eq)]
enum DetectorState {
    Calibrating,
    WaitingForSpeech,
    Recording,
}

enum DetectorVerdict {
    Continue,
    Timeout,
    Complete(Vec<i16>),
}

impl PhraseDetector {
    fn new(listen: ListenConfig) -> Self {
        Self {
            listen,
            state: DetectorState::Calibrating,
            threshold: 0.0,
            calibration_energy: 0.0,
            calibrated_samples: 0,
            waited_samples: 0,
            silent_samples: 0,
            preroll: VecDeque::new(),
            phrase: Vec::new(),
        }
    }

    fn samples_for(&self, secs: f32) -> usize {
        (secs * self.listen.sample_rate as f32) as usize
    }

    fn push_frame(&mut self, frame: &[i16]) -> DetectorVerdict {
        match self.state {
            DetectorState::Calibrating => {
                self.calibration_energy += frame
                    .iter()
                    .map(|&s| {
                        let normalized = s as f64 / 32767.0;
                        normalized * normalized
                    })
                    .sum::<f64>();
                self.calibrated_samples += frame.len();

                if self.calibrated_samples >= self.samples_for(self.listen.calibration_secs) {
                    let ambient_rms =
                        (self.calibration_energy / self.calibrated_samples as f64).sqrt() as f32;
                    self.threshold = (ambient_rms * THRESHOLD_GAIN).max(self.listen.energy_floor);
                    self.state = DetectorState::WaitingForSpeech;
                    debug!(ambient_rms, threshold = self.threshold, "Calibration complete");
                }
                DetectorVerdict::Continue
            }
            DetectorState::WaitingForSpeech => {
                if rms(frame) > self.threshold {
                    self.phrase.extend(self.preroll.drain(..));
                    self.phrase.extend_from_slice(frame);
                    self.state = DetectorState::Recording;
                    debug!("Speech onset detected");
                    return DetectorVerdict::Continue;
                }

                self.preroll.extend(frame.iter().copied());
                let preroll_cap = self.samples_for(PREROLL_MS as f32 / 1000.0);
                while self.preroll.len() > preroll_cap {
                    self.preroll.pop_front();
                }

                self.waited_samples += frame.len();
                if self.waited_samples >= self.samples_for(self.listen.start_timeout_secs) {
                    DetectorVerdict::Timeout
                } else {
                    DetectorVerdict::Continue
                }
            }
            DetectorState::Recording => {
                self.phrase.extend_from_slice(frame);

                if rms(frame) > self.threshold {
                    self.silent_samples = 0;
                } else {
                    self.silent_samples += frame.len();
                }

                let pause_reached =
                    self.silent_samples >= self.samples_for(self.listen.pause_secs);
                let limit_reached =
                    self.phrase.len() >= self.samples_for(self.listen.phrase_limit_secs);

                if pause_reached || limit_reached {
                    DetectorVerdict::Complete(std::mem::take(&mut self.phrase))
                } else {
                    DetectorVerdict::Continue
                }
            }
        }
    }

    /// Whatever phrase has been recorded so far; None before onset.
    fn finish(self) -> Option<Vec<i16>> {
        if self.state == DetectorState::Recording && !self.phrase.is_empty() {
            Some(self.phrase)
        } else {
            None
        }
    }
}

/// Normalized RMS of a frame, 0.0 - 1.0.
fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
    let value = (sum_squares / samples.len() as f64).sqrt();
    (value / 32767.0).min(1.0) as f32
}

/// Linear-interpolation resampler to the capture rate.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos.fract();

        let sample = if src_idx + 1 < samples.len() {
            let s0 = samples[src_idx] as f64;
            let s1 = samples[src_idx + 1] as f64;
            (s0 + (s1 - s0) * frac) as i16
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0
        };
        output.push(sample);
    }
    output
}

/// Average interleaved channels down to mono.
fn fold_to_mono(data: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

fn get_device(selected_device_id: Option<&str>) -> Result<Device, DomainError> {
    let host = cpal::default_host();

    if let Some(id) = selected_device_id {
        let devices = host.input_devices().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to enumerate devices: {}", e),
        })?;

        for device in devices {
            if let Ok(name) = device.name() {
                if name == id {
                    return Ok(device);
                }
            }
        }
        warn!(device_id = %id, "Selected device not found, falling back to default");
    }

    host.default_input_device()
        .ok_or_else(|| DomainError::AudioDevice {
            message: "No default input device available".to_string(),
        })
}

fn build_stream(
    device: &Device,
    target_sample_rate: u32,
    mut producer: RingProducer,
) -> Result<Stream, DomainError> {
    let supported = device
        .default_input_config()
        .map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to get default config: {}", e),
        })?;

    let sample_format = supported.sample_format();
    let config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };
    let channels = config.channels as usize;
    let device_sample_rate = config.sample_rate.0;

    debug!(
        sample_rate = device_sample_rate,
        channels,
        format = ?sample_format,
        "Opening input stream"
    );

    let error_callback = |err: cpal::StreamError| warn!(?err, "Audio stream error");

    let stream = match sample_format {
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let mono = fold_to_mono(data, channels);
                let resampled = resample(&mono, device_sample_rate, target_sample_rate);
                let _ = producer.push_slice(&resampled);
            },
            error_callback,
            None,
        ),
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let i16_data: Vec<i16> = data
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                    .collect();
                let mono = fold_to_mono(&i16_data, channels);
                let resampled = resample(&mono, device_sample_rate, target_sample_rate);
                let _ = producer.push_slice(&resampled);
            },
            error_callback,
            None,
        ),
        other => {
            return Err(DomainError::AudioDevice {
                message: format!("Unsupported sample format: {:?}", other),
            });
        }
    }
    .map_err(|e| DomainError::AudioDevice {
        message: format!("Failed to build stream: {}", e),
    })?;

    Ok(stream)
}

/// One scoped listen on the audio thread. The stream lives and dies inside
/// this function, so the device is released on every exit path.
fn run_listen(
    listen: &ListenConfig,
    selected_device_id: Option<&str>,
) -> Result<Vec<i16>, DomainError> {
    let device = get_device(selected_device_id)?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

    let ring = HeapRb::<i16>::new(listen.buffer_capacity());
    let (producer, mut consumer) = ring.split();

    let stream = build_stream(&device, listen.sample_rate, producer)?;
    stream.play().map_err(|e| DomainError::AudioDevice {
        message: format!("Failed to start stream: {}", e),
    })?;

    info!(device = %device_name, "Listening");

    let frame_len = (listen.sample_rate * FRAME_MS / 1000) as usize;
    let total_window = listen.calibration_secs + listen.start_timeout_secs + listen.phrase_limit_secs;
    let deadline = Instant::now() + Duration::from_secs_f32(total_window + 2.0);

    let mut detector = PhraseDetector::new(listen.clone());
    let mut staging: Vec<i16> = Vec::with_capacity(frame_len * 4);
    let mut chunk = vec![0i16; frame_len];

    loop {
        if Instant::now() > deadline {
            // A stalled device looks like silence to the caller.
            drop(stream);
            return match detector.finish() {
                Some(phrase) => Ok(phrase),
                None => Err(DomainError::CaptureTimeout),
            };
        }

        let read = consumer.pop_slice(&mut chunk);
        if read > 0 {
            staging.extend_from_slice(&chunk[..read]);
        }

        while staging.len() >= frame_len {
            let frame: Vec<i16> = staging.drain(..frame_len).collect();
            match detector.push_frame(&frame) {
                DetectorVerdict::Continue => {}
                DetectorVerdict::Timeout => {
                    drop(stream);
                    return Err(DomainError::CaptureTimeout);
                }
                DetectorVerdict::Complete(phrase) => {
                    drop(stream);
                    info!(
                        samples = phrase.len(),
                        secs = phrase.len() as f32 / listen.sample_rate as f32,
                        "Phrase captured"
                    );
                    return Ok(phrase);
                }
            }
        }

        thread::sleep(Duration::from_millis(10));
    }
}

/// Audio thread runner. cpal streams are not Send, so every listen is
/// executed here and results travel back over oneshot channels.
fn audio_thread_main(
    selected_device_id: Arc<RwLock<Option<String>>>,
    mut cmd_rx: mpsc::Receiver<CaptureCommand>,
) {
    while let Some(cmd) = cmd_rx.blocking_recv() {
        match cmd {
            CaptureCommand::Capture { listen, reply } => {
                let device_id = selected_device_id.read().clone();
                let result = run_listen(&listen, device_id.as_deref());
                let _ = reply.send(result);
            }
            CaptureCommand::Shutdown => break,
        }
    }
    debug!("Audio thread shutting down");
}

/// cpal-based microphone capture.
pub struct CpalAudioCapture {
    selected_device_id: Arc<RwLock<Option<String>>>,
    cmd_tx: mpsc::Sender<CaptureCommand>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl CpalAudioCapture {
    pub fn new(input_device: Option<String>) -> Result<Self, DomainError> {
        let selected_device_id = Arc::new(RwLock::new(input_device));
        let (cmd_tx, cmd_rx) = mpsc::channel(4);

        let thread_device_id = Arc::clone(&selected_device_id);
        let thread_handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || audio_thread_main(thread_device_id, cmd_rx))
            .map_err(|e| DomainError::AudioDevice {
                message: format!("Failed to spawn audio thread: {}", e),
            })?;

        info!("CpalAudioCapture initialized");

        Ok(Self {
            selected_device_id,
            cmd_tx,
            thread_handle: Mutex::new(Some(thread_handle)),
        })
    }

    fn list_devices_internal(&self) -> Result<Vec<AudioDevice>, DomainError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let devices = host.input_devices().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to enumerate devices: {}", e),
        })?;

        let mut result = Vec::new();
        let mut name_counts: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();

        for device in devices {
            if let Ok(name) = device.name() {
                let count = name_counts.entry(name.clone()).or_insert(0);
                let id = if *count == 0 {
                    name.clone()
                } else {
                    format!("{}:{}", name, count)
                };
                *count += 1;

                result.push(AudioDevice {
                    id,
                    name: name.clone(),
                    is_default: Some(&name) == default_name.as_ref(),
                });
            }
        }

        debug!(count = result.len(), "Listed input devices");
        Ok(result)
    }
}

impl Drop for CpalAudioCapture {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(CaptureCommand::Shutdown);
        if let Some(handle) = self.thread_handle.lock().take() {
            let _ = handle.join();
        }
    }
}

#[async_trait]
impl AudioCapture for CpalAudioCapture {
    async fn capture(&self, listen: &ListenConfig) -> Result<AudioBuffer, DomainError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.cmd_tx
            .send(CaptureCommand::Capture {
                listen: listen.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| DomainError::AudioDevice {
                message: "Audio thread not running".to_string(),
            })?;

        let samples = reply_rx
            .await
            .map_err(|_| DomainError::Unexpected("audio thread did not respond".to_string()))??;

        Ok(AudioBuffer::from_samples(listen.sample_rate, samples))
    }

    fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
        self.list_devices_internal()
    }

    fn select_input_device(&self, device_id: Option<&str>) -> Result<(), DomainError> {
        if let Some(id) = device_id {
            let devices = self.list_devices_internal()?;
            if !devices.iter().any(|d| d.id == id) {
                return Err(DomainError::AudioDevice {
                    message: format!("Device not found: {}", id),
                });
            }
        }

        *self.selected_device_id.write() = device_id.map(String::from);
        info!(device_id = ?device_id, "Input device selected");
        Ok(())
    }
}
