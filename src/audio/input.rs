use super::capture::CaptureDevice;
use crate::{ReceptionistError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info, warn};

/// Default system microphone
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioInput {
    /// Open the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            ReceptionistError::MicrophoneAccess("No input device available".into())
        })?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                ReceptionistError::MicrophoneAccess(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }
}

impl CaptureDevice for AudioInput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn start(&mut self, sender: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            warn!("Already recording");
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = sender.try_send(samples) {
                        debug!("Failed to send audio data: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                ReceptionistError::MicrophoneAccess(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            ReceptionistError::MicrophoneAccess(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);

        info!("Started audio recording");
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the stream drops the callback and with it the sender
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio recording");
        }
    }
}

impl Drop for AudioInput {
    fn drop(&mut self) {
        self.stop();
    }
}
