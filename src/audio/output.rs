use super::playback::{PlaybackSink, ScheduledSegment};
use super::resampler::SegmentResampler;
use super::timeline::PlaybackTimeline;
use crate::{ReceptionistError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use tracing::{error, info};

/// Default system speaker driven by a [`PlaybackTimeline`]
pub struct AudioOutput {
    config: StreamConfig,
    stream: Option<Stream>,
    timeline: PlaybackTimeline,
    resampler: SegmentResampler,
}

impl AudioOutput {
    /// Open the default output device and start its clock
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| ReceptionistError::AudioDevice("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: StreamConfig = device
            .default_output_config()
            .map_err(|e| {
                ReceptionistError::AudioDevice(format!("Failed to get output config: {}", e))
            })?
            .into();

        let channels = config.channels as usize;
        let timeline = PlaybackTimeline::new(config.sample_rate.0);
        let render_timeline = timeline.clone();
        let mut mono = Vec::new();

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    mono.resize(frames, 0.0);
                    render_timeline.render(&mut mono);

                    for (frame, &sample) in data.chunks_mut(channels).zip(mono.iter()) {
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                ReceptionistError::AudioDevice(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            ReceptionistError::AudioDevice(format!("Failed to start output stream: {}", e))
        })?;

        info!("Started audio playback at {} Hz", config.sample_rate.0);
        let resampler = SegmentResampler::new(config.sample_rate.0);

        Ok(Self {
            config,
            stream: Some(stream),
            timeline,
            resampler,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }
}

impl PlaybackSink for AudioOutput {
    fn current_time(&self) -> f64 {
        self.timeline.current_time()
    }

    fn play(&mut self, segment: ScheduledSegment) -> Result<()> {
        if self.stream.is_none() {
            return Err(ReceptionistError::AudioDevice("Output is closed".into()));
        }

        let converted = self
            .resampler
            .convert(&segment.samples, segment.sample_rate, segment.start)?;
        self.timeline.enqueue_resampled(segment.start, converted);
        Ok(())
    }

    fn close(&mut self) {
        self.timeline.clear();
        self.resampler.clear();
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio playback");
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.close();
    }
}
