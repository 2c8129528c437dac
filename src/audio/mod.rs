pub mod capture;
pub mod frames;
#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod pcm;
pub mod playback;
pub mod resampler;
pub mod timeline;

pub use capture::{AudioCapture, CaptureDevice};
pub use frames::{AudioFrame, CaptureFrames, FrameAssembler};
#[cfg(feature = "audio-io")]
pub use input::AudioInput;
#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use playback::{decode_audio_payload, PlaybackScheduler, PlaybackSink, ScheduledSegment};
pub use resampler::{resample_audio, AudioResampler, ResampledSegment, SegmentResampler};
pub use timeline::PlaybackTimeline;

use crate::Result;

/// Factory for the devices a call needs
///
/// Devices are opened on the controller thread, so only the backend itself
/// has to be `Send`.
pub trait AudioBackend: Send {
    /// Acquire the default microphone
    fn microphone(&self) -> Result<Box<dyn CaptureDevice>>;

    /// Open the default speaker
    fn speaker(&self) -> Result<Box<dyn PlaybackSink>>;
}

/// System devices through cpal
#[cfg(feature = "audio-io")]
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

#[cfg(feature = "audio-io")]
impl AudioBackend for CpalBackend {
    fn microphone(&self) -> Result<Box<dyn CaptureDevice>> {
        Ok(Box::new(AudioInput::new()?))
    }

    fn speaker(&self) -> Result<Box<dyn PlaybackSink>> {
        Ok(Box::new(AudioOutput::new()?))
    }
}

/// Backend for builds without device support; every call fails at setup
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl AudioBackend for UnavailableBackend {
    fn microphone(&self) -> Result<Box<dyn CaptureDevice>> {
        Err(crate::ReceptionistError::MicrophoneAccess(
            "audio device support is not compiled in".into(),
        ))
    }

    fn speaker(&self) -> Result<Box<dyn PlaybackSink>> {
        Err(crate::ReceptionistError::AudioDevice(
            "audio device support is not compiled in".into(),
        ))
    }
}
