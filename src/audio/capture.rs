use super::frames::{CaptureFrames, FrameAssembler};
use crate::Result;
use crossbeam_channel::{unbounded, Sender};
use tracing::info;

/// A source of mono float samples
///
/// Implementations push raw chunks at their native rate into the sender
/// handed to [`CaptureDevice::start`] and drop it on [`CaptureDevice::stop`].
pub trait CaptureDevice {
    /// Native sample rate of the chunks sent
    fn sample_rate(&self) -> u32;

    fn start(&mut self, sender: Sender<Vec<f32>>) -> Result<()>;

    /// Release the device. Must be safe to call more than once.
    fn stop(&mut self);
}

/// An acquired microphone
pub struct AudioCapture {
    device: Box<dyn CaptureDevice>,
    stopped: bool,
}

impl AudioCapture {
    /// Start the device and return it alongside its frame sequence
    pub fn acquire(
        mut device: Box<dyn CaptureDevice>,
        output_rate: u32,
        frame_size: usize,
    ) -> Result<(Self, CaptureFrames)> {
        let assembler = FrameAssembler::new(device.sample_rate(), output_rate, frame_size)?;
        let (tx, rx) = unbounded();
        device.start(tx)?;

        info!(
            "Microphone acquired at {} Hz, framing to {} Hz",
            device.sample_rate(),
            output_rate
        );

        Ok((
            Self {
                device,
                stopped: false,
            },
            CaptureFrames::new(rx, assembler),
        ))
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.device.stop();
        info!("Microphone released");
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDevice {
        sender: Option<Sender<Vec<f32>>>,
        stops: Arc<AtomicUsize>,
    }

    impl CaptureDevice for CountingDevice {
        fn sample_rate(&self) -> u32 {
            16000
        }

        fn start(&mut self, sender: Sender<Vec<f32>>) -> Result<()> {
            sender.send(vec![0.25; 64]).ok();
            self.sender = Some(sender);
            Ok(())
        }

        fn stop(&mut self) {
            self.sender = None;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_stop_is_idempotent_and_ends_frames() {
        let stops = Arc::new(AtomicUsize::new(0));
        let device = CountingDevice {
            sender: None,
            stops: Arc::clone(&stops),
        };

        let (mut capture, frames) = AudioCapture::acquire(Box::new(device), 16000, 32).unwrap();
        capture.stop();
        capture.stop();
        drop(capture);

        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(frames.count(), 2);
    }
}
