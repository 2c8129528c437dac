use super::pcm::{level_percent, pcm16_to_le_bytes, to_pcm16};
use super::resampler::{AudioResampler, DEFAULT_CHUNK_SIZE};
use crate::Result;
use crossbeam_channel::Receiver;
use ringbuf::{traits::*, HeapRb};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One fixed-size block of mono capture audio
#[derive(Clone, Debug, PartialEq)]
pub struct AudioFrame {
    /// Samples clamped to [-1, 1]
    pub samples: Vec<f32>,
    /// PCM16 conversion of `samples`
    pub pcm: Vec<i16>,
    /// Mean-amplitude meter value in 0-100
    pub level: f32,
}

impl AudioFrame {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        let samples: Vec<f32> = samples.into_iter().map(|s| s.clamp(-1.0, 1.0)).collect();
        let pcm = to_pcm16(&samples);
        let level = level_percent(&samples);
        Self {
            samples,
            pcm,
            level,
        }
    }

    /// PCM16 little-endian bytes, as transmitted
    pub fn pcm_bytes(&self) -> Vec<u8> {
        pcm16_to_le_bytes(&self.pcm)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Turns arbitrarily sized device chunks into frames of a fixed size at the
/// target rate.
pub struct FrameAssembler {
    resampler: Option<AudioResampler>,
    pending: Vec<f32>,
    buffer: HeapRb<f32>,
    frame_size: usize,
}

impl FrameAssembler {
    pub fn new(input_rate: u32, output_rate: u32, frame_size: usize) -> Result<Self> {
        if frame_size == 0 {
            return Err(crate::ReceptionistError::Config(
                "Frame size must be greater than 0".into(),
            ));
        }

        let resampler = if input_rate == output_rate {
            None
        } else {
            Some(AudioResampler::new(
                input_rate,
                output_rate,
                DEFAULT_CHUNK_SIZE,
            )?)
        };

        debug!(
            "Frame assembler: {} Hz -> {} Hz, {} samples per frame",
            input_rate, output_rate, frame_size
        );

        Ok(Self {
            resampler,
            pending: Vec::new(),
            buffer: HeapRb::new(frame_size * 2),
            frame_size,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Samples buffered at the target rate but not yet emitted
    pub fn buffered(&self) -> usize {
        self.buffer.occupied_len()
    }

    /// Forget buffered audio so the next frame starts fresh
    pub fn reset(&mut self) {
        self.pending.clear();
        self.buffer.clear();
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset();
        }
    }

    /// Feed device samples and collect every completed frame
    pub fn push(&mut self, samples: &[f32]) -> Result<Vec<AudioFrame>> {
        let mut frames = Vec::new();

        match self.resampler.as_mut() {
            None => Self::absorb(&mut self.buffer, self.frame_size, samples, &mut frames),
            Some(resampler) => {
                self.pending.extend_from_slice(samples);
                let chunk_size = resampler.chunk_size();
                let mut consumed = 0;
                while self.pending.len() - consumed >= chunk_size {
                    let chunk = &self.pending[consumed..consumed + chunk_size];
                    let resampled = resampler.process_chunk(chunk)?;
                    consumed += chunk_size;
                    Self::absorb(&mut self.buffer, self.frame_size, &resampled, &mut frames);
                }
                self.pending.drain(..consumed);
            }
        }

        Ok(frames)
    }

    fn absorb(
        buffer: &mut HeapRb<f32>,
        frame_size: usize,
        mut samples: &[f32],
        frames: &mut Vec<AudioFrame>,
    ) {
        while !samples.is_empty() {
            let pushed = buffer.push_slice(samples);
            samples = &samples[pushed..];

            while buffer.occupied_len() >= frame_size {
                let mut frame = vec![0.0f32; frame_size];
                buffer.pop_slice(&mut frame);
                frames.push(AudioFrame::from_samples(frame));
            }
        }
    }
}

/// Lazy, finite sequence of capture frames
///
/// Ends once the capture device stops and its channel disconnects.
pub struct CaptureFrames {
    receiver: Receiver<Vec<f32>>,
    assembler: FrameAssembler,
    ready: VecDeque<AudioFrame>,
}

impl CaptureFrames {
    pub fn new(receiver: Receiver<Vec<f32>>, assembler: FrameAssembler) -> Self {
        Self {
            receiver,
            assembler,
            ready: VecDeque::new(),
        }
    }

    /// Drop every chunk captured so far, including partly assembled frames
    ///
    /// Returns the number of raw chunks discarded.
    pub fn discard_pending(&mut self) -> usize {
        let discarded = self.receiver.try_iter().count();
        self.ready.clear();
        self.assembler.reset();
        discarded
    }
}

impl Iterator for CaptureFrames {
    type Item = AudioFrame;

    fn next(&mut self) -> Option<AudioFrame> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Some(frame);
            }

            let chunk = self.receiver.recv().ok()?;
            match self.assembler.push(&chunk) {
                Ok(frames) => self.ready.extend(frames),
                Err(e) => warn!("Dropping capture chunk: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_frame_from_samples_clamps() {
        let frame = AudioFrame::from_samples(vec![1.5, -2.0, 0.0, 0.5]);
        assert_eq!(frame.samples, vec![1.0, -1.0, 0.0, 0.5]);
        assert_eq!(frame.pcm, vec![32767, -32768, 0, 16383]);
        assert_eq!(frame.pcm_bytes().len(), 8);
    }

    #[test]
    fn test_passthrough_emits_exact_frames() {
        let mut assembler = FrameAssembler::new(16000, 16000, 4096).unwrap();

        let frames = assembler.push(&vec![0.1; 3000]).unwrap();
        assert!(frames.is_empty());
        assert_eq!(assembler.buffered(), 3000);

        let frames = assembler.push(&vec![0.1; 10000]).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 4096));
        assert_eq!(assembler.buffered(), 13000 - 3 * 4096);
    }

    #[test]
    fn test_resampled_frames_are_fixed_size() {
        let mut assembler = FrameAssembler::new(48000, 16000, 4096).unwrap();
        let mut frames = Vec::new();
        // 1 second at 48 kHz in uneven chunks
        for _ in 0..100 {
            frames.extend(assembler.push(&vec![0.2; 480]).unwrap());
        }
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 4096));
    }

    #[test]
    fn test_discard_pending_drops_backlog() {
        let (tx, rx) = unbounded();
        let assembler = FrameAssembler::new(16000, 16000, 1024).unwrap();
        let mut frames = CaptureFrames::new(rx, assembler);

        for _ in 0..8 {
            tx.send(vec![0.5; 1024]).unwrap();
        }
        tx.send(vec![0.5; 300]).unwrap();
        assert_eq!(frames.next().map(|f| f.len()), Some(1024));

        assert_eq!(frames.discard_pending(), 8);

        tx.send(vec![-0.25; 1024]).unwrap();
        drop(tx);
        let rest: Vec<AudioFrame> = frames.collect();
        assert_eq!(rest.len(), 1);
        assert!(rest[0].samples.iter().all(|&s| s == -0.25));
    }

    #[test]
    fn test_capture_frames_end_when_sender_dropped() {
        let (tx, rx) = unbounded();
        let assembler = FrameAssembler::new(16000, 16000, 1024).unwrap();
        let frames = CaptureFrames::new(rx, assembler);

        tx.send(vec![0.5; 1500]).unwrap();
        tx.send(vec![0.5; 700]).unwrap();
        drop(tx);

        let collected: Vec<AudioFrame> = frames.collect();
        assert_eq!(collected.len(), 2);
        assert!((collected[0].level - 100.0).abs() < f32::EPSILON);
    }
}
