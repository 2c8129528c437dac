//! Gapless scheduling of inbound agent audio
//!
//! Each payload is decoded and placed at `max(now, cursor)` on the sink's
//! clock, and the cursor advances by the payload's duration. Segments therefore
//! never overlap and never reorder, whatever their arrival timing.

use super::pcm::{pcm16_from_le_bytes, pcm16_to_sample};
use crate::{ReceptionistError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Cursor;
use tracing::debug;

/// A decoded clip placed on the playback clock
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledSegment {
    /// Start time in seconds on the sink clock
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
    /// Mono samples at `sample_rate`
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl ScheduledSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Audio output with a monotonic clock
pub trait PlaybackSink {
    /// Seconds of audio rendered so far
    fn current_time(&self) -> f64;

    /// Queue a segment to start at `segment.start`
    fn play(&mut self, segment: ScheduledSegment) -> Result<()>;

    /// Release the output. Must be safe to call more than once.
    fn close(&mut self);
}

/// Decode a base64 payload into mono samples and their rate
///
/// RIFF/WAVE containers are decoded with their own header; anything else is
/// read as raw mono PCM16 little-endian at `fallback_rate`.
pub fn decode_audio_payload(payload: &str, fallback_rate: u32) -> Result<(Vec<f32>, u32)> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ReceptionistError::MalformedMessage(format!("Invalid base64 audio: {}", e)))?;

    if bytes.is_empty() {
        return Err(ReceptionistError::MalformedMessage(
            "Empty audio payload".into(),
        ));
    }

    let (samples, rate) = if is_wav(&bytes) {
        decode_wav(bytes)?
    } else {
        let pcm = pcm16_from_le_bytes(&bytes).ok_or_else(|| {
            ReceptionistError::MalformedMessage("PCM16 payload has an odd byte count".into())
        })?;
        (pcm.into_iter().map(pcm16_to_sample).collect(), fallback_rate)
    };

    if samples.is_empty() || rate == 0 {
        return Err(ReceptionistError::MalformedMessage(
            "Audio payload contains no samples".into(),
        ));
    }

    Ok((samples, rate))
}

fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

fn decode_wav(bytes: Vec<u8>) -> Result<(Vec<f32>, u32)> {
    let malformed = |e: hound::Error| ReceptionistError::MalformedMessage(format!("Invalid WAV: {}", e));

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(malformed)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(malformed)?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1) as u32)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(malformed)?
        }
    };

    let mono = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((mono, spec.sample_rate))
}

/// Orders decoded payloads back to back on the playback clock
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    sample_rate: u32,
    cursor: f64,
}

impl PlaybackScheduler {
    /// `sample_rate` is the negotiated rate for raw PCM payloads
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            cursor: 0.0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Earliest time the next segment may start
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Decode `payload` and place it on the clock
    pub fn schedule(&mut self, payload: &str, now: f64) -> Result<ScheduledSegment> {
        let (samples, rate) = decode_audio_payload(payload, self.sample_rate)?;
        Ok(self.schedule_samples(samples, rate, now))
    }

    /// Place already decoded samples on the clock
    pub fn schedule_samples(&mut self, samples: Vec<f32>, sample_rate: u32, now: f64) -> ScheduledSegment {
        let duration = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f64 / sample_rate as f64
        };
        let start = now.max(self.cursor);
        self.cursor = start + duration;

        debug!(
            "Scheduled {:.3}s of audio at {:.3}s (now {:.3}s)",
            duration, start, now
        );

        ScheduledSegment {
            start,
            duration,
            samples,
            sample_rate,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::pcm::pcm16_to_le_bytes;

    fn pcm_payload(samples: usize) -> String {
        STANDARD.encode(pcm16_to_le_bytes(&vec![1000i16; samples]))
    }

    #[test]
    fn test_raw_pcm_uses_negotiated_rate() {
        let mut scheduler = PlaybackScheduler::new(24000);
        let segment = scheduler.schedule(&pcm_payload(2400), 0.0).unwrap();

        assert_eq!(segment.sample_rate, 24000);
        assert_eq!(segment.samples.len(), 2400);
        assert!((segment.duration - 0.1).abs() < 1e-9);
        assert!((scheduler.cursor() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_back_to_back_segments() {
        let mut scheduler = PlaybackScheduler::new(24000);
        let first = scheduler.schedule(&pcm_payload(24000), 0.5).unwrap();
        // second chunk arrives while the first is still playing
        let second = scheduler.schedule(&pcm_payload(12000), 0.7).unwrap();

        assert_eq!(first.start, 0.5);
        assert!((second.start - 1.5).abs() < 1e-9);

        // idle gap: the clock passed the cursor
        let third = scheduler.schedule(&pcm_payload(2400), 5.0).unwrap();
        assert_eq!(third.start, 5.0);
    }

    #[test]
    fn test_segments_never_overlap_or_reorder() {
        let mut scheduler = PlaybackScheduler::new(16000);
        let arrivals = [0.0, 0.01, 0.02, 3.0, 3.0, 2.5, 7.25, 7.3, 0.0, 12.0];
        let lengths = [800, 16000, 1, 4000, 32000, 160, 9000, 7, 48000, 1600];

        let segments: Vec<ScheduledSegment> = arrivals
            .iter()
            .zip(lengths.iter())
            .map(|(&now, &len)| scheduler.schedule_samples(vec![0.0; len], 16000, now))
            .collect();

        for (segment, &now) in segments.iter().zip(arrivals.iter()) {
            assert!(segment.start >= now);
        }
        for pair in segments.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            assert!(pair[0].end() <= pair[1].start + 1e-12);
        }
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut scheduler = PlaybackScheduler::new(24000);
        scheduler.schedule(&pcm_payload(48000), 0.0).unwrap();
        assert!(scheduler.cursor() > 0.0);
        scheduler.reset();
        assert_eq!(scheduler.cursor(), 0.0);
    }

    #[test]
    fn test_wav_payload_uses_header_rate() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for _ in 0..800 {
                writer.write_sample(16384i16).unwrap();
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }

        let payload = STANDARD.encode(bytes.into_inner());
        let (samples, rate) = decode_audio_payload(&payload, 24000).unwrap();

        assert_eq!(rate, 8000);
        assert_eq!(samples.len(), 800);
        assert!((samples[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            decode_audio_payload("not base64!!", 24000),
            Err(ReceptionistError::MalformedMessage(_))
        ));
        assert!(matches!(
            decode_audio_payload("", 24000),
            Err(ReceptionistError::MalformedMessage(_))
        ));
        // three bytes
        assert!(matches!(
            decode_audio_payload(&STANDARD.encode([1u8, 2, 3]), 24000),
            Err(ReceptionistError::MalformedMessage(_))
        ));
    }
}
