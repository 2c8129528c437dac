use super::resampler::ResampledSegment;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

struct QueuedSegment {
    start_frame: u64,
    samples: Vec<f32>,
    offset: usize,
}

struct TimelineInner {
    sample_rate: u32,
    frames_rendered: u64,
    last_end: u64,
    queue: VecDeque<QueuedSegment>,
}

impl TimelineInner {
    fn push(&mut self, requested: u64, samples: Vec<f32>) {
        let start_frame = requested.max(self.last_end).max(self.frames_rendered);
        self.last_end = start_frame + samples.len() as u64;
        self.queue.push_back(QueuedSegment {
            start_frame,
            samples,
            offset: 0,
        });
    }
}

/// Mono playback timeline shared between a sink and its device callback
///
/// The clock is the number of frames rendered so far. Segments are written at
/// their start frame and silence fills every gap.
#[derive(Clone)]
pub struct PlaybackTimeline {
    inner: Arc<Mutex<TimelineInner>>,
}

impl PlaybackTimeline {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimelineInner {
                sample_rate: sample_rate.max(1),
                frames_rendered: 0,
                last_end: 0,
                queue: VecDeque::new(),
            })),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.inner.lock().sample_rate
    }

    /// Seconds rendered so far
    pub fn current_time(&self) -> f64 {
        let inner = self.inner.lock();
        inner.frames_rendered as f64 / inner.sample_rate as f64
    }

    /// Queue samples (at the timeline rate) to start at `start` seconds
    ///
    /// A start in the past or inside the previous segment is pushed forward.
    pub fn enqueue(&self, start: f64, samples: Vec<f32>) {
        let mut inner = self.inner.lock();
        let requested = (start.max(0.0) * inner.sample_rate as f64).round() as u64;
        inner.push(requested, samples);
    }

    /// Queue samples directly after the last queued frame
    pub fn append(&self, samples: Vec<f32>) {
        let mut inner = self.inner.lock();
        let next = inner.last_end;
        inner.push(next, samples);
    }

    /// Overwrite the last `tail.len()` queued frames
    ///
    /// Frames that have already been rendered are left alone.
    pub fn revise_tail(&self, tail: &[f32]) {
        let mut inner = self.inner.lock();
        let end = inner.last_end;
        let start = end.saturating_sub(tail.len() as u64);
        let skip = tail.len() - (end - start) as usize;

        for segment in inner.queue.iter_mut().rev() {
            let segment_start = segment.start_frame;
            let segment_end = segment_start + segment.samples.len() as u64;
            if segment_end <= start {
                break;
            }

            let from = start.max(segment_start + segment.offset as u64);
            let to = segment_end.min(end);
            if from < to {
                let source = skip + (from - start) as usize..skip + (to - start) as usize;
                segment.samples[(from - segment_start) as usize..(to - segment_start) as usize]
                    .copy_from_slice(&tail[source]);
            }
        }
    }

    /// Queue a converted segment, joining it to the previous one when it
    /// continues it
    pub fn enqueue_resampled(&self, start: f64, segment: ResampledSegment) {
        if segment.continues_previous {
            self.revise_tail(&segment.revised_tail);
            self.append(segment.samples);
        } else {
            self.enqueue(start, segment.samples);
        }
    }

    /// Frames still waiting to be rendered
    pub fn pending_frames(&self) -> u64 {
        let inner = self.inner.lock();
        inner
            .queue
            .iter()
            .map(|s| (s.samples.len() - s.offset) as u64)
            .sum()
    }

    /// Drop everything queued; the clock keeps running
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.queue.clear();
        inner.last_end = inner.frames_rendered;
    }

    /// Fill `out` with the next mono frames and advance the clock
    pub fn render(&self, out: &mut [f32]) {
        out.fill(0.0);

        let mut inner = self.inner.lock();
        let base = inner.frames_rendered;
        let end = base + out.len() as u64;
        let mut cursor = base;

        while cursor < end {
            let Some(segment) = inner.queue.front_mut() else {
                break;
            };

            let position = segment.start_frame + segment.offset as u64;
            if position >= end {
                break;
            }

            let write_start = position.max(cursor);
            let index = (write_start - base) as usize;
            let remaining = segment.samples.len() - segment.offset;
            let count = remaining.min((end - write_start) as usize);

            out[index..index + count]
                .copy_from_slice(&segment.samples[segment.offset..segment.offset + count]);
            segment.offset += count;
            cursor = write_start + count as u64;

            if segment.offset >= segment.samples.len() {
                inner.queue.pop_front();
            }
        }

        inner.frames_rendered = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::resampler::SegmentResampler;

    #[test]
    fn test_clock_advances_with_rendering() {
        let timeline = PlaybackTimeline::new(100);
        let mut out = vec![0.0; 50];
        timeline.render(&mut out);
        assert!((timeline.current_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_segment_lands_at_start_offset() {
        let timeline = PlaybackTimeline::new(10);
        timeline.enqueue(0.3, vec![1.0, 1.0]);

        let mut out = vec![9.0; 8];
        timeline.render(&mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(timeline.pending_frames(), 0);
    }

    #[test]
    fn test_segment_spanning_callbacks() {
        let timeline = PlaybackTimeline::new(10);
        timeline.enqueue(0.0, vec![0.5; 5]);
        timeline.enqueue(0.0, vec![0.25; 2]);

        let mut first = vec![0.0; 4];
        timeline.render(&mut first);
        assert_eq!(first, vec![0.5; 4]);

        let mut second = vec![0.0; 4];
        timeline.render(&mut second);
        assert_eq!(second, vec![0.5, 0.25, 0.25, 0.0]);
    }

    #[test]
    fn test_late_segment_starts_now() {
        let timeline = PlaybackTimeline::new(10);
        let mut out = vec![0.0; 10];
        timeline.render(&mut out);

        timeline.enqueue(0.2, vec![1.0]);
        let mut out = vec![0.0; 2];
        timeline.render(&mut out);
        assert_eq!(out, vec![1.0, 0.0]);
    }

    #[test]
    fn test_revise_tail_skips_rendered_frames() {
        let timeline = PlaybackTimeline::new(10);
        timeline.enqueue(0.0, vec![1.0; 4]);
        timeline.enqueue(0.0, vec![1.0; 2]);

        let mut out = vec![0.0; 3];
        timeline.render(&mut out);

        // covers frames 1..6; frames 1 and 2 are already gone
        timeline.revise_tail(&[9.0, 9.0, 2.0, 3.0, 4.0]);
        let mut out = vec![0.0; 4];
        timeline.render(&mut out);
        assert_eq!(out, vec![2.0, 3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_contiguous_resampled_segments_play_without_a_dip() {
        let timeline = PlaybackTimeline::new(48000);
        let mut resampler = SegmentResampler::new(48000);

        let first = resampler.convert(&[0.5; 2400], 24000, 0.0).unwrap();
        timeline.enqueue_resampled(0.0, first);
        let second = resampler.convert(&[0.5; 2400], 24000, 0.1).unwrap();
        timeline.enqueue_resampled(0.1, second);
        assert_eq!(timeline.pending_frames(), 9600);

        let mut out = vec![0.0; 9600];
        timeline.render(&mut out);

        let boundary = &out[4800 - 400..4800 + 400];
        let lowest = boundary.iter().cloned().fold(f32::MAX, f32::min);
        assert!(lowest > 0.48, "dip to {} around the segment boundary", lowest);
    }

    #[test]
    fn test_clear_drops_queue() {
        let timeline = PlaybackTimeline::new(10);
        timeline.enqueue(0.0, vec![1.0; 20]);
        timeline.clear();

        let mut out = vec![0.0; 4];
        timeline.render(&mut out);
        assert_eq!(out, vec![0.0; 4]);
    }
}
