use crate::{ReceptionistError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Default number of input frames handed to rubato per call
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Mono sample-rate converter
///
/// Keeps rubato's filter state between calls, so feeding consecutive
/// [`AudioResampler::process_chunk`] calls produces a continuous stream.
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl AudioResampler {
    /// Create a new resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate
    /// * `output_rate` - Output sample rate
    /// * `chunk_size` - Input frames consumed per [`AudioResampler::process_chunk`]
    pub fn new(input_rate: u32, output_rate: u32, chunk_size: usize) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ReceptionistError::Config(
                "Sample rates must be greater than 0".into(),
            ));
        }

        if chunk_size == 0 {
            return Err(ReceptionistError::Config(
                "Resampler chunk size must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, chunk_size, 1)
            .map_err(|e| {
                ReceptionistError::AudioProcessing(format!("Failed to create resampler: {}", e))
            })?;

        debug!(
            "Created resampler: {} Hz -> {} Hz, chunk {}",
            input_rate, output_rate, chunk_size
        );

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Input frames required by the next [`AudioResampler::process_chunk`] call
    pub fn chunk_size(&self) -> usize {
        self.resampler.input_frames_next()
    }

    /// Upper bound on frames returned from one chunk
    pub fn output_frames_max(&self) -> usize {
        self.resampler.output_frames_max()
    }

    /// Resample exactly one chunk of [`AudioResampler::chunk_size`] frames
    pub fn process_chunk(&mut self, chunk: &[f32]) -> Result<Vec<f32>> {
        if chunk.len() != self.chunk_size() {
            return Err(ReceptionistError::AudioProcessing(format!(
                "Expected {} input frames, got {}",
                self.chunk_size(),
                chunk.len()
            )));
        }

        let mut output = self
            .resampler
            .process(&[chunk], None)
            .map_err(|e| ReceptionistError::AudioProcessing(format!("Resampling failed: {}", e)))?;

        Ok(output.pop().unwrap_or_default())
    }

    /// Resample a complete clip of any length
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let frames = (input.len() as f64 * self.ratio()).round() as usize;
        self.resample_to(input, frames)
    }

    /// Resample a complete clip into exactly `frames` output frames
    ///
    /// Starts from a clean filter. Silence is fed after the clip until the
    /// filter has let its tail through, so nothing at the end is lost.
    pub fn resample_to(&mut self, input: &[f32], frames: usize) -> Result<Vec<f32>> {
        self.reset();
        if input.is_empty() || frames == 0 {
            return Ok(Vec::new());
        }

        let chunk_size = self.chunk_size();
        let mut output = Vec::with_capacity(frames + self.output_frames_max());

        for block in input.chunks(chunk_size) {
            if block.len() == chunk_size {
                output.extend(self.process_chunk(block)?);
            } else {
                let mut padded = vec![0.0f32; chunk_size];
                padded[..block.len()].copy_from_slice(block);
                output.extend(self.process_chunk(&padded)?);
            }
        }

        let silence = vec![0.0f32; chunk_size];
        while output.len() < frames {
            let flushed = self.process_chunk(&silence)?;
            if flushed.is_empty() {
                break;
            }
            output.extend(flushed);
        }
        output.resize(frames, 0.0);

        debug!("Resampled {} frames -> {} frames", input.len(), output.len());

        Ok(output)
    }

    pub fn ratio(&self) -> f64 {
        self.output_rate as f64 / self.input_rate as f64
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Reset the filter state
    pub fn reset(&mut self) {
        self.resampler.reset();
    }
}

/// Input samples carried from one segment into the next
const SEGMENT_CONTEXT: usize = 512;

/// A segment converted to the output rate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResampledSegment {
    /// True when this segment picks up exactly where the previous one ended
    pub continues_previous: bool,
    /// Corrected values for the last frames of the previous segment
    pub revised_tail: Vec<f32>,
    /// Frames of this segment at the output rate
    pub samples: Vec<f32>,
}

struct Run {
    input_rate: u32,
    resampler: Option<AudioResampler>,
    history: Vec<f32>,
    consumed: u64,
    emitted: u64,
    end: f64,
}

impl Run {
    fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        let resampler = if input_rate == output_rate {
            None
        } else {
            Some(AudioResampler::new(input_rate, output_rate, DEFAULT_CHUNK_SIZE)?)
        };

        Ok(Self {
            input_rate,
            resampler,
            history: Vec::with_capacity(SEGMENT_CONTEXT),
            consumed: 0,
            emitted: 0,
            end: 0.0,
        })
    }

    fn convert(&mut self, samples: &[f32], continues: bool) -> Result<ResampledSegment> {
        let Some(resampler) = self.resampler.as_mut() else {
            self.remember(samples);
            self.consumed += samples.len() as u64;
            self.emitted = self.consumed;
            return Ok(ResampledSegment {
                continues_previous: continues,
                revised_tail: Vec::new(),
                samples: samples.to_vec(),
            });
        };

        let ratio = resampler.ratio();
        let context = self.history.len();
        let to_frame = |position: u64| (position as f64 * ratio).round() as u64;

        // The filter needs audio on both sides of a sample. The previous
        // segment was rendered before this one existed, so its last frames
        // are recomputed here with the real continuation.
        let tail_start = to_frame(self.consumed - (context / 2) as u64);
        let target_end = to_frame(self.consumed + samples.len() as u64);
        let origin = to_frame(self.consumed - context as u64);

        let mut input = Vec::with_capacity(context + samples.len());
        input.extend_from_slice(&self.history);
        input.extend_from_slice(samples);
        let output = resampler.resample_to(&input, (target_end - origin) as usize)?;

        let tail_from = (tail_start - origin) as usize;
        let body_from = (self.emitted - origin) as usize;
        let revised_tail = output[tail_from.min(body_from)..body_from].to_vec();
        let body = output[body_from..].to_vec();

        self.remember(samples);
        self.consumed += samples.len() as u64;
        self.emitted = target_end;

        Ok(ResampledSegment {
            continues_previous: continues,
            revised_tail,
            samples: body,
        })
    }

    fn remember(&mut self, samples: &[f32]) {
        self.history.extend_from_slice(samples);
        let excess = self.history.len().saturating_sub(SEGMENT_CONTEXT);
        self.history.drain(..excess);
    }
}

/// Converts scheduled playback segments to a device rate without seams
///
/// Segments that start exactly where the previous one ended are treated as
/// one continuous stream. Anything else starts a fresh run.
pub struct SegmentResampler {
    output_rate: u32,
    run: Option<Run>,
}

impl SegmentResampler {
    pub fn new(output_rate: u32) -> Self {
        Self {
            output_rate,
            run: None,
        }
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Convert `samples` recorded at `input_rate` that start at `start` seconds
    pub fn convert(
        &mut self,
        samples: &[f32],
        input_rate: u32,
        start: f64,
    ) -> Result<ResampledSegment> {
        let continues = match &self.run {
            Some(run) => {
                run.input_rate == input_rate && (start - run.end).abs() * (input_rate as f64) < 0.5
            }
            None => false,
        };

        if !continues {
            self.run = Some(Run::new(input_rate, self.output_rate)?);
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(ResampledSegment::default());
        };

        let segment = run.convert(samples, continues)?;
        run.end = start + samples.len() as f64 / input_rate as f64;
        Ok(segment)
    }

    /// Forget the previous segment
    pub fn clear(&mut self) {
        self.run = None;
    }
}

/// Resample a mono clip in one step
pub fn resample_audio(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let mut resampler = AudioResampler::new(input_rate, output_rate, DEFAULT_CHUNK_SIZE)?;
    resampler.resample(input)
}
