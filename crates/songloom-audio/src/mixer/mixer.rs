//! Sample accumulator for one render.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

use super::processing::normalize_peak;

/// Sums buffers at sample offsets.
///
/// The output grows to `max(offset + len)` over everything added.
#[derive(Debug, Clone)]
pub struct Mixer {
    /// Sample rate every added buffer must share.
    sample_rate: u32,
    /// Pre-normalization sum.
    output: Vec<f32>,
}

impl Mixer {
    /// Creates an empty mixer.
    pub fn new(sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            sample_rate,
            output: Vec::new(),
        })
    }

    /// Pads the output with silence to at least `len` samples.
    pub fn with_length(mut self, len: usize) -> Self {
        if self.output.len() < len {
            self.output.resize(len, 0.0);
        }
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current output length in samples.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Adds a buffer starting at `offset`.
    pub fn add(&mut self, buffer: &AudioBuffer, offset: usize) -> AudioResult<()> {
        self.add_scaled(buffer, offset, 1.0)
    }

    /// Adds a buffer starting at `offset`, multiplied by `gain`.
    pub fn add_scaled(&mut self, buffer: &AudioBuffer, offset: usize, gain: f32) -> AudioResult<()> {
        if buffer.sample_rate() != self.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                expected: self.sample_rate,
                found: buffer.sample_rate(),
            });
        }

        let end = offset + buffer.len();
        if self.output.len() < end {
            self.output.resize(end, 0.0);
        }
        for (out, &sample) in self.output[offset..end].iter_mut().zip(buffer.samples()) {
            *out += sample * gain;
        }
        Ok(())
    }

    /// The raw sum, before normalization.
    pub fn accumulate(&self) -> AudioBuffer {
        AudioBuffer {
            sample_rate: self.sample_rate,
            samples: self.output.clone(),
        }
    }

    /// Finishes the mix: the sum after peak normalization.
    pub fn mix_down(self) -> AudioBuffer {
        let mut samples = self.output;
        let divisor = normalize_peak(&mut samples);
        if divisor > 1.0 {
            tracing::debug!(peak = divisor, "normalized mix");
        }
        AudioBuffer {
            sample_rate: self.sample_rate,
            samples,
        }
    }
}

/// Sums `buffers[i]` at `offsets[i]` and normalizes the result.
///
/// All buffers must share one sample rate.
pub fn mix(buffers: &[AudioBuffer], offsets: &[usize]) -> AudioResult<AudioBuffer> {
    if buffers.len() != offsets.len() {
        return Err(AudioError::invalid_param(
            "mix.offsets",
            format!("{} offsets for {} buffers", offsets.len(), buffers.len()),
        ));
    }
    let Some(first) = buffers.first() else {
        return Err(AudioError::invalid_param("mix.buffers", "nothing to mix"));
    };

    let mut mixer = Mixer::new(first.sample_rate())?;
    for (buffer, &offset) in buffers.iter().zip(offsets) {
        mixer.add(buffer, offset)?;
    }
    Ok(mixer.mix_down())
}

/// Adds `ambient`, looped to the length of `primary`, at `volume` gain.
///
/// Output length is `primary.len()`. An empty ambient buffer adds nothing.
/// The same peak normalization as [`mix`] runs afterwards.
pub fn mix_looped_ambient(
    primary: &AudioBuffer,
    ambient: &AudioBuffer,
    volume: f32,
) -> AudioResult<AudioBuffer> {
    if primary.sample_rate() != ambient.sample_rate() {
        return Err(AudioError::SampleRateMismatch {
            expected: primary.sample_rate(),
            found: ambient.sample_rate(),
        });
    }

    let mut samples = primary.samples().to_vec();
    let layer = ambient.samples();
    if !layer.is_empty() {
        for (i, out) in samples.iter_mut().enumerate() {
            *out += layer[i % layer.len()] * volume;
        }
    }
    normalize_peak(&mut samples);
    Ok(primary.with_samples(samples))
}
