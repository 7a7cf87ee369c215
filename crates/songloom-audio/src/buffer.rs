//! Mono sample buffers.

use crate::error::{AudioError, AudioResult};

/// Mono `f32` samples at a fixed sample rate, nominally in `[-1, 1]`.
///
/// Transformations never mutate a buffer in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub(crate) sample_rate: u32,
    pub(crate) samples: Vec<f32>,
}

impl AudioBuffer {
    /// Creates a buffer. The sample rate must be positive.
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    /// Creates `len` samples of silence.
    pub fn silent(sample_rate: u32, len: usize) -> AudioResult<Self> {
        Self::new(sample_rate, vec![0.0; len])
    }

    /// A buffer at the same rate holding other samples.
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            sample_rate: self.sample_rate,
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value, 0 for an empty buffer.
    pub fn peak(&self) -> f32 {
        crate::mixer::peak(&self.samples)
    }

    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns a copy with every sample multiplied by `gain`.
    pub fn scaled(&self, gain: f32) -> Self {
        self.with_samples(self.samples.iter().map(|s| s * gain).collect())
    }
}
