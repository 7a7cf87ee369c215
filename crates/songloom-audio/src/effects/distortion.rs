//! Soft-clipping distortion.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Applies `tanh(sample * gain)` to every sample.
pub fn distort(buffer: &AudioBuffer, gain: f32) -> AudioBuffer {
    buffer.with_samples(buffer.samples().iter().map(|s| (s * gain).tanh()).collect())
}

/// Distortion as configured in an effect chain. Gain must be positive.
pub fn apply(buffer: &AudioBuffer, gain: f64) -> AudioResult<AudioBuffer> {
    if gain.is_nan() || gain <= 0.0 {
        return Err(AudioError::invalid_param(
            "distort.gain",
            format!("must be positive, got {}", gain),
        ));
    }
    Ok(distort(buffer, gain as f32))
}
