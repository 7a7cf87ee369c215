//! Crossfading two buffers.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Returns `a * (1 - mix) + b * mix`.
///
/// Output length is the longer of the two; the shorter one is padded with
/// silence. `mix` must be within `[0, 1]`.
pub fn blend(a: &AudioBuffer, b: &AudioBuffer, mix: f32) -> AudioResult<AudioBuffer> {
    if !(0.0..=1.0).contains(&mix) {
        return Err(AudioError::invalid_param(
            "blend.mix",
            format!("must be 0.0-1.0, got {}", mix),
        ));
    }
    if a.sample_rate() != b.sample_rate() {
        return Err(AudioError::SampleRateMismatch {
            expected: a.sample_rate(),
            found: b.sample_rate(),
        });
    }

    let len = a.len().max(b.len());
    let (sa, sb) = (a.samples(), b.samples());
    let samples = (0..len)
        .map(|i| {
            let x = sa.get(i).copied().unwrap_or(0.0);
            let y = sb.get(i).copied().unwrap_or(0.0);
            x * (1.0 - mix) + y * mix
        })
        .collect();
    Ok(a.with_samples(samples))
}
