//! Sample-order reversal.

use crate::buffer::AudioBuffer;

/// Plays the buffer backwards. Length is preserved.
pub fn reverse(buffer: &AudioBuffer) -> AudioBuffer {
    buffer.with_samples(buffer.samples().iter().rev().copied().collect())
}
