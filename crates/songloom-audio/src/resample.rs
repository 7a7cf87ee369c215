//! Nearest-neighbour resampling and resampling pitch shift.
//!
//! Both operations pick source samples by index without interpolation. Pitch
//! shifting changes playback speed, so pitch and duration move together.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::fragments::{FragmentId, FragmentSource};

/// Converts `buffer` to `target_rate`.
///
/// Output length is `floor(len * target / input)` and output sample `i` is
/// input sample `floor(i * input / target)`.
pub fn resample(buffer: &AudioBuffer, target_rate: u32) -> AudioResult<AudioBuffer> {
    if target_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: target_rate });
    }
    let input_rate = buffer.sample_rate() as u64;
    let target = target_rate as u64;
    if input_rate == target {
        return Ok(buffer.clone());
    }

    let input = buffer.samples();
    let out_len = (input.len() as u64 * target / input_rate) as usize;
    let samples = (0..out_len as u64)
        .map(|i| input[(i * input_rate / target) as usize])
        .collect();
    AudioBuffer::new(target_rate, samples)
}

/// Opens a fragment and resamples it to `target_rate`.
///
/// Fails with [`AudioError::FragmentNotFound`] when the fragment is missing;
/// callers skip the event.
pub fn load_and_resample(
    source: &dyn FragmentSource,
    id: &FragmentId,
    target_rate: u32,
) -> AudioResult<AudioBuffer> {
    let native = source.open(id)?;
    resample(&native, target_rate)
}

/// Shifts pitch by `semitones` through playback-rate change.
///
/// The ratio is `2^(semitones / 12)`; output length is `floor(len / ratio)`
/// and output sample `i` is input sample `floor(i * ratio)`.
pub fn pitch_shift(buffer: &AudioBuffer, semitones: f64) -> AudioBuffer {
    if semitones == 0.0 || buffer.is_empty() {
        return buffer.clone();
    }
    let ratio = 2.0_f64.powf(semitones / 12.0);
    let input = buffer.samples();
    let out_len = (input.len() as f64 / ratio).floor() as usize;
    let last = input.len() - 1;
    let samples = (0..out_len)
        .map(|i| input[((i as f64 * ratio).floor() as usize).min(last)])
        .collect();
    buffer.with_samples(samples)
}
