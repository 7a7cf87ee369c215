//! Single-echo delay.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Adds one echo `delay_samples` later, scaled by `feedback`.
///
/// Output length is `len + delay_samples`. Every input sample lands once at
/// its own index and once, scaled, at `index + delay_samples`; overlaps add.
pub fn delay(buffer: &AudioBuffer, delay_samples: usize, feedback: f32) -> AudioBuffer {
    let input = buffer.samples();
    let mut output = vec![0.0; input.len() + delay_samples];
    for (i, &sample) in input.iter().enumerate() {
        output[i] += sample;
        output[i + delay_samples] += sample * feedback;
    }
    buffer.with_samples(output)
}

/// Delay configured in milliseconds, as in an effect chain.
pub fn apply(buffer: &AudioBuffer, time_ms: f64, feedback: f64) -> AudioResult<AudioBuffer> {
    if !(1.0..=2000.0).contains(&time_ms) {
        return Err(AudioError::invalid_param(
            "delay.time_ms",
            format!("must be 1-2000, got {}", time_ms),
        ));
    }
    if !(0.0..=0.95).contains(&feedback) {
        return Err(AudioError::invalid_param(
            "delay.feedback",
            format!("must be 0.0-0.95, got {}", feedback),
        ));
    }

    let delay_samples = (time_ms / 1000.0 * buffer.sample_rate() as f64).round() as usize;
    Ok(delay(buffer, delay_samples, feedback as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delay_echo_positions() {
        let buffer = AudioBuffer::new(10, vec![1.0, 0.5, 0.0]).unwrap();
        let out = delay(&buffer, 2, 0.5);
        assert_eq!(out.samples(), &[1.0, 0.5, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_zero_delay_adds_in_place() {
        let buffer = AudioBuffer::new(10, vec![0.2, 0.4]).unwrap();
        let out = delay(&buffer, 0, 1.0);
        assert_eq!(out.samples(), &[0.4, 0.8]);
    }

    #[test]
    fn test_apply_converts_milliseconds() {
        let buffer = AudioBuffer::new(1000, vec![1.0; 10]).unwrap();
        let out = apply(&buffer, 5.0, 0.5).unwrap();
        assert_eq!(out.len(), 15);
        assert_eq!(out.samples()[5], 1.5);
    }

    #[test]
    fn test_apply_validates_parameters() {
        let buffer = AudioBuffer::new(1000, vec![1.0]).unwrap();
        assert!(apply(&buffer, 0.0, 0.5).is_err());
        assert!(apply(&buffer, 3000.0, 0.5).is_err());
        let err = apply(&buffer, 100.0, 1.2).unwrap_err();
        assert!(err.to_string().contains("delay.feedback"));
    }
}
