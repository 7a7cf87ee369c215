//! Tests for peak normalization.

use super::*;
use crate::buffer::AudioBuffer;

#[test]
fn test_normalize_loud_audio() {
    let mut samples = vec![2.0, -1.5, 4.0, -2.5];
    let divisor = normalize_peak(&mut samples);
    assert_eq!(divisor, 4.0);
    assert_eq!(samples, vec![0.5, -0.375, 1.0, -0.625]);
}

#[test]
fn test_normalize_quiet_audio_untouched() {
    let mut samples = vec![0.01, -0.005, 0.8, -1.0];
    let before = samples.clone();
    assert_eq!(normalize_peak(&mut samples), 1.0);
    assert_eq!(samples, before);
}

#[test]
fn test_normalize_silent_audio() {
    let mut samples = vec![0.0; 16];
    normalize_peak(&mut samples);
    assert!(samples.iter().all(|&s| s == 0.0));
    assert_eq!(peak(&[]), 0.0);
}

#[test]
fn test_mix_peak_never_exceeds_one() {
    for count in 1..12 {
        let buffers: Vec<AudioBuffer> = (0..count)
            .map(|i| {
                let samples = (0..64)
                    .map(|n| ((n * (i + 3)) % 17) as f32 / 8.0 - 1.0)
                    .collect();
                AudioBuffer::new(44100, samples).unwrap()
            })
            .collect();
        let offsets: Vec<usize> = (0..count).map(|i| i * 5).collect();
        let out = mix(&buffers, &offsets).unwrap();
        assert!(out.peak() <= 1.0 + 1e-6, "peak {} for {count} layers", out.peak());
    }
}

#[test]
fn test_mix_identity_when_quiet() {
    let a = AudioBuffer::new(100, vec![0.25, -0.5, 0.125]).unwrap();
    let out = mix(&[a.clone()], &[0]).unwrap();
    assert_eq!(out, a);
}
