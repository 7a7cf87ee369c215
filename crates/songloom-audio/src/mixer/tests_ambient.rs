//! Tests for the looped ambient layer.

use super::*;
use crate::buffer::AudioBuffer;
use pretty_assertions::assert_eq;

#[test]
fn test_ambient_wraps_to_primary_length() {
    let primary = AudioBuffer::new(100, vec![0.0; 7]).unwrap();
    let ambient = AudioBuffer::new(100, vec![0.5, 1.0, -1.0]).unwrap();
    let out = mix_looped_ambient(&primary, &ambient, 0.5).unwrap();
    assert_eq!(
        out.samples(),
        &[0.25, 0.5, -0.5, 0.25, 0.5, -0.5, 0.25]
    );
}

#[test]
fn test_ambient_normalizes_sum() {
    let primary = AudioBuffer::new(100, vec![1.0, 0.5]).unwrap();
    let ambient = AudioBuffer::new(100, vec![1.0]).unwrap();
    let out = mix_looped_ambient(&primary, &ambient, 1.0).unwrap();
    assert_eq!(out.samples(), &[1.0, 0.75]);
}

#[test]
fn test_empty_ambient_adds_nothing() {
    let primary = AudioBuffer::new(100, vec![0.3, -0.2]).unwrap();
    let ambient = AudioBuffer::new(100, Vec::new()).unwrap();
    assert_eq!(mix_looped_ambient(&primary, &ambient, 0.8).unwrap(), primary);
}

#[test]
fn test_ambient_rate_mismatch() {
    let primary = AudioBuffer::new(100, vec![0.0]).unwrap();
    let ambient = AudioBuffer::new(200, vec![0.0]).unwrap();
    assert!(mix_looped_ambient(&primary, &ambient, 0.5).is_err());
}
