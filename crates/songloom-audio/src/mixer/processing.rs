//! Peak measurement and normalization.

/// Largest absolute sample value, 0 for no samples.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Divides every sample by the peak when the peak exceeds 1.
///
/// Quieter audio is left untouched, never boosted.
///
/// # Returns
/// The divisor applied, 1.0 when nothing changed
pub fn normalize_peak(samples: &mut [f32]) -> f32 {
    let current_peak = peak(samples);
    if current_peak <= 1.0 {
        return 1.0;
    }
    for sample in samples.iter_mut() {
        *sample /= current_peak;
    }
    current_peak
}
