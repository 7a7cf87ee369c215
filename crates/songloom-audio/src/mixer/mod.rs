//! Offset-based mixing with global peak normalization.
//!
//! Buffers are summed at sample offsets into one accumulator. Normalization
//! runs once on the finished sum and only ever attenuates.

#[allow(clippy::module_inception)]
mod mixer;
mod processing;

#[cfg(test)]
mod tests_ambient;
#[cfg(test)]
mod tests_mixing;
#[cfg(test)]
mod tests_normalization;

pub use mixer::{mix, mix_looped_ambient, Mixer};
pub use processing::{normalize_peak, peak};
