//! Buffer effects applied to fragments before mixing.
//!
//! Every effect is a pure buffer-to-buffer transform. A role's effect chain
//! runs on each fragment of that role after pitch shifting.

pub mod blend;
pub mod delay;
pub mod distortion;
pub mod reverse;

pub use blend::blend;
pub use delay::delay;
pub use distortion::distort;
pub use reverse::reverse;

use songloom_spec::Effect;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Applies a chain of effects in order.
///
/// # Arguments
/// * `buffer` - Fragment audio
/// * `effects` - Effect chain to apply
///
/// # Returns
/// Processed audio; the input is untouched
pub fn apply_effect_chain(buffer: &AudioBuffer, effects: &[Effect]) -> AudioResult<AudioBuffer> {
    let mut current = buffer.clone();

    for effect in effects {
        current = match effect {
            Effect::Reverse => reverse(&current),
            Effect::Delay { time_ms, feedback } => delay::apply(&current, *time_ms, *feedback)?,
            Effect::Distort { gain } => distortion::apply(&current, *gain)?,
            Effect::ReverseSwell { mix } => {
                if !(0.0..=1.0).contains(mix) {
                    return Err(AudioError::invalid_param(
                        "reverse_swell.mix",
                        format!("must be 0.0-1.0, got {}", mix),
                    ));
                }
                blend(&current, &reverse(&current), *mix as f32)?
            }
        };
    }

    Ok(current)
}
