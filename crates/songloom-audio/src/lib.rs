//! songloom audio engine
//!
//! Turns composed tracks into audio by stitching pre-recorded fragments:
//!
//! - **Fragments** - `role/name` samples from a directory or from memory
//! - **Resampling** - nearest-neighbour rate conversion and pitch shift
//! - **Effects** - reverse, delay, distortion and reverse swell per role
//! - **Mixing** - offset summation with a single global peak normalization
//! - **Arrangement** - kit selection, event placement and concurrent loading
//!
//! # Determinism
//!
//! Kit and ambient selection draw from a caller-supplied RNG and every
//! transform is a pure function of its input, so a seed and a fragment set
//! reproduce the same samples.
//!
//! # Example
//!
//! ```
//! use songloom_audio::{mix, AudioBuffer};
//!
//! let a = AudioBuffer::new(1000, vec![0.75; 100]).unwrap();
//! let b = AudioBuffer::new(1000, vec![0.5; 50]).unwrap();
//! let out = mix(&[a, b], &[0, 80]).unwrap();
//! assert_eq!(out.len(), 130);
//! assert!(out.peak() <= 1.0);
//! ```

pub mod arrange;
pub mod buffer;
pub mod effects;
pub mod error;
pub mod fragments;
pub mod loader;
pub mod mixer;
pub mod resample;
pub mod wav;

pub use arrange::{
    arrange, bind_tracks, fragment_role_for, reference_pitch, render, render_blocking, select_kit,
    Arrangement, Placement, RenderOptions,
};
pub use buffer::AudioBuffer;
pub use effects::{apply_effect_chain, blend, delay, distort, reverse};
pub use error::{AudioError, AudioResult};
pub use fragments::{
    DirectoryFragmentSource, FragmentId, FragmentSource, MemoryFragmentSource, AMBIENT_ROLE,
};
pub use loader::{load_all, LoadReport};
pub use mixer::{mix, mix_looped_ambient, normalize_peak, peak, Mixer};
pub use resample::{load_and_resample, pitch_shift, resample};
