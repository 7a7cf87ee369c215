//! songloom composition engine
//!
//! Picks a song structure, a key and two chord progressions, then runs the
//! per-role pattern library over every repetition unit to produce timed
//! events. Everything random is drawn from one caller-supplied RNG, so a seed
//! reproduces a song exactly.
//!
//! # Example
//!
//! ```
//! use songloom_compose::{Composer, SymbolicScore};
//! use songloom_spec::{RenderConfig, Role};
//!
//! let composer = Composer::from_config(&RenderConfig::default()).unwrap();
//! let song = composer.compose_seeded(42).unwrap();
//! assert!(song.track(Role::Drum).is_some());
//!
//! let score = SymbolicScore::from_song(&song);
//! assert!(score.validate().is_ok());
//! ```

pub mod composer;
pub mod error;
pub mod midi;
pub mod patterns;
pub mod rng;
pub mod structure;
pub mod symbolic;
pub mod theory;

pub use composer::{compose, is_fill_unit, plays_in, ComposeOptions, Composer, Song};
pub use error::{ComposeError, ComposeResult};
pub use rng::{create_component_rng, create_rng, derive_component_seed, entropy_seed};
pub use structure::StructureCatalog;
pub use symbolic::{SymbolicNote, SymbolicScore, SymbolicTrack};
pub use theory::{
    resolve_chord, resolve_progression, Chord, ChordProgression, ProgressionCatalog, Scale,
    TheoryContext,
};
