//! songloom shared model
//!
//! This crate holds the types every other songloom crate agrees on: spelled
//! pitches, the song model (sections, roles, timed events, tracks), the render
//! configuration document, and the [`BackendError`] reporting trait.
//!
//! # Example
//!
//! ```
//! use songloom_spec::{Pitch, RenderConfig, Role};
//!
//! let config = RenderConfig::from_json(r#"{ "seed": 42, "tempo_bpm": 96 }"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert!(config.roles.contains(&Role::Arp));
//!
//! let a4: Pitch = "A4".parse().unwrap();
//! assert_eq!(a4.to_midi(), Some(69));
//! ```
//!
//! # Modules
//!
//! - [`config`]: render configuration and ornamentation constants
//! - [`error`]: error reporting trait and spec errors
//! - [`pitch`]: pitch classes and concrete pitches
//! - [`song`]: sections, structures, events and tracks

pub mod config;
pub mod error;
pub mod pitch;
pub mod song;

pub use config::{
    ornaments, Effect, KeySpec, Ornaments, PlayerConfig, RenderConfig, RendererConfig, ScaleMode,
    StructureTemplate,
};
pub use error::{BackendError, SpecError};
pub use pitch::{Pitch, PitchClass};
pub use song::{
    AudioEvent, DrumVoice, EventSource, NoteEvent, Role, Section, SectionKind, SongStructure,
    Timing, Track,
};
