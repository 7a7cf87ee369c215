//! songloom End-to-End Test Infrastructure
//!
//! Integration tests for the full pipeline:
//!
//! - Composition: config + seed -> song
//! - Sample mode: song + fragment directory -> WAV
//! - Symbolic mode: song -> Standard MIDI File
//! - **Determinism**: identical seeds give byte-identical output
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p songloom-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
pub use fixtures::{render_song, FragmentFixture};
