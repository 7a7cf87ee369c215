//! songloom CLI library.
//!
//! Config loading, the external renderer and player adapters, and the
//! command implementations behind the `songloom` binary.

pub mod commands;
pub mod error;
pub mod input;
pub mod playback;
pub mod renderer;
