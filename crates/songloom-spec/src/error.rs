//! Error types shared by every songloom crate.

use thiserror::Error;

/// Common reporting surface for errors raised by the songloom crates.
///
/// ```ignore
/// use songloom_spec::error::BackendError;
///
/// fn report<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "AUDIO_001" or "COMPOSE_002". These codes
    /// are stable and can be matched on programmatically.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    ///
    /// Returns a category like "spec", "compose", "audio", "render".
    fn category(&self) -> &'static str;
}

/// Errors raised while parsing pitches or validating a render configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    /// A pitch class name could not be parsed.
    #[error("invalid pitch class '{0}'")]
    InvalidPitchClass(String),

    /// A concrete pitch (class + octave) could not be parsed.
    #[error("invalid pitch '{0}'")]
    InvalidPitch(String),

    /// A configuration value is out of range.
    #[error("invalid config value '{field}': {message}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl SpecError {
    /// Creates an invalid config error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidPitchClass(_) => "SPEC_001",
            SpecError::InvalidPitch(_) => "SPEC_002",
            SpecError::InvalidConfig { .. } => "SPEC_003",
            SpecError::Parse(_) => "SPEC_004",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}
