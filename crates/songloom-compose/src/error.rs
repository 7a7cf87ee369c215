//! Error types for composition.

use songloom_spec::{BackendError, SpecError};
use thiserror::Error;

/// Result type for composition operations.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors that abort a composition before any pattern work is done.
///
/// Every variant describes a configuration problem; none of them is
/// recoverable by skipping a single event.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The structure template catalog is empty.
    #[error("structure catalog is empty")]
    EmptyCatalog,

    /// A structure template has no sections.
    #[error("structure template '{name}' has no sections")]
    EmptyTemplate { name: String },

    /// A section has zero length.
    #[error("section {index} of template '{template}' has zero length")]
    ZeroLengthSection { template: String, index: usize },

    /// A progression symbol is not a Roman-numeral degree.
    #[error("unknown scale degree symbol '{symbol}' (expected i..vii)")]
    UnknownDegree { symbol: String },

    /// The progression catalog is empty.
    #[error("progression catalog is empty")]
    EmptyProgressionCatalog,

    /// A progression has no degrees.
    #[error("progression {index} is empty")]
    EmptyProgression { index: usize },

    /// A scale does not have exactly seven pitch classes.
    #[error("a scale needs exactly 7 pitch classes, got {len}")]
    InvalidScale { len: usize },

    /// A symbolic score failed well-formedness checks.
    #[error("invalid symbolic track '{track}': {message}")]
    InvalidScore { track: String, message: String },

    /// Writing the MIDI file failed.
    #[error("MIDI write failed: {0}")]
    Midi(#[from] std::io::Error),

    /// Invalid shared configuration.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl ComposeError {
    /// Creates an invalid score error.
    pub fn invalid_score(track: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidScore {
            track: track.into(),
            message: message.into(),
        }
    }
}

impl BackendError for ComposeError {
    fn code(&self) -> &'static str {
        match self {
            ComposeError::EmptyCatalog => "COMPOSE_001",
            ComposeError::EmptyTemplate { .. } => "COMPOSE_002",
            ComposeError::ZeroLengthSection { .. } => "COMPOSE_003",
            ComposeError::UnknownDegree { .. } => "COMPOSE_004",
            ComposeError::EmptyProgressionCatalog => "COMPOSE_005",
            ComposeError::EmptyProgression { .. } => "COMPOSE_006",
            ComposeError::InvalidScale { .. } => "COMPOSE_007",
            ComposeError::InvalidScore { .. } => "COMPOSE_008",
            ComposeError::Midi(_) => "COMPOSE_009",
            ComposeError::Spec(_) => "COMPOSE_010",
        }
    }

    fn category(&self) -> &'static str {
        "compose"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_degree_message() {
        let err = ComposeError::UnknownDegree {
            symbol: "viii".to_string(),
        };
        assert!(err.to_string().contains("viii"));
        assert_eq!(err.code(), "COMPOSE_004");
        assert_eq!(err.category(), "compose");
    }

    #[test]
    fn test_spec_error_passes_through() {
        let err: ComposeError = SpecError::InvalidPitch("Q4".into()).into();
        assert_eq!(err.to_string(), "invalid pitch 'Q4'");
        assert_eq!(err.code(), "COMPOSE_010");
    }
}
