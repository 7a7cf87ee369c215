//! Error types for the audio engine.

use songloom_spec::BackendError;
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while loading, transforming or mixing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A fragment id does not resolve to anything.
    #[error("fragment not found: {id}")]
    FragmentNotFound {
        /// The missing fragment.
        id: String,
    },

    /// The fragment source has no entry for a role.
    #[error("no fragments for role '{role}'")]
    RoleNotFound {
        /// The missing role.
        role: String,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Two buffers that must share a sample rate do not.
    #[error("sample rate mismatch: expected {expected}, found {found}")]
    SampleRateMismatch {
        /// Rate of the mix.
        expected: u32,
        /// Rate of the offending buffer.
        found: u32,
    },

    /// WAV decode or encode failure.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fragment loads did not finish in time.
    #[error("{pending} fragment load(s) still pending after {timeout_ms} ms")]
    LoadTimeout {
        /// Loads that were abandoned.
        pending: usize,
        /// The timeout that expired.
        timeout_ms: u64,
    },
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a fragment-not-found error.
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::FragmentNotFound { id: id.to_string() }
    }

    /// Missing fragments and roles are recoverable: the affected event or
    /// layer is skipped and the render continues.
    pub fn is_missing_resource(&self) -> bool {
        matches!(
            self,
            AudioError::FragmentNotFound { .. }
                | AudioError::RoleNotFound { .. }
                | AudioError::LoadTimeout { .. }
        )
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::FragmentNotFound { .. } => "AUDIO_001",
            AudioError::RoleNotFound { .. } => "AUDIO_002",
            AudioError::InvalidSampleRate { .. } => "AUDIO_003",
            AudioError::InvalidParameter { .. } => "AUDIO_004",
            AudioError::SampleRateMismatch { .. } => "AUDIO_005",
            AudioError::Wav(_) => "AUDIO_006",
            AudioError::Io(_) => "AUDIO_007",
            AudioError::LoadTimeout { .. } => "AUDIO_008",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}
