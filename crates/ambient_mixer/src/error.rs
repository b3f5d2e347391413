//! Mixer error types
//!
//! Every failure in the mixer is recoverable: the affected track simply does
//! not start or does not change, and the rest of the mixer keeps running.

use thiserror::Error;

/// Errors reported by the mixer, its track controller and playback backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MixerError {
    /// The playback resource could not be acquired (missing file, bad data, no sink)
    #[error("Playback unavailable for '{resource}': {reason}")]
    PlaybackUnavailable {
        /// Resource reference that failed to load
        resource: String,
        /// Backend-specific reason
        reason: String,
    },

    /// The host refused to start playback of an acquired resource
    #[error("Playback rejected for '{resource}': {reason}")]
    PlaybackRejected {
        /// Resource reference that was rejected
        resource: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Toggle or volume request for an id that is not in the catalog
    #[error("Unknown sound id: {0}")]
    UnknownSoundId(String),

    /// Start requested for a sound that is already playing or starting
    #[error("Sound '{0}' is already playing or starting")]
    AlreadyStarted(String),

    /// Catalog built with the same id twice
    #[error("Duplicate sound id in catalog: {0}")]
    DuplicateSoundId(String),

    /// Handle was never acquired or has already been released
    #[error("Invalid playback handle")]
    InvalidHandle,

    /// Backend used before `initialize`
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Backend failed to open an output device
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),
}

impl MixerError {
    /// Build a `PlaybackUnavailable` error
    pub fn unavailable(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::PlaybackUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a `PlaybackRejected` error
    pub fn rejected(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::PlaybackRejected {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_resource() {
        let err = MixerError::unavailable("sounds/rain.wav", "file not found");
        assert_eq!(
            err.to_string(),
            "Playback unavailable for 'sounds/rain.wav': file not found"
        );
    }
}
