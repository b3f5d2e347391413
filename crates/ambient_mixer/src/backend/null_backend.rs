//! Silent playback backend
//!
//! Tracks every acquired voice in memory without producing sound. Used when
//! no audio device is available and as the backend for mixer tests, where it
//! can be told to fail acquisition or playback for chosen resources.

use super::{HandleAllocator, PlaybackBackend, PlaybackHandle};
use crate::error::MixerError;
use std::collections::{HashMap, HashSet};

/// State of one silent voice
#[derive(Debug, Clone, PartialEq)]
pub struct NullVoice {
    /// Resource the voice was acquired for
    pub resource: String,
    /// Loop flag
    pub looping: bool,
    /// Output level (0.0 to 1.0)
    pub gain: f32,
    /// Whether `play` has been called since the last `stop`
    pub playing: bool,
}

/// Backend that plays nothing but remembers everything
#[derive(Debug, Default)]
pub struct NullBackend {
    voices: HashMap<PlaybackHandle, NullVoice>,
    handles: HandleAllocator,
    unavailable: HashSet<String>,
    rejected: HashSet<String>,
}

impl NullBackend {
    /// Create a new silent backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `acquire` fail for `resource`
    #[must_use]
    pub fn with_unavailable(mut self, resource: impl Into<String>) -> Self {
        self.unavailable.insert(resource.into());
        self
    }

    /// Make `play` fail for `resource`, as a host autoplay policy would
    #[must_use]
    pub fn with_rejected(mut self, resource: impl Into<String>) -> Self {
        self.rejected.insert(resource.into());
        self
    }

    /// Look up a live voice
    pub fn voice(&self, handle: PlaybackHandle) -> Option<&NullVoice> {
        self.voices.get(&handle)
    }

    /// Number of acquired, not yet released voices
    pub fn live_voices(&self) -> usize {
        self.voices.len()
    }

    fn voice_mut(&mut self, handle: PlaybackHandle) -> Result<&mut NullVoice, MixerError> {
        self.voices.get_mut(&handle).ok_or(MixerError::InvalidHandle)
    }
}

impl PlaybackBackend for NullBackend {
    fn acquire(&mut self, resource: &str) -> Result<PlaybackHandle, MixerError> {
        if self.unavailable.contains(resource) {
            return Err(MixerError::unavailable(resource, "resource marked unavailable"));
        }

        let handle = self.handles.next_handle();
        self.voices.insert(
            handle,
            NullVoice {
                resource: resource.to_string(),
                looping: false,
                gain: 1.0,
                playing: false,
            },
        );
        Ok(handle)
    }

    fn set_looping(&mut self, handle: PlaybackHandle, looping: bool) -> Result<(), MixerError> {
        self.voice_mut(handle)?.looping = looping;
        Ok(())
    }

    fn set_gain(&mut self, handle: PlaybackHandle, gain: f32) -> Result<(), MixerError> {
        self.voice_mut(handle)?.gain = gain.clamp(0.0, 1.0);
        Ok(())
    }

    fn gain(&self, handle: PlaybackHandle) -> Result<f32, MixerError> {
        self.voices
            .get(&handle)
            .map(|v| v.gain)
            .ok_or(MixerError::InvalidHandle)
    }

    fn play(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        let voice = self.voices.get_mut(&handle).ok_or(MixerError::InvalidHandle)?;
        if self.rejected.contains(&voice.resource) {
            return Err(MixerError::rejected(
                voice.resource.clone(),
                "playback blocked by host policy",
            ));
        }
        voice.playing = true;
        Ok(())
    }

    fn stop(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        self.voice_mut(handle)?.playing = false;
        Ok(())
    }

    fn release(&mut self, handle: PlaybackHandle) {
        self.voices.remove(&handle);
    }

    fn is_playing(&self, handle: PlaybackHandle) -> bool {
        self.voices.get(&handle).is_some_and(|v| v.playing)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_starts_paused() {
        let mut backend = NullBackend::new();
        let handle = backend.acquire("sounds/fire.wav").unwrap();

        let voice = backend.voice(handle).unwrap();
        assert_eq!(voice.resource, "sounds/fire.wav");
        assert!(!voice.playing);
        assert!(!voice.looping);
        assert_eq!(backend.live_voices(), 1);
    }

    #[test]
    fn test_unavailable_resource() {
        let mut backend = NullBackend::new().with_unavailable("missing.wav");
        let result = backend.acquire("missing.wav");

        assert!(matches!(result, Err(MixerError::PlaybackUnavailable { .. })));
        assert_eq!(backend.live_voices(), 0);
    }

    #[test]
    fn test_rejected_playback_keeps_voice_until_released() {
        let mut backend = NullBackend::new().with_rejected("blocked.wav");
        let handle = backend.acquire("blocked.wav").unwrap();

        assert!(matches!(backend.play(handle), Err(MixerError::PlaybackRejected { .. })));
        assert!(!backend.is_playing(handle));

        backend.release(handle);
        assert_eq!(backend.live_voices(), 0);
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = NullBackend::new();
        let invalid_handle = PlaybackHandle::new(999, 0);

        assert!(matches!(backend.set_gain(invalid_handle, 0.5), Err(MixerError::InvalidHandle)));
        assert!(matches!(backend.set_looping(invalid_handle, true), Err(MixerError::InvalidHandle)));
        assert!(matches!(backend.play(invalid_handle), Err(MixerError::InvalidHandle)));
        assert!(matches!(backend.stop(invalid_handle), Err(MixerError::InvalidHandle)));
        assert!(!backend.is_playing(invalid_handle));

        // Releasing twice is harmless
        backend.release(invalid_handle);
    }

    #[test]
    fn test_gain_is_clamped() {
        let mut backend = NullBackend::new();
        let handle = backend.acquire("a.wav").unwrap();

        backend.set_gain(handle, 1.5).unwrap();
        assert_eq!(backend.gain(handle).unwrap(), 1.0);
        backend.set_gain(handle, -0.2).unwrap();
        assert_eq!(backend.gain(handle).unwrap(), 0.0);
    }
}
