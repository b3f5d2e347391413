//! Rodio playback backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! # Example
//!
//! ```no_run
//! use ambient_mixer::backend::{PlaybackBackend, RodioBackend};
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize().unwrap();
//!
//! let handle = backend.acquire("sounds/rain.wav").unwrap();
//! backend.set_looping(handle, true).unwrap();
//! backend.set_gain(handle, 0.5).unwrap();
//! backend.play(handle).unwrap();
//!
//! backend.stop(handle).unwrap();
//! backend.release(handle);
//! backend.shutdown();
//! ```

use super::{HandleAllocator, PlaybackBackend, PlaybackHandle};
use crate::error::MixerError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// One acquired resource: its encoded bytes and the sink that plays them
struct Voice {
    resource: String,
    data: Arc<[u8]>,
    sink: Sink,
    looping: bool,
    /// Sink queue is empty; the next `play` must append a fresh decoder
    needs_source: bool,
}

/// Rodio-based playback backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Acquired voices
    voices: HashMap<PlaybackHandle, Voice>,
    handles: HandleAllocator,
    initialized: bool,
}

impl RodioBackend {
    /// Create a new, uninitialized Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            voices: HashMap::new(),
            handles: HandleAllocator::default(),
            initialized: false,
        }
    }

    /// Open the default output device
    ///
    /// Calling this twice is a no-op.
    ///
    /// # Errors
    /// - `BackendInitFailed` if no output device can be opened
    pub fn initialize(&mut self) -> Result<(), MixerError> {
        if self.initialized {
            return Ok(());
        }

        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            MixerError::BackendInitFailed(format!("Failed to create audio output: {e}"))
        })?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;

        log::info!("Rodio playback backend initialized");
        Ok(())
    }

    /// Stop and release every voice, then close the output device
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        for (_handle, voice) in self.voices.drain() {
            voice.sink.stop();
        }
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio playback backend shutdown");
    }

    /// Check if backend is initialized
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn voice(&self, handle: PlaybackHandle) -> Result<&Voice, MixerError> {
        self.voices.get(&handle).ok_or(MixerError::InvalidHandle)
    }

    fn voice_mut(&mut self, handle: PlaybackHandle) -> Result<&mut Voice, MixerError> {
        self.voices.get_mut(&handle).ok_or(MixerError::InvalidHandle)
    }
}

fn decode(data: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError> {
    Decoder::new(Cursor::new(Arc::clone(data)))
}

impl PlaybackBackend for RodioBackend {
    fn acquire(&mut self, resource: &str) -> Result<PlaybackHandle, MixerError> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or(MixerError::BackendNotInitialized)?;

        let bytes = std::fs::read(resource)
            .map_err(|e| MixerError::unavailable(resource, format!("Failed to open audio file: {e}")))?;
        let data: Arc<[u8]> = Arc::from(bytes);

        // Validate now so a corrupt file is reported as unavailable, not rejected
        decode(&data)
            .map_err(|e| MixerError::unavailable(resource, format!("Failed to decode audio: {e}")))?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| MixerError::unavailable(resource, format!("Failed to create sink: {e}")))?;
        sink.pause();

        let handle = self.handles.next_handle();
        self.voices.insert(
            handle,
            Voice {
                resource: resource.to_string(),
                data,
                sink,
                looping: false,
                needs_source: true,
            },
        );
        Ok(handle)
    }

    fn set_looping(&mut self, handle: PlaybackHandle, looping: bool) -> Result<(), MixerError> {
        // Takes effect on the next source appended by `play`
        self.voice_mut(handle)?.looping = looping;
        Ok(())
    }

    fn set_gain(&mut self, handle: PlaybackHandle, gain: f32) -> Result<(), MixerError> {
        self.voice(handle)?.sink.set_volume(gain.clamp(0.0, 1.0));
        Ok(())
    }

    fn gain(&self, handle: PlaybackHandle) -> Result<f32, MixerError> {
        Ok(self.voice(handle)?.sink.volume())
    }

    fn play(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        let voice = self.voice_mut(handle)?;

        if voice.needs_source {
            let source = decode(&voice.data)
                .map_err(|e| MixerError::rejected(voice.resource.clone(), e))?;
            if voice.looping {
                voice.sink.append(source.repeat_infinite());
            } else {
                voice.sink.append(source);
            }
            voice.needs_source = false;
        }

        voice.sink.play();
        Ok(())
    }

    fn stop(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        let voice = self.voice_mut(handle)?;
        // Dropping the queued source rewinds: the next play decodes from the start
        voice.sink.stop();
        voice.needs_source = true;
        Ok(())
    }

    fn release(&mut self, handle: PlaybackHandle) {
        if let Some(voice) = self.voices.remove(&handle) {
            voice.sink.stop();
        }
    }

    fn is_playing(&self, handle: PlaybackHandle) -> bool {
        self.voices
            .get(&handle)
            .is_some_and(|voice| !voice.sink.is_paused() && !voice.sink.empty())
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_initialization() {
        let mut backend = RodioBackend::new();
        assert!(!backend.is_initialized());

        let result = backend.initialize();

        // May fail in CI/test environments without audio device
        if result.is_ok() {
            assert!(backend.is_initialized());
            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_double_initialization() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            assert!(backend.initialize().is_ok());
            backend.shutdown();
        }
    }

    #[test]
    fn test_acquire_without_initialization() {
        let mut backend = RodioBackend::new();
        let result = backend.acquire("sounds/rain.wav");
        assert!(matches!(result, Err(MixerError::BackendNotInitialized)));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            let result = backend.acquire("definitely/not/here.wav");
            assert!(matches!(result, Err(MixerError::PlaybackUnavailable { .. })));
            assert!(backend.voices.is_empty());
            backend.shutdown();
        }
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            let invalid_handle = PlaybackHandle::new(999, 0);

            assert!(matches!(backend.play(invalid_handle), Err(MixerError::InvalidHandle)));
            assert!(matches!(backend.stop(invalid_handle), Err(MixerError::InvalidHandle)));
            assert!(matches!(backend.set_gain(invalid_handle, 0.5), Err(MixerError::InvalidHandle)));
            assert!(matches!(backend.gain(invalid_handle), Err(MixerError::InvalidHandle)));
            assert!(!backend.is_playing(invalid_handle));

            backend.release(invalid_handle);
            backend.shutdown();
        }
    }
}
