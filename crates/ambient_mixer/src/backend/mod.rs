//! Playback backend implementations
//!
//! Platform-independent abstraction over the playback primitive the mixer
//! drives: acquire a resource, loop it, set its gain, play, stop, release.

pub mod null_backend;
#[cfg(feature = "rodio-backend")]
pub mod rodio_backend;

pub use null_backend::NullBackend;
#[cfg(feature = "rodio-backend")]
pub use rodio_backend::RodioBackend;

use crate::error::MixerError;

/// Handle to one acquired playback resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle {
    /// Unique identifier for the resource
    pub id: u32,
    /// Generation counter for handle validation
    pub generation: u32,
}

impl PlaybackHandle {
    /// Create a new playback handle
    pub const fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }
}

/// Hands out unique handles for a backend
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next_id: u32,
    generation: u32,
}

impl HandleAllocator {
    /// Generate a new playback handle
    pub fn next_handle(&mut self) -> PlaybackHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == 0 {
            // Wrapped: bump the generation so stale handles never match
            self.generation = self.generation.wrapping_add(1);
        }
        PlaybackHandle::new(id, self.generation)
    }
}

/// Playback primitive consumed by the track controller
///
/// # Threading
/// Not `Send + Sync`: the mixer is single-threaded and event-driven, every
/// call happens from the thread that owns the mixer.
pub trait PlaybackBackend {
    /// Acquire a playback resource for `resource`, paused at position zero
    ///
    /// Fails with `PlaybackUnavailable` when the resource cannot be loaded.
    fn acquire(&mut self, resource: &str) -> Result<PlaybackHandle, MixerError>;

    /// Configure whether the resource loops indefinitely
    fn set_looping(&mut self, handle: PlaybackHandle, looping: bool) -> Result<(), MixerError>;

    /// Set the instantaneous output level (0.0 to 1.0)
    fn set_gain(&mut self, handle: PlaybackHandle, gain: f32) -> Result<(), MixerError>;

    /// Current output level of a resource
    fn gain(&self, handle: PlaybackHandle) -> Result<f32, MixerError>;

    /// Begin playback
    ///
    /// Fails with `PlaybackRejected` when the host refuses to play.
    fn play(&mut self, handle: PlaybackHandle) -> Result<(), MixerError>;

    /// Halt playback and rewind to the start
    fn stop(&mut self, handle: PlaybackHandle) -> Result<(), MixerError>;

    /// Release the resource; the handle is invalid afterwards
    ///
    /// Releasing an unknown handle is a no-op.
    fn release(&mut self, handle: PlaybackHandle);

    /// Check if a resource is currently playing
    fn is_playing(&self, handle: PlaybackHandle) -> bool;
}

impl<B: PlaybackBackend + ?Sized> PlaybackBackend for Box<B> {
    fn acquire(&mut self, resource: &str) -> Result<PlaybackHandle, MixerError> {
        (**self).acquire(resource)
    }

    fn set_looping(&mut self, handle: PlaybackHandle, looping: bool) -> Result<(), MixerError> {
        (**self).set_looping(handle, looping)
    }

    fn set_gain(&mut self, handle: PlaybackHandle, gain: f32) -> Result<(), MixerError> {
        (**self).set_gain(handle, gain)
    }

    fn gain(&self, handle: PlaybackHandle) -> Result<f32, MixerError> {
        (**self).gain(handle)
    }

    fn play(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        (**self).play(handle)
    }

    fn stop(&mut self, handle: PlaybackHandle) -> Result<(), MixerError> {
        (**self).stop(handle)
    }

    fn release(&mut self, handle: PlaybackHandle) {
        (**self).release(handle);
    }

    fn is_playing(&self, handle: PlaybackHandle) -> bool {
        (**self).is_playing(handle)
    }
}

/// Create the default backend for the platform
///
/// Opens the audio device through rodio when the `rodio-backend` feature is
/// enabled. Without it, or when the device cannot be opened, the silent
/// [`NullBackend`] is returned so the mixer keeps working headless.
pub fn create_backend() -> Box<dyn PlaybackBackend> {
    #[cfg(feature = "rodio-backend")]
    {
        let mut backend = RodioBackend::new();
        match backend.initialize() {
            Ok(()) => return Box::new(backend),
            Err(e) => log::warn!("{e}; falling back to silent playback"),
        }
    }
    #[cfg(not(feature = "rodio-backend"))]
    log::info!("Built without rodio; using silent playback");
    Box::new(NullBackend::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_generation() {
        let mut allocator = HandleAllocator::default();
        let handle1 = allocator.next_handle();
        let handle2 = allocator.next_handle();

        assert_ne!(handle1, handle2);
        assert_eq!(handle1.generation, handle2.generation);
    }

    #[test]
    fn test_boxed_backend_forwards() {
        let mut backend: Box<dyn PlaybackBackend> = Box::new(NullBackend::new());
        let handle = backend.acquire("sounds/rain.wav").unwrap();
        backend.set_gain(handle, 0.25).unwrap();
        backend.play(handle).unwrap();

        assert!(backend.is_playing(handle));
        assert_eq!(backend.gain(handle).unwrap(), 0.25);

        backend.release(handle);
        assert!(matches!(backend.gain(handle), Err(MixerError::InvalidHandle)));
    }
}
