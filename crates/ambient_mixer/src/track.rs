//! Track controller
//!
//! Sole owner of live playback handles. Each sound id maps to at most one
//! handle; every handle that leaves this controller is stopped and released.

use crate::backend::{PlaybackBackend, PlaybackHandle};
use crate::catalog::SoundDescriptor;
use crate::error::MixerError;
use std::collections::HashMap;

/// Starts, adjusts and stops looping tracks on a playback backend
pub struct TrackController<B: PlaybackBackend> {
    backend: B,
    handles: HashMap<String, PlaybackHandle>,
}

impl<B: PlaybackBackend> TrackController<B> {
    /// Create a controller driving `backend`
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: HashMap::new(),
        }
    }

    /// The backend, for inspection
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Acquire, loop, set gain and play a sound
    ///
    /// The returned handle is not yet bound to an id; pass it to
    /// [`bind`](Self::bind) or [`discard`](Self::discard).
    ///
    /// # Errors
    /// - `PlaybackUnavailable` if the resource cannot be acquired
    /// - `PlaybackRejected` if the host refuses playback; the resource is released
    pub fn start(
        &mut self,
        descriptor: &SoundDescriptor,
        initial_gain: f32,
    ) -> Result<PlaybackHandle, MixerError> {
        let handle = self.backend.acquire(&descriptor.resource_ref)?;

        let configured = self
            .backend
            .set_looping(handle, true)
            .and_then(|()| self.backend.set_gain(handle, initial_gain.clamp(0.0, 1.0)))
            .and_then(|()| self.backend.play(handle));

        if let Err(e) = configured {
            self.backend.release(handle);
            return Err(e);
        }

        log::debug!(
            "Started '{}' at gain {:.2} ({:?})",
            descriptor.id,
            initial_gain,
            handle
        );
        Ok(handle)
    }

    /// Take ownership of a started handle for `id`
    ///
    /// A handle already bound to `id` is stopped and released first.
    pub fn bind(&mut self, id: &str, handle: PlaybackHandle) {
        if let Some(previous) = self.handles.insert(id.to_string(), handle) {
            log::warn!("Replacing live handle for '{id}'");
            self.discard(previous);
        }
    }

    /// Set the output level of the track bound to `id`
    ///
    /// # Errors
    /// - `InvalidHandle` if nothing is bound to `id` or the backend lost it
    pub fn set_gain(&mut self, id: &str, gain: f32) -> Result<(), MixerError> {
        let handle = *self.handles.get(id).ok_or(MixerError::InvalidHandle)?;
        self.backend.set_gain(handle, gain.clamp(0.0, 1.0))
    }

    /// Stop, rewind and release the track bound to `id`
    ///
    /// Returns whether a track was bound. Unknown ids are a no-op.
    pub fn stop(&mut self, id: &str) -> bool {
        match self.handles.remove(id) {
            Some(handle) => {
                self.discard(handle);
                log::debug!("Stopped '{id}'");
                true
            }
            None => false,
        }
    }

    /// Stop and release a handle that is not bound to any id
    pub fn discard(&mut self, handle: PlaybackHandle) {
        if let Err(e) = self.backend.stop(handle) {
            log::warn!("Failed to stop {handle:?}: {e}");
        }
        self.backend.release(handle);
    }

    /// Stop and release every bound track
    pub fn stop_all(&mut self) {
        let handles: Vec<PlaybackHandle> = self.handles.drain().map(|(_, h)| h).collect();
        for handle in handles {
            self.discard(handle);
        }
    }

    /// Number of bound tracks
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if no tracks are bound
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Output level the backend reports for `id`
    pub fn gain(&self, id: &str) -> Option<f32> {
        let handle = self.handles.get(id)?;
        self.backend.gain(*handle).ok()
    }

    /// Check if the track bound to `id` is playing
    pub fn is_playing(&self, id: &str) -> bool {
        self.handles
            .get(id)
            .is_some_and(|handle| self.backend.is_playing(*handle))
    }
}

impl<B: PlaybackBackend> Drop for TrackController<B> {
    fn drop(&mut self) {
        self.stop_all();
    }
}
