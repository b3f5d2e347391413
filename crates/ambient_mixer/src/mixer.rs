//! Ambient mixer
//!
//! The boundary the presentation layer talks to. Every user intent
//! (toggle, track slider, master slider, mute, teardown) is one `&mut self`
//! call that runs to completion: the plain-data [`MixerState`] is updated
//! first, then the [`TrackController`] applies the matching side effect.
//!
//! Starting a track may be asynchronous in some hosts, so it is split into
//! [`Mixer::request_start`], [`Mixer::launch`] and [`Mixer::finish_start`].
//! [`Mixer::toggle`] runs all three back to back.

use crate::backend::{PlaybackBackend, PlaybackHandle};
use crate::catalog::{SoundCatalog, SoundDescriptor};
use crate::config::{MixerConfig, TrackStartVolume};
use crate::error::MixerError;
use crate::state::{effective_gain, MixerState, StartTicket, Volume};
use crate::track::TrackController;
use serde::Serialize;

/// State of one sound after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    /// Playing
    Active,
    /// Not playing (including a start that was cancelled)
    Inactive,
}

/// A start in flight: everything needed to launch and later resolve it
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Matches the resolution against current state
    pub ticket: StartTicket,
    /// Sound to start
    pub descriptor: SoundDescriptor,
    /// Individual volume the track will get once active
    pub start_volume: Volume,
    /// Gain to start playback at
    pub initial_gain: f32,
}

/// One active track as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    /// Sound id
    pub id: String,
    /// Name shown to the user
    pub display_name: String,
    /// Presentation hint
    pub visual_tag: String,
    /// Per-track slider position
    pub volume: u8,
    /// Audible gain
    pub gain: f32,
}

/// Read-only projection of the mixer for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixerSnapshot {
    /// Master slider position
    pub master_volume: u8,
    /// Master volume is zero
    pub muted: bool,
    /// Active tracks in activation order
    pub tracks: Vec<TrackView>,
    /// Number of active tracks
    pub active_count: usize,
    /// Human-readable summary
    pub status: String,
    /// Most recent recovered failure
    pub last_failure: Option<String>,
}

/// Layered ambient-sound mixer
pub struct Mixer<B: PlaybackBackend> {
    catalog: SoundCatalog,
    state: MixerState,
    tracks: TrackController<B>,
    start_volume: TrackStartVolume,
    unmute_volume: Volume,
    last_failure: Option<MixerError>,
}

impl<B: PlaybackBackend> Mixer<B> {
    /// Create a mixer with default settings
    pub fn new(catalog: SoundCatalog, backend: B) -> Self {
        let config = MixerConfig::default();
        Self::with_settings(catalog, backend, &config)
    }

    /// Create a mixer from configuration
    ///
    /// # Errors
    /// - `DuplicateSoundId` if the configured catalog repeats an id
    pub fn from_config(config: &MixerConfig, backend: B) -> Result<Self, MixerError> {
        let catalog = config.catalog()?;
        Ok(Self::with_settings(catalog, backend, config))
    }

    fn with_settings(catalog: SoundCatalog, backend: B, config: &MixerConfig) -> Self {
        log::info!(
            "Mixer ready with {} sounds, master volume {}",
            catalog.len(),
            config.initial_master_volume
        );
        Self {
            catalog,
            state: MixerState::new(Volume::from(config.initial_master_volume)),
            tracks: TrackController::new(backend),
            start_volume: config.track_start_volume,
            unmute_volume: Volume::from(config.unmute_volume),
            last_failure: None,
        }
    }

    /// Toggle a sound on or off
    ///
    /// Active or pending sounds become inactive. Inactive sounds are started
    /// looping at the current master level.
    ///
    /// # Errors
    /// - `UnknownSoundId` if `id` is not in the catalog
    /// - `PlaybackUnavailable` / `PlaybackRejected` if the start failed; the
    ///   sound stays inactive
    pub fn toggle(&mut self, id: &str) -> Result<TrackStatus, MixerError> {
        if self.deactivate(id) {
            return Ok(TrackStatus::Inactive);
        }

        let request = self.request_start(id)?;
        let outcome = self.launch(&request);
        self.finish_start(&request, outcome)
    }

    /// Mark `id` as starting and describe the start to perform
    ///
    /// A sound that is already active or starting is refused; turn it off
    /// with [`toggle`](Self::toggle) first.
    ///
    /// # Errors
    /// - `UnknownSoundId` if `id` is not in the catalog
    /// - `AlreadyStarted` if `id` is active or pending
    pub fn request_start(&mut self, id: &str) -> Result<StartRequest, MixerError> {
        if self.state.is_active(id) || self.state.is_pending(id) {
            return Err(MixerError::AlreadyStarted(id.to_string()));
        }
        let Some(descriptor) = self.catalog.lookup(id).cloned() else {
            return Err(self.report(MixerError::UnknownSoundId(id.to_string())));
        };

        let master = self.state.master_volume();
        let start_volume = match self.start_volume {
            TrackStartVolume::Full => Volume::MAX,
            TrackStartVolume::MirrorMaster => master,
        };

        Ok(StartRequest {
            ticket: self.state.begin_start(id),
            descriptor,
            start_volume,
            initial_gain: effective_gain(start_volume, master),
        })
    }

    /// Perform the backend start for a request
    ///
    /// # Errors
    /// - `PlaybackUnavailable` / `PlaybackRejected` from the backend
    pub fn launch(&mut self, request: &StartRequest) -> Result<PlaybackHandle, MixerError> {
        self.tracks.start(&request.descriptor, request.initial_gain)
    }

    /// Resolve a start, whenever it completes
    ///
    /// If the sound was toggled off, restarted or torn down meanwhile, a
    /// successful handle is stopped and released here instead of leaking.
    ///
    /// # Errors
    /// - the start failure, when the ticket is still current
    pub fn finish_start(
        &mut self,
        request: &StartRequest,
        outcome: Result<PlaybackHandle, MixerError>,
    ) -> Result<TrackStatus, MixerError> {
        let ticket = &request.ticket;
        if !self.state.is_current(ticket) {
            if let Ok(handle) = outcome {
                log::debug!("Discarding late start for '{}'", ticket.id);
                self.tracks.discard(handle);
            }
            return Ok(TrackStatus::Inactive);
        }

        match outcome {
            Ok(handle) => {
                self.state.complete_start(ticket, Some(request.start_volume));
                self.tracks.bind(&ticket.id, handle);
                // Master may have moved while the start was in flight
                self.apply_gain(&ticket.id);
                log::info!("'{}' active ({} playing)", ticket.id, self.active_count());
                Ok(TrackStatus::Active)
            }
            Err(e) => {
                self.state.complete_start(ticket, None);
                Err(self.report(e))
            }
        }
    }

    /// Set the master volume, clamped to 0..=100, and regain every track
    ///
    /// A non-zero level set by the caller counts as a manual unmute and
    /// forgets any remembered pre-mute volume.
    pub fn set_master_volume(&mut self, value: i32) {
        let volume = Volume::clamped(value);
        if !volume.is_silent() {
            self.state.clear_pre_mute();
        }
        self.apply_master(volume);
    }

    /// Mute, or restore the level from before the last mute
    pub fn toggle_mute(&mut self) {
        let volume = self.state.toggle_mute(self.unmute_volume);
        if volume.is_silent() {
            log::info!("Muted");
        } else {
            log::info!("Unmuted, master volume {}", volume.get());
        }
        self.apply_master(volume);
    }

    /// Set one track's volume, clamped to 0..=100
    ///
    /// Inactive sounds are left alone.
    ///
    /// # Errors
    /// - `UnknownSoundId` if `id` is not in the catalog
    pub fn set_track_volume(&mut self, id: &str, value: i32) -> Result<(), MixerError> {
        if !self.catalog.contains(id) {
            return Err(self.report(MixerError::UnknownSoundId(id.to_string())));
        }
        if self.state.set_track_volume(id, Volume::clamped(value)) {
            self.apply_gain(id);
        }
        Ok(())
    }

    /// Stop and release every track; safe to call repeatedly
    pub fn teardown(&mut self) {
        let stopped = self.state.clear();
        for id in &stopped {
            self.tracks.stop(id);
        }
        // Anything bound without a state entry must not outlive the mixer
        self.tracks.stop_all();
        if !stopped.is_empty() {
            log::info!("Mixer torn down, stopped {} tracks", stopped.len());
        }
    }

    // Read model

    /// Check if a sound is playing
    pub fn is_active(&self, id: &str) -> bool {
        self.state.is_active(id)
    }

    /// Check if a start for this sound is in flight
    pub fn is_pending(&self, id: &str) -> bool {
        self.state.is_pending(id)
    }

    /// Active sound ids in activation order
    pub fn active_ids(&self) -> Vec<&str> {
        self.state
            .active_tracks()
            .iter()
            .map(|track| track.id.as_str())
            .collect()
    }

    /// Individual volume of an active sound
    pub fn track_volume(&self, id: &str) -> Option<u8> {
        self.state.track(id).map(|track| track.individual_volume.get())
    }

    /// Audible gain of an active sound
    pub fn effective_gain(&self, id: &str) -> Option<f32> {
        self.state.gain_of(id)
    }

    /// Master slider position
    pub const fn master_volume(&self) -> u8 {
        self.state.master_volume().get()
    }

    /// Level remembered by the last mute
    pub fn pre_mute_volume(&self) -> Option<u8> {
        self.state.pre_mute_volume().map(Volume::get)
    }

    /// Master volume is zero
    pub const fn is_muted(&self) -> bool {
        self.state.master_volume().is_silent()
    }

    /// Number of playing sounds
    pub fn active_count(&self) -> usize {
        self.state.active_count()
    }

    /// Master controls only make sense while something plays
    pub fn controls_enabled(&self) -> bool {
        self.active_count() > 0
    }

    /// Most recent recovered failure
    pub const fn last_failure(&self) -> Option<&MixerError> {
        self.last_failure.as_ref()
    }

    /// Sounds available to toggle
    pub const fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    /// Track controller, for inspecting live playback
    pub const fn tracks(&self) -> &TrackController<B> {
        &self.tracks
    }

    /// Summary line for the active set
    pub fn status_line(&self) -> String {
        match self.active_count() {
            0 => "Choose sounds to play".to_string(),
            1 => "1 sound playing".to_string(),
            n => format!("{n} sounds playing"),
        }
    }

    /// Everything the presentation layer renders
    pub fn snapshot(&self) -> MixerSnapshot {
        let master = self.state.master_volume();
        let tracks = self
            .state
            .active_tracks()
            .iter()
            .filter_map(|track| {
                let descriptor = self.catalog.lookup(&track.id)?;
                Some(TrackView {
                    id: track.id.clone(),
                    display_name: descriptor.display_name.clone(),
                    visual_tag: descriptor.visual_tag.clone(),
                    volume: track.individual_volume.get(),
                    gain: effective_gain(track.individual_volume, master),
                })
            })
            .collect();

        MixerSnapshot {
            master_volume: master.get(),
            muted: master.is_silent(),
            tracks,
            active_count: self.active_count(),
            status: self.status_line(),
            last_failure: self.last_failure.as_ref().map(ToString::to_string),
        }
    }

    // Internals

    /// Turn an active or pending sound off; returns whether it was on
    fn deactivate(&mut self, id: &str) -> bool {
        if self.state.deactivate(id) {
            self.state.cancel_start(id);
            self.tracks.stop(id);
            log::info!("'{id}' inactive ({} playing)", self.active_count());
            return true;
        }
        if self.state.cancel_start(id) {
            log::debug!("Cancelled pending start for '{id}'");
            return true;
        }
        false
    }

    fn apply_master(&mut self, volume: Volume) {
        self.state.set_master_volume(volume);
        let ids: Vec<String> = self
            .state
            .active_tracks()
            .iter()
            .map(|track| track.id.clone())
            .collect();
        for id in ids {
            self.apply_gain(&id);
        }
    }

    fn apply_gain(&mut self, id: &str) {
        let Some(gain) = self.state.gain_of(id) else {
            return;
        };
        if let Err(e) = self.tracks.set_gain(id, gain) {
            self.report(e);
        }
    }

    fn report(&mut self, error: MixerError) -> MixerError {
        log::warn!("{error}");
        self.last_failure = Some(error.clone());
        error
    }
}
