//! Mixer state
//!
//! Plain-data state machine: which sounds are active, their individual
//! volumes, which starts are still in flight, and the master/mute level.
//! Holds no playback handles; those live in the track controller.

use serde::Serialize;
use std::collections::HashMap;

/// Integer volume, always within `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Silence
    pub const MIN: Self = Self(0);
    /// Full level
    pub const MAX: Self = Self(100);

    /// Clamp any integer into range; out-of-range values are never rejected
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i32) -> Self {
        // Clamped to 0..=100 first, so the cast cannot truncate
        Self(value.clamp(0, 100) as u8)
    }

    /// Raw value in `0..=100`
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Check for zero
    pub const fn is_silent(self) -> bool {
        self.0 == 0
    }

    /// Fraction of full level (0.0 to 1.0)
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl From<u8> for Volume {
    fn from(value: u8) -> Self {
        Self::clamped(i32::from(value))
    }
}

/// Audible gain of a track: `(individual/100) * (master/100)`
pub fn effective_gain(individual: Volume, master: Volume) -> f32 {
    individual.fraction() * master.fraction()
}

/// One playing sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTrack {
    /// Sound id
    pub id: String,
    /// Per-track slider position
    pub individual_volume: Volume,
}

/// Identifies one start attempt for a sound
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StartTicket {
    /// Sound being started
    pub id: String,
    /// Unique per attempt
    pub generation: u64,
}

/// Authoritative in-memory mixer state
#[derive(Debug, Clone)]
pub struct MixerState {
    /// Active tracks in activation order
    active: Vec<ActiveTrack>,
    /// Starts requested but not yet resolved, keyed by id
    pending: HashMap<String, u64>,
    next_generation: u64,
    master_volume: Volume,
    pre_mute_volume: Option<Volume>,
}

impl MixerState {
    /// Create an empty state with the given master volume
    pub fn new(master_volume: Volume) -> Self {
        Self {
            active: Vec::new(),
            pending: HashMap::new(),
            next_generation: 0,
            master_volume,
            pre_mute_volume: None,
        }
    }

    /// Check if a sound is active
    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|track| track.id == id)
    }

    /// Check if a start for this sound is in flight
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Active tracks in activation order
    pub fn active_tracks(&self) -> &[ActiveTrack] {
        &self.active
    }

    /// Look up an active track
    pub fn track(&self, id: &str) -> Option<&ActiveTrack> {
        self.active.iter().find(|track| track.id == id)
    }

    /// Number of active tracks
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Current master volume
    pub const fn master_volume(&self) -> Volume {
        self.master_volume
    }

    /// Master volume remembered by the last mute, if still muted
    pub const fn pre_mute_volume(&self) -> Option<Volume> {
        self.pre_mute_volume
    }

    /// Effective gain of an active track, recomputed from stored volumes
    pub fn gain_of(&self, id: &str) -> Option<f32> {
        self.track(id)
            .map(|track| effective_gain(track.individual_volume, self.master_volume))
    }

    /// Mark a start as in flight, superseding any older attempt for the id
    pub fn begin_start(&mut self, id: &str) -> StartTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending.insert(id.to_string(), generation);
        StartTicket {
            id: id.to_string(),
            generation,
        }
    }

    /// Check if `ticket` is the in-flight start for its id
    pub fn is_current(&self, ticket: &StartTicket) -> bool {
        self.pending.get(&ticket.id) == Some(&ticket.generation)
    }

    /// Drop the in-flight start for `id`; returns whether one existed
    pub fn cancel_start(&mut self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Resolve an in-flight start
    ///
    /// Returns `false` for a stale ticket (cancelled, superseded or torn
    /// down), in which case nothing changes and the caller owns cleanup.
    /// On `Some(volume)` the track becomes active.
    pub fn complete_start(&mut self, ticket: &StartTicket, started: Option<Volume>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending.remove(&ticket.id);

        if let Some(individual_volume) = started {
            if !self.is_active(&ticket.id) {
                self.active.push(ActiveTrack {
                    id: ticket.id.clone(),
                    individual_volume,
                });
            }
        }
        true
    }

    /// Remove an active track; returns whether it was active
    pub fn deactivate(&mut self, id: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|track| track.id != id);
        self.active.len() != before
    }

    /// Store a clamped master volume
    pub fn set_master_volume(&mut self, volume: Volume) {
        self.master_volume = volume;
    }

    /// Forget the remembered pre-mute volume
    pub fn clear_pre_mute(&mut self) {
        self.pre_mute_volume = None;
    }

    /// Mute or unmute; returns the new master volume
    ///
    /// Muting remembers the current level. Unmuting restores it, or
    /// `fallback` when nothing was remembered, and forgets it. The level is
    /// only captured on the way into mute, so a second mute never replaces
    /// the remembered value with zero.
    pub fn toggle_mute(&mut self, fallback: Volume) -> Volume {
        if self.master_volume.is_silent() {
            self.master_volume = self.pre_mute_volume.take().unwrap_or(fallback);
        } else {
            self.pre_mute_volume = Some(self.master_volume);
            self.master_volume = Volume::MIN;
        }
        self.master_volume
    }

    /// Update an active track's individual volume; returns whether it was active
    pub fn set_track_volume(&mut self, id: &str, volume: Volume) -> bool {
        match self.active.iter_mut().find(|track| track.id == id) {
            Some(track) => {
                track.individual_volume = volume;
                true
            }
            None => false,
        }
    }

    /// Remove every active track and in-flight start, returning the removed ids
    pub fn clear(&mut self) -> Vec<String> {
        self.pending.clear();
        self.active.drain(..).map(|track| track.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamping() {
        for v in -50..=150 {
            assert_eq!(i32::from(Volume::clamped(v).get()), v.clamp(0, 100));
        }
        assert_eq!(Volume::from(200u8), Volume::MAX);
    }

    #[test]
    fn test_effective_gain() {
        assert_eq!(effective_gain(Volume::MAX, Volume::clamped(50)), 0.5);
        assert_eq!(effective_gain(Volume::clamped(50), Volume::clamped(50)), 0.25);
        assert_eq!(effective_gain(Volume::MIN, Volume::MAX), 0.0);
    }

    #[test]
    fn test_start_lifecycle() {
        let mut state = MixerState::new(Volume::clamped(80));
        let ticket = state.begin_start("rain");
        assert!(state.is_pending("rain"));
        assert!(!state.is_active("rain"));

        assert!(state.complete_start(&ticket, Some(Volume::MAX)));
        assert!(!state.is_pending("rain"));
        assert!(state.is_active("rain"));
        assert_eq!(state.gain_of("rain"), Some(0.8));
    }

    #[test]
    fn test_failed_start_stays_inactive() {
        let mut state = MixerState::new(Volume::MAX);
        let ticket = state.begin_start("rain");

        assert!(state.complete_start(&ticket, None));
        assert!(!state.is_active("rain"));
        assert!(!state.is_pending("rain"));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut state = MixerState::new(Volume::MAX);
        let first = state.begin_start("rain");
        assert!(state.cancel_start("rain"));

        assert!(!state.complete_start(&first, Some(Volume::MAX)));
        assert!(!state.is_active("rain"));

        // A newer attempt supersedes an older one
        let older = state.begin_start("fire");
        let newer = state.begin_start("fire");
        assert!(!state.complete_start(&older, Some(Volume::MAX)));
        assert!(state.complete_start(&newer, Some(Volume::MAX)));
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_mute_involution() {
        let mut state = MixerState::new(Volume::clamped(50));
        let fallback = Volume::clamped(80);

        assert_eq!(state.toggle_mute(fallback), Volume::MIN);
        assert_eq!(state.pre_mute_volume(), Some(Volume::clamped(50)));

        assert_eq!(state.toggle_mute(fallback), Volume::clamped(50));
        assert_eq!(state.pre_mute_volume(), None);
    }

    #[test]
    fn test_unmute_without_memory_uses_fallback() {
        let mut state = MixerState::new(Volume::MIN);
        assert_eq!(state.toggle_mute(Volume::clamped(80)), Volume::clamped(80));
        assert_eq!(state.pre_mute_volume(), None);
    }

    #[test]
    fn test_activation_order_and_clear() {
        let mut state = MixerState::new(Volume::MAX);
        for id in ["fire", "rain", "birds"] {
            let ticket = state.begin_start(id);
            state.complete_start(&ticket, Some(Volume::MAX));
        }
        state.deactivate("rain");
        let ids: Vec<&str> = state.active_tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["fire", "birds"]);

        assert_eq!(state.clear(), vec!["fire".to_string(), "birds".to_string()]);
        assert_eq!(state.active_count(), 0);
        assert!(state.clear().is_empty());
    }

    #[test]
    fn test_track_volume_only_for_active() {
        let mut state = MixerState::new(Volume::MAX);
        assert!(!state.set_track_volume("rain", Volume::clamped(30)));

        let ticket = state.begin_start("rain");
        state.complete_start(&ticket, Some(Volume::MAX));
        assert!(state.set_track_volume("rain", Volume::clamped(30)));
        assert_eq!(state.track("rain").unwrap().individual_volume.get(), 30);
    }
}
