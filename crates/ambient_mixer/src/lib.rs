//! # Ambient Mixer
//!
//! Layer looping ambient sounds (rain, fire, waves, ...) under one master
//! volume. Each sound is toggled on or off on its own and has its own
//! volume; the audible gain of a track is always
//! `(track volume / 100) * (master volume / 100)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use ambient_mixer::prelude::*;
//!
//! let mut mixer = Mixer::from_config(&MixerConfig::default(), NullBackend::new()).unwrap();
//!
//! mixer.toggle("rain").unwrap();
//! mixer.toggle("fire").unwrap();
//! mixer.set_master_volume(50);
//! assert_eq!(mixer.effective_gain("rain"), Some(0.5));
//!
//! mixer.toggle_mute();
//! assert_eq!(mixer.master_volume(), 0);
//! mixer.toggle_mute();
//! assert_eq!(mixer.master_volume(), 50);
//!
//! mixer.teardown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod mixer;
pub mod state;
pub mod track;

pub use error::MixerError;

/// Common imports for mixer users
pub mod prelude {
    pub use crate::{
        backend::{create_backend, NullBackend, PlaybackBackend, PlaybackHandle},
        catalog::{SoundCatalog, SoundDescriptor},
        config::{Config, ConfigError, MixerConfig, TrackStartVolume},
        error::MixerError,
        mixer::{Mixer, MixerSnapshot, TrackStatus, TrackView},
        state::Volume,
    };
}
