//! Sound catalog
//!
//! Static, read-only registry of the ambient sounds the mixer can play.
//! Built once at startup and never mutated afterwards.

use crate::error::MixerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Immutable description of one playable sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Unique identifier (e.g. "rain")
    pub id: String,
    /// Name shown to the user
    pub display_name: String,
    /// Location handed to the playback backend
    pub resource_ref: String,
    /// Presentation hint (colour family)
    pub visual_tag: String,
}

impl SoundDescriptor {
    /// Create a new sound descriptor
    pub fn new<S: Into<String>>(id: S, display_name: S, resource_ref: S, visual_tag: S) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            resource_ref: resource_ref.into(),
            visual_tag: visual_tag.into(),
        }
    }
}

/// Built-in sounds: (id, display name, file, visual tag)
const BUILTIN_SOUNDS: &[(&str, &str, &str, &str)] = &[
    ("rain", "Rain", "rain.wav", "blue"),
    ("forest", "Forest", "forest.wav", "green"),
    ("waves", "Ocean Waves", "waves.wav", "cyan"),
    ("fire", "Campfire", "fire.wav", "orange"),
    ("birds", "Birdsong", "birds.wav", "yellow"),
    ("night", "Night", "night.wav", "indigo"),
    ("stream", "Stream", "stream.wav", "sky"),
    ("meditation", "Meditation", "meditation.wav", "purple"),
];

/// Read-only registry mapping sound ids to descriptors, in display order
#[derive(Debug, Clone)]
pub struct SoundCatalog {
    sounds: Vec<SoundDescriptor>,
    index: HashMap<String, usize>,
}

impl SoundCatalog {
    /// Build a catalog from descriptors, keeping their order for display
    ///
    /// # Errors
    /// - `DuplicateSoundId` if two descriptors share an id
    pub fn new(sounds: Vec<SoundDescriptor>) -> Result<Self, MixerError> {
        let mut index = HashMap::with_capacity(sounds.len());
        for (position, sound) in sounds.iter().enumerate() {
            if index.insert(sound.id.clone(), position).is_some() {
                return Err(MixerError::DuplicateSoundId(sound.id.clone()));
            }
        }
        Ok(Self { sounds, index })
    }

    /// The built-in ambient sounds, with files resolved under `sounds_root`
    pub fn builtin(sounds_root: &Path) -> Self {
        let sounds = BUILTIN_SOUNDS
            .iter()
            .map(|&(id, name, file, tag)| {
                let resource = sounds_root.join(file).to_string_lossy().into_owned();
                SoundDescriptor::new(id.to_string(), name.to_string(), resource, tag.to_string())
            })
            .collect::<Vec<_>>();
        let index = sounds
            .iter()
            .enumerate()
            .map(|(position, sound)| (sound.id.clone(), position))
            .collect();
        Self { sounds, index }
    }

    /// Find the descriptor for `id`
    pub fn lookup(&self, id: &str) -> Option<&SoundDescriptor> {
        self.index.get(id).map(|&position| &self.sounds[position])
    }

    /// Check if `id` is in the catalog
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in display order
    pub fn iter(&self) -> impl Iterator<Item = &SoundDescriptor> {
        self.sounds.iter()
    }

    /// Number of sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Check if the catalog has no sounds
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = SoundCatalog::builtin(Path::new("sounds"));
        assert_eq!(catalog.len(), 8);

        let rain = catalog.lookup("rain").unwrap();
        assert_eq!(rain.display_name, "Rain");
        assert_eq!(Path::new(&rain.resource_ref), Path::new("sounds").join("rain.wav"));
        assert_eq!(rain.visual_tag, "blue");
    }

    #[test]
    fn test_display_order_is_kept() {
        let catalog = SoundCatalog::builtin(Path::new("sounds"));
        let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            ["rain", "forest", "waves", "fire", "birds", "night", "stream", "meditation"]
        );
    }

    #[test]
    fn test_unknown_id() {
        let catalog = SoundCatalog::builtin(Path::new("sounds"));
        assert!(catalog.lookup("thunder").is_none());
        assert!(!catalog.contains("thunder"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = SoundCatalog::new(vec![
            SoundDescriptor::new("rain", "Rain", "a.wav", "blue"),
            SoundDescriptor::new("rain", "More Rain", "b.wav", "blue"),
        ]);
        assert_eq!(result.unwrap_err(), MixerError::DuplicateSoundId("rain".into()));
    }
}
