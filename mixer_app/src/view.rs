//! Presentation-only state and rendering
//!
//! Theme and panel visibility never reach the mixer; they only change how
//! its read model is printed.

use ambient_mixer::prelude::*;

/// Output colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light text on dark terminals
    #[default]
    Dark,
    /// Plain output for light terminals
    Light,
}

impl Theme {
    /// The other theme
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// State owned by the terminal front end only
#[derive(Debug, Default)]
pub struct ViewState {
    /// Current theme
    pub theme: Theme,
    /// Per-track volume panel visible
    pub panel_open: bool,
}

fn ansi(tag: &str) -> &'static str {
    match tag {
        "blue" | "sky" => "34",
        "green" => "32",
        "cyan" => "36",
        "orange" | "yellow" => "33",
        "indigo" | "purple" => "35",
        _ => "37",
    }
}

impl ViewState {
    fn paint(&self, tag: &str, text: &str) -> String {
        match self.theme {
            Theme::Dark => format!("\x1b[1;{}m{text}\x1b[0m", ansi(tag)),
            Theme::Light => text.to_string(),
        }
    }

    /// Catalog with an on/off marker per sound
    pub fn render_catalog<B: PlaybackBackend>(&self, mixer: &Mixer<B>) -> String {
        mixer
            .catalog()
            .iter()
            .map(|sound| {
                let marker = if mixer.is_active(&sound.id) { "[x]" } else { "[ ]" };
                format!(
                    "{marker} {:<12} {}",
                    sound.id,
                    self.paint(&sound.visual_tag, &sound.display_name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Master line, active chips, optional volume panel and status
    pub fn render_status(&self, snapshot: &MixerSnapshot) -> String {
        let mut lines = Vec::new();
        let speaker = if snapshot.muted { "muted" } else { "on" };
        lines.push(format!("master {:>3} ({speaker})", snapshot.master_volume));

        if !snapshot.tracks.is_empty() {
            let chips: Vec<String> = snapshot
                .tracks
                .iter()
                .map(|track| self.paint(&track.visual_tag, &track.display_name))
                .collect();
            lines.push(chips.join("  "));
        }

        if self.panel_open {
            for track in &snapshot.tracks {
                lines.push(format!(
                    "  {:<12} vol {:>3}  gain {:.2}",
                    track.id, track.volume, track.gain
                ));
            }
        }

        lines.push(snapshot.status.clone());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_render_status_with_panel() {
        let mut mixer = Mixer::new(SoundCatalog::builtin(Path::new("sounds")), NullBackend::new());
        mixer.toggle("rain").unwrap();
        mixer.set_master_volume(50);

        let view = ViewState {
            theme: Theme::Light,
            panel_open: true,
        };
        let text = view.render_status(&mixer.snapshot());

        assert!(text.contains("master  50 (on)"));
        assert!(text.contains("Rain"));
        assert!(text.contains("rain         vol 100  gain 0.50"));
        assert!(text.ends_with("1 sound playing"));
    }

    #[test]
    fn test_render_catalog_marks_active() {
        let mut mixer = Mixer::new(SoundCatalog::builtin(Path::new("sounds")), NullBackend::new());
        mixer.toggle("fire").unwrap();

        let view = ViewState {
            theme: Theme::Light,
            panel_open: false,
        };
        let text = view.render_catalog(&mixer);

        assert!(text.contains("[x] fire"));
        assert!(text.contains("[ ] rain"));
    }
}
