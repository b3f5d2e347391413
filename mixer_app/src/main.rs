//! Terminal ambient mixer
//!
//! Reads one command per line from stdin and drives the mixer with it.
//! Usage: `ambient-mixer [config.toml|config.ron]`

mod command;
mod view;

use ambient_mixer::prelude::*;
use command::{Command, ParseError, HELP};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use view::ViewState;

/// Fatal application errors; mixer failures are reported and survived
#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Mixer setup: {0}")]
    Mixer(#[from] MixerError),

    #[error("Terminal IO: {0}")]
    Io(#[from] io::Error),
}

fn load_config() -> Result<MixerConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            Ok(MixerConfig::load_from_file(&path)?)
        }
        None => Ok(MixerConfig::default()),
    }
}

/// Apply one command; returns false when the user asked to quit
fn handle<B: PlaybackBackend>(
    command: Command,
    mixer: &mut Mixer<B>,
    view: &mut ViewState,
    out: &mut impl Write,
) -> io::Result<bool> {
    match command {
        Command::Toggle(id) => match mixer.toggle(&id) {
            Ok(status) => writeln!(out, "{id}: {status:?}")?,
            Err(e) => writeln!(out, "{id} did not start: {e}")?,
        },
        Command::TrackVolume(id, volume) => {
            if let Err(e) = mixer.set_track_volume(&id, volume) {
                writeln!(out, "{e}")?;
            } else if !mixer.is_active(&id) {
                writeln!(out, "{id} is not playing")?;
            }
        }
        Command::Master(volume) if mixer.controls_enabled() => mixer.set_master_volume(volume),
        Command::Mute if mixer.controls_enabled() => mixer.toggle_mute(),
        Command::Master(_) | Command::Mute => writeln!(out, "Nothing is playing")?,
        Command::List => writeln!(out, "{}", view.render_catalog(mixer))?,
        Command::Status => {}
        Command::Theme => view.theme = view.theme.toggled(),
        Command::Panel => view.panel_open = !view.panel_open,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(false),
    }
    writeln!(out, "{}", view.render_status(&mixer.snapshot()))?;
    Ok(true)
}

fn run<B: PlaybackBackend>(mut mixer: Mixer<B>) -> Result<(), AppError> {
    let mut view = ViewState::default();
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    writeln!(out, "{}\n{}", view.render_catalog(&mixer), mixer.status_line())?;
    write!(out, "> ")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match line.parse::<Command>() {
            Ok(command) => {
                if !handle(command, &mut mixer, &mut view, &mut out)? {
                    break;
                }
            }
            Err(ParseError::Empty) => {}
            Err(e) => writeln!(out, "{e}")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    mixer.teardown();
    Ok(())
}

fn main() {
    ambient_mixer::logging::init_with_default("info");

    let result = load_config().and_then(|config| {
        let backend = create_backend();
        let mixer = Mixer::from_config(&config, backend)?;
        run(mixer)
    });

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
