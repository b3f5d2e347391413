//! Terminal command parsing

use thiserror::Error;

/// One user intent typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle a sound on or off
    Toggle(String),
    /// Set one sound's volume
    TrackVolume(String, i32),
    /// Set the master volume
    Master(i32),
    /// Mute or unmute
    Mute,
    /// Show the catalog
    List,
    /// Show the mixer state
    Status,
    /// Switch between dark and light output
    Theme,
    /// Show or hide per-track volumes
    Panel,
    /// Show usage
    Help,
    /// Tear down and exit
    Quit,
}

/// Why a line could not be parsed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing typed
    #[error("empty command")]
    Empty,
    /// Unrecognised verb
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    /// Wrong number of arguments
    #[error("usage: {0}")]
    Usage(&'static str),
    /// Volume argument is not an integer
    #[error("'{0}' is not a volume")]
    BadVolume(String),
}

fn volume(arg: &str) -> Result<i32, ParseError> {
    arg.parse().map_err(|_| ParseError::BadVolume(arg.to_string()))
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };

        match (verb.to_ascii_lowercase().as_str(), args) {
            ("toggle" | "t", [id]) => Ok(Self::Toggle((*id).to_string())),
            ("toggle" | "t", _) => Err(ParseError::Usage("toggle <sound>")),
            ("vol" | "v", [id, v]) => Ok(Self::TrackVolume((*id).to_string(), volume(v)?)),
            ("vol" | "v", _) => Err(ParseError::Usage("vol <sound> <0-100>")),
            ("master" | "m", [v]) => Ok(Self::Master(volume(v)?)),
            ("master" | "m", _) => Err(ParseError::Usage("master <0-100>")),
            ("mute", []) => Ok(Self::Mute),
            ("list" | "ls", []) => Ok(Self::List),
            ("status" | "s", []) => Ok(Self::Status),
            ("theme", []) => Ok(Self::Theme),
            ("panel", []) => Ok(Self::Panel),
            ("help" | "?", []) => Ok(Self::Help),
            ("quit" | "exit" | "q", []) => Ok(Self::Quit),
            (other, _) => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Usage text for `help`
pub const HELP: &str = "\
  toggle <sound>        start or stop a sound
  vol <sound> <0-100>   set one sound's volume
  master <0-100>        set the master volume
  mute                  mute, or restore the previous volume
  list                  show available sounds
  status                show what is playing
  panel                 show or hide per-sound volumes
  theme                 switch dark/light output
  quit                  stop everything and exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("toggle rain".parse(), Ok(Command::Toggle("rain".into())));
        assert_eq!("  V fire 40 ".parse(), Ok(Command::TrackVolume("fire".into(), 40)));
        assert_eq!("master -20".parse(), Ok(Command::Master(-20)));
        assert_eq!("mute".parse(), Ok(Command::Mute));
        assert_eq!("q".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("dance".parse::<Command>(), Err(ParseError::Unknown("dance".into())));
        assert_eq!("toggle".parse::<Command>(), Err(ParseError::Usage("toggle <sound>")));
        assert_eq!(
            "master loud".parse::<Command>(),
            Err(ParseError::BadVolume("loud".into()))
        );
    }
}
