use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters that may not appear in a corrected name
pub const RESERVED_CHARACTERS: &[char] = &['\\', '/', ':', '*', '"', '<', '>', '|'];

/// Sentinel new file name carried by unknown entities
pub const UNKNOWN_FILE_NAME: &str = "INVALID";

/// Fields specific to each kind of media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaDetails {
    Movie {
        release_year: String,
    },
    Show {
        season: String,
        episode: String,
        episode_title: Option<String>,
    },
    Unknown {
        is_file: bool,
        reason: String,
    },
}

/// How a file reached its current location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    /// Renamed inside its original directory
    Renamed,
    /// Moved into a library directory
    Moved,
    /// Copied into a library directory, original left in place
    Copied,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    #[error("Name is empty")]
    Empty,

    #[error("Name contains a reserved character: '{0}'")]
    ReservedCharacter(char),

    #[error("Name is unchanged")]
    Unchanged,

    #[error("Unrecognized files cannot be renamed")]
    Unrecognized,
}
