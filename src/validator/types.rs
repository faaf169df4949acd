use crate::media::MediaEntity;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Command line paths sorted by what should happen to them
#[derive(Debug, Default)]
pub struct ValidatedArguments {
    /// Files and directories to classify and rename
    pub media: Vec<PathBuf>,
    /// Backup records to restore
    pub backups: Vec<PathBuf>,
    /// Arguments that were skipped
    pub invalid: Vec<InvalidArgument>,
}

impl ValidatedArguments {
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }

    pub fn has_backups(&self) -> bool {
        !self.backups.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NotAbsolute,
    NotFound,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NotAbsolute => f.write_str("not an absolute path"),
            InvalidReason::NotFound => f.write_str("does not exist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    pub path: PathBuf,
    pub reason: InvalidReason,
}

/// A classified batch split before anything is touched on disk
#[derive(Debug, Default)]
pub struct Partition {
    pub renamable: Vec<MediaEntity>,
    pub already_correct: Vec<MediaEntity>,
    pub unknown: Vec<MediaEntity>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.renamable.is_empty() && self.already_correct.is_empty() && self.unknown.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("No paths were given")]
    NoArguments,

    #[error("None of the given paths are valid")]
    NoValidArguments { invalid: Vec<InvalidArgument> },
}

impl ValidationError {
    pub fn format_error_message(&self) -> String {
        match self {
            ValidationError::NoArguments => {
                String::from("Pass one or more absolute paths to media files or directories.")
            }
            ValidationError::NoValidArguments { invalid } => {
                let mut msg = String::from("The following paths were rejected:\n");
                for arg in invalid {
                    msg.push_str(&format!("  - {} ({})\n", arg.path.display(), arg.reason));
                }
                msg.push_str("\nPaths must be absolute and must exist.\n");
                msg
            }
        }
    }
}
