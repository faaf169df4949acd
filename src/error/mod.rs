mod codes;

pub use codes::ExitCode;

use crate::backup::BackupError;
use crate::scanner::ScannerError;
use crate::settings::SettingsError;
use crate::validator::{InvalidArgument, InvalidReason, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("None of the given paths are usable")]
    NoValidPaths { invalid: Vec<InvalidArgument> },

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Nothing to process")]
    NothingToProcess { reason: String },

    #[error("Backup store error: {0}")]
    Backup(#[from] BackupError),

    #[error("{failed} of {total} renames failed")]
    RenameFailures { failed: usize, total: usize },

    #[error("{failed} of {total} restores failed")]
    RestoreFailures { failed: usize, total: usize },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::InvalidArguments { .. } => ExitCode::InvalidArguments,
            AppError::NoValidPaths { invalid } => {
                if invalid.iter().all(|a| a.reason == InvalidReason::NotFound) {
                    ExitCode::PathNotFound
                } else {
                    ExitCode::InvalidArguments
                }
            }
            AppError::PathNotFound { .. } => ExitCode::PathNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::NothingToProcess { .. } => ExitCode::NothingToProcess,
            AppError::Backup(_) => ExitCode::BackupError,
            AppError::RenameFailures { .. } => ExitCode::RenameFailures,
            AppError::RestoreFailures { .. } => ExitCode::RestoreFailures,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InvalidArguments { message } => {
                format!("{}\n\nRun with --help for usage.", message)
            }

            AppError::NoValidPaths { invalid } => {
                let mut msg = String::from("None of the given paths can be processed:\n");
                for arg in invalid.iter().take(10) {
                    msg.push_str(&format!("  - {} ({})\n", arg.path.display(), arg.reason));
                }
                if invalid.len() > 10 {
                    msg.push_str(&format!("  ... and {} more\n", invalid.len() - 10));
                }
                msg.push_str("\nPaths must be absolute and must exist.");
                msg
            }

            AppError::PathNotFound { path } => {
                format!(
                    "The specified path does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::NothingToProcess { reason } => {
                format!("Nothing to process: {}", reason)
            }

            AppError::Backup(err) => match err {
                BackupError::InvalidRecord { key, reason } => format!(
                    "Backup record '{}' cannot be read:\n  {}\n\n\
                     The record may be corrupted or written by an incompatible version.",
                    key, reason
                ),
                BackupError::DirectoryUnavailable { path, source } => format!(
                    "The backup directory cannot be used:\n  {}\n  {}\n\n\
                     Set --backup-dir or CINEMA_RENAMER_BACKUP_DIR to a writable directory.",
                    path.display(),
                    source
                ),
                other => format!("Backup store error:\n  {}", other),
            },

            AppError::RenameFailures { failed, total } => {
                format!(
                    "{} of {} files could not be renamed.\n\n\
                     Their backups were removed and the files left untouched. \
                     See the failure list above for details.",
                    failed, total
                )
            }

            AppError::RestoreFailures { failed, total } => {
                format!(
                    "{} of {} backups could not be restored.\n\n\
                     Their records were kept so the restore can be retried.",
                    failed, total
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::PathNotFound { path },
            ScannerError::NotADirectory(path) => AppError::InvalidArguments {
                message: format!("Not a directory: {}", path.display()),
            },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::NoArguments => AppError::InvalidArguments {
                message: err.format_error_message(),
            },
            ValidationError::NoValidArguments { invalid } => AppError::NoValidPaths { invalid },
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::InvalidArguments {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(format!("I/O error: {}", err))
    }
}
