//! Configuration from the environment (and `.env`) merged with CLI flags.
//!
//! The rename core never reads configuration itself; it receives the
//! [`RenameOptions`] built here.

use crate::backup::BackupStore;
use crate::cli::Args;
use crate::rename::{Libraries, RenameOptions};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub const ENV_MOVIES: &str = "CINEMA_RENAMER_MOVIES";
pub const ENV_SHOWS: &str = "CINEMA_RENAMER_SHOWS";
pub const ENV_COPY: &str = "CINEMA_RENAMER_COPY";
pub const ENV_OVERWRITE: &str = "CINEMA_RENAMER_OVERWRITE";
pub const ENV_BACKUP_DIR: &str = "CINEMA_RENAMER_BACKUP_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{name} must be a boolean (true/false, yes/no, on/off, 1/0), got '{value}'")]
    InvalidBoolean { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub libraries: Libraries,
    pub copy: bool,
    pub overwrite: bool,
    pub backup_dir: Option<PathBuf>,
    /// Rename in place even when both libraries are configured
    pub rename_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            libraries: Libraries::default(),
            copy: true,
            overwrite: false,
            backup_dir: None,
            rename_only: false,
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidBoolean {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn env_bool(name: &str, default: bool) -> Result<bool, SettingsError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_bool(name, &value),
        _ => Ok(default),
    }
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file in the
    /// working directory.
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Self {
            libraries: Libraries {
                movies: env_path(ENV_MOVIES),
                shows: env_path(ENV_SHOWS),
            },
            copy: env_bool(ENV_COPY, defaults.copy)?,
            overwrite: env_bool(ENV_OVERWRITE, defaults.overwrite)?,
            backup_dir: env_path(ENV_BACKUP_DIR),
            rename_only: false,
        };
        debug!(?settings, "Settings loaded from environment");
        Ok(settings)
    }

    /// Override with whatever was given on the command line
    pub fn merge_args(mut self, args: &Args) -> Self {
        if let Some(movies) = &args.movies {
            self.libraries.movies = Some(movies.clone());
        }
        if let Some(shows) = &args.shows {
            self.libraries.shows = Some(shows.clone());
        }
        if let Some(copy) = args.copy_flag() {
            self.copy = copy;
        }
        if let Some(overwrite) = args.overwrite_flag() {
            self.overwrite = overwrite;
        }
        if let Some(dir) = &args.backup_dir {
            self.backup_dir = Some(dir.clone());
        }
        self.rename_only |= args.rename_only;
        self
    }

    /// Files are integrated into libraries only when both are configured
    pub fn integrates(&self) -> bool {
        !self.rename_only && self.libraries.is_complete()
    }

    pub fn rename_options(&self, dry_run: bool) -> RenameOptions {
        RenameOptions {
            libraries: self.libraries.clone(),
            integrate: self.integrates(),
            copy: self.copy,
            overwrite: self.overwrite,
            dry_run,
        }
    }

    pub fn backup_directory(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(BackupStore::default_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;

    // Mutex to serialize env var tests (they share global state)
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for name in [ENV_MOVIES, ENV_SHOWS, ENV_COPY, ENV_OVERWRITE, ENV_BACKUP_DIR] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_from_env_defaults() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        let settings = Settings::from_env().unwrap();

        assert_eq!(settings, Settings::default());
        assert!(settings.copy);
        assert!(!settings.overwrite);
        assert!(!settings.integrates());
    }

    #[test]
    fn test_from_env_with_values() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(ENV_MOVIES, "/library/movies");
        env::set_var(ENV_SHOWS, "/library/shows");
        env::set_var(ENV_COPY, "off");
        env::set_var(ENV_OVERWRITE, "Yes");
        env::set_var(ENV_BACKUP_DIR, "/var/backups");

        let settings = Settings::from_env().unwrap();

        assert_eq!(settings.libraries.movies, Some(PathBuf::from("/library/movies")));
        assert!(!settings.copy);
        assert!(settings.overwrite);
        assert!(settings.integrates());
        assert_eq!(settings.backup_directory(), PathBuf::from("/var/backups"));

        clear_env();
    }

    #[test]
    fn test_from_env_invalid_boolean() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(ENV_COPY, "sometimes");
        let result = Settings::from_env();
        clear_env();

        assert_eq!(
            result,
            Err(SettingsError::InvalidBoolean {
                name: ENV_COPY.to_string(),
                value: "sometimes".to_string(),
            })
        );
    }

    #[test]
    fn test_args_override_env() {
        let settings = Settings {
            libraries: Libraries {
                movies: Some(PathBuf::from("/env/movies")),
                shows: Some(PathBuf::from("/env/shows")),
            },
            ..Default::default()
        };
        let args = Args::try_parse_from([
            "cinema-renamer",
            "--movies",
            "/cli/movies",
            "--move",
            "--overwrite",
            "/downloads",
        ])
        .unwrap();

        let merged = settings.merge_args(&args);

        assert_eq!(merged.libraries.movies, Some(PathBuf::from("/cli/movies")));
        assert_eq!(merged.libraries.shows, Some(PathBuf::from("/env/shows")));
        assert!(!merged.copy);
        assert!(merged.overwrite);

        let options = merged.rename_options(true);
        assert!(options.integrate);
        assert!(options.dry_run);
    }

    #[test]
    fn test_rename_only_or_partial_libraries_stay_in_place() {
        let partial = Settings {
            libraries: Libraries {
                movies: Some(PathBuf::from("/library/movies")),
                shows: None,
            },
            ..Default::default()
        };
        assert!(!partial.integrates());

        let args = Args::try_parse_from([
            "cinema-renamer",
            "--rename-only",
            "--shows",
            "/library/shows",
            "/downloads",
        ])
        .unwrap();
        let merged = partial.merge_args(&args);
        assert!(merged.libraries.is_complete());
        assert!(!merged.integrates());
    }
}
