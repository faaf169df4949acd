use crate::rename::ConflictResolution;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Backup conflict policy accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnConflict {
    Overwrite,
    Append,
    Skip,
}

impl From<OnConflict> for ConflictResolution {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Overwrite => ConflictResolution::Overwrite,
            OnConflict::Append => ConflictResolution::Append,
            OnConflict::Skip => ConflictResolution::Skip,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cinema-renamer")]
#[command(author, version, long_about = None)]
#[command(about = "Rename movie and TV episode files and file them into libraries")]
pub struct Args {
    /// Absolute paths of media files, directories or `.backup` records to restore
    #[arg(required_unless_present = "list_backups")]
    pub paths: Vec<PathBuf>,

    /// Simulate changes without modifying the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Movies library root
    #[arg(long, value_name = "DIR")]
    pub movies: Option<PathBuf>,

    /// TV shows library root
    #[arg(long, value_name = "DIR")]
    pub shows: Option<PathBuf>,

    /// Copy files into the library, leaving the originals in place
    #[arg(long, conflicts_with = "move_files")]
    pub copy: bool,

    /// Move files into the library
    #[arg(long = "move", conflicts_with = "copy")]
    pub move_files: bool,

    /// Replace files already present at the destination
    #[arg(long, conflicts_with = "no_overwrite")]
    pub overwrite: bool,

    /// Never replace files at the destination
    #[arg(long, conflicts_with = "overwrite")]
    pub no_overwrite: bool,

    /// How to handle an existing backup with the same name
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_conflict: Option<OnConflict>,

    /// Rename in place even when libraries are configured
    #[arg(long)]
    pub rename_only: bool,

    /// Directory holding backup records
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// List stored backup records and exit
    #[arg(long)]
    pub list_backups: bool,
}

impl Args {
    /// `Some(true)` for `--copy`, `Some(false)` for `--move`
    pub fn copy_flag(&self) -> Option<bool> {
        match (self.copy, self.move_files) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// `Some(true)` for `--overwrite`, `Some(false)` for `--no-overwrite`
    pub fn overwrite_flag(&self) -> Option<bool> {
        match (self.overwrite, self.no_overwrite) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths_and_flags() {
        let args = Args::try_parse_from([
            "cinema-renamer",
            "--dry",
            "-vv",
            "--movies",
            "/library/movies",
            "--move",
            "--on-conflict",
            "append",
            "/downloads/Heat.1995.mkv",
            "/downloads/shows",
        ])
        .unwrap();

        assert!(args.dry);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.movies, Some(PathBuf::from("/library/movies")));
        assert_eq!(args.copy_flag(), Some(false));
        assert_eq!(args.overwrite_flag(), None);
        assert_eq!(args.on_conflict, Some(OnConflict::Append));
        assert_eq!(args.paths.len(), 2);
    }

    #[test]
    fn test_paths_required_unless_listing() {
        assert!(Args::try_parse_from(["cinema-renamer"]).is_err());

        let args = Args::try_parse_from(["cinema-renamer", "--list-backups"]).unwrap();
        assert!(args.list_backups);
        assert!(args.paths.is_empty());
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(Args::try_parse_from(["cinema-renamer", "--copy", "--move", "/a"]).is_err());
        assert!(
            Args::try_parse_from(["cinema-renamer", "--overwrite", "--no-overwrite", "/a"])
                .is_err()
        );
    }

    #[test]
    fn test_on_conflict_conversion() {
        assert_eq!(
            ConflictResolution::from(OnConflict::Overwrite),
            ConflictResolution::Overwrite
        );
        assert_eq!(ConflictResolution::from(OnConflict::Skip), ConflictResolution::Skip);
    }
}
