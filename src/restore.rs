use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backup::{BackupError, BackupStore};
use crate::media::{MediaEntity, Transfer};
use crate::progress::Progress;
use crate::rename::{move_file, same_entry};

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    #[error("File not found: '{}' (expected from previous rename)", .0.display())]
    SourceMissing(PathBuf),

    #[error("Cannot restore: '{}' already exists", .0.display())]
    DestinationOccupied(PathBuf),

    #[error("Failed to restore '{}' to '{}': {source}", .from.display(), .to.display())]
    RenameError {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The file was moved back to its original path
    Restored,
    /// A library copy was removed; the original never moved
    CopyRemoved,
    /// The rename never happened, so only the record was removed
    NothingToRestore,
}

impl RestoreOutcome {
    pub fn description(&self) -> &'static str {
        match self {
            RestoreOutcome::Restored => "restored",
            RestoreOutcome::CopyRemoved => "copy removed",
            RestoreOutcome::NothingToRestore => "nothing to restore",
        }
    }
}

/// A restored (or, in a dry run, planned) record
#[derive(Debug, Clone)]
pub struct RestoredEntity {
    pub key: String,
    pub from: PathBuf,
    pub to: PathBuf,
    pub outcome: RestoreOutcome,
}

#[derive(Debug, Default)]
pub struct RestoreReport {
    pub restored: Vec<RestoredEntity>,
    pub failed: Vec<(String, RestoreError)>,
    pub dry_run: bool,
}

impl RestoreReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Reverses renames recorded in a backup store.
///
/// A record is deleted only after its file is back in place; a failed
/// restore keeps the record so it can be retried.
pub struct RestoreTransaction<'a> {
    store: &'a BackupStore,
    options: RestoreOptions,
}

impl<'a> RestoreTransaction<'a> {
    pub fn new(store: &'a BackupStore, options: RestoreOptions) -> Self {
        Self { store, options }
    }

    /// Read a record without touching anything
    pub fn inspect(&self, key: &str) -> Result<MediaEntity, RestoreError> {
        Ok(self.store.read(key)?)
    }

    pub fn restore(&self, key: &str) -> Result<RestoredEntity, RestoreError> {
        let entity = self.store.read(key)?;
        let current = entity.current_path();
        let original = entity.old_absolute_path().to_path_buf();

        debug!(key = %key, from = ?current, to = ?original, "Restoring");

        let outcome = if entity.transfer() == Some(Transfer::Copied) && original.exists() {
            self.remove_copy(&current)?
        } else {
            self.move_back(&current, &original)?
        };

        if !self.options.dry_run {
            self.store.delete(key)?;
            info!(key = %key, outcome = outcome.description(), "Restore complete");
        }

        Ok(RestoredEntity {
            key: key.to_string(),
            from: current,
            to: original,
            outcome,
        })
    }

    /// Restore every key, continuing past failures
    pub fn restore_all(&self, keys: &[String], progress: &mut Progress) -> RestoreReport {
        let mut report = RestoreReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };
        let total = keys.len();

        progress.restore_start(total);

        for (i, key) in keys.iter().enumerate() {
            match self.restore(key) {
                Ok(restored) => {
                    progress.restore_progress(
                        i + 1,
                        total,
                        &file_name(&restored.from),
                        &file_name(&restored.to),
                    );
                    report.restored.push(restored);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Restore failed");
                    progress.warn(&format!("{}: {}", key, e));
                    report.failed.push((key.clone(), e));
                }
            }
        }

        progress.restore_complete(report.restored.len(), self.options.dry_run);

        report
    }

    fn remove_copy(&self, current: &Path) -> Result<RestoreOutcome, RestoreError> {
        if !current.exists() {
            debug!(path = ?current, "Library copy already gone");
            return Ok(RestoreOutcome::NothingToRestore);
        }

        if !self.options.dry_run {
            fs::remove_file(current).map_err(|e| RestoreError::RenameError {
                from: current.to_path_buf(),
                to: current.to_path_buf(),
                source: e,
            })?;
            remove_if_empty(current.parent());
        }

        Ok(RestoreOutcome::CopyRemoved)
    }

    fn move_back(&self, current: &Path, original: &Path) -> Result<RestoreOutcome, RestoreError> {
        if !current.exists() {
            // Interrupted between backup and rename
            if original.exists() {
                debug!(path = ?original, "Original still in place");
                return Ok(RestoreOutcome::NothingToRestore);
            }
            return Err(RestoreError::SourceMissing(current.to_path_buf()));
        }

        if original.exists() && !same_entry(current, original) {
            return Err(RestoreError::DestinationOccupied(original.to_path_buf()));
        }

        if self.options.dry_run {
            return Ok(RestoreOutcome::Restored);
        }

        let to_error = |e: std::io::Error| RestoreError::RenameError {
            from: current.to_path_buf(),
            to: original.to_path_buf(),
            source: e,
        };

        if let Some(parent) = original.parent() {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        move_file(current, original).map_err(to_error)?;

        if current.parent() != original.parent() {
            remove_if_empty(current.parent());
        }

        info!(from = ?current, to = ?original, "Restored");
        Ok(RestoreOutcome::Restored)
    }
}

/// Remove a directory left empty by a restore
fn remove_if_empty(directory: Option<&Path>) {
    let Some(directory) = directory else { return };

    let is_empty = fs::read_dir(directory)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);

    if is_empty {
        match fs::remove_dir(directory) {
            Ok(()) => debug!(path = ?directory, "Removed empty directory"),
            Err(e) => debug!(path = ?directory, error = %e, "Could not remove directory"),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::{ConflictResolution, Libraries, RenameOptions, RenameTransaction};
    use crate::scanner::classify_file;
    use tempfile::tempdir;

    fn rename(store: &BackupStore, path: &Path, options: RenameOptions) -> String {
        let entity = classify_file(path);
        let report = RenameTransaction::new(store, options).run(
            vec![entity],
            &mut ConflictResolution::Skip,
            &mut Progress::silent(),
        );
        assert_eq!(report.renamed.len(), 1, "{:?}", report.failed);
        report.renamed[0].entity.backup_identity().to_string()
    }

    #[test]
    fn test_restore_in_place_rename() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let restored = tx.restore(&key).unwrap();

        assert_eq!(restored.outcome, RestoreOutcome::Restored);
        assert!(file.exists());
        assert!(!dir.path().join("Heat (1995).mkv").exists());
        assert!(!store.contains(&key));
    }

    #[test]
    fn test_restore_twice_is_not_found() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        tx.restore(&key).unwrap();

        let again = tx.restore(&key);
        assert!(matches!(
            again,
            Err(RestoreError::Backup(BackupError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_occupied_destination_keeps_record() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());
        fs::write(&file, "someone else").unwrap();

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let result = tx.restore(&key);

        assert!(matches!(result, Err(RestoreError::DestinationOccupied(_))));
        assert!(store.contains(&key));
        assert!(dir.path().join("Heat (1995).mkv").exists());
    }

    #[test]
    fn test_missing_file_keeps_record() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());
        fs::remove_file(dir.path().join("Heat (1995).mkv")).unwrap();

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let result = tx.restore(&key);

        assert!(matches!(result, Err(RestoreError::SourceMissing(_))));
        assert!(store.contains(&key));
    }

    #[test]
    fn test_interrupted_rename_restores_nothing() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();

        // Backup written, rename never ran
        let entity = classify_file(&file);
        store.create(&entity).unwrap();

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let restored = tx.restore(entity.backup_identity()).unwrap();

        assert_eq!(restored.outcome, RestoreOutcome::NothingToRestore);
        assert!(file.exists());
        assert!(!store.contains(entity.backup_identity()));
    }

    #[test]
    fn test_restore_copied_file_removes_copy() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let downloads = dir.path().join("downloads");
        let movies = dir.path().join("movies");
        fs::create_dir(&downloads).unwrap();
        fs::create_dir(&movies).unwrap();
        let file = downloads.join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();

        let options = RenameOptions {
            libraries: Libraries {
                movies: Some(movies.clone()),
                shows: None,
            },
            integrate: true,
            copy: true,
            ..Default::default()
        };
        let key = rename(&store, &file, options);
        let copy = movies.join("Heat (1995)").join("Heat (1995).mkv");
        assert!(copy.exists());

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let restored = tx.restore(&key).unwrap();

        assert_eq!(restored.outcome, RestoreOutcome::CopyRemoved);
        assert!(!copy.exists());
        assert!(!movies.join("Heat (1995)").exists());
        assert!(file.exists());
    }

    #[test]
    fn test_restore_moved_file_recreates_directory() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let movies = dir.path().join("movies");
        let old_dir = movies.join("heat");
        fs::create_dir_all(&old_dir).unwrap();
        let file = old_dir.join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();

        let options = RenameOptions {
            libraries: Libraries {
                movies: Some(movies.clone()),
                shows: None,
            },
            integrate: true,
            ..Default::default()
        };
        let key = rename(&store, &file, options);
        assert!(!old_dir.exists());

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        tx.restore(&key).unwrap();

        assert!(file.exists());
        assert!(!movies.join("Heat (1995)").exists());
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());

        let tx = RestoreTransaction::new(&store, RestoreOptions { dry_run: true });
        let restored = tx.restore(&key).unwrap();

        assert_eq!(restored.outcome, RestoreOutcome::Restored);
        assert!(!file.exists());
        assert!(store.contains(&key));
    }

    #[test]
    fn test_restore_all_continues_past_failures() {
        let dir = tempdir().unwrap();
        let store = BackupStore::open(dir.path().join("backups")).unwrap();
        let file = dir.path().join("Heat.1995.mkv");
        fs::write(&file, "heat").unwrap();
        let key = rename(&store, &file, RenameOptions::default());

        let tx = RestoreTransaction::new(&store, RestoreOptions::default());
        let report = tx.restore_all(
            &["missing".to_string(), key],
            &mut Progress::silent(),
        );

        assert_eq!(report.restored.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.has_failures());
        assert!(file.exists());
    }
}
