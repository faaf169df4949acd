use super::types::{BackupError, BackupRecord, BACKUP_EXTENSION, RECORD_VERSION};
use crate::media::MediaEntity;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DATA_SUBDIRECTORY: &str = "cinema-renamer";
const FALLBACK_DIRECTORY: &str = "cinema-renamer-backups";

/// One JSON record file per in-flight rename, keyed by backup identity
#[derive(Debug, Clone)]
pub struct BackupStore {
    directory: PathBuf,
}

impl BackupStore {
    /// Open a store rooted at `directory`, creating it if needed
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self, BackupError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| BackupError::DirectoryUnavailable {
            path: directory.clone(),
            source,
        })?;

        debug!(path = ?directory, "Backup store opened");
        Ok(Self { directory })
    }

    /// Refer to a store without creating its directory
    pub fn at(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// `<data dir>/cinema-renamer/backups`, or a directory under the
    /// working directory when the platform has no data dir
    pub fn default_directory() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(DATA_SUBDIRECTORY).join("backups"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIRECTORY))
    }

    /// Split a record file path into its store and key
    pub fn locate(path: &Path) -> Result<(Self, String), BackupError> {
        let key = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BackupError::InvalidRecord {
                key: path.display().to_string(),
                reason: "not a backup file name".to_string(),
            })?;

        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok((Self { directory }, key))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", key, BACKUP_EXTENSION))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.record_path(key).is_file()
    }

    /// Write a new record under the entity's backup identity.
    ///
    /// Fails with `DuplicateKey` when a record already exists; the existing
    /// record is never touched.
    pub fn create(&self, entity: &MediaEntity) -> Result<PathBuf, BackupError> {
        if entity.is_unknown() {
            return Err(BackupError::Unrecognized);
        }

        let key = entity.backup_identity();
        let bytes = serde_json::to_vec_pretty(&BackupRecord::new(entity))?;
        let path = self.record_path(key);

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(key = %key, "Backup key already taken");
                return Err(BackupError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut writer = BufWriter::new(file);
        if let Err(e) = writer.write_all(&bytes).and_then(|_| writer.flush()) {
            drop(writer);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        info!(key = %key, "Backup created");
        Ok(path)
    }

    /// Create a record, appending "(1)", "(2)", ... to the key until it is free.
    ///
    /// The entity's backup identity is updated to the key actually used.
    pub fn create_append(&self, entity: &mut MediaEntity) -> Result<PathBuf, BackupError> {
        match self.create(entity) {
            Err(BackupError::DuplicateKey { .. }) => {}
            other => return other,
        }

        let mut n = 1;
        loop {
            let candidate = entity.numbered_identity(n);
            if !self.contains(&candidate) {
                entity.set_backup_identity(candidate);
                match self.create(entity) {
                    Err(BackupError::DuplicateKey { .. }) => {}
                    other => return other,
                }
            }
            n += 1;
        }
    }

    /// Overwrite the record at the entity's key, creating it if absent
    pub fn update(&self, entity: &MediaEntity) -> Result<PathBuf, BackupError> {
        if entity.is_unknown() {
            return Err(BackupError::Unrecognized);
        }

        let key = entity.backup_identity();
        let path = self.record_path(key);
        let temp_path = self
            .directory
            .join(format!("{}.{}.tmp", key, BACKUP_EXTENSION));

        let bytes = serde_json::to_vec_pretty(&BackupRecord::new(entity))?;

        // Write then atomically rename; never leave the temp file behind
        let written = File::create(&temp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes)?;
            writer.flush()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&temp_path, &path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!(key = %key, "Backup updated");
        Ok(path)
    }

    /// Read the entity stored under `key`.
    ///
    /// A missing record is `NotFound`; a record that exists but is empty,
    /// unparseable or of another version is `InvalidRecord`.
    pub fn read(&self, key: &str) -> Result<MediaEntity, BackupError> {
        let bytes = match fs::read(self.record_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackupError::NotFound {
                    key: key.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let invalid = |reason: String| BackupError::InvalidRecord {
            key: key.to_string(),
            reason,
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(invalid("record is empty".to_string()));
        }

        let record: BackupRecord = serde_json::from_slice(&bytes)
            .map_err(|e| invalid(format!("invalid JSON: {}", e)))?;

        // Version check
        if record.version != RECORD_VERSION {
            return Err(invalid(format!(
                "version mismatch: expected {}, found {}",
                RECORD_VERSION, record.version
            )));
        }

        debug!(key = %key, "Backup read");
        Ok(record.entity)
    }

    pub fn delete(&self, key: &str) -> Result<(), BackupError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => {
                info!(key = %key, "Backup deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BackupError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Keys of all live records, sorted
    pub fn keys(&self) -> Result<Vec<String>, BackupError> {
        let mut keys = Vec::new();

        if !self.directory.exists() {
            return Ok(keys);
        }

        for entry in fs::read_dir(&self.directory)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Failed to read backup entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let is_record = path
                .extension()
                .is_some_and(|ext| ext == BACKUP_EXTENSION);

            if is_record && path.is_file() {
                if let Some(stem) = path.file_stem() {
                    keys.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
