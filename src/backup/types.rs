use crate::media::MediaEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const RECORD_VERSION: &str = "1.0";

/// Extension of backup record files
pub const BACKUP_EXTENSION: &str = "backup";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Schema version for compatibility
    pub version: String,

    /// When the record was last written
    pub backed_up_at: DateTime<Utc>,

    /// Tool version that wrote this record
    pub tool_version: String,

    /// Snapshot of the entity being renamed
    pub entity: MediaEntity,
}

impl BackupRecord {
    pub fn new(entity: &MediaEntity) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            backed_up_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            entity: entity.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("A backup already exists for '{key}'")]
    DuplicateKey { key: String },

    #[error("No backup found for '{key}'")]
    NotFound { key: String },

    #[error("Invalid backup record '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },

    #[error("Unrecognized files are never backed up")]
    Unrecognized,

    #[error("Backup directory is not usable: {path}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize backup record: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Backup I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
