use crate::media::MediaEntity;
use crate::parser::{classify_stem, NO_VALID_FILES};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// Entities classified from a batch of paths, plus the paths that could not be read
#[derive(Debug, Default)]
pub struct ScanResult {
    pub entities: Vec<MediaEntity>,
    pub failures: Vec<(PathBuf, ScannerError)>,
}

/// Classify a single file from its stem
pub fn classify_file(path: &Path) -> MediaEntity {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entity = MediaEntity::from_draft(path, classify_stem(&stem));
    debug!(path = ?path, kind = ?entity.kind(), "Classified file");
    entity
}

/// Classify every direct child file of a directory.
///
/// Unknown files are dropped. When nothing in the directory is recognized
/// the whole directory becomes a single unknown entity.
pub fn classify_directory(target: &Path) -> Result<Vec<MediaEntity>, ScannerError> {
    debug!(path = ?target, "Scanning directory");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    let mut files = Vec::new();

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        trace!(entry = ?path, "Examining entry");

        if !path.is_file() {
            trace!(path = ?path, "Skipping non-file");
            continue;
        }

        files.push(path);
    }

    sort_naturally(&mut files);

    let entities: Vec<MediaEntity> = files
        .iter()
        .map(|path| classify_file(path))
        .filter(|entity| !entity.is_unknown())
        .collect();

    debug!(count = entities.len(), "Scan complete");

    if entities.is_empty() {
        return Ok(vec![MediaEntity::unknown(target, NO_VALID_FILES, false)]);
    }

    Ok(entities)
}

/// Classify a batch of files and directories in natural order.
///
/// A path that cannot be read is recorded as a failure and the rest of the
/// batch continues.
pub fn classify_paths(paths: &[PathBuf]) -> ScanResult {
    let mut sorted = paths.to_vec();
    sort_naturally(&mut sorted);

    let mut result = ScanResult::default();

    for path in sorted {
        if path.is_dir() {
            match classify_directory(&path) {
                Ok(entities) => result.entities.extend(entities),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to scan directory");
                    result.failures.push((path, e));
                }
            }
        } else if path.is_file() {
            result.entities.push(classify_file(&path));
        } else {
            result.failures.push((path.clone(), ScannerError::PathNotFound(path)));
        }
    }

    result
}

fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
}

/// Compare strings so that embedded numbers sort by value ("2x9" < "2x10").
///
/// Letters compare case-insensitively; exact ties fall back to byte order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b).then_with(|| a.cmp(b))
}
