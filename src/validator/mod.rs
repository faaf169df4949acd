mod types;

pub use types::*;

use crate::backup::BACKUP_EXTENSION;
use crate::media::MediaEntity;
use crate::rename::RenameOptions;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Route command line paths to classification or restore.
///
/// Paths must be absolute and exist. Files carrying the backup extension go
/// to restore; every other file or directory is classified. Invalid paths
/// are reported and skipped; it is an error only when none are valid.
pub fn validate_arguments(paths: &[PathBuf]) -> Result<ValidatedArguments, ValidationError> {
    if paths.is_empty() {
        return Err(ValidationError::NoArguments);
    }

    info!("Validating {} arguments", paths.len());

    let mut validated = ValidatedArguments::default();

    for path in paths {
        let reason = if !path.is_absolute() {
            Some(InvalidReason::NotAbsolute)
        } else if !path.exists() {
            Some(InvalidReason::NotFound)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(path = ?path, reason = %reason, "Rejected argument");
            validated.invalid.push(InvalidArgument {
                path: path.clone(),
                reason,
            });
            continue;
        }

        let is_backup = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == BACKUP_EXTENSION);

        if is_backup {
            debug!(path = ?path, "Backup argument");
            validated.backups.push(path.clone());
        } else {
            debug!(path = ?path, "Media argument");
            validated.media.push(path.clone());
        }
    }

    if !validated.has_media() && !validated.has_backups() {
        warn!(count = validated.invalid.len(), "No valid arguments");
        return Err(ValidationError::NoValidArguments {
            invalid: validated.invalid,
        });
    }

    Ok(validated)
}

/// Split a classified batch into renamable, already-correct and unknown entities
pub fn partition_entities(entities: Vec<MediaEntity>, options: &RenameOptions) -> Partition {
    let mut partition = Partition::default();

    for entity in entities {
        if entity.is_unknown() {
            partition.unknown.push(entity);
        } else if options.is_already_correct(&entity) {
            debug!(name = %entity.new_file_name(), "Already correct");
            partition.already_correct.push(entity);
        } else {
            partition.renamable.push(entity);
        }
    }

    info!(
        renamable = partition.renamable.len(),
        already_correct = partition.already_correct.len(),
        unknown = partition.unknown.len(),
        "Batch partitioned"
    );

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::Libraries;
    use crate::scanner::classify_file;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_routes_media_and_backups() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("Heat.1995.mkv");
        let backup = dir.path().join("Heat (1995).Heat (1995).mkv.backup");
        fs::write(&media, "").unwrap();
        fs::write(&backup, "{}").unwrap();

        let validated = validate_arguments(&[media.clone(), backup.clone(), dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(validated.media, vec![media, dir.path().to_path_buf()]);
        assert_eq!(validated.backups, vec![backup]);
        assert!(validated.invalid.is_empty());
    }

    #[test]
    fn test_invalid_arguments_reported_and_skipped() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("Heat.1995.mkv");
        fs::write(&media, "").unwrap();

        let validated = validate_arguments(&[
            media.clone(),
            PathBuf::from("relative/path.mkv"),
            dir.path().join("missing.mkv"),
        ])
        .unwrap();

        assert_eq!(validated.media, vec![media]);
        assert_eq!(validated.invalid.len(), 2);
        assert_eq!(validated.invalid[0].reason, InvalidReason::NotAbsolute);
        assert_eq!(validated.invalid[1].reason, InvalidReason::NotFound);
    }

    #[test]
    fn test_no_valid_arguments() {
        let result = validate_arguments(&[PathBuf::from("relative.mkv")]);
        assert!(matches!(
            result,
            Err(ValidationError::NoValidArguments { .. })
        ));
    }

    #[test]
    fn test_no_arguments() {
        let result = validate_arguments(&[]);
        assert!(matches!(result, Err(ValidationError::NoArguments)));
    }

    #[test]
    fn test_error_message_lists_paths() {
        let err = validate_arguments(&[PathBuf::from("relative.mkv")]).unwrap_err();
        let msg = err.format_error_message();

        assert!(msg.contains("relative.mkv"));
        assert!(msg.contains("not an absolute path"));
    }

    #[test]
    fn test_partition_in_place() {
        let entities = vec![
            classify_file(Path::new("/downloads/Heat.1995.mkv")),
            classify_file(Path::new("/downloads/Heat (1995).mkv")),
            classify_file(Path::new("/downloads/notes.txt")),
        ];

        let partition = partition_entities(entities, &RenameOptions::default());

        assert_eq!(partition.renamable.len(), 1);
        assert_eq!(partition.already_correct.len(), 1);
        assert_eq!(partition.unknown.len(), 1);
    }

    #[test]
    fn test_partition_with_library_requires_placement() {
        let options = RenameOptions {
            libraries: Libraries {
                movies: Some(PathBuf::from("/library/movies")),
                shows: Some(PathBuf::from("/library/shows")),
            },
            integrate: true,
            ..Default::default()
        };

        let outside = classify_file(Path::new("/downloads/Heat (1995)/Heat (1995).mkv"));
        let inside = classify_file(Path::new("/library/movies/Heat (1995)/Heat (1995).mkv"));

        let partition = partition_entities(vec![outside, inside], &options);

        assert_eq!(partition.renamable.len(), 1);
        assert_eq!(
            partition.renamable[0].old_directory_path(),
            Path::new("/downloads/Heat (1995)")
        );
        assert_eq!(partition.already_correct.len(), 1);
    }
}
