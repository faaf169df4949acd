use super::types::RenameError;
use crate::media::{MediaEntity, Transfer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where an entity goes inside its library
#[derive(Debug, Clone)]
pub(crate) struct LibraryPlan {
    /// `<root>/<old directory>`
    old_directory: PathBuf,
    /// `<root>/<new directory name>`
    new_directory: PathBuf,
    /// The file lives in `old_directory`, so that directory is renamed with it
    inside_library: bool,
    copy: bool,
}

impl LibraryPlan {
    pub(crate) fn new(entity: &MediaEntity, root: &Path, copy: bool) -> Self {
        let old_directory = root.join(entity.old_directory());
        let new_directory = root.join(entity.new_directory_name());
        let inside_library = entity.old_directory_path() == old_directory;

        Self {
            old_directory,
            new_directory,
            inside_library,
            copy,
        }
    }

    pub(crate) fn destination(&self, entity: &MediaEntity) -> PathBuf {
        self.new_directory
            .join(entity.new_file_name_with_extension())
    }

    /// Files from outside the library are copied when asked to; files
    /// already inside it are always moved.
    pub(crate) fn transfer(&self) -> Transfer {
        if self.copy && !self.inside_library {
            Transfer::Copied
        } else {
            Transfer::Moved
        }
    }
}

/// Directory changes made before the file operation, undone if it fails
enum DirectoryChange {
    None,
    Renamed,
    Created,
}

/// Move or copy an entity's file into its library directory.
///
/// The library directory is sorted out first: when the file lives in a
/// library directory under its old name, that directory is renamed; when the
/// new directory does not exist it is created. Old and new directories that
/// both exist and are distinct are a conflict. Two names that resolve to the
/// same directory (case variance) are treated as the new directory, as is an
/// old directory that is already gone because a sibling renamed it.
pub(crate) fn integrate(
    entity: &MediaEntity,
    plan: &LibraryPlan,
    overwrite: bool,
) -> Result<(PathBuf, Transfer), RenameError> {
    let mut source = entity.old_absolute_path().to_path_buf();
    let mut change = DirectoryChange::None;

    if plan.inside_library && plan.old_directory != plan.new_directory {
        if !plan.old_directory.exists() && plan.new_directory.exists() {
            // Renamed earlier in the batch along with a sibling file
            debug!(
                path = ?plan.new_directory,
                "Library directory already renamed"
            );
            source = plan.new_directory.join(source_file_name(entity));
        } else if plan.new_directory.exists() {
            if !same_entry(&plan.old_directory, &plan.new_directory) {
                return Err(RenameError::DirectoryConflict {
                    old: plan.old_directory.clone(),
                    new: plan.new_directory.clone(),
                });
            }
            debug!(
                path = ?plan.new_directory,
                "Library directory differs only by case"
            );
            source = plan.new_directory.join(source_file_name(entity));
        } else {
            fs::rename(&plan.old_directory, &plan.new_directory).map_err(|e| {
                RenameError::FilesystemError {
                    from: plan.old_directory.clone(),
                    to: plan.new_directory.clone(),
                    source: e,
                }
            })?;
            info!(
                from = ?plan.old_directory,
                to = ?plan.new_directory,
                "Renamed library directory"
            );
            source = plan.new_directory.join(source_file_name(entity));
            change = DirectoryChange::Renamed;
        }
    } else if !plan.new_directory.exists() {
        fs::create_dir(&plan.new_directory).map_err(|e| RenameError::FilesystemError {
            from: entity.old_absolute_path().to_path_buf(),
            to: plan.new_directory.clone(),
            source: e,
        })?;
        debug!(path = ?plan.new_directory, "Created library directory");
        change = DirectoryChange::Created;
    }

    let destination = plan.destination(entity);
    let transfer = plan.transfer();

    let result = check_destination(&source, &destination, overwrite).and_then(|_| {
        let outcome = match transfer {
            Transfer::Copied => fs::copy(&source, &destination).map(|_| ()),
            _ => move_file(&source, &destination),
        };
        outcome.map_err(|e| RenameError::FilesystemError {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })
    });

    if let Err(e) = result {
        undo_directory_change(&change, plan);
        return Err(e);
    }

    info!(
        from = ?source,
        to = ?destination,
        transfer = ?transfer,
        "Integrated into library"
    );
    Ok((destination, transfer))
}

fn source_file_name(entity: &MediaEntity) -> String {
    format!("{}{}", entity.old_file_name(), entity.file_extension())
}

fn undo_directory_change(change: &DirectoryChange, plan: &LibraryPlan) {
    let undone = match change {
        DirectoryChange::None => return,
        DirectoryChange::Renamed => fs::rename(&plan.new_directory, &plan.old_directory),
        DirectoryChange::Created => fs::remove_dir(&plan.new_directory),
    };

    if let Err(e) = undone {
        warn!(
            path = ?plan.new_directory,
            error = %e,
            "Failed to undo library directory change"
        );
    }
}

/// An existing destination is only acceptable when it is the source itself
/// (a case-only rename) or when overwriting is allowed.
pub(crate) fn check_destination(
    source: &Path,
    destination: &Path,
    overwrite: bool,
) -> Result<(), RenameError> {
    if !destination.exists() || same_entry(source, destination) {
        return Ok(());
    }

    if overwrite {
        debug!(path = ?destination, "Overwriting existing destination");
        Ok(())
    } else {
        Err(RenameError::DestinationExists(destination.to_path_buf()))
    }
}

/// Rename, falling back to copy and delete across filesystems
pub(crate) fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    let rename_error = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    debug!(from = ?from, error = %rename_error, "Rename failed, copying instead");

    if fs::copy(from, to).is_err() {
        return Err(rename_error);
    }

    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(e);
    }

    Ok(())
}

/// Both paths name the same file or directory
#[cfg(unix)]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x.to_string_lossy().to_lowercase() == y.to_string_lossy().to_lowercase(),
        _ => false,
    }
}
