use crate::backup::BackupError;
use crate::media::{MediaEntity, Transfer};
use crate::parser::MediaKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Library root directories, one per media kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Libraries {
    pub movies: Option<PathBuf>,
    pub shows: Option<PathBuf>,
}

impl Libraries {
    pub fn route(&self, kind: MediaKind) -> Option<&Path> {
        match kind {
            MediaKind::Movie => self.movies.as_deref(),
            MediaKind::Show => self.shows.as_deref(),
            MediaKind::Unknown => None,
        }
    }

    /// Both libraries are configured
    pub fn is_complete(&self) -> bool {
        self.movies.is_some() && self.shows.is_some()
    }
}

/// Options for a rename batch
#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub libraries: Libraries,
    /// Move or copy files into their library instead of renaming in place
    pub integrate: bool,
    /// Copy files from outside the library instead of moving them
    pub copy: bool,
    /// Replace an existing file at the destination
    pub overwrite: bool,
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            libraries: Libraries::default(),
            integrate: false,
            copy: true,
            overwrite: false,
            dry_run: false,
        }
    }
}

impl RenameOptions {
    /// Library the entity is integrated into, if integration is on
    pub fn library_for(&self, kind: MediaKind) -> Option<&Path> {
        if self.integrate {
            self.libraries.route(kind)
        } else {
            None
        }
    }

    pub fn mode(&self) -> &'static str {
        match (self.integrate, self.copy) {
            (true, true) => "copy into libraries",
            (true, false) => "move into libraries",
            (false, _) => "in place",
        }
    }

    /// Where the entity's file ends up when renamed with these options
    pub fn destination_for(&self, entity: &MediaEntity) -> PathBuf {
        match self.library_for(entity.kind()) {
            Some(root) => root
                .join(entity.new_directory_name())
                .join(entity.new_file_name_with_extension()),
            None => entity.new_absolute_path(),
        }
    }

    /// An entity needs no work when its file name is already correct and,
    /// when integrating, it already sits in `<library>/<new directory name>`.
    ///
    /// In place, only the file is renamed, so the file name alone decides.
    pub fn is_already_correct(&self, entity: &MediaEntity) -> bool {
        if entity.is_unknown() || !entity.has_correct_file_name() {
            return false;
        }

        match self.library_for(entity.kind()) {
            Some(root) => entity.old_directory_path() == root.join(entity.new_directory_name()),
            None if self.integrate => entity.has_correct_directory_name(),
            None => true,
        }
    }
}

/// What to do when an entity's backup key is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Replace the existing record
    Overwrite,
    /// Store under a disambiguated key
    Append,
    /// Leave this entity untouched
    Skip,
}

impl ConflictResolution {
    pub fn description(&self) -> &'static str {
        match self {
            ConflictResolution::Overwrite => "overwrite",
            ConflictResolution::Append => "append",
            ConflictResolution::Skip => "skip",
        }
    }
}

/// Decides how a backup key conflict is handled.
///
/// Asked at most once per batch; the answer applies to every later conflict.
pub trait ConflictResolver {
    fn resolve(&mut self, entity: &MediaEntity) -> ConflictResolution;
}

impl ConflictResolver for ConflictResolution {
    fn resolve(&mut self, _entity: &MediaEntity) -> ConflictResolution {
        *self
    }
}

impl<F> ConflictResolver for F
where
    F: FnMut(&MediaEntity) -> ConflictResolution,
{
    fn resolve(&mut self, entity: &MediaEntity) -> ConflictResolution {
        self(entity)
    }
}

/// Where an entity was when its rename stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStage {
    Parsed,
    Reviewed,
    BackedUp,
}

impl RenameStage {
    pub fn description(&self) -> &'static str {
        match self {
            RenameStage::Parsed => "parsed",
            RenameStage::Reviewed => "reviewed",
            RenameStage::BackedUp => "backed up",
        }
    }
}

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("'{name}' is already correctly named")]
    AlreadyCorrect { name: String },

    #[error("Unrecognized files cannot be renamed")]
    Unrecognized,

    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Library directories '{}' and '{}' both exist", .old.display(), .new.display())]
    DirectoryConflict { old: PathBuf, new: PathBuf },

    #[error("No library is configured for {} files", .kind.description())]
    IntegrationRouteMissing { kind: MediaKind },

    #[error("Library directory is unavailable: {}", .0.display())]
    LibraryUnavailable(PathBuf),

    #[error("Failed to rename '{}' to '{}': {source}", .from.display(), .to.display())]
    FilesystemError {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenameError {
    /// Destination or directory collisions that overwriting or renaming could resolve
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RenameError::DestinationExists(_) | RenameError::DirectoryConflict { .. }
        )
    }
}

/// A completed (or, in a dry run, planned) rename
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub entity: MediaEntity,
    pub from: PathBuf,
    pub to: PathBuf,
    pub transfer: Transfer,
    /// False when the record still holds the pre-rename path
    pub record_synced: bool,
}

#[derive(Debug, Clone)]
pub struct SkippedEntity {
    pub entity: MediaEntity,
    pub reason: String,
}

#[derive(Debug)]
pub struct FailedEntity {
    pub entity: MediaEntity,
    /// Last stage reached before the failure
    pub stage: RenameStage,
    pub error: RenameError,
}

/// Per-entity results of a rename batch
#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<RenameOutcome>,
    pub skipped: Vec<SkippedEntity>,
    pub failed: Vec<FailedEntity>,
    pub dry_run: bool,
}

impl RenameReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Renames whose backup record could not be updated with the final placement
    pub fn unsynced(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.renamed.iter().filter(|outcome| !outcome.record_synced)
    }

    pub fn len(&self) -> usize {
        self.renamed.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
