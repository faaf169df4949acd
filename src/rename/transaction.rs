use super::integrate::{check_destination, integrate, LibraryPlan};
use super::types::*;
use crate::backup::{BackupError, BackupStore};
use crate::media::{MediaEntity, Transfer};
use crate::progress::Progress;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// How an entity's file is going to be renamed
enum Plan {
    InPlace { to: PathBuf },
    Library(LibraryPlan),
}

enum EntityResult {
    Renamed(RenameOutcome),
    Skipped(SkippedEntity),
    Failed(FailedEntity),
}

fn failed(entity: MediaEntity, stage: RenameStage, error: RenameError) -> EntityResult {
    EntityResult::Failed(FailedEntity {
        entity,
        stage,
        error,
    })
}

/// Renames a batch of reviewed entities, backing each one up first.
///
/// Every entity moves through `Reviewed -> BackedUp -> Renamed`. A failure
/// after the backup was written deletes that backup before the failure is
/// reported. Failures never stop the rest of the batch.
pub struct RenameTransaction<'a> {
    store: &'a BackupStore,
    options: RenameOptions,
}

impl<'a> RenameTransaction<'a> {
    pub fn new(store: &'a BackupStore, options: RenameOptions) -> Self {
        Self { store, options }
    }

    pub fn run<R>(
        &self,
        entities: Vec<MediaEntity>,
        resolver: &mut R,
        progress: &mut Progress,
    ) -> RenameReport
    where
        R: ConflictResolver + ?Sized,
    {
        let mut report = RenameReport::new(self.options.dry_run);
        let mut remembered: Option<ConflictResolution> = None;
        let total = entities.len();

        info!(
            count = total,
            dry_run = self.options.dry_run,
            integrate = self.options.integrate,
            "Starting rename batch"
        );
        progress.rename_start(total, self.options.mode());

        for (i, entity) in entities.into_iter().enumerate() {
            match self.rename_one(entity, &mut remembered, resolver) {
                EntityResult::Renamed(outcome) => {
                    progress.rename_progress(
                        i + 1,
                        total,
                        outcome.entity.old_file_name(),
                        &outcome.entity.new_file_name_with_extension(),
                    );
                    if !outcome.record_synced {
                        progress.warn(&format!(
                            "{}: backup still points at the old location",
                            outcome.entity.backup_identity()
                        ));
                    }
                    report.renamed.push(outcome);
                }
                EntityResult::Skipped(skipped) => {
                    progress.skipped(skipped.entity.new_file_name(), &skipped.reason);
                    report.skipped.push(skipped);
                }
                EntityResult::Failed(failure) => {
                    warn!(
                        name = %failure.entity.new_file_name(),
                        stage = failure.stage.description(),
                        error = %failure.error,
                        "Rename failed"
                    );
                    progress.warn(&format!(
                        "{}: {}",
                        failure.entity.old_file_name(),
                        failure.error
                    ));
                    report.failed.push(failure);
                }
            }
        }

        info!(
            renamed = report.renamed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Rename batch complete"
        );
        progress.rename_complete(report.renamed.len(), self.options.dry_run);

        report
    }

    fn rename_one<R>(
        &self,
        mut entity: MediaEntity,
        remembered: &mut Option<ConflictResolution>,
        resolver: &mut R,
    ) -> EntityResult
    where
        R: ConflictResolver + ?Sized,
    {
        if entity.is_unknown() {
            return failed(entity, RenameStage::Parsed, RenameError::Unrecognized);
        }

        if self.options.is_already_correct(&entity) {
            let name = entity.new_file_name_with_extension();
            return failed(entity, RenameStage::Parsed, RenameError::AlreadyCorrect { name });
        }

        trace!(name = %entity.new_file_name(), stage = "reviewed", "Entity reviewed");

        let plan = match self.plan(&entity) {
            Ok(plan) => plan,
            Err(e) => return failed(entity, RenameStage::Reviewed, e),
        };

        if self.options.dry_run {
            let (to, transfer) = match &plan {
                Plan::InPlace { to } => (to.clone(), Transfer::Renamed),
                Plan::Library(library) => (library.destination(&entity), library.transfer()),
            };
            debug!(to = ?to, "Dry run: planned rename");
            return EntityResult::Renamed(RenameOutcome {
                from: entity.old_absolute_path().to_path_buf(),
                to,
                transfer,
                entity,
                record_synced: true,
            });
        }

        // Reviewed -> BackedUp
        match self.back_up(&mut entity, remembered, resolver) {
            Ok(true) => {}
            Ok(false) => {
                return EntityResult::Skipped(SkippedEntity {
                    reason: format!("a backup named '{}' already exists", entity.backup_identity()),
                    entity,
                })
            }
            Err(e) => return failed(entity, RenameStage::Reviewed, e.into()),
        }

        trace!(key = %entity.backup_identity(), stage = "backed_up", "Entity backed up");

        // BackedUp -> Renamed
        let applied = match &plan {
            Plan::InPlace { to } => self.rename_in_place(&entity, to),
            Plan::Library(library) => integrate(&entity, library, self.options.overwrite),
        };

        let (location, transfer) = match applied {
            Ok(placed) => placed,
            Err(e) => {
                if let Err(cleanup) = self.store.delete(entity.backup_identity()) {
                    warn!(
                        key = %entity.backup_identity(),
                        error = %cleanup,
                        "Failed to remove backup after failed rename"
                    );
                }
                return failed(entity, RenameStage::BackedUp, e);
            }
        };

        entity.record_placement(location.clone(), transfer);
        let record_synced = match self.store.update(&entity) {
            Ok(_) => true,
            Err(e) => {
                // The rename itself succeeded
                warn!(
                    key = %entity.backup_identity(),
                    error = %e,
                    "Failed to record final placement"
                );
                false
            }
        };

        trace!(to = ?location, stage = "renamed", "Entity renamed");

        EntityResult::Renamed(RenameOutcome {
            from: entity.old_absolute_path().to_path_buf(),
            to: location,
            transfer,
            entity,
            record_synced,
        })
    }

    fn plan(&self, entity: &MediaEntity) -> Result<Plan, RenameError> {
        if !self.options.integrate {
            return Ok(Plan::InPlace {
                to: entity.new_absolute_path(),
            });
        }

        let root = self
            .options
            .library_for(entity.kind())
            .ok_or(RenameError::IntegrationRouteMissing {
                kind: entity.kind(),
            })?;

        if !root.is_dir() {
            return Err(RenameError::LibraryUnavailable(root.to_path_buf()));
        }

        // Already in its library directory: only the file name changes
        if entity.old_directory_path() == root.join(entity.new_directory_name()) {
            return Ok(Plan::InPlace {
                to: entity.new_absolute_path(),
            });
        }

        Ok(Plan::Library(LibraryPlan::new(
            entity,
            root,
            self.options.copy,
        )))
    }

    /// Write the entity's backup. `Ok(false)` means the entity is skipped.
    fn back_up<R>(
        &self,
        entity: &mut MediaEntity,
        remembered: &mut Option<ConflictResolution>,
        resolver: &mut R,
    ) -> Result<bool, BackupError>
    where
        R: ConflictResolver + ?Sized,
    {
        match self.store.create(entity) {
            Ok(_) => return Ok(true),
            Err(BackupError::DuplicateKey { key }) => {
                debug!(key = %key, "Backup key conflict");
            }
            Err(e) => return Err(e),
        }

        let resolution = *remembered.get_or_insert_with(|| resolver.resolve(entity));
        debug!(resolution = resolution.description(), "Resolving backup conflict");

        match resolution {
            ConflictResolution::Overwrite => self.store.update(entity).map(|_| true),
            ConflictResolution::Append => self.store.create_append(entity).map(|_| true),
            ConflictResolution::Skip => Ok(false),
        }
    }

    fn rename_in_place(
        &self,
        entity: &MediaEntity,
        to: &Path,
    ) -> Result<(PathBuf, Transfer), RenameError> {
        let from = entity.old_absolute_path();
        check_destination(from, to, self.options.overwrite)?;

        fs::rename(from, to).map_err(|e| RenameError::FilesystemError {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;

        info!(from = ?from, to = ?to, "Renamed");
        Ok((to.to_path_buf(), Transfer::Renamed))
    }
}
