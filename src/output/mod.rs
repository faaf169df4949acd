use crate::media::{MediaEntity, Transfer};
use crate::rename::{RenameOptions, RenameOutcome, RenameReport};
use crate::restore::RestoreReport;
use crate::validator::Partition;
use std::io::{self, Write};
use std::path::Path;

fn transfer_verb(transfer: Transfer, dry_run: bool) -> &'static str {
    match (transfer, dry_run) {
        (Transfer::Renamed, false) => "renamed",
        (Transfer::Moved, false) => "moved",
        (Transfer::Copied, false) => "copied",
        (Transfer::Renamed, true) => "rename",
        (Transfer::Moved, true) => "move",
        (Transfer::Copied, true) => "copy",
    }
}

fn source_name(entity: &MediaEntity) -> String {
    format!("{}{}", entity.old_file_name(), entity.file_extension())
}

/// Display the entities that will not be renamed: unrecognized ones and
/// ones whose names (and library placement) are already correct
pub fn display_partition(partition: &Partition, writer: &mut impl Write) -> io::Result<()> {
    if !partition.unknown.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Unrecognized ({}):", partition.unknown.len())?;
        for entity in &partition.unknown {
            writeln!(
                writer,
                "  - {} ({})",
                entity.old_absolute_path().display(),
                entity.unknown_reason().unwrap_or_default()
            )?;
        }
    }

    if !partition.already_correct.is_empty() {
        writeln!(writer)?;
        writeln!(
            writer,
            "Already correct ({}):",
            partition.already_correct.len()
        )?;
        for entity in &partition.already_correct {
            writeln!(writer, "  - {}", source_name(entity))?;
        }
    }

    Ok(())
}

/// Display the numbered list of renames awaiting review
pub fn display_renamable(
    entities: &[MediaEntity],
    options: &RenameOptions,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "To rename ({}):", entities.len())?;
    writeln!(writer)?;

    for (i, entity) in entities.iter().enumerate() {
        writeln!(writer, "  {}. [{}] {}", i + 1, entity.kind().description(), source_name(entity))?;
        writeln!(
            writer,
            "     -> {}",
            options.destination_for(entity).display()
        )?;
    }

    Ok(())
}

/// Display dry run results in a formatted output
pub fn display_dry_run(report: &RenameReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              DRY RUN")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;
    writeln!(writer, "Operations: {}", report.renamed.len())?;
    writeln!(writer)?;

    if report.renamed.is_empty() {
        writeln!(writer, "No files to rename.")?;
    } else {
        writeln!(writer, "Planned changes:")?;
        writeln!(writer)?;

        for (i, outcome) in report.renamed.iter().enumerate() {
            writeln!(
                writer,
                "  {}. [{}]",
                i + 1,
                transfer_verb(outcome.transfer, true)
            )?;
            writeln!(writer, "     From: {}", outcome.from.display())?;
            writeln!(writer, "     To:   {}", outcome.to.display())?;
            writeln!(writer)?;
        }
    }

    display_failures(report, writer)?;

    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} files would be renamed", report.renamed.len())?;
    if !report.failed.is_empty() {
        writeln!(writer, "  {} files would fail", report.failed.len())?;
    }
    writeln!(writer)?;
    writeln!(writer, "Run without --dry to apply these changes.")?;

    Ok(())
}

fn display_failures(report: &RenameReport, writer: &mut impl Write) -> io::Result<()> {
    if !report.skipped.is_empty() {
        writeln!(writer, "Skipped ({}):", report.skipped.len())?;
        for skipped in &report.skipped {
            writeln!(
                writer,
                "  - {} ({})",
                source_name(&skipped.entity),
                skipped.reason
            )?;
        }
        writeln!(writer)?;
    }

    if !report.failed.is_empty() {
        writeln!(writer, "Failed ({}):", report.failed.len())?;
        for failure in &report.failed {
            writeln!(
                writer,
                "  - {} [{}]: {}",
                source_name(&failure.entity),
                failure.stage.description(),
                failure.error
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Display execution results (non-dry-run)
pub fn display_rename_result(report: &RenameReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Renamed {} files.", report.renamed.len())?;
    for outcome in &report.renamed {
        writeln!(
            writer,
            "  {} {} -> {}",
            transfer_verb(outcome.transfer, false),
            source_name(&outcome.entity),
            outcome.to.display()
        )?;
    }
    writeln!(writer)?;

    let unsynced: Vec<&RenameOutcome> = report.unsynced().collect();
    if !unsynced.is_empty() {
        writeln!(writer, "Backups not updated ({}):", unsynced.len())?;
        for outcome in unsynced {
            writeln!(
                writer,
                "  {} (restore expects the file at {})",
                outcome.entity.backup_identity(),
                outcome.entity.new_absolute_path().display()
            )?;
        }
        writeln!(writer)?;
    }

    display_failures(report, writer)
}

/// Display the records about to be restored
pub fn display_restore_plan(
    records: &[(String, MediaEntity)],
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "To restore ({}):", records.len())?;
    writeln!(writer)?;

    for (i, (key, entity)) in records.iter().enumerate() {
        writeln!(writer, "  {}. {}", i + 1, key)?;
        writeln!(writer, "     From: {}", entity.current_path().display())?;
        writeln!(writer, "     To:   {}", entity.old_absolute_path().display())?;
    }

    Ok(())
}

/// Display restore results
pub fn display_restore_result(report: &RestoreReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    if report.dry_run {
        writeln!(writer, "{} records would be restored.", report.restored.len())?;
    } else {
        writeln!(writer, "Restored {} records.", report.restored.len())?;
    }

    for restored in &report.restored {
        writeln!(
            writer,
            "  {} ({})",
            restored.to.display(),
            restored.outcome.description()
        )?;
    }

    if report.has_failures() {
        writeln!(writer)?;
        writeln!(writer, "Failed ({}):", report.failed.len())?;
        for (key, error) in &report.failed {
            writeln!(writer, "  - {}: {}", key, error)?;
        }
    }

    Ok(())
}

/// Display the keys of live backup records
pub fn display_backup_keys(
    directory: &Path,
    keys: &[String],
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "Backups in {}:", directory.display())?;

    if keys.is_empty() {
        writeln!(writer, "  (none)")?;
        return Ok(());
    }

    for key in keys {
        writeln!(writer, "  {}", key)?;
    }

    Ok(())
}
