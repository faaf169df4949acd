use cinema_renamer::backup::BackupStore;
use cinema_renamer::cli::Args;
use cinema_renamer::error::AppError;
use cinema_renamer::logging;
use cinema_renamer::media::MediaEntity;
use cinema_renamer::output::{
    display_backup_keys, display_dry_run, display_partition, display_renamable,
    display_rename_result, display_restore_plan, display_restore_result,
};
use cinema_renamer::progress::Progress;
use cinema_renamer::rename::{ConflictResolution, RenameOptions, RenameTransaction};
use cinema_renamer::restore::{RestoreOptions, RestoreReport, RestoreTransaction};
use cinema_renamer::scanner::classify_paths;
use cinema_renamer::settings::Settings;
use cinema_renamer::ui::{ReviewChoice, Ui, UiConfig};
use cinema_renamer::validator::{partition_entities, validate_arguments};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let settings = Settings::from_env()?.merge_args(&args);
    debug!(?settings, "Effective settings");

    let verbose = args.verbose > 0;
    let ui_config = UiConfig::new(verbose);
    let mut progress = Progress::new_with_ui(verbose, ui_config.colors_enabled);
    let mut ui = Ui::new(ui_config);

    ui.print_header(env!("CARGO_PKG_VERSION"));

    if args.list_backups {
        let store = BackupStore::at(settings.backup_directory());
        let keys = store.keys()?;
        display_backup_keys(store.directory(), &keys, &mut io::stdout())?;
        return Ok(());
    }

    let validated = validate_arguments(&args.paths)?;
    for invalid in &validated.invalid {
        ui.warning(&format!(
            "Ignoring {} ({})",
            invalid.path.display(),
            invalid.reason
        ));
    }

    let restored = if validated.has_backups() {
        restore_backups(&validated.backups, &args, &mut ui, &mut progress)
    } else {
        Ok(())
    };

    let renamed = if validated.has_media() {
        rename_media(&validated.media, &args, &settings, &mut ui, &mut progress)
    } else {
        Ok(())
    };

    restored.and(renamed)
}

fn restore_backups(
    paths: &[PathBuf],
    args: &Args,
    ui: &mut Ui,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let options = RestoreOptions { dry_run: args.dry };

    // Records may come from several backup directories
    let mut groups: Vec<(BackupStore, Vec<String>)> = Vec::new();
    for path in paths {
        let (store, key) = BackupStore::locate(path)?;
        match groups
            .iter_mut()
            .find(|(existing, _)| existing.directory() == store.directory())
        {
            Some((_, keys)) => keys.push(key),
            None => groups.push((store, vec![key])),
        }
    }

    let mut plan: Vec<(String, MediaEntity)> = Vec::new();
    let mut unreadable = 0;

    for (store, keys) in groups.iter_mut() {
        let restorer = RestoreTransaction::new(store, options.clone());
        keys.retain(|key| match restorer.inspect(key) {
            Ok(entity) => {
                plan.push((key.clone(), entity));
                true
            }
            Err(e) => {
                ui.error(&format!("{}: {}", key, e));
                unreadable += 1;
                false
            }
        });
    }

    if plan.is_empty() {
        return Err(AppError::RestoreFailures {
            failed: unreadable,
            total: paths.len(),
        });
    }

    if args.dry {
        ui.boxed_title("DRY RUN");
    }
    display_restore_plan(&plan, &mut io::stdout())?;

    if !args.dry && !args.yes && !ui.confirm(&format!("Restore {} files?", plan.len()))? {
        ui.info("Restore cancelled.");
        return Ok(());
    }

    let mut report = RestoreReport {
        dry_run: args.dry,
        ..Default::default()
    };
    for (store, keys) in &groups {
        let group = RestoreTransaction::new(store, options.clone()).restore_all(keys, progress);
        report.restored.extend(group.restored);
        report.failed.extend(group.failed);
    }

    display_restore_result(&report, &mut io::stdout())?;

    let failed = report.failed.len() + unreadable;
    if failed > 0 {
        return Err(AppError::RestoreFailures {
            failed,
            total: paths.len(),
        });
    }

    Ok(())
}

fn rename_media(
    paths: &[PathBuf],
    args: &Args,
    settings: &Settings,
    ui: &mut Ui,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let options = settings.rename_options(args.dry);

    if !settings.rename_only && !settings.libraries.is_complete() {
        ui.warning("Movie and show libraries are not both configured; renaming in place only.");
        if !args.dry && !args.yes && !ui.confirm("Continue with in-place renaming?")? {
            ui.info("Rename cancelled.");
            return Ok(());
        }
    }

    ui.kv("Mode", options.mode());
    ui.section("Classifying");
    let scan = classify_paths(paths);
    for (path, e) in &scan.failures {
        ui.error(&format!("{}: {}", path.display(), e));
    }

    let partition = partition_entities(scan.entities, &options);
    display_partition(&partition, &mut io::stdout())?;

    if partition.renamable.is_empty() {
        if !partition.already_correct.is_empty() {
            ui.success("Everything is already correctly named.");
            return Ok(());
        }
        if let Some((_, e)) = scan.failures.into_iter().next() {
            return Err(e.into());
        }
        return Err(AppError::NothingToProcess {
            reason: "no recognized media files were found".to_string(),
        });
    }

    let Some(entities) = review(partition.renamable, &options, args, ui)? else {
        ui.info("Rename cancelled.");
        return Ok(());
    };

    let store = if args.dry {
        BackupStore::at(settings.backup_directory())
    } else {
        BackupStore::open(settings.backup_directory())?
    };
    progress.backups_location(store.directory());

    let transaction = RenameTransaction::new(&store, options);
    let report = match args.on_conflict.map(ConflictResolution::from) {
        Some(mut policy) => transaction.run(entities, &mut policy, progress),
        None if args.yes => transaction.run(entities, &mut ConflictResolution::Append, progress),
        None => {
            let mut ask = |entity: &MediaEntity| {
                ui.choose_conflict(entity)
                    .unwrap_or(ConflictResolution::Skip)
            };
            transaction.run(entities, &mut ask, progress)
        }
    };

    if report.dry_run {
        display_dry_run(&report, &mut io::stdout())?;
    } else {
        display_rename_result(&report, &mut io::stdout())?;
    }

    info!(
        renamed = report.renamed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Done"
    );

    if report.has_failures() {
        return Err(AppError::RenameFailures {
            failed: report.failed.len(),
            total: report.len(),
        });
    }

    Ok(())
}

/// Let the user confirm the batch or correct titles first.
///
/// Returns `None` when the user cancels.
fn review(
    mut entities: Vec<MediaEntity>,
    options: &RenameOptions,
    args: &Args,
    ui: &mut Ui,
) -> Result<Option<Vec<MediaEntity>>, AppError> {
    if args.yes || args.dry {
        if !args.dry {
            display_renamable(&entities, options, &mut io::stdout())?;
        }
        return Ok(Some(entities));
    }

    loop {
        display_renamable(&entities, options, &mut io::stdout())?;

        match ui.review(entities.len())? {
            ReviewChoice::Proceed => return Ok(Some(entities)),
            ReviewChoice::Cancel => return Ok(None),
            ReviewChoice::Correct(indices) => {
                for i in indices {
                    if let Some(corrected) = ui.correct_title(&entities[i])? {
                        entities[i] = corrected;
                    }
                }
            }
        }
    }
}
