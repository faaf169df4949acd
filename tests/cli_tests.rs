use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const ENV_VARS: [&str; 5] = [
    "CINEMA_RENAMER_MOVIES",
    "CINEMA_RENAMER_SHOWS",
    "CINEMA_RENAMER_COPY",
    "CINEMA_RENAMER_OVERWRITE",
    "CINEMA_RENAMER_BACKUP_DIR",
];

fn cinema_renamer(backups: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cinema-renamer").unwrap();
    for name in ENV_VARS {
        cmd.env_remove(name);
    }
    cmd.env("NO_COLOR", "1")
        .arg("--backup-dir")
        .arg(backups);
    cmd
}

fn create_file(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, "video").unwrap();
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("cinema-renamer")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename movie and TV episode files"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("cinema-renamer")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_paths() {
    Command::cargo_bin("cinema-renamer")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let file = dir.path().join("Heat.1995.720p.mkv");
    create_file(&file);

    cinema_renamer(&backups)
        .arg("--dry")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("Heat (1995) [720p].mkv"))
        .stdout(predicate::str::contains("1 files would be renamed"));

    assert!(file.exists());
    assert!(!dir.path().join("Heat (1995) [720p].mkv").exists());
    assert!(!backups.exists());
}

#[test]
fn test_rename_in_place_then_restore() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let downloads = dir.path().join("downloads");
    let file = downloads.join("Rick.and.Morty.S05E05.720p.WEBRip.x264-BAE.mkv");
    create_file(&file);

    cinema_renamer(&backups)
        .arg("--yes")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed 1 files."));

    let renamed = downloads.join("Rick and Morty 05x05 [720p] [x264].mkv");
    let record = backups.join("Rick and Morty.Rick and Morty 05x05 [720p] [x264].mkv.backup");
    assert!(renamed.exists());
    assert!(!file.exists());
    assert!(record.exists());

    cinema_renamer(&backups)
        .arg("--yes")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 1 records."));

    assert!(file.exists());
    assert!(!renamed.exists());
    assert!(!record.exists());
}

#[test]
fn test_integrates_into_library() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let movies = dir.path().join("movies");
    let shows = dir.path().join("shows");
    std::fs::create_dir_all(&movies).unwrap();
    std::fs::create_dir_all(&shows).unwrap();
    let file = dir.path().join("downloads").join("Amateur Night (2016) 720p.mp4");
    create_file(&file);

    cinema_renamer(&backups)
        .arg("--yes")
        .arg("--move")
        .arg("--movies")
        .arg(&movies)
        .arg("--shows")
        .arg(&shows)
        .arg(&file)
        .assert()
        .success();

    assert!(movies
        .join("Amateur Night (2016)")
        .join("Amateur Night (2016) [720p].mp4")
        .exists());
    assert!(!file.exists());
}

#[test]
fn test_review_cancel_leaves_files() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let file = dir.path().join("Heat.1995.720p.mkv");
    create_file(&file);

    cinema_renamer(&backups)
        .arg("--rename-only")
        .arg(&file)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [movie] Heat.1995.720p.mkv"))
        .stderr(predicate::str::contains("[Y|n|#]"));

    assert!(file.exists());
}

#[test]
fn test_review_correction() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let file = dir.path().join("Heat.1995.720p.mkv");
    create_file(&file);

    cinema_renamer(&backups)
        .arg("--rename-only")
        .arg(&file)
        .write_stdin("1\nHeat: Redux\nHeat Redux\ny\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("reserved character"));

    assert!(dir.path().join("Heat Redux (1995) [720p].mkv").exists());
}

#[test]
fn test_nonexistent_path() {
    let dir = tempdir().unwrap();

    cinema_renamer(&dir.path().join("backups"))
        .arg("/nonexistent/path/Heat.1995.mkv")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_relative_path() {
    let dir = tempdir().unwrap();

    cinema_renamer(&dir.path().join("backups"))
        .arg("Heat.1995.mkv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not an absolute path"));
}

#[test]
fn test_unrecognized_only() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    create_file(&file);

    cinema_renamer(&dir.path().join("backups"))
        .arg("--yes")
        .arg(&file)
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Unrecognized (1):"))
        .stderr(predicate::str::contains("Nothing to process"));
}

#[test]
fn test_list_backups_empty() {
    let dir = tempdir().unwrap();

    cinema_renamer(&dir.path().join("backups"))
        .arg("--list-backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
}

#[test]
fn test_corrupt_backup_fails() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    std::fs::create_dir_all(&backups).unwrap();
    let record = backups.join("Heat (1995).Heat (1995).mkv.backup");
    std::fs::write(&record, "not json").unwrap();

    cinema_renamer(&backups)
        .arg("--yes")
        .arg(&record)
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Invalid backup record"));

    assert!(record.exists());
}
