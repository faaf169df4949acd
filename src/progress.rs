//! Progress output for user-facing status updates.
//!
//! The rename and restore transactions report each entity here as they go.
//! In verbose mode, output is suppressed since tracing handles everything.
//! In normal mode, output is shown with colors.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        let colors_enabled = should_use_colors();
        Self {
            writer: Box::new(io::stderr()),
            silent: false,
            colors_enabled,
        }
    }

    /// Create a progress reporter that respects UI mode
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    /// Create a silent progress reporter
    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    fn counter_line(&mut self, current: usize, total: usize, from: &str, to: &str) {
        if self.colors_enabled {
            let counter = format!("[{}/{}]", current, total);
            let _ = writeln!(
                self.writer,
                "{} {} {} {}",
                counter.cyan(),
                from.dimmed(),
                "→".cyan(),
                to
            );
        } else {
            let _ = writeln!(self.writer, "[{}/{}] {} -> {}", current, total, from, to);
        }
    }

    fn heading(&mut self, text: &str) {
        let _ = writeln!(self.writer);
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", text.bold());
        } else {
            let _ = writeln!(self.writer, "{}", text);
        }
    }

    /// Report the start of a rename batch
    pub fn rename_start(&mut self, total: usize, mode: &str) {
        if self.silent {
            return;
        }
        self.heading(&format!("Renaming {} files ({})", total, mode));
    }

    /// Report progress on a single rename
    pub fn rename_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        if self.silent {
            return;
        }
        self.counter_line(current, total, from, to);
    }

    /// Report an entity left untouched
    pub fn skipped(&mut self, name: &str, reason: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {} {}",
                "-".dimmed(),
                name,
                format!("({})", reason).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Skipped: {} ({})", name, reason);
        }
    }

    /// Report rename batch complete
    pub fn rename_complete(&mut self, count: usize, dry_run: bool) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        if dry_run {
            if self.colors_enabled {
                let _ = writeln!(
                    self.writer,
                    "{}",
                    format!("Dry run complete. {} files would be renamed.", count).dimmed()
                );
            } else {
                let _ = writeln!(
                    self.writer,
                    "Dry run complete. {} files would be renamed.",
                    count
                );
            }
        } else if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("{} files renamed", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Rename complete. {} files renamed.", count);
        }
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    /// Report where backup records are kept
    pub fn backups_location(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Backups stored in: {}", path.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Backups stored in: {}", path.display());
        }
    }

    /// Report starting a restore operation
    pub fn restore_start(&mut self, total: usize) {
        if self.silent {
            return;
        }
        self.heading(&format!("Restoring {} files from backups", total));
    }

    /// Report progress on a single restore
    pub fn restore_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        if self.silent {
            return;
        }
        self.counter_line(current, total, from, to);
    }

    /// Report restore complete
    pub fn restore_complete(&mut self, count: usize, dry_run: bool) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        if dry_run {
            if self.colors_enabled {
                let _ = writeln!(
                    self.writer,
                    "{}",
                    format!("Dry run complete. {} files would be restored.", count).dimmed()
                );
            } else {
                let _ = writeln!(
                    self.writer,
                    "Dry run complete. {} files would be restored.",
                    count
                );
            }
        } else if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("{} files restored", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Restore complete. {} files restored.", count);
        }
    }
}
