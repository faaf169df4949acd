//! UI module for styled terminal output and interactive prompts.
//!
//! Decorations are colored in normal mode and suppressed in verbose mode,
//! where tracing carries the same information. Prompts are always shown.

use crate::media::MediaEntity;
use crate::progress::should_use_colors;
use crate::rename::ConflictResolution;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// ASCII art header lines for the application (for gradient coloring)
const HEADER_LINE_1: &str = r"   ___ _                         ___                              ";
const HEADER_LINE_2: &str = r"  / __(_)_ _  ___ _ __  __ _    | _ \___ _ _  __ _ _ __  ___ _ _ ";
const HEADER_LINE_3: &str = r" | (__| | ' \/ -_) '  \/ _` |   |   / -_) ' \/ _` | '  \/ -_) '_|";
const HEADER_LINE_4: &str = r"  \___|_|_||_\___|_|_|_\__,_|   |_|_\___|_||_\__,_|_|_|_\___|_|  ";

/// Plain ASCII header (non-colored)
const ASCII_HEADER_PLAIN: &str = r"
   ___ _                         ___
  / __(_)_ _  ___ _ __  __ _    | _ \___ _ _  __ _ _ __  ___ _ _
 | (__| | ' \/ -_) '  \/ _` |   |   / -_) ' \/ _` | '  \/ -_) '_|
  \___|_|_||_\___|_|_|_\__,_|   |_|_\___|_||_\__,_|_|_|_\___|_|
";

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,
    pub verbose: bool,
}

impl UiConfig {
    /// Create UI config from environment and args
    pub fn new(verbose: bool) -> Self {
        Self {
            colors_enabled: should_use_colors(),
            verbose,
        }
    }
}

/// The answer to the review prompt shown before a batch is renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewChoice {
    Proceed,
    Cancel,
    /// Zero-based indices of entities whose title should be corrected
    Correct(Vec<usize>),
}

/// Parse an answer to `[Y|n|#]`.
///
/// Indices are one-based as displayed and may be separated by commas or
/// spaces. Returns `None` for anything that is not a valid answer.
pub fn parse_review_answer(answer: &str, count: usize) -> Option<ReviewChoice> {
    let answer = answer.trim();
    match answer.to_lowercase().as_str() {
        "" | "y" | "yes" => return Some(ReviewChoice::Proceed),
        "n" | "no" => return Some(ReviewChoice::Cancel),
        _ => {}
    }

    let mut indices = Vec::new();
    for token in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let number: usize = token.parse().ok()?;
        if number == 0 || number > count {
            return None;
        }
        if !indices.contains(&(number - 1)) {
            indices.push(number - 1);
        }
    }

    if indices.is_empty() {
        None
    } else {
        Some(ReviewChoice::Correct(indices))
    }
}

/// Parse an answer to the backup conflict prompt
pub fn parse_conflict_answer(answer: &str) -> Option<ConflictResolution> {
    match answer.trim().to_lowercase().as_str() {
        "o" | "overwrite" => Some(ConflictResolution::Overwrite),
        "a" | "append" => Some(ConflictResolution::Append),
        "s" | "skip" => Some(ConflictResolution::Skip),
        _ => None,
    }
}

fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Styled output writer with line-based prompts
pub struct Ui {
    config: UiConfig,
    reader: Box<dyn BufRead>,
    writer: Box<dyn Write>,
}

impl Ui {
    /// Create a new UI reading stdin and writing stderr
    pub fn new(config: UiConfig) -> Self {
        Self::with_io(
            config,
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    /// Create UI with custom reader and writer
    pub fn with_io(config: UiConfig, reader: Box<dyn BufRead>, writer: Box<dyn Write>) -> Self {
        // Set colored crate's global color setting
        if !config.colors_enabled {
            colored::control::set_override(false);
        }

        Self {
            config,
            reader,
            writer,
        }
    }

    /// Print the application header
    pub fn print_header(&mut self, version: &str) {
        if self.config.verbose {
            let _ = writeln!(self.writer, "cinema-renamer v{}", version);
            let _ = writeln!(self.writer);
            return;
        }

        if self.config.colors_enabled {
            let _ = writeln!(self.writer);
            let _ = writeln!(self.writer, "{}", HEADER_LINE_1.bright_yellow().bold());
            let _ = writeln!(self.writer, "{}", HEADER_LINE_2.yellow().bold());
            let _ = writeln!(self.writer, "{}", HEADER_LINE_3.red().bold());
            let _ = writeln!(self.writer, "{}", HEADER_LINE_4.bright_red());
            let _ = writeln!(
                self.writer,
                "{}",
                format!("{:>66}", format!("v{}", version)).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "{}", ASCII_HEADER_PLAIN);
            let _ = writeln!(self.writer, "{:>66}", format!("v{}", version));
        }
        let _ = writeln!(self.writer);
    }

    /// Print a section header
    pub fn section(&mut self, title: &str) {
        if self.config.verbose {
            return;
        }
        let _ = writeln!(self.writer);
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{}", title.bold());
        } else {
            let _ = writeln!(self.writer, "{}", title);
        }
    }

    /// Print an info message
    pub fn info(&mut self, msg: &str) {
        if self.config.verbose {
            return;
        }
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{}", msg.cyan());
        } else {
            let _ = writeln!(self.writer, "{}", msg);
        }
    }

    /// Print a success message with checkmark
    pub fn success(&mut self, msg: &str) {
        if self.config.verbose {
            return;
        }
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "✓".green().bold(), msg.green());
        } else {
            let _ = writeln!(self.writer, "* {}", msg);
        }
    }

    /// Print a warning message
    pub fn warning(&mut self, msg: &str) {
        if self.config.verbose {
            return;
        }
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), msg.yellow());
        } else {
            let _ = writeln!(self.writer, "! {}", msg);
        }
    }

    /// Print an error message
    pub fn error(&mut self, msg: &str) {
        // Errors shown in both modes
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "✗".red().bold(), msg.red());
        } else {
            let _ = writeln!(self.writer, "X {}", msg);
        }
    }

    /// Print a key-value pair
    pub fn kv(&mut self, key: &str, value: &str) {
        if self.config.verbose {
            return;
        }
        if self.config.colors_enabled {
            let _ = writeln!(self.writer, "{}: {}", key.bold(), value);
        } else {
            let _ = writeln!(self.writer, "{}: {}", key, value);
        }
    }

    /// Print a boxed title (for dry run, restore, etc.)
    pub fn boxed_title(&mut self, title: &str) {
        if self.config.verbose {
            return;
        }
        let width = 50;
        let padding = (width - title.len() - 2) / 2;
        let title_line = format!(
            "║{}{}{}║",
            " ".repeat(padding),
            title,
            " ".repeat(width - padding - title.len() - 2)
        );

        if self.config.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("╔{}╗", "═".repeat(width - 2)).cyan()
            );
            let _ = writeln!(self.writer, "{}", title_line.cyan().bold());
            let _ = writeln!(
                self.writer,
                "{}",
                format!("╚{}╝", "═".repeat(width - 2)).cyan()
            );
        } else {
            let _ = writeln!(self.writer, "╔{}╗", "═".repeat(width - 2));
            let _ = writeln!(self.writer, "{}", title_line);
            let _ = writeln!(self.writer, "╚{}╝", "═".repeat(width - 2));
        }
    }

    /// Write a prompt and read one line; `None` on end of input
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.config.colors_enabled {
            write!(self.writer, "{} ", prompt.bold())?;
        } else {
            write!(self.writer, "{} ", prompt)?;
        }
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            let _ = writeln!(self.writer);
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask a yes/no question; an empty answer means yes, end of input means no
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) = self.ask(&format!("{} [Y|n]", question))? else {
                return Ok(false);
            };
            match parse_confirmation(&answer) {
                Some(confirmed) => return Ok(confirmed),
                None => self.error("Please answer y or n."),
            }
        }
    }

    /// Ask whether to proceed with `count` listed entities, cancel, or correct some
    pub fn review(&mut self, count: usize) -> io::Result<ReviewChoice> {
        loop {
            let Some(answer) = self.ask("Proceed with these renames? [Y|n|#]")? else {
                return Ok(ReviewChoice::Cancel);
            };
            match parse_review_answer(&answer, count) {
                Some(choice) => return Ok(choice),
                None => self.error(&format!(
                    "Answer y, n or the numbers (1-{}) of the entries to correct.",
                    count
                )),
            }
        }
    }

    /// Ask for a replacement title until one is accepted.
    ///
    /// A blank answer keeps the entity as it is and returns `None`.
    pub fn correct_title(&mut self, entity: &MediaEntity) -> io::Result<Option<MediaEntity>> {
        loop {
            let prompt = format!(
                "New title for '{}' (blank keeps it):",
                entity.new_file_name()
            );
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(None);
            };
            if answer.trim().is_empty() {
                return Ok(None);
            }
            match entity.with_title(&answer) {
                Ok(corrected) => return Ok(Some(corrected)),
                Err(e) => self.error(&e.to_string()),
            }
        }
    }

    /// Ask how to handle a backup key that is already taken
    pub fn choose_conflict(&mut self, entity: &MediaEntity) -> io::Result<ConflictResolution> {
        let prompt = format!(
            "A backup named '{}' already exists. [o]verwrite, [a]ppend or [s]kip?",
            entity.backup_identity()
        );
        loop {
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(ConflictResolution::Skip);
            };
            match parse_conflict_answer(&answer) {
                Some(resolution) => return Ok(resolution),
                None => self.error("Please answer o, a or s."),
            }
        }
    }
}
