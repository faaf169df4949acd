pub mod backup;
pub mod cli;
pub mod error;
pub mod logging;
pub mod media;
pub mod output;
pub mod parser;
pub mod progress;
pub mod rename;
pub mod restore;
pub mod scanner;
pub mod settings;
pub mod ui;
pub mod validator;

pub use backup::{BackupError, BackupRecord, BackupStore, BACKUP_EXTENSION};
pub use error::{AppError, ExitCode};
pub use media::{CorrectionError, MediaDetails, MediaEntity, Transfer};
pub use parser::{classify, classify_stem, clean_name, title_case, MediaKind};
pub use progress::Progress;
pub use rename::{
    ConflictResolution, ConflictResolver, Libraries, RenameError, RenameOptions, RenameReport,
    RenameTransaction,
};
pub use restore::{RestoreError, RestoreOptions, RestoreOutcome, RestoreReport, RestoreTransaction};
pub use scanner::{classify_directory, classify_file, classify_paths, ScanResult, ScannerError};
pub use settings::Settings;
pub use validator::{partition_entities, validate_arguments, Partition, ValidationError};
