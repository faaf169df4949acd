mod store;
mod types;

pub use store::BackupStore;
pub use types::{BackupError, BackupRecord, BACKUP_EXTENSION, RECORD_VERSION};
