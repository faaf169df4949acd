mod integrate;
mod transaction;
mod types;

pub(crate) use integrate::{move_file, same_entry};
pub use transaction::RenameTransaction;
pub use types::*;
