mod filesystem;
mod memory;
mod store;

pub use filesystem::{FilesystemHistoryStore, HISTORY_FILE_NAME};
pub use memory::MemoryHistoryStore;
pub use store::HistoryStore;
