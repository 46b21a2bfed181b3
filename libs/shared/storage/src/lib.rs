pub mod store;

pub use store::{FileStore, KvStore, MemoryStore, StorageError};
