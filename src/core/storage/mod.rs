//! Key-value persistence for the planner's aggregates.
//!
//! # Modules
//!
//! - `kv` - The [`KeyValueStore`] trait and an in-memory store
//! - `file_store` - One JSON file per key under a data directory
//! - `persist` - Fail-closed loading and the write-back observer
//! - `error` - Error types for storage operations

pub mod error;
pub mod file_store;
pub mod kv;
pub mod persist;

pub use error::{StorageError, StorageResult};
pub use file_store::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use persist::{
    compose, load_state, LoadedState, PersistenceObserver, HISTORY_KEY, LIBRARY_KEY, PLAN_KEY,
};
