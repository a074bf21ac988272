//! Retention-bounded dataset history.
//!
//! [`DatasetStore`] owns every stored dataset and partitions them by
//! [`equip_model::HistoryScope`]. Each scope keeps at most
//! [`equip_model::RETENTION_LIMIT`] datasets; saving one more evicts the
//! oldest.
//!
//! # Durability
//!
//! - `DatasetStore::in_memory()` keeps history for the process lifetime
//! - `DatasetStore::open(backend)` loads and writes through a
//!   [`HistoryBackend`]; [`JsonDirectoryBackend`] keeps one JSON snapshot
//!   per scope
//!
//! A failed durable write rolls the in-memory change back.
//!
//! # Example
//!
//! ```ignore
//! use equip_store::{DatasetStore, JsonDirectoryBackend};
//!
//! let store = DatasetStore::open(JsonDirectoryBackend::new("data")?)?;
//! let saved = store.save(&scope, "plant.csv", records, aggregates)?;
//! let history = store.list(&scope);
//! ```

mod backend;
mod error;
mod store;

pub use backend::{
    HistoryBackend, JsonDirectoryBackend, SNAPSHOT_VERSION, ScopeSnapshot, snapshot_file_name,
};
pub use error::{Result, StoreError};
pub use store::DatasetStore;
