//! Persistence of conversation messages.
//!
//! The store itself is a trait seam over some relational backend;
//! [`save_messages`] implements the saving protocol on top of it, and
//! [`InMemoryStore`] is a backend for tests and local runs.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod memory;
mod save;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{StoreError, StoreErrorKind};
pub use memory::InMemoryStore;
pub use save::{load_messages, save_messages};

/// A conversation thread that messages belong to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thread {
    /// Identifier of the thread.
    pub id: u64,
    /// Display name of the thread.
    pub name: String,
    /// The user who created the thread.
    pub created_by: Option<String>,
}

/// A persisted message row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMessage {
    /// Identifier of the row, assigned by the store.
    pub id: u64,
    /// Identifier of the owning thread.
    pub thread_id: u64,
    /// The serialized message.
    pub message: Value,
}

/// Capabilities of a store backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreFeatures {
    /// Whether a bulk insert reports the identifiers of the rows it
    /// created. Without it, rows must be created one at a time.
    pub can_return_rows_from_bulk_insert: bool,
}

/// Store for the messages of conversation threads.
///
/// Rows are created empty and filled afterwards, so that each message can
/// carry the identifier of its own row.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Returns the capabilities of this store.
    fn features(&self) -> StoreFeatures;

    /// Returns the identifiers of the rows in the thread, in order.
    async fn message_ids(&self, thread: &Thread) -> Result<Vec<u64>, StoreError>;

    /// Creates `count` empty rows in one insert and returns them.
    ///
    /// Only called when [`StoreFeatures::can_return_rows_from_bulk_insert`]
    /// is set.
    async fn bulk_create(
        &self,
        thread: &Thread,
        count: usize,
    ) -> Result<Vec<StoredMessage>, StoreError>;

    /// Creates one empty row and returns it.
    async fn create(&self, thread: &Thread) -> Result<StoredMessage, StoreError>;

    /// Writes the `message` column of existing rows.
    async fn bulk_update(&self, rows: &[StoredMessage]) -> Result<(), StoreError>;

    /// Lists the rows of the thread in order.
    async fn list(&self, thread: &Thread) -> Result<Vec<StoredMessage>, StoreError>;
}
