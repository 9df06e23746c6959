use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{MessageStore, StoreError, StoreFeatures, StoredMessage, Thread};

#[derive(Default)]
struct Tables {
    threads: HashMap<u64, Thread>,
    messages: BTreeMap<u64, StoredMessage>,
    next_thread_id: u64,
    next_message_id: u64,
}

impl Tables {
    fn check_thread(&self, thread: &Thread) -> Result<(), StoreError> {
        if self.threads.contains_key(&thread.id) {
            Ok(())
        } else {
            Err(StoreError::thread_not_found(thread.id))
        }
    }

    fn insert_empty(&mut self, thread_id: u64) -> StoredMessage {
        self.next_message_id += 1;
        let row = StoredMessage {
            id: self.next_message_id,
            thread_id,
            message: Value::Object(Map::new()),
        };
        self.messages.insert(row.id, row.clone());
        row
    }
}

/// A message store that keeps everything in memory.
///
/// It counts the insert calls it receives, so that tests can verify
/// which insert path was taken.
#[derive(Default)]
pub struct InMemoryStore {
    features: StoreFeatures,
    tables: Mutex<Tables>,
    bulk_create_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl InMemoryStore {
    /// Creates a store that supports returning rows from bulk inserts.
    #[inline]
    pub fn new() -> Self {
        Self::with_features(StoreFeatures {
            can_return_rows_from_bulk_insert: true,
        })
    }

    /// Creates a store with the given capabilities.
    #[inline]
    pub fn with_features(features: StoreFeatures) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    /// Creates a new thread.
    pub async fn create_thread<S: Into<String>>(
        &self,
        name: S,
        created_by: Option<&str>,
    ) -> Thread {
        let mut tables = self.tables.lock().await;
        tables.next_thread_id += 1;
        let thread = Thread {
            id: tables.next_thread_id,
            name: name.into(),
            created_by: created_by.map(str::to_owned),
        };
        tables.threads.insert(thread.id, thread.clone());
        thread
    }

    /// Returns how many times [`MessageStore::bulk_create`] was called.
    #[inline]
    pub fn bulk_create_calls(&self) -> usize {
        self.bulk_create_calls.load(Ordering::Relaxed)
    }

    /// Returns how many times [`MessageStore::create`] was called.
    #[inline]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    #[inline]
    fn features(&self) -> StoreFeatures {
        self.features
    }

    async fn message_ids(&self, thread: &Thread) -> Result<Vec<u64>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check_thread(thread)?;
        Ok(tables
            .messages
            .values()
            .filter(|row| row.thread_id == thread.id)
            .map(|row| row.id)
            .collect())
    }

    async fn bulk_create(
        &self,
        thread: &Thread,
        count: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        self.bulk_create_calls.fetch_add(1, Ordering::Relaxed);
        let mut tables = self.tables.lock().await;
        tables.check_thread(thread)?;
        Ok((0..count).map(|_| tables.insert_empty(thread.id)).collect())
    }

    async fn create(&self, thread: &Thread) -> Result<StoredMessage, StoreError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        let mut tables = self.tables.lock().await;
        tables.check_thread(thread)?;
        Ok(tables.insert_empty(thread.id))
    }

    async fn bulk_update(&self, rows: &[StoredMessage]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(row) =
            rows.iter().find(|row| !tables.messages.contains_key(&row.id))
        {
            return Err(StoreError::backend(format!("no message with id {}", row.id)));
        }
        for row in rows {
            if let Some(stored) = tables.messages.get_mut(&row.id) {
                stored.message = row.message.clone();
            }
        }
        Ok(())
    }

    async fn list(&self, thread: &Thread) -> Result<Vec<StoredMessage>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check_thread(thread)?;
        Ok(tables
            .messages
            .values()
            .filter(|row| row.thread_id == thread.id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_threads_are_isolated() {
        let store = InMemoryStore::new();
        let first = store.create_thread("First", Some("ada")).await;
        let second = store.create_thread("Second", None).await;
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_by.as_deref(), Some("ada"));

        let rows = store.bulk_create(&first, 2).await.unwrap();
        store.create(&second).await.unwrap();
        assert_eq!(store.message_ids(&first).await.unwrap(), [rows[0].id, rows[1].id]);
        assert_eq!(store.list(&second).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_update() {
        let store = InMemoryStore::new();
        let thread = store.create_thread("Thread", None).await;
        let mut row = store.create(&thread).await.unwrap();
        row.message = json!({ "type": "human", "data": { "content": "Hi" } });

        store.bulk_update(std::slice::from_ref(&row)).await.unwrap();
        assert_eq!(store.list(&thread).await.unwrap(), [row.clone()]);

        row.id += 100;
        let err = store.bulk_update(&[row]).await.unwrap_err();
        assert_eq!(err.kind(), crate::StoreErrorKind::Backend);
    }
}
