use std::collections::HashSet;

use tool_relay_model::Message;

use crate::{MessageStore, StoreError, StoredMessage, Thread};

/// Saves the messages of a conversation to `thread`.
///
/// Messages whose identifier already belongs to a row of the thread are
/// skipped, so saving the whole conversation after each step only stores
/// what is new. Each saved message gets the identifier of its row, and
/// the created rows are returned in message order.
///
/// When the store can return rows from a bulk insert, all rows are created
/// with a single [`MessageStore::bulk_create`]; otherwise they are created
/// one by one.
pub async fn save_messages<S: MessageStore + ?Sized>(
    store: &S,
    thread: &Thread,
    messages: Vec<Message>,
) -> Result<Vec<StoredMessage>, StoreError> {
    let existing: HashSet<String> = store
        .message_ids(thread)
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    let mut pending: Vec<Message> = messages
        .into_iter()
        .filter(|msg| msg.id().is_none_or(|id| !existing.contains(id)))
        .collect();
    if pending.is_empty() {
        debug!("nothing new to save in thread {}", thread.id);
        return Ok(vec![]);
    }

    let mut rows = if store.features().can_return_rows_from_bulk_insert {
        store.bulk_create(thread, pending.len()).await?
    } else {
        let mut rows = Vec::with_capacity(pending.len());
        for _ in 0..pending.len() {
            rows.push(store.create(thread).await?);
        }
        rows
    };
    if rows.len() != pending.len() {
        return Err(StoreError::backend(format!(
            "expected {} rows, got {}",
            pending.len(),
            rows.len()
        )));
    }

    for (row, msg) in rows.iter_mut().zip(pending.iter_mut()) {
        msg.set_id(row.id.to_string());
        row.message =
            serde_json::to_value(&*msg).map_err(StoreError::serialization)?;
    }
    store.bulk_update(&rows).await?;

    trace!("saved {} messages in thread {}", rows.len(), thread.id);
    Ok(rows)
}

/// Loads the messages of `thread` in order.
pub async fn load_messages<S: MessageStore + ?Sized>(
    store: &S,
    thread: &Thread,
) -> Result<Vec<Message>, StoreError> {
    store
        .list(thread)
        .await?
        .into_iter()
        .map(|row| {
            serde_json::from_value(row.message)
                .map_err(StoreError::serialization)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{InMemoryStore, StoreErrorKind, StoreFeatures};

    fn store(can_return_rows_from_bulk_insert: bool) -> InMemoryStore {
        InMemoryStore::with_features(StoreFeatures {
            can_return_rows_from_bulk_insert,
        })
    }

    #[tokio::test]
    async fn test_bulk_insert_when_supported() {
        let store = store(true);
        let thread = store.create_thread("Weather", Some("ada")).await;

        save_messages(&store, &thread, vec![Message::human("Hello")])
            .await
            .unwrap();

        assert_eq!(store.bulk_create_calls(), 1);
        assert_eq!(store.create_calls(), 0);
        let rows = store.list(&thread).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message["data"]["content"], json!("Hello"));
    }

    #[tokio::test]
    async fn test_single_inserts_when_bulk_unsupported() {
        let store = store(false);
        let thread = store.create_thread("Weather", Some("ada")).await;

        save_messages(&store, &thread, vec![Message::human("Hello")])
            .await
            .unwrap();

        assert_eq!(store.bulk_create_calls(), 0);
        assert_eq!(store.create_calls(), 1);
        let rows = store.list(&thread).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message["data"]["content"], json!("Hello"));
    }

    #[tokio::test]
    async fn test_ids_are_assigned_and_reused() {
        let store = store(true);
        let thread = store.create_thread("Weather", None).await;

        let rows = save_messages(
            &store,
            &thread,
            vec![Message::human("Hi"), Message::ai("Hello!")],
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);

        let mut conversation = load_messages(&store, &thread).await.unwrap();
        let ids: Vec<_> = conversation
            .iter()
            .map(|msg| msg.id().map(str::to_owned))
            .collect();
        let expected: Vec<_> =
            rows.iter().map(|row| Some(row.id.to_string())).collect();
        assert_eq!(ids, expected);

        // Saving the whole conversation again only stores the new turn.
        conversation.push(Message::human("Thanks"));
        let rows = save_messages(&store, &thread, conversation).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.list(&thread).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_nothing_to_save() {
        let store = store(true);
        let thread = store.create_thread("Weather", None).await;

        let rows = save_messages(&store, &thread, vec![]).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(store.bulk_create_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_thread() {
        let store = store(true);
        let thread = Thread {
            id: 99,
            name: "Ghost".to_owned(),
            created_by: None,
        };

        let err = save_messages(&store, &thread, vec![Message::human("Hi")])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::ThreadNotFound);
    }
}
