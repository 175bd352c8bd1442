use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use slactac_protocols::{MessageResponse, MessagingError};
use slactac_store::memory_storage;

#[derive(Default)]
struct RecordingTransport {
    refreshes: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn request(&self, message: RuntimeMessage) -> Result<MessageResponse, MessagingError> {
        assert_eq!(message.known_action(), Some(Action::RefreshNames));
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(MessagingError::NoReceiver)
        } else {
            Ok(MessageResponse::status("Names refreshed"))
        }
    }
}

fn book() -> (TackBook, Storage) {
    let storage = memory_storage();
    let book = TackBook::new(storage.clone(), &Config::default()).unwrap();
    (book, storage)
}

#[tokio::test]
async fn test_save_trims_and_persists() {
    let (book, storage) = book();
    book.save("  general ", " 🔥 general\n").await.unwrap();

    let stored = storage.sync().get("chatRoomOverrides").await.unwrap();
    assert_eq!(stored, Some(json!({"general": "🔥 general"})));
}

#[tokio::test]
async fn test_save_requires_both_fields() {
    let (book, storage) = book();
    assert!(matches!(
        book.save("   ", "x").await,
        Err(TackError::MissingField("original"))
    ));
    assert!(matches!(
        book.save("general", "").await,
        Err(TackError::MissingField("replacement"))
    ));
    assert_eq!(storage.sync().get("chatRoomOverrides").await.unwrap(), None);
}

#[tokio::test]
async fn test_save_rejects_unsafe_replacement() {
    let (book, _) = book();
    let err = book
        .save("general", "<script>alert(1)</script>")
        .await
        .unwrap_err();
    assert!(matches!(err, TackError::UnsafeValue(_)));
    assert!(book.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_accepts_prose_with_data_colon() {
    let (book, storage) = book();
    book.save("analytics", "Big data: Q3").await.unwrap();

    let stored = storage.sync().get("chatRoomOverrides").await.unwrap();
    assert_eq!(stored, Some(json!({"analytics": "Big data: Q3"})));
}

#[tokio::test]
async fn test_save_overwrites_last_writer_wins() {
    let (book, _) = book();
    book.save("general", "one").await.unwrap();
    book.save("general", "two").await.unwrap();
    book.save("random", "water cooler").await.unwrap();

    let list = book.list().await.unwrap();
    assert_eq!(
        list.into_iter().collect::<Vec<_>>(),
        vec![
            ("general".to_string(), "two".to_string()),
            ("random".to_string(), "water cooler".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_remove() {
    let (book, _) = book();
    book.save("general", "🔥 general").await.unwrap();

    assert!(book.remove("general").await.unwrap());
    assert!(!book.remove("general").await.unwrap());
    assert!(book.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_preserves_entries_list_hides() {
    let (book, storage) = book();
    storage
        .sync()
        .set("chatRoomOverrides", json!({"legacy": 7}))
        .await
        .unwrap();

    book.save("general", "🔥 general").await.unwrap();
    assert_eq!(book.list().await.unwrap().len(), 1);
    let stored = storage.sync().get("chatRoomOverrides").await.unwrap().unwrap();
    assert_eq!(stored["legacy"], json!(7));
}

#[tokio::test]
async fn test_clear_all() {
    let (book, storage) = book();
    book.save("general", "🔥 general").await.unwrap();
    book.clear_all().await.unwrap();
    assert_eq!(storage.sync().get("chatRoomOverrides").await.unwrap(), None);
}

#[tokio::test]
async fn test_last_picked_and_take() {
    let (book, storage) = book();
    assert_eq!(book.last_picked().await.unwrap(), None);

    storage
        .local()
        .set("lastPickedChannel", json!("general"))
        .await
        .unwrap();
    assert_eq!(book.last_picked().await.unwrap().as_deref(), Some("general"));
    assert_eq!(
        book.take_last_picked().await.unwrap().as_deref(),
        Some("general")
    );
    assert_eq!(book.last_picked().await.unwrap(), None);
}

#[tokio::test]
async fn test_changes_request_refresh() {
    let (book, _) = book();
    let transport = Arc::new(RecordingTransport::default());
    let book = book.with_transport(transport.clone());

    book.save("general", "🔥 general").await.unwrap();
    book.remove("general").await.unwrap();
    book.remove("general").await.unwrap();
    book.clear_all().await.unwrap();
    assert_eq!(transport.refreshes.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_transport_failure_is_not_an_error() {
    let (book, _) = book();
    let transport = Arc::new(RecordingTransport {
        fail: true,
        ..Default::default()
    });
    let book = book.with_transport(transport.clone());

    book.save("general", "🔥 general").await.unwrap();
    assert_eq!(transport.refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let sync = Arc::new(slactac_store::MemoryStore::new("sync"));
    let storage = Storage::new(sync.clone(), Arc::new(slactac_store::MemoryStore::new("local")));
    let book = TackBook::new(storage, &Config::default()).unwrap();

    sync.set_unavailable(true);
    assert!(matches!(
        book.save("general", "x").await,
        Err(TackError::Storage(_))
    ));
}
