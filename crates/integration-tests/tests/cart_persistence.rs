//! Persistence behavior of the cart store: hydration on startup,
//! write-through on every mutation, the record format, and recovery when
//! the backend misbehaves.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use pocketcart_core::ProductId;
use pocketcart_integration_tests::{init_tracing, item, FlakyStorage};
use pocketcart_store::storage::keys;
use pocketcart_store::{
    CartStore, CartStoreError, FileStorage, KeyValueStorage, MemoryStorage, StorageError,
};

/// Fetch and parse the persisted cart record.
async fn persisted_record(storage: &dyn KeyValueStorage) -> Value {
    let raw = storage.get(keys::CART).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Hydration
// =============================================================================

#[tokio::test]
async fn test_load_without_record_yields_empty_cart() {
    init_tracing();
    let store = CartStore::load(Arc::new(MemoryStorage::new())).await.unwrap();

    assert!(store.is_empty().await);
    assert_eq!(store.total_quantity().await, 0);
}

#[tokio::test]
async fn test_load_restores_items_and_quantities() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
            .await
            .unwrap();
        store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
        store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
        store.add_or_increment(item("sku-2", "Saucer", 450)).await;
    }

    let restored = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    let items = restored.items().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.as_str(), "sku-1");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[1].id.as_str(), "sku-2");
    assert_eq!(items[1].quantity, 1);
}

#[tokio::test]
async fn test_cart_survives_restart_on_file_backend() {
    let dir = TempDir::new().unwrap();
    {
        let store = CartStore::load(Arc::new(FileStorage::new(dir.path()))).await.unwrap();
        store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
        store.increment(&ProductId::new("sku-1")).await.unwrap();
        store.add_or_increment(item("sku-2", "Saucer", 450)).await;
        store.decrement(&ProductId::new("sku-2")).await.unwrap();
    }

    // a fresh storage instance over the same directory sees the same cart
    let restored = CartStore::load(Arc::new(FileStorage::new(dir.path()))).await.unwrap();
    let items = restored.items().await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "sku-1");
    assert_eq!(items[0].title, "Espresso Cup");
    assert_eq!(items[0].quantity, 2);
}

// =============================================================================
// Write-through and record format
// =============================================================================

#[tokio::test]
async fn test_every_mutation_writes_through() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    let id = ProductId::new("sku-1");

    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
    assert_eq!(persisted_record(storage.as_ref()).await[0]["quantity"], 1);

    store.increment(&id).await.unwrap();
    assert_eq!(persisted_record(storage.as_ref()).await[0]["quantity"], 2);

    store.decrement(&id).await.unwrap();
    assert_eq!(persisted_record(storage.as_ref()).await[0]["quantity"], 1);
}

#[tokio::test]
async fn test_record_is_a_plain_json_array_of_line_items() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;

    let record = persisted_record(storage.as_ref()).await;
    assert_eq!(
        record,
        serde_json::json!([{
            "id": "sku-1",
            "title": "Espresso Cup",
            "image_url": "images/sku-1.png",
            "price": "10.99",
            "quantity": 1,
        }])
    );
}

#[tokio::test]
async fn test_emptying_the_cart_persists_an_empty_record() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    let id = ProductId::new("sku-1");

    // add twice, raise once, then take the quantity back down to removal
    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
    store.increment(&id).await.unwrap();
    store.decrement(&id).await.unwrap();
    store.decrement(&id).await.unwrap();
    store.decrement(&id).await.unwrap();

    assert!(store.is_empty().await);
    let raw = storage.get(keys::CART).await.unwrap().unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_rejected_mutations_persist_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();

    let missing = ProductId::new("missing");
    assert!(store.increment(&missing).await.is_err());
    assert!(store.decrement(&missing).await.is_err());

    assert_eq!(storage.get(keys::CART).await.unwrap(), None);
}

// =============================================================================
// Degraded backends
// =============================================================================

#[tokio::test]
async fn test_unreadable_record_hydrates_empty_and_is_repaired() {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::CART, "{ definitely not a cart").await.unwrap();

    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    assert!(store.is_empty().await);

    // the next mutation overwrites the bad record with a valid one
    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
    let record = persisted_record(storage.as_ref()).await;
    assert_eq!(record[0]["id"], "sku-1");
}

#[tokio::test]
async fn test_record_breaking_cart_invariants_counts_as_unreadable() {
    let storage = Arc::new(MemoryStorage::new());
    let duplicate_ids = r#"[
        {"id":"sku-1","title":"Cup","image_url":"cup.png","price":"10.99","quantity":1},
        {"id":"sku-1","title":"Cup","image_url":"cup.png","price":"10.99","quantity":4}
    ]"#;
    storage.set(keys::CART, duplicate_ids).await.unwrap();

    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_backend_read_failure_surfaces_as_storage_error() {
    let storage = Arc::new(FlakyStorage::new());
    storage.set_fail_reads(true);

    let err = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CartStoreError::Storage(StorageError::Backend(_))
    ));
}

#[tokio::test]
async fn test_write_failure_keeps_the_mutation() {
    init_tracing();
    let storage = Arc::new(FlakyStorage::new());
    let store = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>)
        .await
        .unwrap();

    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;
    storage.set_fail_writes(true);
    store.add_or_increment(item("sku-1", "Espresso Cup", 1099)).await;

    // memory took the mutation even though the backend refused the write
    assert_eq!(store.total_quantity().await, 2);
    let record = persisted_record(storage.as_ref()).await;
    assert_eq!(record[0]["quantity"], 1);

    // once the backend recovers, the next write persists the full state
    storage.set_fail_writes(false);
    store.increment(&ProductId::new("sku-1")).await.unwrap();
    let record = persisted_record(storage.as_ref()).await;
    assert_eq!(record[0]["quantity"], 3);
}
