// Copyright 2025 Dealer Store Authors.
//
// Comprehensive tests for SimpleStore and the key-value stores under it

mod common;

use std::sync::Arc;

use common::*;
use dealer_store::{
    ClientType, Collection, Deal, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
    Record, RecordStore, SimpleStore, StoreBackend, StoreError,
};
use serde_json::json;

#[tokio::test]
async fn test_crud_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = SimpleStore::in_dir(dir.path());
    store.init().await.unwrap();

    let deal = sample_deal("d1", "p1", "c1", "c2");
    store
        .add(Collection::Deals, deal.to_document().unwrap())
        .await
        .expect("Failed to add deal");

    let mut updated = deal.clone();
    updated.payment_schedule[1].paid = true;
    store
        .update(Collection::Deals, updated.to_document().unwrap())
        .await
        .unwrap();

    let documents = store.get_all(Collection::Deals).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(Deal::from_document(documents[0].clone()).unwrap(), updated);

    store.delete(Collection::Deals, "d1").await.unwrap();
    store.delete(Collection::Deals, "d1").await.unwrap();
    assert!(store.get_all(Collection::Deals).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_data_survives_new_instance() {
    let dir = tempfile::tempdir().unwrap();

    let client = sample_client("c1", "Ayesha", ClientType::Buyer);
    {
        let store = SimpleStore::in_dir(dir.path());
        store.init().await.unwrap();
        store
            .add(Collection::Clients, client.to_document().unwrap())
            .await
            .unwrap();
    }

    let store = SimpleStore::in_dir(dir.path());
    let documents = store.get_all(Collection::Clients).await.unwrap();
    assert_eq!(documents, vec![client.to_document().unwrap()]);
}

#[tokio::test]
async fn test_collections_are_separate_blobs() {
    let store = SimpleStore::in_memory();

    let client = sample_client("c1", "Ayesha", ClientType::Buyer);
    store
        .add(Collection::Clients, client.to_document().unwrap())
        .await
        .unwrap();

    assert!(store.get_all(Collection::Properties).await.unwrap().is_empty());
    assert_eq!(store.get_all(Collection::Clients).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_add_rejected() {
    let store = SimpleStore::in_memory();
    let document = json!({ "id": "x1", "title": "Call back" });

    store
        .add(Collection::Reminders, document.clone())
        .await
        .unwrap();
    let result = store.add(Collection::Reminders, document).await;
    assert!(matches!(result, Err(StoreError::ConstraintViolation { .. })));
}

#[tokio::test]
async fn test_corrupt_blob_reads_as_empty() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("clients", "{not json").await.unwrap();

    let store = SimpleStore::new(kv);
    let documents = store.get_all(Collection::Clients).await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_concurrent_adds_are_all_kept() {
    let store = Arc::new(SimpleStore::in_memory());

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .add(Collection::Clients, json!({ "id": format!("c{}", i), "name": "x" }))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.get_all(Collection::Clients).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_init_never_fails_on_bad_directory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // A regular file cannot be used as the store directory
    let store = SimpleStore::in_dir(file.path().join("nested"));

    store.init().await.expect("Simple store init must not fail");

    let result = store
        .add(Collection::Clients, json!({ "id": "c1" }))
        .await;
    assert!(matches!(result, Err(ref e) if e.is_unavailable()));
}

#[tokio::test]
async fn test_file_key_value_store() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileKeyValueStore::new(dir.path());
    assert!(kv.prepare().await);

    assert_eq!(kv.get("dealer_pin").await.unwrap(), None);
    kv.set("dealer_pin", "1234").await.unwrap();
    assert_eq!(kv.get("dealer_pin").await.unwrap(), Some("1234".to_string()));

    kv.remove("dealer_pin").await.unwrap();
    kv.remove("dealer_pin").await.unwrap();
    assert_eq!(kv.get("dealer_pin").await.unwrap(), None);
}
