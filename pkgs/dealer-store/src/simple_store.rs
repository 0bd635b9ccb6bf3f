//! Simple store - each collection is one JSON array under a fixed key
//!
//! Every mutation reads the whole blob, changes it and writes it back. The
//! store serializes its own read-modify-write cycles, but two processes
//! sharing one key-value directory can still lose each other's writes. That
//! is accepted for a single-user, single-window book.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::{
    document_id, ensure_document_id, require_document_id, BackendKind, Collection, Document,
    RecordStore, StoreBackend,
};
use crate::error::{Result, StoreError};
use crate::key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

pub struct SimpleStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SimpleStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Store keeping one file per collection in `dir`
    pub fn in_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(dir)))
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Document>> {
        let Some(blob) = self.kv.get(collection.name()).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Document>>(&blob) {
            Ok(documents) => Ok(documents),
            Err(e) => {
                warn!(
                    "Stored {} blob is unreadable, treating it as empty: {}",
                    collection, e
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, collection: Collection, documents: &[Document]) -> Result<()> {
        let blob = serde_json::to_string(documents)
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        self.kv.set(collection.name(), &blob).await
    }
}

#[async_trait]
impl RecordStore for SimpleStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>> {
        let documents = self.load(collection).await?;
        debug!("Read {} {} from simple store", documents.len(), collection);
        Ok(documents)
    }

    async fn add(&self, collection: Collection, mut document: Document) -> Result<String> {
        let id = ensure_document_id(&mut document)?;

        let _guard = self.write_lock.lock().await;
        let mut documents = self.load(collection).await?;
        if documents.iter().any(|d| document_id(d) == Some(id.as_str())) {
            return Err(StoreError::duplicate_id(collection, id));
        }
        documents.push(document);
        self.save(collection, &documents).await?;

        debug!("Added {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: Collection, document: Document) -> Result<()> {
        let id = require_document_id(&document)?;

        let _guard = self.write_lock.lock().await;
        let mut documents = self.load(collection).await?;
        match documents
            .iter_mut()
            .find(|d| document_id(d) == Some(id.as_str()))
        {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        self.save(collection, &documents).await?;

        debug!("Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.load(collection).await?;
        let before = documents.len();
        documents.retain(|d| document_id(d) != Some(id));

        if documents.len() != before {
            self.save(collection, &documents).await?;
        }

        debug!("Deleted {}/{}", collection, id);
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for SimpleStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Simple
    }

    /// Never fails; an unusable medium shows up on the first operation instead.
    async fn init(&self) -> Result<()> {
        if self.kv.prepare().await {
            info!("Simple store ready");
        } else {
            warn!("Simple store selected on an unusable medium");
        }
        Ok(())
    }
}
