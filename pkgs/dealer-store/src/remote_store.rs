//! Remote store - a hosted document database behind [`DocumentClient`]
//!
//! The remote rejects absent values, so every document is passed through
//! [`strip_absent`] before it is written. A session identity is established
//! once, lazily, before the first read or write.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::backend::{
    ensure_document_id, require_document_id, BackendKind, Collection, Document, RecordStore,
    StoreBackend,
};
use crate::error::Result;
use crate::mongo_client::MongoDocumentClient;
use crate::RemoteConfig;

/// Who the remote session acts as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIdentity {
    pub uid: String,
    pub anonymous: bool,
}

/// Transport to a hosted document database.
///
/// Network and permission failures map to `BackendUnavailable`, a duplicate
/// key on `insert` to `ConstraintViolation`.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Open a session, anonymously if no credentials are configured
    async fn sign_in(&self) -> Result<RemoteIdentity>;

    /// Every document of a collection, each carrying its `id`
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<Document>>;

    /// Create a document under `id`
    async fn insert(&self, collection: Collection, id: &str, document: Document) -> Result<()>;

    /// Store `document` under `id` in place of whatever was there, creating it if missing
    async fn replace(&self, collection: Collection, id: &str, document: Document) -> Result<()>;

    /// Delete the document under `id`, if any
    async fn remove(&self, collection: Collection, id: &str) -> Result<()>;
}

pub struct RemoteStore {
    client: Arc<dyn DocumentClient>,
    identity: OnceCell<RemoteIdentity>,
}

impl RemoteStore {
    pub fn new(client: Arc<dyn DocumentClient>) -> Self {
        Self {
            client,
            identity: OnceCell::new(),
        }
    }

    /// Remote store on MongoDB
    pub fn mongo(config: RemoteConfig) -> Self {
        Self::new(Arc::new(MongoDocumentClient::new(config)))
    }

    /// The session identity, once established
    pub fn identity(&self) -> Option<&RemoteIdentity> {
        self.identity.get()
    }

    async fn ensure_identity(&self) -> Result<&RemoteIdentity> {
        self.identity
            .get_or_try_init(|| async {
                let identity = self.client.sign_in().await?;
                info!(
                    "Remote session established as {} (anonymous: {})",
                    identity.uid, identity.anonymous
                );
                Ok(identity)
            })
            .await
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.ensure_identity().await?;
        let documents = self.client.fetch_all(collection).await.map_err(|e| {
            error!("Remote read of {} failed: {}", collection, e);
            e
        })?;
        debug!("Read {} {} from remote store", documents.len(), collection);
        Ok(documents)
    }

    async fn add(&self, collection: Collection, mut document: Document) -> Result<String> {
        self.ensure_identity().await?;
        let id = ensure_document_id(&mut document)?;

        self.client
            .insert(collection, &id, strip_absent(document))
            .await
            .map_err(|e| {
                error!("Remote add of {}/{} failed: {}", collection, id, e);
                e
            })?;

        debug!("Added {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: Collection, document: Document) -> Result<()> {
        self.ensure_identity().await?;
        let id = require_document_id(&document)?;

        self.client
            .replace(collection, &id, strip_absent(document))
            .await
            .map_err(|e| {
                error!("Remote update of {}/{} failed: {}", collection, id, e);
                e
            })?;

        debug!("Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.ensure_identity().await?;
        self.client.remove(collection, id).await.map_err(|e| {
            error!("Remote delete of {}/{} failed: {}", collection, id, e);
            e
        })?;

        debug!("Deleted {}/{}", collection, id);
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for RemoteStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    /// Establish the session only; a failing read later does not undo selection.
    async fn init(&self) -> Result<()> {
        self.ensure_identity().await.map(|_| ())
    }
}

/// Drop absent (`null`) values recursively, from objects and arrays alike
pub fn strip_absent(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_absent(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_absent)
                .collect(),
        ),
        other => other,
    }
}
