//! MongoDB transport for the remote store

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::{doc, to_document, Bson, Document as BsonDocument};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection as MongoCollection, Database};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::backend::{generate_id, BackendKind, Collection, Document};
use crate::error::{Result, StoreError};
use crate::remote_store::{DocumentClient, RemoteIdentity};
use crate::RemoteConfig;

const DUPLICATE_KEY: i32 = 11000;

struct Connection {
    db: Database,
    user: Option<String>,
}

pub struct MongoDocumentClient {
    config: RemoteConfig,
    conn: OnceCell<Connection>,
}

impl MongoDocumentClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&Connection> {
        self.conn
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.config.uri)
                    .await
                    .map_err(unavailable)?;
                options.app_name = Some(self.config.app_name.clone());
                options.server_selection_timeout =
                    Some(Duration::from_secs(self.config.connect_timeout_seconds));

                let user = options
                    .credential
                    .as_ref()
                    .and_then(|c| c.username.clone());
                let client = Client::with_options(options).map_err(unavailable)?;
                let db = client.database(&self.config.database);

                debug!("MongoDB client created for {}", self.config.database);
                Ok(Connection { db, user })
            })
            .await
    }

    async fn collection(&self, collection: Collection) -> Result<MongoCollection<BsonDocument>> {
        let conn = self.connection().await?;
        Ok(conn.db.collection::<BsonDocument>(collection.name()))
    }
}

#[async_trait]
impl DocumentClient for MongoDocumentClient {
    async fn sign_in(&self) -> Result<RemoteIdentity> {
        let conn = self.connection().await?;
        conn.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(unavailable)?;

        let identity = match &conn.user {
            Some(user) => RemoteIdentity {
                uid: user.clone(),
                anonymous: false,
            },
            None => RemoteIdentity {
                uid: format!("anonymous-{}", generate_id()),
                anonymous: true,
            },
        };
        info!("Connected to MongoDB database {}", self.config.database);
        Ok(identity)
    }

    async fn fetch_all(&self, collection: Collection) -> Result<Vec<Document>> {
        let coll = self.collection(collection).await?;
        let mut cursor = coll.find(doc! {}).await.map_err(unavailable)?;

        let mut documents = Vec::new();
        while let Some(item) = cursor.next().await {
            let bson_doc = item.map_err(unavailable)?;
            documents.push(to_json(bson_doc));
        }
        Ok(documents)
    }

    async fn insert(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        let coll = self.collection(collection).await?;
        let mut bson_doc = to_bson(&document)?;
        bson_doc.insert("_id", id);

        coll.insert_one(bson_doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::duplicate_id(collection, id)
            } else {
                unavailable(e)
            }
        })?;
        Ok(())
    }

    async fn replace(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        let coll = self.collection(collection).await?;
        let mut replacement = to_bson(&document)?;
        replacement.remove("_id");

        coll.replace_one(doc! { "_id": id }, replacement)
            .upsert(true)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        let coll = self.collection(collection).await?;
        coll.delete_one(doc! { "_id": id })
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: mongodb::error::Error) -> StoreError {
    StoreError::unavailable(BackendKind::Remote, e)
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn to_bson(document: &Document) -> Result<BsonDocument> {
    to_document(document).map_err(|e| StoreError::Validation(e.to_string()))
}

/// Convert a stored document back to JSON, exposing `_id` as `id`
fn to_json(bson_doc: BsonDocument) -> Document {
    let mut value = Bson::Document(bson_doc).into_relaxed_extjson();
    if let Value::Object(map) = &mut value {
        if let Some(raw_id) = map.remove("_id") {
            if !map.contains_key("id") {
                let id = match raw_id {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                map.insert("id".to_string(), Value::String(id));
            }
        }
    }
    value
}
