//! Embedded store - one SQLite table per collection through Sea-ORM
//!
//! Each row keeps the whole record as JSON in `data` next to a handful of
//! indexed columns copied out of the document. The database is opened lazily
//! and brought up to the current schema version by the migrator.

use std::path::PathBuf;

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, OnConflict, Order, Query, SimpleExpr};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::backend::{
    ensure_document_id, require_document_id, BackendKind, Collection, Document, RecordStore,
    StoreBackend,
};
use crate::error::{Result, StoreError};
use crate::migration::{Migrator, MigratorTrait};

/// SQLite-backed record store
pub struct EmbeddedStore {
    url: String,
    db: OnceCell<DatabaseConnection>,
}

impl EmbeddedStore {
    /// Store backed by a database file, created on first open
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        let db_path: PathBuf = db_path.into();
        let url = format!(
            "sqlite:{}?mode=rwc",
            db_path.to_string_lossy().replace('\\', "/")
        );
        Self::with_url(url)
    }

    /// Store backed by any SQLite connection string
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            db: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&DatabaseConnection> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::connect(&self.url)
                    .await
                    .map_err(|e| StoreError::unavailable(BackendKind::Embedded, e))?;

                Migrator::up(&db, None)
                    .await
                    .map_err(|e| StoreError::unavailable(BackendKind::Embedded, e))?;

                info!("Embedded store opened at {}", self.url);
                Ok(db)
            })
            .await
    }

    /// Documents whose indexed `field` equals `value`.
    ///
    /// `field` may be the column name or the document field it mirrors.
    pub async fn find_by_index(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        let column = collection
            .indexed_fields()
            .iter()
            .find(|(column, doc_field)| *column == field || *doc_field == field)
            .map(|(column, _)| *column)
            .ok_or_else(|| {
                StoreError::Validation(format!("{} has no index on '{}'", collection, field))
            })?;

        let db = self.connection().await?;
        let select = Query::select()
            .column(Alias::new("data"))
            .from(Alias::new(collection.name()))
            .and_where(Expr::col(Alias::new(column)).eq(value.to_string()))
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .to_owned();

        let rows = db
            .query_all(db.get_database_backend().build(&select))
            .await
            .map_err(unavailable)?;

        Ok(decode_rows(collection, rows))
    }

    async fn write(
        &self,
        collection: Collection,
        id: &str,
        document: &Document,
        upsert: bool,
    ) -> Result<()> {
        let db = self.connection().await?;
        let now = chrono::Utc::now().timestamp_millis();
        let data = serde_json::to_string(document)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let mut columns = vec![
            Alias::new("id"),
            Alias::new("data"),
            Alias::new("created_at"),
            Alias::new("updated_at"),
        ];
        let mut values: Vec<SimpleExpr> = vec![
            id.to_string().into(),
            data.into(),
            now.into(),
            now.into(),
        ];
        for (column, field) in collection.indexed_fields() {
            columns.push(Alias::new(*column));
            values.push(index_value(document.get(*field)).into());
        }

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(collection.name()))
            .columns(columns);
        insert
            .values(values)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        if upsert {
            // created_at keeps its first value
            let mut update_columns = vec![Alias::new("data"), Alias::new("updated_at")];
            update_columns.extend(
                collection
                    .indexed_fields()
                    .iter()
                    .map(|(column, _)| Alias::new(*column)),
            );
            insert.on_conflict(
                OnConflict::column(Alias::new("id"))
                    .update_columns(update_columns)
                    .to_owned(),
            );
        }

        db.execute(db.get_database_backend().build(&insert))
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(message)) => {
                    unique_violation(collection, id, document, &message)
                }
                _ => unavailable(e),
            })?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for EmbeddedStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>> {
        let db = self.connection().await?;
        let select = Query::select()
            .column(Alias::new("data"))
            .from(Alias::new(collection.name()))
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .to_owned();

        let rows = db
            .query_all(db.get_database_backend().build(&select))
            .await
            .map_err(|e| {
                error!("Failed to read {} from embedded store: {}", collection, e);
                unavailable(e)
            })?;

        let documents = decode_rows(collection, rows);
        debug!("Read {} {} from embedded store", documents.len(), collection);
        Ok(documents)
    }

    async fn add(&self, collection: Collection, mut document: Document) -> Result<String> {
        let id = ensure_document_id(&mut document)?;
        self.write(collection, &id, &document, false).await?;
        debug!("Added {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: Collection, document: Document) -> Result<()> {
        let id = require_document_id(&document)?;
        self.write(collection, &id, &document, true).await?;
        debug!("Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let db = self.connection().await?;
        let delete = Query::delete()
            .from_table(Alias::new(collection.name()))
            .and_where(Expr::col(Alias::new("id")).eq(id.to_string()))
            .to_owned();

        let result = db
            .execute(db.get_database_backend().build(&delete))
            .await
            .map_err(unavailable)?;

        debug!(
            "Deleted {}/{} ({} rows)",
            collection,
            id,
            result.rows_affected()
        );
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for EmbeddedStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Embedded
    }

    async fn init(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }
}

fn unavailable(e: DbErr) -> StoreError {
    StoreError::unavailable(BackendKind::Embedded, e)
}

/// Name the column a unique index rejected, e.g. from
/// `UNIQUE constraint failed: properties.property_code`
fn unique_violation(
    collection: Collection,
    id: &str,
    document: &Document,
    message: &str,
) -> StoreError {
    let qualified = |column: &str| format!("{}.{}", collection.name(), column);

    match collection
        .indexed_fields()
        .iter()
        .find(|(column, _)| message.contains(&qualified(column)))
    {
        Some((_, field)) => StoreError::ConstraintViolation {
            collection,
            field: (*field).to_string(),
            value: index_value(document.get(*field)).unwrap_or_default(),
        },
        None => StoreError::duplicate_id(collection, id),
    }
}

/// Text form of a document field for an index column
fn index_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_rows(collection: Collection, rows: Vec<sea_orm::QueryResult>) -> Vec<Document> {
    rows.into_iter()
        .filter_map(|row| {
            let data: String = match row.try_get("", "data") {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping unreadable row in {}: {}", collection, e);
                    return None;
                }
            };
            match serde_json::from_str(&data) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!("Skipping malformed document in {}: {}", collection, e);
                    None
                }
            }
        })
        .collect()
}
