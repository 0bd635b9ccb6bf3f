//! The storage contract shared by every backend
//!
//! Documents crossing this boundary are JSON objects carrying a string `id`.
//! Typed records are converted to and from documents by the facade, so an
//! adapter never needs to know the shape of a property or a deal.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

/// A stored record in its serialized form
pub type Document = Value;

/// The concrete persistence media, in selection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    Remote,
    Embedded,
    Simple,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Remote => "Remote",
            BackendKind::Embedded => "Embedded",
            BackendKind::Simple => "Simple",
        };
        f.write_str(name)
    }
}

/// The five record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Properties,
    Clients,
    Rentings,
    Deals,
    Reminders,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Properties,
        Collection::Clients,
        Collection::Rentings,
        Collection::Deals,
        Collection::Reminders,
    ];

    /// Table, document-collection and key name used by every backend
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Properties => "properties",
            Collection::Clients => "clients",
            Collection::Rentings => "rentings",
            Collection::Deals => "deals",
            Collection::Reminders => "reminders",
        }
    }

    /// Secondary index columns as `(column, document field)` pairs
    pub fn indexed_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Collection::Properties => &[
                ("property_code", "propertyId"),
                ("status", "status"),
                ("kind", "type"),
            ],
            Collection::Clients => &[("name", "name"), ("mobile", "mobile"), ("kind", "type")],
            Collection::Rentings => &[
                ("renting_code", "rentingId"),
                ("property_type", "propertyType"),
                ("availability_status", "availabilityStatus"),
            ],
            Collection::Deals => &[
                ("property_id", "propertyId"),
                ("buyer_id", "buyerId"),
                ("seller_id", "sellerId"),
            ],
            Collection::Reminders => &[
                ("due_date", "dueDate"),
                ("kind", "type"),
                ("completed", "completed"),
            ],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform CRUD surface over named collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every document in the collection; order is unspecified
    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>>;

    /// Persist a new document, generating an id when it has none. Returns the id.
    async fn add(&self, collection: Collection, document: Document) -> Result<String>;

    /// Upsert a whole document by its id
    async fn update(&self, collection: Collection, document: Document) -> Result<()>;

    /// Remove by id; a missing id is not an error
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

/// A record store that can take part in backend selection
#[async_trait]
pub trait StoreBackend: RecordStore {
    fn kind(&self) -> BackendKind;

    /// Open or connect the medium. Called once by the selector.
    async fn init(&self) -> Result<()>;
}

/// Read the string id of a document, if it has a non-empty one
pub fn document_id(document: &Document) -> Option<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Make sure a document is an object with a non-empty `id`, generating one if needed
pub fn ensure_document_id(document: &mut Document) -> Result<String> {
    if let Some(id) = document_id(document) {
        return Ok(id.to_string());
    }

    let object = document
        .as_object_mut()
        .ok_or_else(|| StoreError::Validation("document is not a JSON object".to_string()))?;
    let id = generate_id();
    object.insert("id".to_string(), Value::String(id.clone()));
    Ok(id)
}

/// Read the id of a document that must already carry one
pub fn require_document_id(document: &Document) -> Result<String> {
    if !document.is_object() {
        return Err(StoreError::Validation(
            "document is not a JSON object".to_string(),
        ));
    }
    document_id(document)
        .map(str::to_string)
        .ok_or_else(|| StoreError::Validation("document has no id".to_string()))
}

/// Generate a fresh record id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
