//! Dealer Store - Persistence for a property dealer's book of business
//!
//! This crate keeps properties, clients, rental listings, deals and reminders
//! in one of three interchangeable backends and exposes them through a single
//! typed facade.
//!
//! # Architecture
//!
//! - **DealerStore**: The facade. Typed CRUD, in-memory mirror per collection
//! - **BackendSelector**: Picks the first backend that initializes and sticks to it
//! - **RemoteStore**: Hosted document database (MongoDB) with value sanitization
//! - **EmbeddedStore**: SQLite through Sea-ORM, schema managed by migrations
//! - **SimpleStore**: One JSON blob per collection in a key-value store
//! - **AccessGate**: Local PIN check over the key-value store
//!
//! Reports, backups and CSV export work on a [`BookSnapshot`] of the facade.
//!
//! # Database Schema
//!
//! The embedded backend creates one table per collection:
//!
//! - `properties`: indexed by property code (unique), status and type
//! - `clients`: indexed by name, mobile and type
//! - `rentings`: indexed by renting code (unique), property type and availability
//! - `deals`: indexed by property, buyer and seller
//! - `reminders`: indexed by due date, type and completion
//!
//! Each row carries the full record as JSON next to its indexed columns.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dealer_store::{Client, ClientType, DealerStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig {
//!     db_path: "dealer.db".into(),
//!     ..Default::default()
//! };
//!
//! let store = DealerStore::with_config(&config);
//! store.init().await;
//!
//! let client = Client {
//!     id: String::new(),
//!     name: "Ayesha Khan".to_string(),
//!     mobile: "0300-1234567".to_string(),
//!     whatsapp: String::new(),
//!     kind: ClientType::Buyer,
//!     budget: 2_500_000.0,
//!     budget_notes: String::new(),
//!     additional_notes: String::new(),
//!     property_id: None,
//!     created_at: chrono::Utc::now(),
//!     updated_at: chrono::Utc::now(),
//! };
//! let client = store.add(client).await?;
//! println!("stored client {}", client.id);
//! # Ok(())
//! # }
//! ```

pub mod access_gate;
pub mod backend;
pub mod backup;
pub mod dealer_store;
pub mod embedded_store;
pub mod error;
pub mod export;
pub mod key_value;
pub mod migration;
pub mod mongo_client;
pub mod records;
pub mod remote_store;
pub mod reports;
pub mod selector;
pub mod sequence;
pub mod simple_store;

pub use access_gate::AccessGate;
pub use backend::{BackendKind, Collection, Document, RecordStore, StoreBackend};
pub use dealer_store::{BookSnapshot, CachedRecord, DealerStore};
pub use embedded_store::EmbeddedStore;
pub use error::{Result, StoreError};
pub use export::{export_csv, row, to_csv, CsvRow};
pub use key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use mongo_client::MongoDocumentClient;
pub use records::*;
pub use remote_store::{strip_absent, DocumentClient, RemoteIdentity, RemoteStore};
pub use selector::{BackendSelector, FallbackPolicy, SelectorState};
pub use simple_store::SimpleStore;

/// Connection settings for the remote backend
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// MongoDB connection string
    pub uri: String,

    /// Database holding the five collections
    pub database: String,

    /// Application name reported to the server
    pub app_name: String,

    /// Server selection timeout in seconds (default: 5s)
    pub connect_timeout_seconds: u64,
}

impl RemoteConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            ..Default::default()
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "property_dealer".to_string(),
            app_name: "dealer-store".to_string(),
            connect_timeout_seconds: 5,
        }
    }
}

/// Configuration for the storage layer
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: std::path::PathBuf,

    /// Directory for the key-value fallback and the access PIN
    pub data_dir: std::path::PathBuf,

    /// Remote backend; `None` skips straight to the local backends
    pub remote: Option<RemoteConfig>,

    /// What to do when the remote backend does not come up
    pub policy: FallbackPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::path::PathBuf::from("dealer-store.db"),
            data_dir: std::path::PathBuf::from("dealer-data"),
            remote: None,
            policy: FallbackPolicy::Cascade,
        }
    }
}
