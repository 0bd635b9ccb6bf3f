//! Dealer store - typed CRUD over the five collections
//!
//! The store owns the [`BackendSelector`] and an in-memory mirror of every
//! collection. Mutations always go to the backend first and touch the mirror
//! only once the backend has accepted them, so a failed call leaves the
//! mirror at the last state the backend confirmed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::backend::{generate_id, BackendKind, StoreBackend};
use crate::embedded_store::EmbeddedStore;
use crate::error::{Result, StoreError};
use crate::records::{Client, Deal, Property, Record, Reminder, Renting};
use crate::remote_store::RemoteStore;
use crate::selector::{BackendSelector, SelectorState};
use crate::sequence::{next_code, PROPERTY_PREFIX, RENTING_PREFIX};
use crate::simple_store::SimpleStore;
use crate::StoreConfig;

/// In-memory mirror of every collection
#[derive(Default)]
pub struct RecordCache {
    properties: RwLock<Vec<Property>>,
    clients: RwLock<Vec<Client>>,
    rentings: RwLock<Vec<Renting>>,
    deals: RwLock<Vec<Deal>>,
    reminders: RwLock<Vec<Reminder>>,
}

/// A record type the store keeps a mirror of
pub trait CachedRecord: Record {
    fn slot(cache: &RecordCache) -> &RwLock<Vec<Self>>;

    /// Give a new record its sequential code if it has none
    fn fill_code(&mut self, _cache: &RecordCache) -> Result<()> {
        Ok(())
    }
}

macro_rules! impl_cached {
    ($ty:ty, $field:ident) => {
        impl CachedRecord for $ty {
            fn slot(cache: &RecordCache) -> &RwLock<Vec<Self>> {
                &cache.$field
            }
        }
    };
    ($ty:ty, $field:ident, $code:ident, $prefix:expr) => {
        impl CachedRecord for $ty {
            fn slot(cache: &RecordCache) -> &RwLock<Vec<Self>> {
                &cache.$field
            }

            fn fill_code(&mut self, cache: &RecordCache) -> Result<()> {
                if self.$code.is_empty() {
                    self.$code = cache.next_code::<Self>($prefix, |r| &r.$code)?;
                }
                Ok(())
            }
        }
    };
}

impl_cached!(Property, properties, property_id, PROPERTY_PREFIX);
impl_cached!(Client, clients);
impl_cached!(Renting, rentings, renting_id, RENTING_PREFIX);
impl_cached!(Deal, deals);
impl_cached!(Reminder, reminders);

impl RecordCache {
    fn next_code<T: CachedRecord>(
        &self,
        prefix: &str,
        code: fn(&T) -> &String,
    ) -> Result<String> {
        let records = T::slot(self).read();
        next_code(prefix, records.iter().map(|r| code(r).as_str()))
    }
}

/// Point-in-time copy of every collection, for reports and exports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub properties: Vec<Property>,
    pub clients: Vec<Client>,
    pub rentings: Vec<Renting>,
    pub deals: Vec<Deal>,
    pub reminders: Vec<Reminder>,
}

pub struct DealerStore {
    selector: BackendSelector,
    cache: RecordCache,
    initialized: AtomicBool,
}

impl DealerStore {
    pub fn new(selector: BackendSelector) -> Self {
        Self {
            selector,
            cache: RecordCache::default(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Store with the standard backend set described by `config`
    pub fn with_config(config: &StoreConfig) -> Self {
        let mut selector = BackendSelector::new(config.policy);
        if let Some(remote) = &config.remote {
            selector = selector.with_backend(Arc::new(RemoteStore::mongo(remote.clone())));
        }
        let selector = selector
            .with_backend(Arc::new(EmbeddedStore::new(config.db_path.clone())))
            .with_backend(Arc::new(SimpleStore::in_dir(config.data_dir.clone())));

        Self::new(selector)
    }

    /// Select a backend and load every collection.
    ///
    /// Load failures are logged and leave that collection empty; they never
    /// trigger a different backend. Returns the selected backend, if any.
    pub async fn init(&self) -> Option<BackendKind> {
        let selected = self.selector.select().await;

        if selected.is_some() {
            if let Err(e) = self.load_all().await {
                warn!("Initial load incomplete: {}", e);
            }
        } else {
            warn!("No backend available; starting with empty collections");
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!("Dealer store initialized (backend: {:?})", selected);
        selected
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn active_backend(&self) -> Option<BackendKind> {
        self.selector.active_kind()
    }

    pub fn selector_state(&self) -> SelectorState {
        self.selector.state()
    }

    fn backend(&self) -> Result<Arc<dyn StoreBackend>> {
        self.selector.active()
    }

    fn failed(&self, action: &str, collection: &str, err: StoreError) -> StoreError {
        error!("Failed to {} {}: {}", action, collection, err);
        self.selector.record_failure(&err);
        err
    }

    /// Replace the mirror of one collection with the backend's contents
    pub async fn load<T: CachedRecord>(&self) -> Result<usize> {
        let collection = T::COLLECTION;
        let documents = self
            .backend()?
            .get_all(collection)
            .await
            .map_err(|e| self.failed("load", collection.name(), e))?;

        let records: Vec<T> = documents
            .into_iter()
            .filter_map(|document| match T::from_document(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping record: {}", e);
                    None
                }
            })
            .collect();

        let count = records.len();
        *T::slot(&self.cache).write() = records;
        debug!("Loaded {} {}", count, collection);
        Ok(count)
    }

    /// Reload every collection. All five are attempted; the first error is returned.
    pub async fn load_all(&self) -> Result<()> {
        let results = [
            self.load::<Property>().await.map(|_| ()),
            self.load::<Client>().await.map(|_| ()),
            self.load::<Renting>().await.map(|_| ()),
            self.load::<Deal>().await.map(|_| ()),
            self.load::<Reminder>().await.map(|_| ()),
        ];

        results.into_iter().collect()
    }

    /// Persist a new record, generating its id and sequential code if empty.
    /// Returns the stored record.
    pub async fn add<T: CachedRecord>(&self, mut record: T) -> Result<T> {
        if record.id().is_empty() {
            record.set_id(generate_id());
        }
        record.fill_code(&self.cache)?;
        let collection = T::COLLECTION;
        let document = record.to_document()?;

        self.backend()?
            .add(collection, document)
            .await
            .map_err(|e| self.failed("add to", collection.name(), e))?;

        T::slot(&self.cache).write().push(record.clone());
        debug!("Cached new {}/{}", collection, record.id());
        Ok(record)
    }

    /// Replace a whole record by id
    pub async fn update<T: CachedRecord>(&self, record: T) -> Result<()> {
        if record.id().is_empty() {
            return Err(StoreError::Validation("record has no id".to_string()));
        }
        let collection = T::COLLECTION;
        let document = record.to_document()?;

        self.backend()?
            .update(collection, document)
            .await
            .map_err(|e| self.failed("update", collection.name(), e))?;

        let mut cached = T::slot(&self.cache).write();
        match cached.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => cached.push(record),
        }
        Ok(())
    }

    /// Remove a record by id; unknown ids are not an error
    pub async fn delete<T: CachedRecord>(&self, id: &str) -> Result<()> {
        let collection = T::COLLECTION;

        self.backend()?
            .delete(collection, id)
            .await
            .map_err(|e| self.failed("delete from", collection.name(), e))?;

        T::slot(&self.cache).write().retain(|r| r.id() != id);
        Ok(())
    }

    pub fn list<T: CachedRecord>(&self) -> Vec<T> {
        T::slot(&self.cache).read().clone()
    }

    pub fn get<T: CachedRecord>(&self, id: &str) -> Option<T> {
        T::slot(&self.cache)
            .read()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn properties(&self) -> Vec<Property> {
        self.list()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.list()
    }

    pub fn rentings(&self) -> Vec<Renting> {
        self.list()
    }

    pub fn deals(&self) -> Vec<Deal> {
        self.list()
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.list()
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            properties: self.properties(),
            clients: self.clients(),
            rentings: self.rentings(),
            deals: self.deals(),
            reminders: self.reminders(),
        }
    }

    /// Code for the next property, from the mirrored codes
    pub fn next_property_code(&self) -> Result<String> {
        self.cache
            .next_code::<Property>(PROPERTY_PREFIX, |p| &p.property_id)
    }

    /// Code for the next rental listing
    pub fn next_renting_code(&self) -> Result<String> {
        self.cache
            .next_code::<Renting>(RENTING_PREFIX, |r| &r.renting_id)
    }

    /// Flip a reminder's completion flag. Returns the new value.
    pub async fn toggle_reminder(&self, id: &str) -> Result<bool> {
        let mut reminder = self
            .get::<Reminder>(id)
            .ok_or_else(|| StoreError::Validation(format!("no reminder with id '{}'", id)))?;
        reminder.completed = !reminder.completed;
        let completed = reminder.completed;

        self.update(reminder).await?;
        debug!("Reminder {} completed: {}", id, completed);
        Ok(completed)
    }

    /// Flip an installment of a deal between paid and unpaid. Returns the new value.
    pub async fn toggle_payment(&self, deal_id: &str, installment_id: &str) -> Result<bool> {
        let mut deal = self
            .get::<Deal>(deal_id)
            .ok_or_else(|| StoreError::Validation(format!("no deal with id '{}'", deal_id)))?;
        let paid = deal.toggle_payment(installment_id, Utc::now())?;

        self.update(deal).await?;
        debug!("Installment {}/{} paid: {}", deal_id, installment_id, paid);
        Ok(paid)
    }
}
