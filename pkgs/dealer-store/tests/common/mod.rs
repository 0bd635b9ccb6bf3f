// Copyright 2025 Dealer Store Authors.
//
// Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dealer_store::{
    AvailabilityStatus, BackendKind, Client, ClientType, Collection, Deal, DealStatus,
    Document, DocumentClient, Furnishing, LeaseDuration, LeasePeriod, PaymentInstallment,
    Property, PropertyLocation, PropertySize, PropertyStatus, PropertyType, RecordStore,
    RelatedRecord, RelatedType, RemoteIdentity, Reminder, ReminderType, Renting,
    RentingLocation, RentingOwner, RentingSize, RentingSizeUnit, RentingType, SimpleStore,
    SizeUnit, StoreBackend, StoreError,
};
use parking_lot::Mutex;
use serde_json::Value;
use tempfile::NamedTempFile;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
}

pub fn sqlite_url(path: &NamedTempFile) -> String {
    format!(
        "sqlite:{}?mode=rwc",
        path.path().to_str().unwrap().replace("\\", "/")
    )
}

pub fn sample_property(id: &str, code: &str, status: PropertyStatus) -> Property {
    Property {
        id: id.to_string(),
        property_id: code.to_string(),
        name: format!("Plot {}", code),
        phone_number: "0300-1111111".to_string(),
        location: PropertyLocation {
            city: "Lahore".to_string(),
            area: "DHA Phase 6".to_string(),
            street: "Street 12".to_string(),
        },
        kind: PropertyType::Plot,
        size: PropertySize {
            value: 10.0,
            unit: SizeUnit::Marla,
        },
        price: 18_500_000.0,
        status,
        notes: "corner plot".to_string(),
        remarks: None,
        images: Vec::new(),
        documents: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn sample_client(id: &str, name: &str, kind: ClientType) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        mobile: "0321-2222222".to_string(),
        whatsapp: String::new(),
        kind,
        budget: 20_000_000.0,
        budget_notes: "flexible".to_string(),
        additional_notes: String::new(),
        property_id: None,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn sample_renting(id: &str, code: &str) -> Renting {
    Renting {
        id: id.to_string(),
        renting_id: code.to_string(),
        property_type: RentingType::Apartment,
        title: "Two bed apartment".to_string(),
        location: RentingLocation {
            city: "Karachi".to_string(),
            area: "Clifton".to_string(),
            street: "Block 4".to_string(),
            full_address: String::new(),
        },
        size: RentingSize {
            value: 1200.0,
            unit: RentingSizeUnit::Sqft,
        },
        bedrooms: Some(2),
        bathrooms: None,
        rent_amount: 85_000.0,
        security_deposit: 170_000.0,
        furnished: Furnishing::SemiFurnished,
        availability_status: AvailabilityStatus::Available,
        owner: RentingOwner {
            name: "Bilal".to_string(),
            mobile: "0333-3333333".to_string(),
            whatsapp: None,
            email: None,
        },
        amenities: vec!["parking".to_string()],
        lease_duration: LeaseDuration {
            kind: LeasePeriod::Yearly,
            value: 1,
            custom_period: None,
        },
        payment_schedule: LeasePeriod::Monthly,
        additional_notes: String::new(),
        images: Vec::new(),
        documents: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn installment(id: &str, amount: f64, due_in_days: i64, paid: bool) -> PaymentInstallment {
    PaymentInstallment {
        id: id.to_string(),
        amount,
        due_date: fixed_time() + Duration::days(due_in_days),
        paid,
        paid_date: None,
        notes: None,
    }
}

pub fn sample_deal(id: &str, property_id: &str, buyer_id: &str, seller_id: &str) -> Deal {
    Deal {
        id: id.to_string(),
        property_id: property_id.to_string(),
        buyer_id: buyer_id.to_string(),
        seller_id: seller_id.to_string(),
        agreed_price: 18_000_000.0,
        payment_schedule: vec![
            installment("i1", 6_000_000.0, 0, true),
            installment("i2", 6_000_000.0, 30, false),
            installment("i3", 6_000_000.0, 60, false),
        ],
        commission: Some(180_000.0),
        agreement_files: Vec::new(),
        status: DealStatus::Active,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn sample_reminder(id: &str, due_in_days: i64, related: RelatedRecord) -> Reminder {
    Reminder {
        id: id.to_string(),
        kind: ReminderType::FollowUp,
        title: format!("Reminder {}", id),
        description: String::new(),
        due_date: fixed_time() + Duration::days(due_in_days),
        completed: false,
        related_to: related,
        created_at: fixed_time(),
    }
}

pub fn related(kind: RelatedType, id: &str) -> RelatedRecord {
    RelatedRecord {
        kind,
        id: id.to_string(),
    }
}

/// In-memory stand-in for the hosted document database
#[derive(Default)]
pub struct MemoryDocumentClient {
    documents: Mutex<HashMap<Collection, Vec<Document>>>,
    /// Every document as it reached the transport
    pub writes: Mutex<Vec<Document>>,
    pub offline: AtomicBool,
    pub sign_ins: AtomicUsize,
}

impl MemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        let client = Self::default();
        client.offline.store(true, Ordering::SeqCst);
        client
    }

    fn check_online(&self) -> dealer_store::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::unavailable(BackendKind::Remote, "network unreachable"))
        } else {
            Ok(())
        }
    }
}

fn id_of(document: &Document) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

#[async_trait]
impl DocumentClient for MemoryDocumentClient {
    async fn sign_in(&self) -> dealer_store::Result<RemoteIdentity> {
        self.check_online()?;
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteIdentity {
            uid: "anonymous-test".to_string(),
            anonymous: true,
        })
    }

    async fn fetch_all(&self, collection: Collection) -> dealer_store::Result<Vec<Document>> {
        self.check_online()?;
        Ok(self
            .documents
            .lock()
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> dealer_store::Result<()> {
        self.check_online()?;
        self.writes.lock().push(document.clone());

        let mut documents = self.documents.lock();
        let stored = documents.entry(collection).or_default();
        if stored.iter().any(|d| id_of(d) == Some(id)) {
            return Err(StoreError::duplicate_id(collection, id));
        }
        stored.push(document);
        Ok(())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> dealer_store::Result<()> {
        self.check_online()?;
        self.writes.lock().push(document.clone());

        let mut documents = self.documents.lock();
        let stored = documents.entry(collection).or_default();
        match stored.iter_mut().find(|d| id_of(d) == Some(id)) {
            Some(existing) => *existing = document,
            None => stored.push(document),
        }
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> dealer_store::Result<()> {
        self.check_online()?;
        if let Some(stored) = self.documents.lock().get_mut(&collection) {
            stored.retain(|d| id_of(d) != Some(id));
        }
        Ok(())
    }
}

/// Backend that can be told to fail at init or on every operation
pub struct FlakyBackend {
    kind: BackendKind,
    inner: SimpleStore,
    pub fail_init: AtomicBool,
    pub fail_ops: AtomicBool,
    pub init_calls: AtomicUsize,
}

impl FlakyBackend {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            inner: SimpleStore::in_memory(),
            fail_init: AtomicBool::new(false),
            fail_ops: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_init(kind: BackendKind) -> Self {
        let backend = Self::new(kind);
        backend.fail_init.store(true, Ordering::SeqCst);
        backend
    }

    fn check(&self) -> dealer_store::Result<()> {
        if self.fail_ops.load(Ordering::SeqCst) {
            Err(StoreError::unavailable(self.kind, "injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyBackend {
    async fn get_all(&self, collection: Collection) -> dealer_store::Result<Vec<Document>> {
        self.check()?;
        self.inner.get_all(collection).await
    }

    async fn add(&self, collection: Collection, document: Document) -> dealer_store::Result<String> {
        self.check()?;
        self.inner.add(collection, document).await
    }

    async fn update(&self, collection: Collection, document: Document) -> dealer_store::Result<()> {
        self.check()?;
        self.inner.update(collection, document).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> dealer_store::Result<()> {
        self.check()?;
        self.inner.delete(collection, id).await
    }
}

#[async_trait]
impl StoreBackend for FlakyBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn init(&self) -> dealer_store::Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(self.kind, "injected init failure"));
        }
        Ok(())
    }
}
