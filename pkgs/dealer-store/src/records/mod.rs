//! Record types for the five collections
//!
//! Field names serialize in camelCase, the document shape every backend
//! persists. Cross-collection ids (`propertyId`, `buyerId`, `relatedTo.id`, ...)
//! are weak references: nothing enforces them and lookups must tolerate
//! dangling values.

pub mod client;
pub mod deal;
pub mod property;
pub mod reminder;
pub mod renting;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{Collection, Document};
use crate::error::{Result, StoreError};

pub use client::{Client, ClientType};
pub use deal::{Deal, DealStatus, PaymentInstallment};
pub use property::{
    Property, PropertyLocation, PropertySize, PropertyStatus, PropertyType, Remarks, RemarksType,
    SizeUnit,
};
pub use reminder::{RelatedRecord, RelatedType, Reminder, ReminderType};
pub use renting::{
    AvailabilityStatus, Furnishing, LeaseDuration, LeasePeriod, Renting, RentingLocation,
    RentingOwner, RentingSize, RentingSizeUnit, RentingType,
};

/// Display value for a weak reference that does not resolve
pub const UNKNOWN: &str = "Unknown";

/// A record that lives in one of the collections
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn to_document(&self) -> Result<Document> {
        serde_json::to_value(self).map_err(|e| {
            StoreError::Validation(format!("cannot serialize {} record: {}", Self::COLLECTION, e))
        })
    }

    fn from_document(document: Document) -> Result<Self> {
        serde_json::from_value(document).map_err(|e| {
            StoreError::Validation(format!("cannot decode {} record: {}", Self::COLLECTION, e))
        })
    }
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_record!(Property, Collection::Properties);
impl_record!(Client, Collection::Clients);
impl_record!(Renting, Collection::Rentings);
impl_record!(Deal, Collection::Deals);
impl_record!(Reminder, Collection::Reminders);

/// Find a record by id in a slice
pub fn find_by_id<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}
