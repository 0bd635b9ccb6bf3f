//! Rental listings, independent of the property collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentingType {
    House,
    Plot,
    Flat,
    Apartment,
    Shop,
    Office,
    Warehouse,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentingSizeUnit {
    Marla,
    Kanal,
    Sqft,
    Sqm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Furnishing {
    Furnished,
    #[serde(rename = "Semi-Furnished")]
    SemiFurnished,
    Unfurnished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Available,
    Rented,
    #[serde(rename = "Under Negotiation")]
    UnderNegotiation,
    Maintenance,
    Reserved,
}

/// Lease length and payment cadence share one set of periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeasePeriod {
    Monthly,
    Quarterly,
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
    Yearly,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentingLocation {
    pub city: String,
    pub area: String,
    pub street: String,
    #[serde(default)]
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentingSize {
    pub value: f64,
    pub unit: RentingSizeUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentingOwner {
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseDuration {
    #[serde(rename = "type")]
    pub kind: LeasePeriod,
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renting {
    pub id: String,
    /// Human readable sequential code, `R-NNN`
    pub renting_id: String,
    pub property_type: RentingType,
    pub title: String,
    pub location: RentingLocation,
    pub size: RentingSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    pub rent_amount: f64,
    pub security_deposit: f64,
    pub furnished: Furnishing,
    pub availability_status: AvailabilityStatus,
    pub owner: RentingOwner,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub lease_duration: LeaseDuration,
    pub payment_schedule: LeasePeriod,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
