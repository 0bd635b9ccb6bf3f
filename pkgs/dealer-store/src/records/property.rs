//! Property listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Plot,
    House,
    Shop,
    Flat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    Available,
    Sold,
    Rented,
    #[serde(rename = "On Hold")]
    OnHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    Marla,
    Kanal,
    Sqft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemarksType {
    Sold,
    #[serde(rename = "On Rent")]
    OnRent,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyLocation {
    pub city: String,
    pub area: String,
    pub street: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySize {
    pub value: f64,
    pub unit: SizeUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remarks {
    #[serde(rename = "type")]
    pub kind: RemarksType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    /// Human readable sequential code, `P-NNN`
    pub property_id: String,
    pub name: String,
    pub phone_number: String,
    pub location: PropertyLocation,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub size: PropertySize,
    pub price: f64,
    pub status: PropertyStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Remarks>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyStatus {
    /// Status implied by a remarks selection
    pub fn from_remarks(kind: RemarksType) -> Self {
        match kind {
            RemarksType::Sold => PropertyStatus::Sold,
            RemarksType::OnRent => PropertyStatus::Rented,
            RemarksType::Other => PropertyStatus::Available,
        }
    }
}

impl Property {
    /// Set remarks and move the status to match them.
    ///
    /// Free text survives only for `Other`.
    pub fn apply_remarks(&mut self, kind: RemarksType, custom_text: Option<String>) {
        self.status = PropertyStatus::from_remarks(kind);
        self.remarks = Some(Remarks {
            kind,
            custom_text: match kind {
                RemarksType::Other => Some(custom_text.unwrap_or_default()),
                _ => None,
            },
        });
        self.updated_at = Utc::now();
    }

    /// `"area, city"` as used in reports
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.location.area, self.location.city)
    }

    /// `"5 Marla"` as used in reports
    pub fn size_label(&self) -> String {
        format!("{} {:?}", self.size.value, self.size.unit)
    }
}
