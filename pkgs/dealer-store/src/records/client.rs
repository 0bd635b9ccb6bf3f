//! Buyers and sellers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientType {
    Buyer,
    Seller,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(rename = "type")]
    pub kind: ClientType,
    pub budget: f64,
    #[serde(default)]
    pub budget_notes: String,
    #[serde(default)]
    pub additional_notes: String,
    /// Weak reference to a property of interest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
