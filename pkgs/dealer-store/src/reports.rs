//! Dashboard figures and report rows
//!
//! Everything here is computed from a [`BookSnapshot`]; nothing touches a
//! backend. Weak references that do not resolve show as [`UNKNOWN`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dealer_store::BookSnapshot;
use crate::export::{row, CsvRow};
use crate::records::{
    find_by_id, AvailabilityStatus, Client, ClientType, DealStatus, Property, PropertyStatus,
    PropertyType, RelatedType, Reminder, ReminderType, Renting, RentingType, UNKNOWN,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_properties: usize,
    pub available_properties: usize,
    pub sold_properties: usize,
    pub rented_properties: usize,
    pub total_clients: usize,
    pub buyers: usize,
    pub sellers: usize,
    pub active_deals: usize,
    pub completed_deals: usize,
    /// Sum of agreed prices over all deals
    pub total_revenue: f64,
    pub total_commission: f64,
}

pub fn summary(book: &BookSnapshot) -> SummaryStats {
    let with_status = |status: PropertyStatus| {
        book.properties
            .iter()
            .filter(|p| p.status == status)
            .count()
    };
    let with_type = |kind: ClientType| book.clients.iter().filter(|c| c.kind == kind).count();
    let deals_in = |status: DealStatus| book.deals.iter().filter(|d| d.status == status).count();

    SummaryStats {
        total_properties: book.properties.len(),
        available_properties: with_status(PropertyStatus::Available),
        sold_properties: with_status(PropertyStatus::Sold),
        rented_properties: with_status(PropertyStatus::Rented),
        total_clients: book.clients.len(),
        buyers: with_type(ClientType::Buyer),
        sellers: with_type(ClientType::Seller),
        active_deals: deals_in(DealStatus::Active),
        completed_deals: deals_in(DealStatus::Completed),
        total_revenue: book.deals.iter().map(|d| d.agreed_price).sum(),
        total_commission: book.deals.iter().map(|d| d.commission_or_zero()).sum(),
    }
}

/// An unpaid installment of some deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDue {
    pub deal_id: String,
    pub property_name: String,
    pub client_name: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
}

/// Unpaid installments across all deals, earliest first
pub fn payments_due(book: &BookSnapshot, now: DateTime<Utc>) -> Vec<PaymentDue> {
    let mut due: Vec<PaymentDue> = book
        .deals
        .iter()
        .flat_map(|deal| {
            let property_name = property_name(book, &deal.property_id);
            let client_name = client_name(book, &deal.buyer_id);

            deal.payment_schedule
                .iter()
                .filter(|payment| !payment.paid)
                .map(move |payment| PaymentDue {
                    deal_id: deal.id.clone(),
                    property_name: property_name.clone(),
                    client_name: client_name.clone(),
                    amount: payment.amount,
                    due_date: payment.due_date,
                    is_overdue: payment.due_date < now,
                })
        })
        .collect();

    due.sort_by_key(|p| p.due_date);
    due
}

pub fn property_name(book: &BookSnapshot, id: &str) -> String {
    find_by_id(&book.properties, id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn client_name(book: &BookSnapshot, id: &str) -> String {
    find_by_id(&book.clients, id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Display name of whatever a reminder points at. A deal resolves to its property.
pub fn related_name(book: &BookSnapshot, reminder: &Reminder) -> String {
    let related = &reminder.related_to;
    match related.kind {
        RelatedType::Property => property_name(book, &related.id),
        RelatedType::Client => client_name(book, &related.id),
        RelatedType::Deal => find_by_id(&book.deals, &related.id)
            .map(|deal| property_name(book, &deal.property_id))
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Short local date (`dd/mm/yyyy`)
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Serialized form of an enum value, e.g. `"On Hold"`
pub(crate) fn label<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub fn available_property_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.properties
        .iter()
        .filter(|p| p.status == PropertyStatus::Available)
        .map(|p| {
            row([
                ("Property ID", json!(p.property_id)),
                ("Name", json!(p.name)),
                ("Type", label(&p.kind)),
                ("Location", json!(p.location_label())),
                ("Size", json!(p.size_label())),
                ("Price", json!(p.price)),
                ("Status", label(&p.status)),
                ("Notes", json!(p.notes)),
            ])
        })
        .collect()
}

/// Sold properties with the completed deal that sold them, when there is one
pub fn sold_property_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.properties
        .iter()
        .filter(|p| p.status == PropertyStatus::Sold)
        .map(|p| {
            let deal = book
                .deals
                .iter()
                .find(|d| d.property_id == p.id && d.status == DealStatus::Completed);

            row([
                ("Property ID", json!(p.property_id)),
                ("Name", json!(p.name)),
                ("Type", label(&p.kind)),
                ("Location", json!(p.location_label())),
                ("Size", json!(p.size_label())),
                ("Original Price", json!(p.price)),
                ("Sale Price", json!(deal.map_or(0.0, |d| d.agreed_price))),
                (
                    "Sale Date",
                    json!(deal.map_or_else(|| "N/A".to_string(), |d| display_date(d.updated_at))),
                ),
                ("Commission", json!(deal.map_or(0.0, |d| d.commission_or_zero()))),
            ])
        })
        .collect()
}

pub fn payment_due_rows(payments: &[PaymentDue]) -> Vec<CsvRow> {
    payments
        .iter()
        .map(|p| {
            row([
                ("Property", json!(p.property_name)),
                ("Client", json!(p.client_name)),
                ("Amount Due", json!(p.amount)),
                ("Due Date", json!(display_date(p.due_date))),
                ("Status", json!(if p.is_overdue { "Overdue" } else { "Pending" })),
            ])
        })
        .collect()
}

pub fn client_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.clients
        .iter()
        .map(|c| {
            row([
                ("Name", json!(c.name)),
                ("Mobile", json!(c.mobile)),
                ("WhatsApp", json!(c.whatsapp)),
                ("Type", label(&c.kind)),
                ("Budget", json!(c.budget)),
                ("Budget Notes", json!(c.budget_notes)),
                ("Additional Notes", json!(c.additional_notes)),
                ("Created Date", json!(display_date(c.created_at))),
            ])
        })
        .collect()
}

/// Which reminders to show. `None` matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderFilter {
    pub kind: Option<ReminderType>,
    pub completed: Option<bool>,
}

impl ReminderFilter {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        self.kind.map_or(true, |k| reminder.kind == k)
            && self.completed.map_or(true, |c| reminder.completed == c)
    }
}

/// Case-insensitive substring match; an empty query matches everything
fn contains_folded(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Property search: text over name, code, phone, city and area, plus type and status
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub query: String,
    pub kind: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        let q = self.query.as_str();
        let text = contains_folded(&property.name, q)
            || contains_folded(&property.property_id, q)
            || contains_folded(&property.phone_number, q)
            || contains_folded(&property.location.city, q)
            || contains_folded(&property.location.area, q);

        text && self.kind.map_or(true, |k| property.kind == k)
            && self.status.map_or(true, |s| property.status == s)
    }
}

/// Client search. Phone numbers match verbatim, the name and the linked
/// property's label case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub query: String,
    pub kind: Option<ClientType>,
}

impl ClientFilter {
    /// `properties` resolves the client's property of interest, by id or code
    pub fn matches(&self, client: &Client, properties: &[Property]) -> bool {
        let q = self.query.as_str();
        let label = client
            .property_id
            .as_deref()
            .and_then(|pid| {
                properties
                    .iter()
                    .find(|p| p.id == pid || p.property_id == pid)
            })
            .map(property_label)
            .unwrap_or_default();

        let text = contains_folded(&client.name, q)
            || client.mobile.contains(q)
            || client.whatsapp.contains(q)
            || contains_folded(&label, q);

        text && self.kind.map_or(true, |k| client.kind == k)
    }
}

/// `"P-004 • Plot • 10 Marla"`
pub fn property_label(property: &Property) -> String {
    format!(
        "{} • {:?} • {}",
        property.property_id,
        property.kind,
        property.size_label()
    )
}

/// Rental search: text over title, code, city, area and the owner's mobile,
/// plus property type and availability
#[derive(Debug, Clone, Default)]
pub struct RentingFilter {
    pub query: String,
    pub kind: Option<RentingType>,
    pub status: Option<AvailabilityStatus>,
}

impl RentingFilter {
    pub fn matches(&self, renting: &Renting) -> bool {
        let q = self.query.as_str();
        let text = contains_folded(&renting.title, q)
            || contains_folded(&renting.renting_id, q)
            || contains_folded(&renting.location.city, q)
            || contains_folded(&renting.location.area, q)
            || renting.owner.mobile.contains(q);

        text && self.kind.map_or(true, |k| renting.property_type == k)
            && self.status.map_or(true, |s| renting.availability_status == s)
    }
}

/// Reminders split for display, each group sorted by due date
#[derive(Debug, Clone, Default)]
pub struct ReminderBoard {
    pub overdue: Vec<Reminder>,
    pub upcoming: Vec<Reminder>,
    pub completed: Vec<Reminder>,
}

pub fn reminder_board(
    reminders: &[Reminder],
    filter: ReminderFilter,
    now: DateTime<Utc>,
) -> ReminderBoard {
    let mut matching: Vec<&Reminder> = reminders.iter().filter(|r| filter.matches(r)).collect();
    matching.sort_by_key(|r| r.due_date);

    let mut board = ReminderBoard::default();
    for reminder in matching {
        let group = if reminder.completed {
            &mut board.completed
        } else if reminder.is_overdue(now) {
            &mut board.overdue
        } else {
            &mut board.upcoming
        };
        group.push(reminder.clone());
    }
    board
}
