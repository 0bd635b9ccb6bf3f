//! Full backup as four CSV files

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::info;

use crate::dealer_store::BookSnapshot;
use crate::export::{export_csv, row, CsvRow};
use crate::records::{find_by_id, UNKNOWN};
use crate::reports::{client_name, label, property_name, related_name};

pub const PROPERTIES_BACKUP: &str = "Properties_Backup";
pub const CLIENTS_BACKUP: &str = "Clients_Backup";
pub const DEALS_BACKUP: &str = "Deals_Backup";
pub const REMINDERS_BACKUP: &str = "Reminders_Backup";

fn timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn property_backup_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.properties
        .iter()
        .map(|p| {
            row([
                ("Property ID", json!(p.property_id)),
                ("Name", json!(p.name)),
                ("City", json!(p.location.city)),
                ("Area", json!(p.location.area)),
                ("Street", json!(p.location.street)),
                ("Type", label(&p.kind)),
                ("Size Value", json!(p.size.value)),
                ("Size Unit", label(&p.size.unit)),
                ("Price", json!(p.price)),
                ("Status", label(&p.status)),
                ("Notes", json!(p.notes)),
                ("Created Date", json!(timestamp(p.created_at))),
                ("Updated Date", json!(timestamp(p.updated_at))),
            ])
        })
        .collect()
}

pub fn client_backup_rows(book: &BookSnapshot) -> Vec<CsvRow> {
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
                ("Created Date", json!(timestamp(c.created_at))),
                ("Updated Date", json!(timestamp(c.updated_at))),
            ])
        })
        .collect()
}

pub fn deal_backup_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.deals
        .iter()
        .map(|d| {
            let property_code = find_by_id(&book.properties, &d.property_id)
                .map(|p| p.property_id.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            row([
                ("Property", json!(property_name(book, &d.property_id))),
                ("Property ID", json!(property_code)),
                ("Buyer", json!(client_name(book, &d.buyer_id))),
                ("Seller", json!(client_name(book, &d.seller_id))),
                ("Agreed Price", json!(d.agreed_price)),
                ("Commission", json!(d.commission_or_zero())),
                ("Status", label(&d.status)),
                ("Total Payments", json!(d.payment_schedule.len())),
                ("Paid Payments", json!(d.paid_installments())),
                ("Created Date", json!(timestamp(d.created_at))),
                ("Updated Date", json!(timestamp(d.updated_at))),
            ])
        })
        .collect()
}

pub fn reminder_backup_rows(book: &BookSnapshot) -> Vec<CsvRow> {
    book.reminders
        .iter()
        .map(|r| {
            row([
                ("Type", label(&r.kind)),
                ("Title", json!(r.title)),
                ("Description", json!(r.description)),
                ("Due Date", json!(timestamp(r.due_date))),
                ("Completed", json!(r.completed)),
                ("Related Type", label(&r.related_to.kind)),
                ("Related Item", json!(related_name(book, r))),
                ("Created Date", json!(timestamp(r.created_at))),
            ])
        })
        .collect()
}

/// Write all four backup files into `dir`. Returns the paths written.
pub async fn export_backup(book: &BookSnapshot, dir: &Path) -> Result<Vec<PathBuf>> {
    let files = [
        (PROPERTIES_BACKUP, property_backup_rows(book)),
        (CLIENTS_BACKUP, client_backup_rows(book)),
        (DEALS_BACKUP, deal_backup_rows(book)),
        (REMINDERS_BACKUP, reminder_backup_rows(book)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, rows) in files {
        written.push(export_csv(&rows, dir, name).await?);
    }

    info!("Backup written to {}", dir.display());
    Ok(written)
}
