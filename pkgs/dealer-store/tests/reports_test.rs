// Copyright 2025 Dealer Store Authors.
//
// Comprehensive tests for dashboard figures and report rows

mod common;

use chrono::Duration;
use common::*;
use dealer_store::reports::{
    available_property_rows, client_rows, payment_due_rows, payments_due, property_label,
    reminder_board, sold_property_rows, summary, ClientFilter, PropertyFilter, ReminderFilter,
    RentingFilter,
};
use dealer_store::{
    AvailabilityStatus, BookSnapshot, ClientType, DealStatus, PropertyStatus, PropertyType,
    RelatedType, Reminder, ReminderType, RentingType,
};
use serde_json::json;

fn sample_book() -> BookSnapshot {
    let mut completed = sample_deal("d1", "p2", "c1", "c2");
    completed.status = DealStatus::Completed;
    completed.agreed_price = 20_000_000.0;

    let mut uncommissioned = sample_deal("d2", "p9", "ghost", "c2");
    uncommissioned.commission = None;
    uncommissioned.payment_schedule = vec![installment("j1", 1_000_000.0, -5, false)];

    BookSnapshot {
        properties: vec![
            sample_property("p1", "P-001", PropertyStatus::Available),
            sample_property("p2", "P-002", PropertyStatus::Sold),
            sample_property("p3", "P-003", PropertyStatus::Rented),
            sample_property("p4", "P-004", PropertyStatus::OnHold),
        ],
        clients: vec![
            sample_client("c1", "Ayesha", ClientType::Buyer),
            sample_client("c2", "Hamza", ClientType::Seller),
            sample_client("c3", "Sana", ClientType::Buyer),
        ],
        rentings: Vec::new(),
        deals: vec![completed, uncommissioned],
        reminders: Vec::new(),
    }
}

#[test]
fn test_summary_counts_and_totals() {
    let stats = summary(&sample_book());

    assert_eq!(stats.total_properties, 4);
    assert_eq!(stats.available_properties, 1);
    assert_eq!(stats.sold_properties, 1);
    assert_eq!(stats.rented_properties, 1);
    assert_eq!(stats.total_clients, 3);
    assert_eq!(stats.buyers, 2);
    assert_eq!(stats.sellers, 1);
    assert_eq!(stats.active_deals, 1);
    assert_eq!(stats.completed_deals, 1);
    assert_eq!(stats.total_revenue, 38_000_000.0);
    assert_eq!(stats.total_commission, 180_000.0);
}

#[test]
fn test_payments_due_sorted_with_overdue_flag() {
    let now = fixed_time() + Duration::days(1);
    let due = payments_due(&sample_book(), now);

    // d1 has two unpaid installments, d2 one
    assert_eq!(due.len(), 3);
    assert_eq!(due[0].deal_id, "d2");
    assert!(due[0].is_overdue);
    assert_eq!(due[0].property_name, "Unknown");
    assert_eq!(due[0].client_name, "Unknown");

    assert_eq!(due[1].deal_id, "d1");
    assert_eq!(due[1].property_name, "Plot P-002");
    assert_eq!(due[1].client_name, "Ayesha");
    assert!(!due[1].is_overdue);
    assert!(due[1].due_date < due[2].due_date);

    let rows = payment_due_rows(&due);
    assert_eq!(rows[0]["Status"], json!("Overdue"));
    assert_eq!(rows[1]["Status"], json!("Pending"));
    assert_eq!(rows[1]["Due Date"], json!("14/02/2025"));
}

#[test]
fn test_available_rows() {
    let rows = available_property_rows(&sample_book());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Property ID"], json!("P-001"));
    assert_eq!(rows[0]["Location"], json!("DHA Phase 6, Lahore"));
    assert_eq!(rows[0]["Size"], json!("10 Marla"));
    assert_eq!(rows[0]["Status"], json!("Available"));
}

#[test]
fn test_sold_rows_use_completed_deal() {
    let mut book = sample_book();
    book.properties
        .push(sample_property("p5", "P-005", PropertyStatus::Sold));
    let rows = sold_property_rows(&book);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Sale Price"], json!(20_000_000.0));
    assert_eq!(rows[0]["Sale Date"], json!("15/01/2025"));
    assert_eq!(rows[0]["Commission"], json!(180_000.0));

    assert_eq!(rows[1]["Sale Price"], json!(0.0));
    assert_eq!(rows[1]["Sale Date"], json!("N/A"));
}

#[test]
fn test_client_rows() {
    let rows = client_rows(&sample_book());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Name"], json!("Ayesha"));
    assert_eq!(rows[0]["Created Date"], json!("15/01/2025"));
}

fn ids(list: &[Reminder]) -> Vec<String> {
    list.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn test_reminder_board() {
    let mut done = sample_reminder("m3", -10, related(RelatedType::Client, "c1"));
    done.completed = true;
    let mut call = sample_reminder("m4", 5, related(RelatedType::Client, "c1"));
    call.kind = ReminderType::Call;

    let reminders = vec![
        sample_reminder("m2", 2, related(RelatedType::Property, "p1")),
        sample_reminder("m1", -1, related(RelatedType::Property, "p1")),
        done,
        call,
    ];
    let now = fixed_time();

    let board = reminder_board(&reminders, ReminderFilter::default(), now);
    assert_eq!(ids(&board.overdue), vec!["m1"]);
    assert_eq!(ids(&board.upcoming), vec!["m2", "m4"]);
    assert_eq!(ids(&board.completed), vec!["m3"]);

    let calls = reminder_board(
        &reminders,
        ReminderFilter {
            kind: Some(ReminderType::Call),
            completed: None,
        },
        now,
    );
    assert_eq!(ids(&calls.upcoming), vec!["m4"]);
    assert!(calls.overdue.is_empty());
}

#[test]
fn test_property_filter() {
    let book = sample_book();
    let mut house = sample_property("p5", "P-005", PropertyStatus::Available);
    house.kind = PropertyType::House;
    house.name = "Gulberg House".to_string();
    house.location.city = "Islamabad".to_string();

    let matching = |filter: PropertyFilter| -> Vec<String> {
        book.properties
            .iter()
            .chain(std::iter::once(&house))
            .filter(|p| filter.matches(p))
            .map(|p| p.id.clone())
            .collect()
    };

    assert_eq!(matching(PropertyFilter::default()).len(), 5);
    assert_eq!(
        matching(PropertyFilter {
            query: "islam".to_string(),
            ..Default::default()
        }),
        vec!["p5"]
    );
    assert_eq!(
        matching(PropertyFilter {
            query: "p-003".to_string(),
            ..Default::default()
        }),
        vec!["p3"]
    );
    assert_eq!(
        matching(PropertyFilter {
            query: "0300-1111".to_string(),
            status: Some(PropertyStatus::Sold),
            ..Default::default()
        }),
        vec!["p2"]
    );
    assert_eq!(
        matching(PropertyFilter {
            query: "lahore".to_string(),
            kind: Some(PropertyType::House),
            ..Default::default()
        }),
        Vec::<String>::new()
    );
}

#[test]
fn test_client_filter() {
    let book = sample_book();
    let mut interested = sample_client("c4", "Zain", ClientType::Buyer);
    interested.mobile = "0345-9999999".to_string();
    interested.property_id = Some("P-001".to_string());

    let by_name = ClientFilter {
        query: "ayE".to_string(),
        kind: None,
    };
    assert!(by_name.matches(&book.clients[0], &book.properties));
    assert!(!by_name.matches(&interested, &book.properties));

    let by_mobile = ClientFilter {
        query: "0345".to_string(),
        kind: Some(ClientType::Buyer),
    };
    assert!(by_mobile.matches(&interested, &book.properties));
    assert!(!by_mobile.matches(&book.clients[0], &book.properties));

    let by_property = ClientFilter {
        query: "p-001 • plot".to_string(),
        kind: None,
    };
    assert!(by_property.matches(&interested, &book.properties));
    assert!(!by_property.matches(&book.clients[1], &book.properties));

    let sellers = ClientFilter {
        query: String::new(),
        kind: Some(ClientType::Seller),
    };
    assert!(sellers.matches(&book.clients[1], &book.properties));
    assert!(!sellers.matches(&book.clients[0], &book.properties));

    assert_eq!(property_label(&book.properties[0]), "P-001 • Plot • 10 Marla");
}

#[test]
fn test_renting_filter() {
    let mut office = sample_renting("r2", "R-002");
    office.property_type = RentingType::Office;
    office.title = "Corner office".to_string();
    office.availability_status = AvailabilityStatus::Rented;
    let apartment = sample_renting("r1", "R-001");

    let search = RentingFilter {
        query: "clifton".to_string(),
        ..Default::default()
    };
    assert!(search.matches(&apartment));
    assert!(search.matches(&office));

    let offices = RentingFilter {
        query: "OFFICE".to_string(),
        kind: Some(RentingType::Office),
        status: Some(AvailabilityStatus::Rented),
    };
    assert!(offices.matches(&office));
    assert!(!offices.matches(&apartment));

    let by_owner = RentingFilter {
        query: "0333-3333".to_string(),
        status: Some(AvailabilityStatus::Available),
        ..Default::default()
    };
    assert!(by_owner.matches(&apartment));
    assert!(!by_owner.matches(&office));
}
