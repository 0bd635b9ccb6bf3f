use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dealer_store::backup::export_backup;
use dealer_store::reports::{
    available_property_rows, client_rows, payment_due_rows, payments_due, reminder_board,
    sold_property_rows, summary, ClientFilter, PropertyFilter, ReminderFilter, RentingFilter,
};
use dealer_store::{
    export_csv, AccessGate, CachedRecord, Client, Deal, DealerStore, FallbackPolicy,
    FileKeyValueStore, Property, RemoteConfig, Reminder, Renting, StoreConfig,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file for the embedded backend
    #[arg(long, env = "DEALER_DB_PATH", default_value = "dealer-store.db")]
    db_path: PathBuf,

    /// Directory for the fallback store and the access PIN
    #[arg(long, env = "DEALER_DATA_DIR", default_value = "dealer-data")]
    data_dir: PathBuf,

    /// MongoDB connection string; without it the remote backend is skipped
    #[arg(long, env = "DEALER_MONGO_URI")]
    mongo_uri: Option<String>,

    /// MongoDB database name
    #[arg(long, env = "DEALER_MONGO_DB", default_value = "property_dealer")]
    mongo_db: String,

    /// Stay offline instead of falling back when the remote is unreachable
    #[arg(long, env = "DEALER_REMOTE_ONLY")]
    remote_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the selected backend and record counts
    Status,
    /// Print every record of a collection as JSON lines
    List {
        collection: CollectionArg,
        /// Text search over properties, clients or rentals
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add records from a JSON file holding one object or an array of them
    Add {
        collection: CollectionArg,
        file: PathBuf,
    },
    /// Delete a record by id
    Delete { collection: CollectionArg, id: String },
    /// Print the next free property or renting code
    NextCode { collection: CollectionArg },
    /// Flip a reminder between open and completed
    ToggleReminder { id: String },
    /// Mark an installment of a deal paid, or unpaid again
    TogglePayment { deal_id: String, installment_id: String },
    /// Print the dashboard summary, payments due and reminders
    Report,
    /// Write one report as CSV
    Export {
        report: ReportArg,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Write the four backup CSV files
    Backup {
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Manage the access PIN
    Pin {
        #[command(subcommand)]
        action: PinAction,
    },
}

#[derive(Subcommand, Debug)]
enum PinAction {
    /// Store a new PIN
    Set { pin: String },
    /// Check a PIN against the stored one
    Check { pin: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CollectionArg {
    Properties,
    Clients,
    Rentings,
    Deals,
    Reminders,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportArg {
    Available,
    Sold,
    Clients,
    Payments,
}

impl Args {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            db_path: self.db_path.clone(),
            data_dir: self.data_dir.clone(),
            remote: self
                .mongo_uri
                .as_ref()
                .map(|uri| RemoteConfig::new(uri.clone(), self.mongo_db.clone())),
            policy: if self.remote_only {
                FallbackPolicy::RemoteOnly
            } else {
                FallbackPolicy::Cascade
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();
    let config = args.store_config();

    match args.command {
        Command::Pin { action } => run_pin(&config, action).await,
        command => run(&config, command).await,
    }
}

async fn run(config: &StoreConfig, command: Command) -> Result<()> {
    let store = DealerStore::with_config(config);
    let backend = store.init().await;
    info!("Running with backend {:?}", backend);

    match command {
        Command::Status => {
            match store.active_backend() {
                Some(kind) => println!("Backend: {}", kind),
                None => println!("Backend: none (offline)"),
            }
            println!("State: {:?}", store.selector_state());
            println!("Properties: {}", store.properties().len());
            println!("Clients: {}", store.clients().len());
            println!("Rentings: {}", store.rentings().len());
            println!("Deals: {}", store.deals().len());
            println!("Reminders: {}", store.reminders().len());
        }
        Command::List { collection, search } => {
            let query = search.unwrap_or_default();
            match collection {
                CollectionArg::Properties => {
                    let filter = PropertyFilter {
                        query,
                        ..Default::default()
                    };
                    print_matching(store.properties(), |p| filter.matches(p))?
                }
                CollectionArg::Clients => {
                    let filter = ClientFilter {
                        query,
                        ..Default::default()
                    };
                    let properties = store.properties();
                    print_matching(store.clients(), |c| filter.matches(c, &properties))?
                }
                CollectionArg::Rentings => {
                    let filter = RentingFilter {
                        query,
                        ..Default::default()
                    };
                    print_matching(store.rentings(), |r| filter.matches(r))?
                }
                CollectionArg::Deals => print_matching(store.deals(), |_| true)?,
                CollectionArg::Reminders => print_matching(store.reminders(), |_| true)?,
            }
        }
        Command::Add { collection, file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let documents = match value {
                Value::Array(items) => items,
                other => vec![other],
            };

            let added = match collection {
                CollectionArg::Properties => add_all::<Property>(&store, documents).await?,
                CollectionArg::Clients => add_all::<Client>(&store, documents).await?,
                CollectionArg::Rentings => add_all::<Renting>(&store, documents).await?,
                CollectionArg::Deals => add_all::<Deal>(&store, documents).await?,
                CollectionArg::Reminders => add_all::<Reminder>(&store, documents).await?,
            };
            println!("Added {} record(s)", added);
        }
        Command::Delete { collection, id } => {
            match collection {
                CollectionArg::Properties => store.delete::<Property>(&id).await?,
                CollectionArg::Clients => store.delete::<Client>(&id).await?,
                CollectionArg::Rentings => store.delete::<Renting>(&id).await?,
                CollectionArg::Deals => store.delete::<Deal>(&id).await?,
                CollectionArg::Reminders => store.delete::<Reminder>(&id).await?,
            }
            println!("Deleted {}", id);
        }
        Command::NextCode { collection } => match collection {
            CollectionArg::Properties => println!("{}", store.next_property_code()?),
            CollectionArg::Rentings => println!("{}", store.next_renting_code()?),
            other => bail!("{:?} records have no sequential code", other),
        },
        Command::ToggleReminder { id } => {
            let completed = store.toggle_reminder(&id).await?;
            println!(
                "Reminder {} is now {}",
                id,
                if completed { "completed" } else { "open" }
            );
        }
        Command::TogglePayment {
            deal_id,
            installment_id,
        } => {
            let paid = store.toggle_payment(&deal_id, &installment_id).await?;
            println!(
                "Installment {} is now {}",
                installment_id,
                if paid { "paid" } else { "unpaid" }
            );
        }
        Command::Report => print_report(&store),
        Command::Export { report, out } => {
            let book = store.snapshot();
            let (rows, name) = match report {
                ReportArg::Available => (
                    available_property_rows(&book),
                    "Available_Properties_Report",
                ),
                ReportArg::Sold => (sold_property_rows(&book), "Sold_Properties_Report"),
                ReportArg::Clients => (client_rows(&book), "Clients_Report"),
                ReportArg::Payments => (
                    payment_due_rows(&payments_due(&book, Utc::now())),
                    "Payment_Due_Report",
                ),
            };
            if rows.is_empty() {
                println!("Nothing to export");
            } else {
                let path = export_csv(&rows, &out, name).await?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Backup { out } => {
            let paths = export_backup(&store.snapshot(), &out).await?;
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
        Command::Pin { action } => run_pin(config, action).await?,
    }

    Ok(())
}

async fn run_pin(config: &StoreConfig, action: PinAction) -> Result<()> {
    let gate = AccessGate::new(Arc::new(FileKeyValueStore::new(config.data_dir.clone())));

    match action {
        PinAction::Set { pin } => {
            gate.set_secret(&pin).await?;
            println!("PIN saved");
        }
        PinAction::Check { pin } => {
            if !gate.has_stored_secret().await? {
                bail!("No PIN has been set");
            }
            if !gate.validate_secret(&pin).await? {
                bail!("Incorrect PIN");
            }
            println!("PIN accepted");
        }
    }
    Ok(())
}

fn print_matching<T: CachedRecord>(records: Vec<T>, keep: impl Fn(&T) -> bool) -> Result<()> {
    for record in records.iter().filter(|r| keep(r)) {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

async fn add_all<T: CachedRecord>(store: &DealerStore, documents: Vec<Value>) -> Result<usize> {
    let mut added = 0;
    for document in documents {
        let record = T::from_document(document)?;
        let record = store.add(record).await?;
        info!("Added {}", record.id());
        added += 1;
    }
    Ok(added)
}

fn print_report(store: &DealerStore) {
    let book = store.snapshot();
    let now = Utc::now();
    let stats = summary(&book);

    println!(
        "Properties: {} total, {} available, {} sold, {} rented",
        stats.total_properties,
        stats.available_properties,
        stats.sold_properties,
        stats.rented_properties
    );
    println!(
        "Clients: {} total, {} buyers, {} sellers",
        stats.total_clients, stats.buyers, stats.sellers
    );
    println!(
        "Deals: {} active, {} completed",
        stats.active_deals, stats.completed_deals
    );
    println!(
        "Revenue: {:.0}  Commission: {:.0}",
        stats.total_revenue, stats.total_commission
    );

    let due = payments_due(&book, now);
    if !due.is_empty() {
        println!("\nPayments due:");
        for payment in &due {
            println!(
                "  {} {} / {} {:.0}{}",
                payment.due_date.format("%d/%m/%Y"),
                payment.property_name,
                payment.client_name,
                payment.amount,
                if payment.is_overdue { " (overdue)" } else { "" }
            );
        }
    }

    let board = reminder_board(&book.reminders, ReminderFilter::default(), now);
    for (title, reminders) in [
        ("Overdue", &board.overdue),
        ("Upcoming", &board.upcoming),
        ("Completed", &board.completed),
    ] {
        if reminders.is_empty() {
            continue;
        }
        println!("\n{} reminders ({}):", title, reminders.len());
        for reminder in reminders {
            println!("  {} {}", reminder.due_date.format("%d/%m/%Y"), reminder.title);
        }
    }
}
