//! Component Inventory - command line front end
//!
//! Manages the local parts database: add, list, search, update and remove
//! components, show low-stock alerts, and export CSV/PDF reports.

use clap::{Parser, Subcommand};
use component_inventory::config::DEFAULT_DB_FILE;
use component_inventory::models::parse_date;
use component_inventory::{
    InventoryError, InventoryItem, InventoryService, ItemPatch, ReportExporter, ReportFormat, StoreConfig,
    WriteOutcome, LOW_STOCK_THRESHOLD,
};
use std::path::PathBuf;

/// Local component inventory with search, alerts and reports
#[derive(Parser, Debug)]
#[command(name = "component_inventory")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = DEFAULT_DB_FILE)]
    database: PathBuf,

    /// Quantity at or below which an item is reported as low on stock
    #[arg(long, default_value_t = LOW_STOCK_THRESHOLD)]
    threshold: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new component
    Add(ItemArgs),
    /// List every component
    List,
    /// Search name, category and location for a keyword
    Search { keyword: String },
    /// Search a single field (name, category, quantity, location, date)
    Find { criterion: String, keyword: String },
    /// Change the given fields of an existing component
    Update {
        id: i64,
        #[command(flatten)]
        changes: UpdateArgs,
    },
    /// Remove a component
    Remove { id: i64 },
    /// Show components that are low on stock
    Alerts,
    /// Write a CSV or PDF report
    Export {
        /// Output file; the extension is added when missing
        path: PathBuf,
        /// csv or pdf (default: inferred from the path, else csv)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct ItemArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=1_000_000))]
    quantity: i64,
    #[arg(long, default_value = "")]
    location: String,
    /// Acquisition date as YYYY-MM-DD (default: today)
    #[arg(long)]
    acquired_on: Option<String>,
}

impl ItemArgs {
    fn into_item(self) -> Result<InventoryItem, InventoryError> {
        let acquired_on = match self.acquired_on {
            Some(text) => Some(parse_date(&text).ok_or(InventoryError::InvalidDate(text))?),
            None => Some(chrono::Local::now().date_naive()),
        };
        Ok(InventoryItem::new(
            self.name,
            self.category,
            self.quantity,
            self.location,
            acquired_on,
        ))
    }
}

/// Fields for `update`; anything omitted keeps its stored value
#[derive(clap::Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=1_000_000))]
    quantity: Option<i64>,
    #[arg(long)]
    location: Option<String>,
    /// Acquisition date as YYYY-MM-DD
    #[arg(long)]
    acquired_on: Option<String>,
}

impl UpdateArgs {
    fn into_patch(self) -> Result<ItemPatch, InventoryError> {
        let acquired_on = self
            .acquired_on
            .map(|text| parse_date(&text).ok_or(InventoryError::InvalidDate(text)))
            .transpose()?;
        Ok(ItemPatch {
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            location: self.location,
            acquired_on,
        })
    }
}

fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = StoreConfig::new(args.database).with_threshold(args.threshold);
    log::debug!("Database path: {}", config.db_path.display());

    let service = InventoryService::new(&config);
    if !service.is_ready() {
        log::error!(
            "Cannot continue without the inventory database at {}",
            config.db_path.display()
        );
        std::process::exit(1);
    }

    let ok = match run(&service, args.command) {
        Ok(ok) => ok,
        Err(e) => {
            log::error!("{}", e);
            false
        }
    };

    // process::exit skips destructors, so close the store first
    drop(service);
    if !ok {
        std::process::exit(1);
    }
}

fn run(service: &InventoryService, command: Command) -> Result<bool, InventoryError> {
    match command {
        Command::Add(item) => Ok(service.add_item(&item.into_item()?)),
        Command::List => {
            print_items(&service.list_all());
            Ok(true)
        }
        Command::Search { keyword } => {
            print_items(&service.search(&keyword));
            Ok(true)
        }
        Command::Find { criterion, keyword } => {
            print_items(&service.find_by_label(&keyword, &criterion)?);
            Ok(true)
        }
        Command::Update { id, changes } => {
            let patch = changes.into_patch()?;
            if patch.is_empty() {
                log::warn!("Nothing to update for component {}", id);
            }
            let outcome = service.patch_item(id, &patch);
            report_write(outcome, id, "updated");
            Ok(outcome.is_applied())
        }
        Command::Remove { id } => {
            let outcome = service.remove_item(id);
            report_write(outcome, id, "removed");
            Ok(outcome.is_applied())
        }
        Command::Alerts => {
            let alerts = service.low_stock_items();
            println!(
                "{} component(s) at or below {}:",
                alerts.len(),
                service.low_stock_threshold()
            );
            print_items(&alerts);
            Ok(true)
        }
        Command::Export { path, format } => {
            let format = match format {
                Some(label) => label.parse()?,
                None => ReportFormat::from_path(&path).unwrap_or(ReportFormat::Csv),
            };
            let path = format.ensure_extension(&path);
            let exported = ReportExporter::new(service.store()).export(format, &path);
            if exported {
                println!("Report written to {}", path.display());
            }
            Ok(exported)
        }
    }
}

fn report_write(outcome: WriteOutcome, id: i64, verb: &str) {
    println!("{}", write_message(outcome, id, verb));
}

fn write_message(outcome: WriteOutcome, id: i64, verb: &str) -> String {
    match outcome {
        WriteOutcome::Applied => format!("Component {} {}", id, verb),
        WriteOutcome::NotFound => format!("No component with id {}", id),
        WriteOutcome::Failed => format!("Could not write component {}", id),
    }
}

fn print_items(items: &[InventoryItem]) {
    println!(
        "{:>5}  {:<24} {:<16} {:>8}  {:<16} {:<10}",
        "ID", "Name", "Category", "Quantity", "Location", "Acquired"
    );
    for item in items {
        println!(
            "{:>5}  {:<24} {:<16} {:>8}  {:<16} {:<10}",
            item.id.map(|id| id.to_string()).unwrap_or_default(),
            item.name,
            item.category,
            item.quantity,
            item.location,
            item.acquired_on_text()
        );
    }
}
