use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use stocktake::{
    codec, compute_stats, query, FileStore, InventoryService, ItemPatch, NewItem, ScanOutcome,
    ScanResult, SortDirection, SortField, StockFilter, StockItem,
};

#[derive(Parser)]
#[command(name = "stocktake", about = "Barcode-driven inventory tracking", version)]
struct Cli {
    /// Directory holding the persisted inventory blobs.
    #[arg(long, default_value = ".stocktake", global = true)]
    data_dir: PathBuf,

    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one or more scanned barcodes against the record set.
    Scan { codes: Vec<String> },
    /// Create a new inventory record.
    Add(AddArgs),
    /// Adjust a record's quantity by a signed delta (clamped at zero).
    Adjust { barcode: String, delta: i64 },
    /// Edit fields of an existing record.
    Update(UpdateArgs),
    /// Remove a record from the active set.
    Remove { barcode: String },
    /// List records, filtered and sorted.
    List(ListArgs),
    /// Show dashboard statistics.
    Stats,
    /// Show a record's audit history.
    History { barcode: String },
    /// Export the record set to a CSV file.
    Export { file: PathBuf },
    /// Import records from a CSV file, merging by barcode.
    Import { file: PathBuf },
    /// Write an example CSV template.
    Template { file: PathBuf },
    /// Manage the category registry.
    Category {
        #[command(subcommand)]
        command: RegistryCommand,
    },
    /// Manage the location registry.
    Location {
        #[command(subcommand)]
        command: RegistryCommand,
    },
    /// Delete all records, registries, and settings.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    barcode: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value_t = 0)]
    quantity: u32,
    /// Defaults to the session's default unit when omitted.
    #[arg(long)]
    unit: Option<String>,
    #[arg(long, default_value = "Uncategorized")]
    category: String,
    #[arg(long, default_value = "Unknown")]
    location: String,
    #[arg(long)]
    min_quantity: Option<u32>,
    #[arg(long)]
    max_quantity: Option<u32>,
    #[arg(long)]
    cost: Option<Decimal>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    /// Barcode of the record to edit.
    barcode: String,
    #[arg(long)]
    new_barcode: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    quantity: Option<u32>,
    #[arg(long)]
    unit: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    min_quantity: Option<u32>,
    #[arg(long)]
    max_quantity: Option<u32>,
    #[arg(long)]
    cost: Option<Decimal>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    low_stock: bool,
    #[arg(long)]
    no_stock: bool,
    #[arg(long, value_enum, default_value_t = SortArg::Name)]
    sort: SortArg,
    #[arg(long)]
    desc: bool,
}

#[derive(Subcommand)]
enum RegistryCommand {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Barcode,
    Quantity,
    Category,
    Location,
    Updated,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::Barcode => SortField::Barcode,
            SortArg::Quantity => SortField::Quantity,
            SortArg::Category => SortField::Category,
            SortArg::Location => SortField::Location,
            SortArg::Updated => SortField::UpdatedAt,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileStore::open(&cli.data_dir)
        .with_context(|| format!("failed to open data dir {}", cli.data_dir.display()))?;
    let mut service = InventoryService::open(store);

    match cli.command {
        Commands::Scan { codes } => handle_scan(&mut service, codes, cli.json)?,
        Commands::Add(args) => handle_add(&mut service, args, cli.json)?,
        Commands::Adjust { barcode, delta } => {
            let id = resolve(&service, &barcode)?;
            let item = service.adjust_quantity(id, delta)?;
            if cli.json {
                print_json(item)?;
            } else {
                println!("{}: quantity now {}", item.name, item.quantity);
            }
        }
        Commands::Update(args) => handle_update(&mut service, args, cli.json)?,
        Commands::Remove { barcode } => {
            let id = resolve(&service, &barcode)?;
            let removed = service.remove_item(id)?;
            if cli.json {
                print_json(&removed)?;
            } else {
                println!("Removed {} ({})", removed.name, removed.barcode);
            }
        }
        Commands::List(args) => handle_list(&service, args, cli.json)?,
        Commands::Stats => {
            let stats = compute_stats(
                service.items(),
                service.categories().len(),
                service.locations().len(),
            );
            if cli.json {
                print_json(&stats)?;
            } else {
                println!("Items:        {}", stats.total_items);
                println!("Quantity:     {}", stats.total_quantity);
                println!("Value:        {}", stats.total_value);
                println!("Low stock:    {}", stats.low_stock_items);
                println!("Out of stock: {}", stats.out_of_stock_items);
                println!("Categories:   {}", stats.categories);
                println!("Locations:    {}", stats.locations);
            }
        }
        Commands::History { barcode } => {
            let item = service
                .find_by_barcode(&barcode)
                .with_context(|| format!("no record with barcode {barcode}"))?;
            if cli.json {
                print_json(&item.history)?;
            } else {
                for entry in &item.history {
                    let note = entry.notes.as_deref().unwrap_or("");
                    match (&entry.old_value, &entry.new_value) {
                        (Some(old), Some(new)) => println!(
                            "{}  {}  {} ({} -> {})",
                            entry.timestamp.to_rfc3339(),
                            entry.action.as_str(),
                            note,
                            old,
                            new
                        ),
                        _ => println!(
                            "{}  {}  {}",
                            entry.timestamp.to_rfc3339(),
                            entry.action.as_str(),
                            note
                        ),
                    }
                }
            }
        }
        Commands::Export { file } => {
            let bytes = codec::export_csv(service.items())?;
            fs::write(&file, bytes)
                .with_context(|| format!("failed to write {}", file.display()))?;
            if !cli.json {
                println!("Exported {} items to {}", service.items().len(), file.display());
            }
        }
        Commands::Import { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let rows = codec::import_csv(&bytes)?;
            let summary = service.merge_import(rows);
            if cli.json {
                print_json(&summary)?;
            } else {
                println!(
                    "Added {} new items, updated {} existing items",
                    summary.added, summary.updated
                );
            }
        }
        Commands::Template { file } => {
            let bytes = codec::export_template()?;
            fs::write(&file, bytes)
                .with_context(|| format!("failed to write {}", file.display()))?;
            if !cli.json {
                println!("Template written to {}", file.display());
            }
        }
        Commands::Category { command } => {
            handle_registry(&mut service, command, cli.json, Kind::Category)?
        }
        Commands::Location { command } => {
            handle_registry(&mut service, command, cli.json, Kind::Location)?
        }
        Commands::Clear { yes } => {
            anyhow::ensure!(yes, "refusing to clear without --yes");
            service.clear_all()?;
            if !cli.json {
                println!("All data cleared");
            }
        }
    }

    Ok(())
}

fn handle_scan(
    service: &mut InventoryService<FileStore>,
    codes: Vec<String>,
    json: bool,
) -> Result<()> {
    #[derive(Serialize)]
    struct ScanReport<'a> {
        code: &'a str,
        outcome: &'a ScanOutcome,
    }

    for code in &codes {
        let outcome = service.reconcile(&ScanResult::new(code.clone()));
        if json {
            print_json(&ScanReport { code, outcome: &outcome })?;
            continue;
        }
        match outcome {
            ScanOutcome::Matched(item) => {
                println!("{} - quantity updated to {}", item.name, item.quantity);
            }
            ScanOutcome::NeedsCreation(code) => {
                println!("{code}: no record found; create one with `stocktake add --barcode {code} --name ...`");
            }
        }
    }
    Ok(())
}

fn handle_add(
    service: &mut InventoryService<FileStore>,
    args: AddArgs,
    json: bool,
) -> Result<()> {
    let unit = args
        .unit
        .unwrap_or_else(|| service.settings().default_unit.clone());
    let item = service.create_item(NewItem {
        barcode: args.barcode,
        name: args.name,
        description: args.description,
        quantity: args.quantity,
        unit,
        category: args.category,
        location: args.location,
        min_quantity: args.min_quantity,
        max_quantity: args.max_quantity,
        cost: args.cost,
        price: args.price,
        supplier: args.supplier,
        notes: args.notes,
    })?;
    if json {
        print_json(item)?;
    } else {
        println!("Added {} ({})", item.name, item.barcode);
    }
    Ok(())
}

fn handle_update(
    service: &mut InventoryService<FileStore>,
    args: UpdateArgs,
    json: bool,
) -> Result<()> {
    let id = resolve(service, &args.barcode)?;
    let mut patch = ItemPatch::from(
        service
            .item(id)
            .with_context(|| format!("no record with barcode {}", args.barcode))?,
    );
    if let Some(barcode) = args.new_barcode {
        patch.barcode = barcode;
    }
    if let Some(name) = args.name {
        patch.name = name;
    }
    if let Some(description) = args.description {
        patch.description = description;
    }
    if let Some(quantity) = args.quantity {
        patch.quantity = quantity;
    }
    if let Some(unit) = args.unit {
        patch.unit = unit;
    }
    if let Some(category) = args.category {
        patch.category = category;
    }
    if let Some(location) = args.location {
        patch.location = location;
    }
    if args.min_quantity.is_some() {
        patch.min_quantity = args.min_quantity;
    }
    if args.max_quantity.is_some() {
        patch.max_quantity = args.max_quantity;
    }
    if args.cost.is_some() {
        patch.cost = args.cost;
    }
    if args.price.is_some() {
        patch.price = args.price;
    }
    if args.supplier.is_some() {
        patch.supplier = args.supplier;
    }
    if args.notes.is_some() {
        patch.notes = args.notes;
    }
    let item = service.update_item(id, patch)?;
    if json {
        print_json(item)?;
    } else {
        println!("Updated {} ({})", item.name, item.barcode);
    }
    Ok(())
}

fn handle_list(
    service: &InventoryService<FileStore>,
    args: ListArgs,
    json: bool,
) -> Result<()> {
    let filter = StockFilter {
        search: args.search,
        category: args.category,
        location: args.location,
        low_stock: args.low_stock,
        no_stock: args.no_stock,
    };
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    let view = query(service.items(), &filter, args.sort.into(), direction);
    if json {
        print_json(&view)?;
        return Ok(());
    }
    if view.is_empty() {
        println!("No matching items");
        return Ok(());
    }
    for item in view {
        println!("{}", format_line(item));
    }
    Ok(())
}

fn format_line(item: &StockItem) -> String {
    let status = if item.is_out_of_stock() {
        "  [OUT OF STOCK]"
    } else if item.is_low_stock() {
        "  [LOW]"
    } else {
        ""
    };
    format!(
        "{:<16} {:<24} {:>6} {:<6} {} / {}{}",
        item.barcode, item.name, item.quantity, item.unit, item.category, item.location, status
    )
}

fn handle_registry(
    service: &mut InventoryService<FileStore>,
    command: RegistryCommand,
    json: bool,
    kind: Kind,
) -> Result<()> {
    match command {
        RegistryCommand::Add { name } => {
            match kind {
                Kind::Category => service.add_category(&name)?,
                Kind::Location => service.add_location(&name)?,
            }
            if !json {
                println!("Added {name}");
            }
        }
        RegistryCommand::Remove { name } => {
            match kind {
                Kind::Category => service.remove_category(&name)?,
                Kind::Location => service.remove_location(&name)?,
            }
            if !json {
                println!("Removed {name}");
            }
        }
        RegistryCommand::List => {
            let registry = match kind {
                Kind::Category => service.categories(),
                Kind::Location => service.locations(),
            };
            if json {
                print_json(&registry.names())?;
            } else {
                for name in registry.names() {
                    println!("{name}");
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Kind {
    Category,
    Location,
}

fn resolve(service: &InventoryService<FileStore>, barcode: &str) -> Result<uuid::Uuid> {
    service
        .find_by_barcode(barcode)
        .map(|item| item.id)
        .with_context(|| format!("no record with barcode {barcode}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
