//! Command-line front end for the inventory provider.
//!
//! # Responsibility
//! - Open the SQLite file, wire engine + notifier + provider, run one command.
//! - Print records as `column=value` lines; errors go to stderr.

use clap::{Parser, Subcommand};
use inventory_core::db::open_db;
use inventory_core::{
    default_log_level, init_logging, InventoryProvider, InventoryService, ObserverRegistry,
    Product, ResourceLocator, Selection, SqliteStorageEngine,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "inventory")]
#[command(about = "Query and edit the inventory product table", version)]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, default_value = "inventory.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error (defaults by build mode).
    #[arg(long)]
    log_level: Option<String>,

    /// Echo every change notification to stderr.
    #[arg(long)]
    watch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: i64,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        supplier_name: Option<String>,
        #[arg(long)]
        supplier_phone: Option<String>,
    },
    /// List all products
    List {
        /// SQL ORDER BY expression, passed through verbatim.
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one product
    Show { id: i64 },
    /// Remove units from stock
    Sell {
        id: i64,
        #[arg(long, default_value_t = 1)]
        amount: i64,
    },
    /// Add units to stock
    Receive {
        id: i64,
        #[arg(long)]
        amount: i64,
    },
    /// Delete one product
    Delete { id: i64 },
    /// Delete every product
    DeleteAll,
    /// Print the MIME type of a locator
    Type { locator: String },
    /// Run a raw query against a locator
    Query {
        locator: String,
        /// Comma-separated column list.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Selection with `?` placeholders.
        #[arg(long = "where")]
        clause: Option<String>,
        /// Positional selection argument; repeatable.
        #[arg(long = "arg")]
        args: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let registry = Arc::new(ObserverRegistry::new());
    let provider = InventoryProvider::with_default_config(
        SqliteStorageEngine::new(&conn),
        Arc::clone(&registry),
    );
    if cli.watch {
        registry.register(
            provider.collection_locator(),
            true,
            Arc::new(|changed: &ResourceLocator| eprintln!("changed: {changed}")),
        );
    }
    let service = InventoryService::new(provider);
    info!("event=cli_command module=cli status=start db={}", cli.db.display());

    match cli.command {
        Commands::Add {
            name,
            price,
            quantity,
            supplier_name,
            supplier_phone,
        } => {
            let mut product = Product::new(name, price, quantity);
            product.supplier_name = supplier_name;
            product.supplier_phone = supplier_phone;
            let id = service.add_product(&product)?;
            println!("{}", service.provider().config().item_locator(id));
        }
        Commands::List { sort } => {
            for product in service.list_products(sort.as_deref())? {
                print_product(&product);
            }
        }
        Commands::Show { id } => match service.get_product(id)? {
            Some(product) => print_product(&product),
            None => return Err(format!("product not found: {id}").into()),
        },
        Commands::Sell { id, amount } => print_product(&service.record_sale(id, amount)?),
        Commands::Receive { id, amount } => print_product(&service.receive_stock(id, amount)?),
        Commands::Delete { id } => service.delete_product(id)?,
        Commands::DeleteAll => println!("deleted={}", service.delete_all()?),
        Commands::Type { locator } => {
            let locator: ResourceLocator = locator.parse()?;
            println!("{}", service.provider().get_type(&locator)?);
        }
        Commands::Query {
            locator,
            columns,
            clause,
            args,
            sort,
        } => {
            let locator: ResourceLocator = locator.parse()?;
            let projection: Vec<&str> = columns.iter().map(String::as_str).collect();
            let selection = match clause {
                Some(clause) => Selection::new(clause, args),
                None => Selection::all(),
            };
            let cursor = service.provider().query(
                &locator,
                (!projection.is_empty()).then_some(projection.as_slice()),
                &selection,
                sort.as_deref(),
            )?;
            for record in &cursor {
                println!("{record}");
            }
        }
    }

    Ok(())
}

fn print_product(product: &Product) {
    println!(
        "_id={} name={} price={} quantity={} supplier_name={} supplier_phone={}",
        product.id.map_or_else(|| "NULL".to_string(), |id| id.to_string()),
        product.name,
        product.price,
        product.quantity,
        product.supplier_name.as_deref().unwrap_or("NULL"),
        product.supplier_phone.as_deref().unwrap_or("NULL"),
    );
}
