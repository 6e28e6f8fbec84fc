//! itemstore admin binary
//!
//! Non-interactive maintenance commands against a snapshot/log pair.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itemstore::{Config, Engine, Item};
use tracing_subscriber::{fmt, EnvFilter};

/// itemstore admin
#[derive(Parser, Debug)]
#[command(name = "itemstore-admin")]
#[command(about = "Maintenance commands for an itemstore data directory")]
#[command(version)]
struct Args {
    /// Directory holding items.dat and operations.log
    #[arg(short, long, default_value = "./itemstore_data")]
    data_dir: PathBuf,

    /// Snapshot file (overrides --data-dir)
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Operation log file (overrides --data-dir)
    #[arg(long)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the operation log onto the snapshot
    Compact,

    /// List every item
    List,

    /// Show one item by code
    Get {
        /// Item code
        code: i64,
    },

    /// Find items with a similar name
    Find {
        /// Name to match
        name: String,

        /// Maximum weighted edit distance
        #[arg(short = 'k', long, default_value = "2")]
        distance: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,itemstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder().dir(&args.data_dir);
    if let Some(path) = &args.data_path {
        builder = builder.data_path(path);
    }
    if let Some(path) = &args.log_path {
        builder = builder.log_path(path);
    }
    let config = builder.build();

    tracing::debug!("itemstore-admin v{}", itemstore::VERSION);

    // Opening already compacts pending operations, so `compact` usually reports zero
    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Compact => match engine.compact() {
            Ok(replayed) => println!(
                "replayed {} operations; {} records in snapshot",
                replayed,
                engine.len()
            ),
            Err(e) => {
                tracing::error!("Compaction failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::List => {
            for item in engine.items() {
                print_item(item);
            }
        }
        Commands::Get { code } => match engine.select_by_code(code) {
            Some(item) => print_item(&item),
            None => {
                eprintln!("no item with code {}", code);
                std::process::exit(2);
            }
        },
        Commands::Find { name, distance } => {
            for item in engine.select_by_name_like_within(&name, distance) {
                print_item(&item);
            }
        }
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}

fn print_item(item: &Item) {
    println!(
        "{}\t{}\t{}\tqty={}\tbrands={}",
        item.code,
        item.name,
        item.colour,
        item.quantity,
        item.brand_count()
    );
    for brand in &item.brands {
        println!(
            "\t- {}\t{}\tqty={}\tprice={}",
            brand.code, brand.name, brand.quantity, brand.price
        );
    }
}
