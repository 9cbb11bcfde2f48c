pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mixmart_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "mixmart",
    about = "Mixmart storefront recommendations CLI",
    long_about = "Resolve delivery-variant prices and compute comparator and purchase-history \
                  recommendations against catalog and order snapshots.",
    after_help = "Examples:\n  mixmart demo\n  mixmart price --product rm-n20 --variant pump --catalog catalog.json\n  mixmart compare --product rm-n25 --catalog catalog.json --json\n  mixmart history --orders orders.json --catalog catalog.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Resolve the effective price for a product and delivery variant")]
    Price {
        #[arg(long, help = "Product id to price")]
        product: String,
        #[arg(long, help = "Delivery variant key (normal|pump|tremie_1|tremie_2|tremie_3)")]
        variant: Option<String>,
        #[arg(long, help = "Path to a catalog snapshot JSON file")]
        catalog: PathBuf,
    },
    #[command(about = "Compute upsell/downsell/alternative groups for a reference product")]
    Compare {
        #[arg(long, help = "Reference product id")]
        product: String,
        #[arg(long, help = "Path to a catalog snapshot JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Override the per-group display cap")]
        max: Option<usize>,
        #[arg(long, help = "Attach the full recommendation groups as JSON data")]
        json: bool,
    },
    #[command(about = "Mine a customer's order history for personalized recommendations")]
    History {
        #[arg(long, help = "Path to the customer's order history JSON file")]
        orders: PathBuf,
        #[arg(long, help = "Optional storewide order corpus JSON file")]
        market: Option<PathBuf>,
        #[arg(long, help = "Path to a catalog snapshot JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Attach the full recommendation records as JSON data")]
        json: bool,
    },
    #[command(about = "Run both engines against the built-in demo catalog and orders")]
    Demo {
        #[arg(long, help = "Attach the full demo output as JSON data")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use mixmart_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logging is best-effort here; commands re-load and report config errors
    // through the structured envelope.
    let logging_config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    init_logging(&logging_config);

    let result = match cli.command {
        Command::Price { product, variant, catalog } => {
            commands::price::run(&product, variant.as_deref(), &catalog)
        }
        Command::Compare { product, catalog, max, json } => {
            commands::compare::run(&product, &catalog, max, json)
        }
        Command::History { orders, market, catalog, json } => {
            commands::history::run(&orders, market.as_deref(), &catalog, json)
        }
        Command::Demo { json } => commands::demo::run(json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
