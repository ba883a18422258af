//! # Zakat CLI
//!
//! Reads a JSON request, prints the JSON result.
//!
//! ## Usage
//! ```bash
//! # Calculate from a file with live prices (needs a goldapi.io key)
//! zakat-cli --api-key $GOLDAPI_KEY calculate request.json
//!
//! # From stdin, fixed prices, with the step-by-step explanation
//! echo '{"cash_on_hand": 6000}' | zakat-cli --offline calculate --explain
//!
//! # JSON Schemas for the request and result records
//! zakat-cli schema
//!
//! # Write a sample config file
//! zakat-cli init-config
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use zakat_engine::pricing::Prices;
use zakat_engine::{ZakatCalculator, ZakatConfig, ZakatRequest, ZakatResult};

#[cfg(feature = "live-pricing")]
use zakat_engine::pricing::{BestEffortPriceProvider, GoldApiPriceProvider, NetworkConfig, PriceProvider};

mod config_loader;

use config_loader::CliConfig;

/// Zakat calculator
#[derive(Parser, Debug)]
#[command(name = "zakat-cli")]
#[command(version)]
#[command(about = "Deterministic Zakat calculator with live metal pricing", long_about = None)]
struct Args {
    /// Use fallback prices instead of fetching live
    #[arg(long, global = true, default_value = "false")]
    offline: bool,

    /// Gold price per gram (overrides live/default)
    #[arg(long, global = true)]
    gold_price: Option<Decimal>,

    /// Silver price per gram (overrides live/default)
    #[arg(long, global = true)]
    silver_price: Option<Decimal>,

    /// goldapi.io access token (falls back to GOLDAPI_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate Zakat for a JSON request
    Calculate {
        /// Request file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Print the step-by-step calculation instead of JSON
        #[arg(long, default_value = "false")]
        explain: bool,

        /// Pretty-print the JSON result
        #[arg(long, default_value = "false")]
        pretty: bool,
    },
    /// Print JSON Schemas for the request and result records
    Schema {
        #[arg(long, value_enum, default_value = "all")]
        record: SchemaRecord,
    },
    /// Write a sample config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SchemaRecord {
    Request,
    Result,
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let level = if args.verbose { "zakat_engine=debug" } else { "zakat_engine=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.parse()?)
                .add_directive(level.replace("zakat_engine", "zakat_cli").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let file_config = match &args.config {
        Some(path) => CliConfig::load_from(path),
        None => CliConfig::load(),
    };

    match &args.command {
        Commands::Calculate { input, explain, pretty } => {
            let config = build_config(&args, &file_config).await?;
            let body = read_input(input.as_deref())?;
            run_calculate(&body, &config, *explain, *pretty)
        }
        Commands::Schema { record } => print_schema(*record),
        Commands::InitConfig { force } => {
            let path = CliConfig::create_sample(*force)?;
            println!("Wrote sample configuration to {}", path.display());
            Ok(())
        }
    }
}

/// Resolves the engine config: file settings plus prices from flags, file, feed or fallback.
async fn build_config(args: &Args, file_config: &CliConfig) -> Result<ZakatConfig, Box<dyn std::error::Error>> {
    let prices = get_prices(args, file_config).await;
    info!(gold = %prices.gold_per_gram, silver = %prices.silver_per_gram, "using metal prices");

    let mut builder = ZakatConfig::builder()
        .gold_price(prices.gold_per_gram)
        .silver_price(prices.silver_per_gram);
    if let Some(rate) = file_config.zakat_rate {
        builder = builder.zakat_rate(rate);
    }
    if let Some(standard) = file_config.nisab_standard() {
        builder = builder.nisab_standard(standard);
    }

    Ok(builder.build()?)
}

/// Explicit prices, falling back per metal to the live feed or the built-in fallback.
fn fixed_prices(args: &Args, file_config: &CliConfig) -> (Option<Decimal>, Option<Decimal>) {
    (
        args.gold_price.or(file_config.gold_price),
        args.silver_price.or(file_config.silver_price),
    )
}

/// Fetches prices using BestEffortPriceProvider
async fn get_prices(args: &Args, file_config: &CliConfig) -> Prices {
    let (gold, silver) = fixed_prices(args, file_config);
    let defaults = Prices::fallback();
    let fallback = Prices {
        gold_per_gram: gold.unwrap_or(defaults.gold_per_gram),
        silver_per_gram: silver.unwrap_or(defaults.silver_per_gram),
    };

    if gold.is_some() && silver.is_some() {
        return fallback;
    }
    if args.offline || file_config.offline.unwrap_or(false) {
        debug!("offline mode; using fallback prices");
        return fallback;
    }

    fetch_live(args, file_config, fallback).await
}

/// Live prices through the best-effort provider. Explicit prices still win per metal.
#[cfg(feature = "live-pricing")]
async fn fetch_live(args: &Args, file_config: &CliConfig, fallback: Prices) -> Prices {
    let (gold, silver) = fixed_prices(args, file_config);
    let api_key = args.api_key.clone()
        .or_else(|| file_config.api_key.clone())
        .or_else(|| std::env::var("GOLDAPI_KEY").ok());

    let Some(api_key) = api_key else {
        warn!("No goldapi.io key configured; using fallback prices");
        return fallback;
    };

    let mut live = GoldApiPriceProvider::new(api_key, &NetworkConfig::default());
    if let Some(currency) = &file_config.currency {
        live = live.with_currency(currency.as_str());
    }
    let provider = BestEffortPriceProvider::with_fallback(live, fallback.clone());

    match provider.get_prices().await {
        Ok(prices) => Prices {
            gold_per_gram: gold.unwrap_or(prices.gold_per_gram),
            silver_per_gram: silver.unwrap_or(prices.silver_per_gram),
        },
        Err(e) => {
            warn!("Live pricing failed: {}", e);
            fallback
        }
    }
}

#[cfg(not(feature = "live-pricing"))]
async fn fetch_live(_args: &Args, _file_config: &CliConfig, fallback: Prices) -> Prices {
    warn!("Compiled without 'live-pricing'; using fallback prices");
    fallback
}

fn read_input(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parses the request body. Blank input is an empty request.
fn parse_request(body: &str, config: &ZakatConfig) -> Result<ZakatRequest, serde_json::Error> {
    let value: Value = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(body)?
    };
    Ok(ZakatRequest::from_value_with_config(&value, config))
}

fn run_calculate(body: &str, config: &ZakatConfig, explain: bool, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let request = parse_request(body, config)?;
    let report = ZakatCalculator::compute_with_trace(&request);

    if explain {
        print!("{}", report.explain());
    } else {
        println!("{}", render_result(&report.result, pretty)?);
    }
    Ok(())
}

fn render_result(result: &ZakatResult, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

fn print_schema(record: SchemaRecord) -> Result<(), Box<dyn std::error::Error>> {
    let request = schemars::schema_for!(ZakatRequest);
    let result = schemars::schema_for!(ZakatResult);

    let output = match record {
        SchemaRecord::Request => serde_json::to_value(&request)?,
        SchemaRecord::Result => serde_json::to_value(&result)?,
        SchemaRecord::All => serde_json::json!({ "request": request, "result": result }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
