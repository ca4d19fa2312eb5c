//! FunPay Analyst CLI
//!
//! Provides commands for:
//! - `category`: Analyze the listings of a category
//! - `seller`: Analyze a seller's profile and reviews
//! - `categories`: List the game categories of the home page
//! - `analyze`: Detect the target type and run the matching analysis
//!
//! Reports are printed to stdout as pretty JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use funpay_analyst_lib::application::{AnalysisResponse, MarketAnalyzer};
use funpay_analyst_lib::domain::Currency;
use funpay_analyst_lib::infrastructure::{AnalystConfig, HttpClient, init_logging_with_config};

/// FunPay marketplace analytics
#[derive(Parser)]
#[command(name = "funpay-analyst")]
#[command(about = "Seller rankings, price distributions and review history for FunPay")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Currency prices are rendered in: RUB, USD, EUR or UAH
    #[arg(long, global = true, default_value = "RUB")]
    currency: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Analyze a category by URL
    Category {
        /// Category URL, e.g. https://funpay.com/lots/81/
        url: String,
    },
    /// Analyze a seller by numeric id or profile URL
    Seller(ReviewArgs),
    /// List game categories
    Categories,
    /// Analyze a category id, category URL, seller URL or lot URL
    Analyze(ReviewArgs),
}

#[derive(Args)]
struct ReviewArgs {
    target: String,

    /// Maximum number of reviews to fetch (clamped to 1..=1000)
    #[arg(long)]
    max_reviews: Option<i64>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AnalystConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;
    debug!("Loaded configuration: {:?}", config);

    let currency = Currency::parse_lenient(&cli.currency);
    let client = HttpClient::with_settings(&config.http)?;
    let default_max_reviews = config.pagination.default_max_reviews as i64;
    let analyzer = MarketAnalyzer::new(client, config)?;
    info!("🚀 funpay-analyst started (currency {} {})", currency, currency.symbol());

    match cli.command {
        Commands::Category { url } => {
            let response: AnalysisResponse = analyzer.analyze_category(&url, currency).await.into();
            print_json(&response)?;
        }
        Commands::Seller(args) => {
            let max_reviews = analyzer
                .config()
                .pagination
                .clamp_max_reviews(args.max_reviews.unwrap_or(default_max_reviews));
            let response: AnalysisResponse = analyzer
                .analyze_seller(&args.target, currency, max_reviews)
                .await
                .into();
            print_json(&response)?;
        }
        Commands::Categories => {
            print_json(&analyzer.get_categories().await)?;
        }
        Commands::Analyze(args) => {
            let response = analyzer
                .analyze(
                    &args.target,
                    currency,
                    args.max_reviews.unwrap_or(default_max_reviews),
                )
                .await;
            print_json(&response)?;
        }
    }

    Ok(())
}
