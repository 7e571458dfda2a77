//! Folio CLI - Command line access to the portfolio metrics engine.
//!
//! Every command reads JSON inputs from files and prints an `ApiResponse`
//! envelope as JSON on stdout. Logs go to stderr (`RUST_LOG` controls the level).

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use folio_core::{
    analysis::{analyze_liquidity, analyze_portfolio, analyze_risk_return, fund_overlap},
    analysis::{plan_rebalancing, SchemeCatalog},
    portfolio::{calculate_returns, calculate_risk_metrics, compute_xirr, volatility},
    Allocation, ApiResponse, Benchmark, MetricsConfig, Period, PortfolioSnapshot, Transaction,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI - portfolio returns, risk and allocation analysis")]
#[command(version)]
struct Cli {
    /// Metrics config file (defaults to ~/.folio/metrics.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute XIRR for a date-sorted transaction list
    Xirr {
        /// JSON array of transactions
        #[arg(short, long)]
        transactions: PathBuf,
    },
    /// Absolute return and CAGR for a portfolio snapshot
    Returns {
        /// Portfolio snapshot JSON
        #[arg(short, long)]
        portfolio: PathBuf,
        /// Valuation time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Volatility, Sharpe ratio and beta for a return series
    Risk {
        /// JSON array of periodic returns in percent
        #[arg(short, long)]
        returns: PathBuf,
        /// JSON array of benchmark returns aligned with the series
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        /// Sampling period: daily, weekly or monthly
        #[arg(long)]
        period: Option<Period>,
    },
    /// Sector and market-cap overlap between two schemes
    Overlap {
        /// Scheme catalog JSON (defaults to ~/.folio/schemes.json)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// First scheme code
        #[arg(long)]
        scheme1: String,
        /// Second scheme code
        #[arg(long)]
        scheme2: String,
    },
    /// Liquidity profile of a portfolio
    Liquidity {
        /// Portfolio snapshot JSON
        #[arg(short, long)]
        portfolio: PathBuf,
    },
    /// Rebalancing suggestions against a target allocation
    Rebalance {
        /// Portfolio snapshot JSON
        #[arg(short, long)]
        portfolio: PathBuf,
        /// Target allocation JSON object (defaults to 60/30/5/5)
        #[arg(short, long)]
        target: Option<PathBuf>,
        /// Drift threshold in percentage points
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Full portfolio overview plus risk-return data
    Analysis {
        /// Portfolio snapshot JSON
        #[arg(short, long)]
        portfolio: PathBuf,
        /// JSON array of transactions
        #[arg(short, long)]
        transactions: PathBuf,
        /// Benchmark JSON ({"return": .., "historicalReturns": [..]})
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
    },
}

fn main() {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match run(cli) {
        Ok(data) => render(&ApiResponse::ok(data)),
        Err(e) => render(&ApiResponse::<()>::err(format!("{:#}", e))),
    };

    println!("{}", output);
}

fn run(cli: Cli) -> anyhow::Result<serde_json::Value> {
    let mut config = match &cli.config {
        Some(path) => MetricsConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => MetricsConfig::load(),
    };

    match cli.command {
        Commands::Xirr { transactions } => {
            let transactions: Vec<Transaction> = read_json(&transactions)?;
            let xirr = compute_xirr(&transactions, &config.solver)?;
            Ok(json!({
                "xirr": xirr,
                "transactionCount": transactions.len(),
            }))
        }
        Commands::Returns { portfolio, now } => {
            let portfolio: PortfolioSnapshot = read_json(&portfolio)?;
            let returns = calculate_returns(&portfolio, now.unwrap_or_else(Utc::now));
            Ok(json!({
                "absoluteReturn": portfolio.absolute_return(),
                "returns": returns,
            }))
        }
        Commands::Risk {
            returns,
            benchmark,
            period,
        } => {
            let returns: Vec<f64> = read_json(&returns)?;
            let benchmark: Option<Vec<f64>> = benchmark.map(|p| read_json(&p)).transpose()?;
            let period = period.unwrap_or(config.risk.default_period);
            let metrics = calculate_risk_metrics(&returns, benchmark.as_deref(), &config.risk);
            Ok(json!({
                "period": period,
                "volatility": volatility(&returns, period),
                "riskMetrics": metrics,
            }))
        }
        Commands::Overlap {
            catalog,
            scheme1,
            scheme2,
        } => {
            let catalog = match catalog {
                Some(path) => SchemeCatalog::from_path(&path)?,
                None => SchemeCatalog::load(),
            };
            let overlap = fund_overlap(&catalog, &scheme1, &scheme2)?;
            Ok(serde_json::to_value(overlap)?)
        }
        Commands::Liquidity { portfolio } => {
            let portfolio: PortfolioSnapshot = read_json(&portfolio)?;
            Ok(serde_json::to_value(analyze_liquidity(&portfolio))?)
        }
        Commands::Rebalance {
            portfolio,
            target,
            threshold,
        } => {
            let portfolio: PortfolioSnapshot = read_json(&portfolio)?;
            let target: Option<Allocation> = target.map(|p| read_json(&p)).transpose()?;
            if let Some(threshold) = threshold {
                config.rebalance.threshold = threshold;
            }
            let plan = plan_rebalancing(&portfolio, target.as_ref(), &config.rebalance);
            Ok(serde_json::to_value(plan)?)
        }
        Commands::Analysis {
            portfolio,
            transactions,
            benchmark,
        } => {
            let portfolio: PortfolioSnapshot = read_json(&portfolio)?;
            let transactions: Vec<Transaction> = read_json(&transactions)?;
            let benchmark: Option<Benchmark> = benchmark.map(|p| read_json(&p)).transpose()?;

            let overview = analyze_portfolio(&portfolio, &transactions, &config, Utc::now());
            let risk_return = analyze_risk_return(&portfolio, benchmark.as_ref(), &config.risk);
            Ok(json!({
                "overview": overview,
                "riskReturn": risk_return,
                "liquidity": analyze_liquidity(&portfolio),
            }))
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|e| encode_failure(&e))
}

fn encode_failure(error: &serde_json::Error) -> String {
    json!({
        "ok": false,
        "error": format!("failed to encode response: {}", error),
    })
    .to_string()
}
