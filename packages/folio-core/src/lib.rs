//! Folio Core - Portfolio metrics engine for client/advisor portfolio tracking.
//!
//! This crate turns transactions, valuation snapshots and scheme metadata into
//! the indicators shown on an advisor dashboard:
//!
//! - **Returns**: XIRR (money-weighted), absolute return, CAGR, per-holding return
//! - **Risk metrics**: annualized volatility, Sharpe ratio, beta
//! - **Fund analysis**: sector and market-cap overlap, liquidity profile
//! - **Rebalancing**: drift against a target allocation
//!
//! Every calculation is a pure function over caller-supplied values; policy
//! constants live in [`MetricsConfig`].
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use folio_core::{compute_xirr, MetricsConfig, Transaction, TransactionType};
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let transactions = vec![
//!     Transaction::new(start, TransactionType::Purchase, 100_000.0),
//!     Transaction::new(start + Duration::days(365), TransactionType::Redemption, 110_000.0),
//! ];
//!
//! let config = MetricsConfig::default();
//! let xirr = compute_xirr(&transactions, &config.solver).unwrap();
//! assert!((xirr - 10.0).abs() <= 0.01);
//! ```

pub mod analysis;
pub mod config;
pub mod portfolio;
pub mod types;

// Re-export commonly used types
pub use config::{MetricsConfig, RebalancePolicy, RiskPolicy, SolverPolicy};
pub use types::{
    Allocation, ApiResponse, Benchmark, Holding, MarketCapAllocation, Period, PortfolioSnapshot,
    SchemeMetadata, SchemeReturns, SchemeType, Transaction, TransactionType,
};

// Re-export main functionality
pub use analysis::{
    analyze_liquidity, analyze_portfolio, analyze_risk_return, fund_overlap,
    market_cap_overlap, plan_rebalancing, sector_overlap, suggest_rebalancing, FundOverlap,
    LiquidityProfile, LiquidityTier, PortfolioAnalysis, RebalanceAction, RebalancingPlan,
    RiskReturnAnalysis, SchemeCatalog, SchemeLookup, Suggestion,
};
pub use portfolio::{
    absolute_return, beta, cagr, calculate_returns, calculate_risk_metrics, compute_xirr,
    sharpe_ratio, volatility, xirr_or_zero, ReturnsSummary, RiskMetrics,
};

/// Error types for folio-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("XIRR did not converge after {iterations} iterations (rate {last_rate}): {reason}")]
    NonConvergent {
        iterations: u32,
        last_rate: f64,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;
