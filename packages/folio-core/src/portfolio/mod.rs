//! Portfolio return and risk calculations.
//!
//! Provides the XIRR solver, return summaries, and volatility / Sharpe / beta.

mod performance;
mod risk;
mod xirr;

pub use performance::{absolute_return, cagr, calculate_returns, ReturnsSummary, DAYS_PER_YEAR};
pub use risk::{beta, calculate_risk_metrics, sharpe_ratio, volatility, RiskMetrics};
pub use xirr::{compute_xirr, xirr_or_zero};
