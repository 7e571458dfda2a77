//! Aggregate analysis objects served to the dashboard.

use crate::config::{MetricsConfig, RiskPolicy};
use crate::portfolio::{beta, calculate_returns, compute_xirr, volatility, ReturnsSummary};
use crate::types::{Allocation, Benchmark, MarketCapAllocation, PortfolioSnapshot, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-holding weight and return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingBreakdown {
    /// Scheme display name
    pub scheme: String,
    /// Share of portfolio value in percent
    pub allocation: f64,
    /// Unrealized return in percent
    pub returns: f64,
}

/// Performance overview of a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalysis {
    /// XIRR in percent; `None` when the solver could not converge
    pub xirr: Option<f64>,
    pub returns: ReturnsSummary,
    pub asset_allocation: Allocation,
    pub market_cap_allocation: MarketCapAllocation,
    pub sector_allocation: Allocation,
    pub holdings: Vec<HoldingBreakdown>,
}

/// Return and risk of one holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRiskReturn {
    pub scheme: String,
    /// Unrealized return in percent
    #[serde(rename = "return")]
    pub return_percent: f64,
    /// Annualized volatility of the scheme's return history
    pub risk: f64,
}

/// Portfolio versus benchmark.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    /// Portfolio XIRR minus benchmark return
    pub alpha: f64,
    /// `None` when the benchmark series has no variance
    pub beta: Option<f64>,
}

/// Risk-return scatter data for a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskReturnAnalysis {
    pub returns: Vec<HoldingRiskReturn>,
    /// Stored portfolio XIRR in percent
    pub portfolio_return: f64,
    /// Annualized volatility of the portfolio return history
    pub portfolio_risk: f64,
    pub benchmark_comparison: Option<BenchmarkComparison>,
}

/// Build the performance overview for a portfolio.
///
/// `transactions` must be sorted by date. A solver failure is logged and
/// reported as `xirr: None` rather than failing the whole analysis.
pub fn analyze_portfolio(
    portfolio: &PortfolioSnapshot,
    transactions: &[Transaction],
    config: &MetricsConfig,
    now: DateTime<Utc>,
) -> PortfolioAnalysis {
    let xirr = match compute_xirr(transactions, &config.solver) {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!("Leaving XIRR empty in portfolio analysis: {}", e);
            None
        }
    };

    let holdings = portfolio
        .holdings
        .iter()
        .map(|h| HoldingBreakdown {
            scheme: h.scheme.name.clone(),
            allocation: share_percent(h.current_value, portfolio.current_value),
            returns: h.return_percent(),
        })
        .collect();

    PortfolioAnalysis {
        xirr,
        returns: calculate_returns(portfolio, now),
        asset_allocation: portfolio.asset_allocation.clone(),
        market_cap_allocation: portfolio.market_cap_allocation,
        sector_allocation: portfolio.sector_allocation.clone(),
        holdings,
    }
}

/// Build risk-return data for each holding and, optionally, a benchmark comparison.
pub fn analyze_risk_return(
    portfolio: &PortfolioSnapshot,
    benchmark: Option<&Benchmark>,
    policy: &RiskPolicy,
) -> RiskReturnAnalysis {
    let period = policy.default_period;

    let returns = portfolio
        .holdings
        .iter()
        .map(|h| HoldingRiskReturn {
            scheme: h.scheme.name.clone(),
            return_percent: h.return_percent(),
            risk: volatility(&h.scheme.returns.historical_returns, period),
        })
        .collect();

    let benchmark_comparison = benchmark.map(|b| BenchmarkComparison {
        alpha: portfolio.xirr - b.return_percent,
        beta: beta(&portfolio.returns.historical_returns, &b.historical_returns),
    });

    RiskReturnAnalysis {
        returns,
        portfolio_return: portfolio.xirr,
        portfolio_risk: volatility(&portfolio.returns.historical_returns, period),
        benchmark_comparison,
    }
}

fn share_percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    part / total * 100.0
}
