//! Portfolio risk metrics calculation.
//!
//! Provides annualized volatility, Sharpe ratio and beta over periodic return
//! series expressed in percent.

use crate::config::RiskPolicy;
use crate::types::Period;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dispersion below this fraction of the series' magnitude counts as none.
const DISPERSION_TOLERANCE: f64 = 1e-12;

/// Risk summary for a return series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Sample standard deviation of the series (not annualized)
    pub standard_deviation: f64,
    /// Sharpe ratio; `None` when the series has no dispersion
    pub sharpe_ratio: Option<f64>,
    /// Beta against the benchmark; `None` without a usable benchmark
    pub beta: Option<f64>,
}

/// Calculate risk metrics for a return series.
///
/// # Arguments
///
/// * `returns` - Periodic returns in percent
/// * `benchmark` - Benchmark returns aligned with `returns`, if any
/// * `policy` - Risk-free rate and related settings
///
/// # Returns
///
/// `RiskMetrics` with zeroed fields when there are fewer than 2 data points.
pub fn calculate_risk_metrics(
    returns: &[f64],
    benchmark: Option<&[f64]>,
    policy: &RiskPolicy,
) -> RiskMetrics {
    if returns.len() < 2 {
        return RiskMetrics {
            standard_deviation: 0.0,
            sharpe_ratio: Some(0.0),
            beta: Some(0.0),
        };
    }

    RiskMetrics {
        standard_deviation: sample_std(returns),
        sharpe_ratio: sharpe_ratio(returns, policy.risk_free_rate),
        beta: benchmark.and_then(|b| beta(returns, b)),
    }
}

/// Calculate annualized volatility from periodic returns.
///
/// Sample standard deviation scaled by `sqrt(252)`, `sqrt(52)` or `sqrt(12)`
/// depending on `period`. Returns 0 for fewer than 2 data points.
pub fn volatility(returns: &[f64], period: Period) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    sample_std(returns) * period.annualization_factor()
}

/// Calculate Sharpe ratio from returns.
///
/// # Arguments
///
/// * `returns` - Periodic returns in percent
/// * `risk_free_rate` - Risk-free rate in the same unit (4.0 = 4%)
///
/// # Returns
///
/// `(mean - risk_free_rate) / std`. Fewer than 2 points give `Some(0.0)`;
/// a series with zero standard deviation gives `None`.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.len() < 2 {
        return Some(0.0);
    }

    let std = sample_std(returns);
    if std <= DISPERSION_TOLERANCE * mean(returns).abs().max(1.0) {
        debug!("Sharpe ratio undefined for a series with zero dispersion");
        return None;
    }

    Some((mean(returns) - risk_free_rate) / std)
}

/// Calculate beta as the least-squares slope of portfolio returns on benchmark returns.
///
/// Equivalent to `(nΣxy - ΣxΣy) / (nΣx² - (Σx)²)`. Series of different
/// lengths give `Some(0.0)`. A benchmark with no variance (including an
/// empty one) gives `None`.
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Option<f64> {
    if portfolio_returns.len() != benchmark_returns.len() {
        return Some(0.0);
    }

    if benchmark_returns.is_empty() {
        return None;
    }

    // Centred sums; the raw-sum form cancels badly for large constant values
    let x_mean = mean(benchmark_returns);
    let y_mean = mean(portfolio_returns);
    let (mut sxy, mut sxx, mut sum_sq) = (0.0, 0.0, 0.0);

    for (&y, &x) in portfolio_returns.iter().zip(benchmark_returns) {
        sxy += (x - x_mean) * (y - y_mean);
        sxx += (x - x_mean) * (x - x_mean);
        sum_sq += x * x;
    }

    if sxx <= DISPERSION_TOLERANCE * sum_sq {
        debug!("Beta undefined for a constant benchmark");
        return None;
    }

    Some(sxy / sxx)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Callers guarantee at least 2 values.
fn sample_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
