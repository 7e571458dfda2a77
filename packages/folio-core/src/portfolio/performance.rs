//! Portfolio return calculations.

use crate::types::PortfolioSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Day count used for calendar-year fractions.
pub const DAYS_PER_YEAR: f64 = 365.25;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional number of days from `from` to `to` (negative if `to` is earlier).
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Return summary for a portfolio snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsSummary {
    /// Absolute return percentage since inception
    pub absolute: f64,
    /// Compound annual growth rate percentage since inception
    pub cagr: f64,
    /// Trailing one-year return percentage
    pub one_year: f64,
    /// Trailing three-year return percentage
    pub three_year: f64,
    /// Trailing five-year return percentage
    pub five_year: f64,
}

/// Calculate absolute return.
///
/// Returns `(current_value - investment) / investment * 100`, or 0 when
/// nothing was invested.
pub fn absolute_return(investment: f64, current_value: f64) -> f64 {
    if investment == 0.0 {
        return 0.0;
    }
    ((current_value - investment) / investment) * 100.0
}

/// Calculate compound annual growth rate in percent.
///
/// # Arguments
///
/// * `investment` - Amount invested at `created_at`
/// * `current_value` - Value at `now`
/// * `created_at` - Start of the holding period
/// * `now` - End of the holding period
///
/// # Returns
///
/// `((current_value / investment)^(1 / years) - 1) * 100` with years measured
/// in 365.25-day units; 0 when the period is empty or nothing was invested.
pub fn cagr(
    investment: f64,
    current_value: f64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let years = days_between(created_at, now) / DAYS_PER_YEAR;
    if years <= 0.0 || investment == 0.0 {
        return 0.0;
    }

    let growth = current_value / investment;
    if growth < 0.0 {
        return 0.0;
    }

    (growth.powf(1.0 / years) - 1.0) * 100.0
}

/// Calculate the return summary for a portfolio as of `now`.
///
/// Trailing period returns mirror CAGR until NAV history is available per
/// period. An empty portfolio (no investment or no value) reports all zeros.
pub fn calculate_returns(portfolio: &PortfolioSnapshot, now: DateTime<Utc>) -> ReturnsSummary {
    if portfolio.total_investment == 0.0 || portfolio.current_value == 0.0 {
        return ReturnsSummary::default();
    }

    let absolute = absolute_return(portfolio.total_investment, portfolio.current_value);
    let growth = cagr(
        portfolio.total_investment,
        portfolio.current_value,
        portfolio.created_at,
        now,
    );

    ReturnsSummary {
        absolute,
        cagr: growth,
        one_year: growth,
        three_year: growth,
        five_year: growth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_absolute_return() {
        assert_relative_eq!(absolute_return(10000.0, 11500.0), 15.0, epsilon = 1e-9);
        assert_relative_eq!(absolute_return(10000.0, 8000.0), -20.0, epsilon = 1e-9);
        assert_eq!(absolute_return(0.0, 5000.0), 0.0);
    }

    #[test]
    fn test_cagr_no_growth() {
        let now = start() + Duration::days(1000);
        assert_eq!(cagr(100_000.0, 100_000.0, start(), now), 0.0);
    }

    #[test]
    fn test_cagr_two_years() {
        // Two 365.25-day years
        let now = start() + Duration::hours(730 * 24 + 12);
        let growth = cagr(100_000.0, 121_000.0, start(), now);

        // 1.21^(1/2) - 1 = 10%
        assert_relative_eq!(growth, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_degenerate() {
        assert_eq!(cagr(100_000.0, 150_000.0, start(), start()), 0.0);
        assert_eq!(cagr(100_000.0, 150_000.0, start(), start() - Duration::days(10)), 0.0);
        assert_eq!(cagr(0.0, 150_000.0, start(), start() + Duration::days(400)), 0.0);
    }

    #[test]
    fn test_calculate_returns() {
        let snapshot = PortfolioSnapshot::new(100_000.0, 121_000.0, start());
        let now = start() + Duration::hours(730 * 24 + 12);

        let returns = calculate_returns(&snapshot, now);

        assert_relative_eq!(returns.absolute, 21.0, epsilon = 1e-9);
        assert_relative_eq!(returns.cagr, 10.0, epsilon = 1e-9);
        assert_eq!(returns.one_year, returns.cagr);
        assert_eq!(returns.five_year, returns.cagr);
    }

    #[test]
    fn test_calculate_returns_empty_portfolio() {
        let snapshot = PortfolioSnapshot::new(0.0, 0.0, start());
        let returns = calculate_returns(&snapshot, start() + Duration::days(100));

        assert_eq!(returns, ReturnsSummary::default());
    }

    #[test]
    fn test_days_between_fractional() {
        let later = start() + Duration::hours(36);
        assert_relative_eq!(days_between(start(), later), 1.5, epsilon = 1e-12);
        assert_relative_eq!(days_between(later, start()), -1.5, epsilon = 1e-12);
    }
}
