//! Core data types for the Folio metrics engine.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a mutual-fund transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Purchase,
    Redemption,
    #[serde(rename = "Switch In")]
    SwitchIn,
    #[serde(rename = "Switch Out")]
    SwitchOut,
    Dividend,
}

impl TransactionType {
    /// Whether money leaves the investor's pocket for this transaction.
    pub fn is_outflow(self) -> bool {
        matches!(self, TransactionType::Purchase)
    }
}

/// A dated cash-flow transaction against a scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Trade date
    pub date: DateTime<Utc>,
    /// Transaction kind
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Units allotted or redeemed
    #[serde(default)]
    pub units: f64,
    /// NAV the units were priced at
    #[serde(default)]
    pub nav: f64,
    /// Gross amount
    pub amount: f64,
    /// Charges deducted from the gross amount
    #[serde(default)]
    pub charges: f64,
    /// Tax deducted from the gross amount
    #[serde(default)]
    pub tax: f64,
    /// Amount after charges and tax; always non-negative, direction comes from `kind`
    pub net_amount: f64,
}

impl Transaction {
    /// Create a transaction carrying only a date, kind and net amount.
    pub fn new(date: DateTime<Utc>, kind: TransactionType, net_amount: f64) -> Self {
        Self {
            date,
            kind,
            units: 0.0,
            nav: 0.0,
            amount: net_amount,
            charges: 0.0,
            tax: 0.0,
            net_amount,
        }
    }

    /// Attach units and NAV to the transaction.
    pub fn with_units(mut self, units: f64, nav: f64) -> Self {
        self.units = units;
        self.nav = nav;
        self
    }

    /// Cash flow from the investor's point of view: purchases are negative,
    /// everything else is money coming back.
    pub fn signed_cash_flow(&self) -> f64 {
        if self.kind.is_outflow() {
            -self.net_amount
        } else {
            self.net_amount
        }
    }
}

/// Broad asset type of a scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SchemeType {
    Equity,
    Debt,
    Hybrid,
    #[serde(rename = "Solution Oriented")]
    SolutionOriented,
    #[default]
    Other,
}

/// Market-cap split of a scheme's equity book, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketCapAllocation {
    pub large_cap: f64,
    pub mid_cap: f64,
    pub small_cap: f64,
}

impl MarketCapAllocation {
    pub fn new(large_cap: f64, mid_cap: f64, small_cap: f64) -> Self {
        Self {
            large_cap,
            mid_cap,
            small_cap,
        }
    }

    /// The three bands in a fixed order: large, mid, small.
    pub fn bands(&self) -> [f64; 3] {
        [self.large_cap, self.mid_cap, self.small_cap]
    }
}

/// Historical return series attached to a scheme or portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemeReturns {
    /// Periodic returns in percent, oldest first
    pub historical_returns: Vec<f64>,
}

/// Read-only metadata for a mutual-fund scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemeMetadata {
    /// Scheme code (unique)
    pub code: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Asset type
    #[serde(rename = "type", default)]
    pub scheme_type: SchemeType,
    /// SEBI-style category, e.g. "Liquid Fund" or "Large Cap Fund"
    #[serde(default)]
    pub category: String,
    /// Sector weights in percent
    #[serde(default)]
    pub sector_allocation: Allocation,
    /// Market-cap weights in percent
    #[serde(default)]
    pub market_cap_allocation: MarketCapAllocation,
    /// Return history
    #[serde(default)]
    pub returns: SchemeReturns,
}

impl SchemeMetadata {
    /// Create scheme metadata with empty allocations.
    pub fn new(code: &str, scheme_type: SchemeType, category: &str) -> Self {
        Self {
            code: code.to_string(),
            name: code.to_string(),
            scheme_type,
            category: category.to_string(),
            sector_allocation: Allocation::new(),
            market_cap_allocation: MarketCapAllocation::default(),
            returns: SchemeReturns::default(),
        }
    }
}

/// A scheme position inside a portfolio snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Scheme the units belong to
    pub scheme: SchemeMetadata,
    /// Units held
    pub units: f64,
    /// Market value at the latest NAV
    pub current_value: f64,
    /// Average purchase price per unit
    pub avg_cost_price: f64,
}

impl Holding {
    pub fn new(
        scheme: SchemeMetadata,
        units: f64,
        avg_cost_price: f64,
        current_value: f64,
    ) -> Self {
        Self {
            scheme,
            units,
            current_value,
            avg_cost_price,
        }
    }

    /// Amount invested in this holding (units * average cost).
    pub fn cost_value(&self) -> f64 {
        self.units * self.avg_cost_price
    }

    /// Unrealized return of the holding in percent, 0 when there is no cost basis.
    pub fn return_percent(&self) -> f64 {
        let cost = self.cost_value();
        if cost == 0.0 {
            return 0.0;
        }
        ((self.current_value - cost) / cost) * 100.0
    }
}

/// Valuation snapshot of a client portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// Total amount invested
    pub total_investment: f64,
    /// Current market value
    pub current_value: f64,
    /// When the portfolio was opened
    pub created_at: DateTime<Utc>,
    /// Scheme holdings
    #[serde(default)]
    pub holdings: Vec<Holding>,
    /// Last stored XIRR in percent
    #[serde(default)]
    pub xirr: f64,
    /// Asset-class split in percent (equity, debt, gold, cash, ...)
    #[serde(default)]
    pub asset_allocation: Allocation,
    /// Sector split in percent
    #[serde(default)]
    pub sector_allocation: Allocation,
    /// Market-cap split in percent
    #[serde(default)]
    pub market_cap_allocation: MarketCapAllocation,
    /// Portfolio-level return history
    #[serde(default)]
    pub returns: SchemeReturns,
}

impl PortfolioSnapshot {
    /// Create a snapshot with no holdings.
    pub fn new(total_investment: f64, current_value: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            total_investment,
            current_value,
            created_at,
            holdings: Vec::new(),
            xirr: 0.0,
            asset_allocation: Allocation::new(),
            sector_allocation: Allocation::new(),
            market_cap_allocation: MarketCapAllocation::default(),
            returns: SchemeReturns::default(),
        }
    }

    /// Absolute return in percent, 0 when nothing was invested.
    pub fn absolute_return(&self) -> f64 {
        crate::portfolio::absolute_return(self.total_investment, self.current_value)
    }

    /// Sum of holding market values.
    pub fn holdings_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.current_value).sum()
    }
}

/// Benchmark index used for alpha/beta comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    /// Benchmark return in percent over the comparison horizon
    #[serde(rename = "return")]
    pub return_percent: f64,
    /// Periodic benchmark returns aligned with the portfolio series
    #[serde(default)]
    pub historical_returns: Vec<f64>,
}

/// Sampling frequency of a returns series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Period {
    /// Multiplier that turns a per-period standard deviation into an annual one.
    pub fn annualization_factor(self) -> f64 {
        match self {
            Period::Daily => 252.0_f64.sqrt(),
            Period::Weekly => 52.0_f64.sqrt(),
            Period::Monthly => 12.0_f64.sqrt(),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!(
                "unknown period '{}', expected daily, weekly or monthly",
                other
            )),
        }
    }
}

/// Category → weight map that remembers insertion order.
///
/// Used for asset-class, sector and target allocations. Weights are expected
/// to sum to roughly 100 but this is not enforced. JSON objects deserialize
/// in document order, so iteration follows the order the caller wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(IndexMap<String, f64>);

impl Allocation {
    /// Create an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// House default target: equity 60, debt 30, gold 5, cash 5.
    pub fn default_target() -> Self {
        [("equity", 60.0), ("debt", 30.0), ("gold", 5.0), ("cash", 5.0)]
            .into_iter()
            .collect()
    }

    /// Set the weight of a category, keeping its original position if present.
    pub fn set(&mut self, category: &str, weight: f64) {
        self.0.insert(category.to_string(), weight);
    }

    /// Builder form of [`Allocation::set`].
    pub fn with(mut self, category: &str, weight: f64) -> Self {
        self.set(category, weight);
        self
    }

    /// Weight of a category, if present.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Weight of a category, treating a missing category as 0.
    pub fn weight(&self, category: &str) -> f64 {
        self.get(category).unwrap_or(0.0)
    }

    /// Iterate categories and weights in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    /// Category names in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(category, weight)| (category.into(), weight)).collect())
    }
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_signed_cash_flow() {
        let buy = Transaction::new(day(1), TransactionType::Purchase, 5000.0);
        let sell = Transaction::new(day(2), TransactionType::Redemption, 5200.0);
        let switch_in = Transaction::new(day(3), TransactionType::SwitchIn, 100.0);

        assert_eq!(buy.signed_cash_flow(), -5000.0);
        assert_eq!(sell.signed_cash_flow(), 5200.0);
        // Only purchases count as outflows
        assert_eq!(switch_in.signed_cash_flow(), 100.0);
    }

    #[test]
    fn test_transaction_json() {
        let json = r#"{
            "date": "2024-01-05T00:00:00Z",
            "type": "Switch Out",
            "units": 12.5,
            "nav": 40.0,
            "amount": 500.0,
            "netAmount": 495.0
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(txn.kind, TransactionType::SwitchOut);
        assert_eq!(txn.net_amount, 495.0);
        assert_eq!(txn.charges, 0.0);
        assert_eq!(txn.date, day(5));
    }

    #[test]
    fn test_holding_return_percent() {
        let scheme = SchemeMetadata::new("EQ1", SchemeType::Equity, "Large Cap Fund");
        let holding = Holding::new(scheme, 100.0, 10.0, 1250.0);

        assert_eq!(holding.cost_value(), 1000.0);
        assert!((holding.return_percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_holding_return_zero_cost() {
        let scheme = SchemeMetadata::new("EQ1", SchemeType::Equity, "Large Cap Fund");
        let holding = Holding::new(scheme, 0.0, 10.0, 1250.0);

        assert_eq!(holding.return_percent(), 0.0);
    }

    #[test]
    fn test_snapshot_absolute_return() {
        let snapshot = PortfolioSnapshot::new(200_000.0, 230_000.0, day(1));
        assert!((snapshot.absolute_return() - 15.0).abs() < 1e-9);

        let empty = PortfolioSnapshot::new(0.0, 1000.0, day(1));
        assert_eq!(empty.absolute_return(), 0.0);
    }

    #[test]
    fn test_allocation_keeps_document_order() {
        let json = r#"{"gold": 5, "equity": 60, "cash": 5, "debt": 30}"#;
        let allocation: Allocation = serde_json::from_str(json).unwrap();

        let order: Vec<&str> = allocation.categories().collect();
        assert_eq!(order, vec!["gold", "equity", "cash", "debt"]);
        assert_eq!(allocation.total(), 100.0);
        assert_eq!(
            serde_json::to_string(&allocation).unwrap(),
            r#"{"gold":5.0,"equity":60.0,"cash":5.0,"debt":30.0}"#
        );
    }

    #[test]
    fn test_allocation_set_replaces_in_place() {
        let mut allocation = Allocation::new().with("equity", 50.0).with("debt", 50.0);
        allocation.set("equity", 70.0);

        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.get("equity"), Some(70.0));
        assert_eq!(allocation.weight("gold"), 0.0);
        assert_eq!(allocation.categories().next(), Some("equity"));
    }

    #[test]
    fn test_scheme_type_names() {
        let scheme_type: SchemeType = serde_json::from_str(r#""Solution Oriented""#).unwrap();
        assert_eq!(scheme_type, SchemeType::SolutionOriented);
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Weekly".parse::<Period>(), Ok(Period::Weekly));
        assert!("hourly".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::Monthly);
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
