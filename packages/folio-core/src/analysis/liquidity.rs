//! Liquidity profile of a portfolio.

use crate::types::{PortfolioSnapshot, SchemeMetadata, SchemeType};
use serde::{Deserialize, Serialize};

/// How quickly a holding can be turned into cash.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityTier {
    /// T+1 redemption
    High,
    /// T+2 to T+3
    Medium,
    /// Longer than T+3
    Low,
}

impl LiquidityTier {
    /// Classify a scheme by its type and category.
    pub fn of(scheme: &SchemeMetadata) -> Self {
        match scheme.scheme_type {
            SchemeType::Equity => LiquidityTier::Medium,
            SchemeType::Debt => {
                let category = scheme.category.as_str();
                if category.contains("Liquid") || category.contains("Overnight") {
                    LiquidityTier::High
                } else if category.contains("Ultra Short") || category.contains("Low Duration") {
                    LiquidityTier::Medium
                } else {
                    LiquidityTier::Low
                }
            }
            _ => LiquidityTier::Medium,
        }
    }
}

/// Portfolio value split by liquidity tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityProfile {
    pub high_liquidity: f64,
    pub medium_liquidity: f64,
    pub low_liquidity: f64,
    pub high_liquidity_percent: f64,
    pub medium_liquidity_percent: f64,
    pub low_liquidity_percent: f64,
}

/// Bucket every holding's current value into a liquidity tier.
///
/// Percentages are taken against the portfolio's `current_value`; an empty
/// portfolio reports 0 for each.
pub fn analyze_liquidity(portfolio: &PortfolioSnapshot) -> LiquidityProfile {
    let mut profile = LiquidityProfile::default();

    for holding in &portfolio.holdings {
        match LiquidityTier::of(&holding.scheme) {
            LiquidityTier::High => profile.high_liquidity += holding.current_value,
            LiquidityTier::Medium => profile.medium_liquidity += holding.current_value,
            LiquidityTier::Low => profile.low_liquidity += holding.current_value,
        }
    }

    let total = portfolio.current_value;
    if total != 0.0 {
        profile.high_liquidity_percent = profile.high_liquidity / total * 100.0;
        profile.medium_liquidity_percent = profile.medium_liquidity / total * 100.0;
        profile.low_liquidity_percent = profile.low_liquidity / total * 100.0;
    }

    profile
}
