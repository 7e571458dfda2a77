//! Fund and portfolio analysis.
//!
//! - **Overlap**: shared sector and market-cap weight between two schemes
//! - **Liquidity**: holdings bucketed by redemption speed
//! - **Rebalancing**: drift against a target allocation
//! - **Reports**: portfolio overview and risk-return data for the dashboard

mod catalog;
mod liquidity;
mod overlap;
mod rebalancing;
mod report;

pub use catalog::{SchemeCatalog, SchemeLookup};
pub use liquidity::{analyze_liquidity, LiquidityProfile, LiquidityTier};
pub use overlap::{fund_overlap, market_cap_overlap, scheme_overlap, sector_overlap, FundOverlap};
pub use rebalancing::{
    plan_rebalancing, suggest_rebalancing, RebalanceAction, RebalancingPlan, Suggestion,
};
pub use report::{
    analyze_portfolio, analyze_risk_return, BenchmarkComparison, HoldingBreakdown,
    HoldingRiskReturn, PortfolioAnalysis, RiskReturnAnalysis,
};
