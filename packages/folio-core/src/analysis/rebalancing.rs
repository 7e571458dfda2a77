//! Rebalancing suggestions against a target allocation.

use crate::config::RebalancePolicy;
use crate::types::{Allocation, PortfolioSnapshot};
use serde::{Deserialize, Serialize};

/// Direction of a suggested adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RebalanceAction {
    Increase,
    Decrease,
}

/// A single suggested adjustment for one asset class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Asset class or category name
    pub asset: String,
    /// Current weight in percent
    pub current_allocation: f64,
    /// Target weight in percent
    pub target_allocation: f64,
    /// Target minus current, in percentage points
    pub difference: f64,
    pub action: RebalanceAction,
    /// Money to move to close the gap
    pub amount_to_rebalance: f64,
}

/// Current and target allocations together with the resulting suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingPlan {
    pub current_allocation: Allocation,
    pub target_allocation: Allocation,
    pub suggestions: Vec<Suggestion>,
}

/// Compare current and target allocations and suggest trades.
///
/// # Arguments
///
/// * `current` - Current weights in percent; missing categories count as 0
/// * `target` - Target weights in percent; output follows its order
/// * `portfolio_value` - Current market value used to size the trades
/// * `threshold` - Drift in percentage points that must be exceeded
///
/// # Returns
///
/// One suggestion per target category whose drift is strictly greater than
/// `threshold`. Categories only present in `current` are ignored.
pub fn suggest_rebalancing(
    current: &Allocation,
    target: &Allocation,
    portfolio_value: f64,
    threshold: f64,
) -> Vec<Suggestion> {
    target
        .iter()
        .filter_map(|(asset, target_weight)| {
            let current_weight = current.weight(asset);
            let difference = target_weight - current_weight;

            if difference.abs() <= threshold {
                return None;
            }

            Some(Suggestion {
                asset: asset.to_string(),
                current_allocation: current_weight,
                target_allocation: target_weight,
                difference,
                action: if difference > 0.0 {
                    RebalanceAction::Increase
                } else {
                    RebalanceAction::Decrease
                },
                amount_to_rebalance: (difference * portfolio_value / 100.0).abs(),
            })
        })
        .collect()
}

/// Build a rebalancing plan for a portfolio snapshot.
///
/// Uses [`Allocation::default_target`] when no target is supplied.
pub fn plan_rebalancing(
    portfolio: &PortfolioSnapshot,
    target: Option<&Allocation>,
    policy: &RebalancePolicy,
) -> RebalancingPlan {
    let target = target.cloned().unwrap_or_else(Allocation::default_target);
    let suggestions = suggest_rebalancing(
        &portfolio.asset_allocation,
        &target,
        portfolio.current_value,
        policy.threshold,
    );

    RebalancingPlan {
        current_allocation: portfolio.asset_allocation.clone(),
        target_allocation: target,
        suggestions,
    }
}
