//! Portfolio overlap between two schemes.
//!
//! Overlap is the weight two funds have in common along one dimension: for
//! each category take the smaller of the two weights, then sum.

use super::catalog::SchemeLookup;
use crate::types::{Allocation, MarketCapAllocation, SchemeMetadata};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Overlap between two schemes, in percentage points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundOverlap {
    pub sector_overlap: f64,
    pub market_cap_overlap: f64,
    /// Mean of sector and market-cap overlap
    pub overall_overlap: f64,
}

/// Sum of `min(w1, w2)` across the union of sectors; a missing sector weighs 0.
pub fn sector_overlap(sectors1: &Allocation, sectors2: &Allocation) -> f64 {
    let only_in_second = sectors2
        .categories()
        .filter(|sector| sectors1.get(sector).is_none());

    sectors1
        .categories()
        .chain(only_in_second)
        .map(|sector| sectors1.weight(sector).min(sectors2.weight(sector)))
        .sum()
}

/// Sum of `min(w1, w2)` across the large, mid and small cap bands.
pub fn market_cap_overlap(cap1: &MarketCapAllocation, cap2: &MarketCapAllocation) -> f64 {
    cap1.bands()
        .iter()
        .zip(cap2.bands().iter())
        .map(|(a, b)| a.min(*b))
        .sum()
}

/// Overlap between two already-resolved schemes.
pub fn scheme_overlap(scheme1: &SchemeMetadata, scheme2: &SchemeMetadata) -> FundOverlap {
    let sector = sector_overlap(&scheme1.sector_allocation, &scheme2.sector_allocation);
    let market_cap = market_cap_overlap(
        &scheme1.market_cap_allocation,
        &scheme2.market_cap_allocation,
    );

    FundOverlap {
        sector_overlap: sector,
        market_cap_overlap: market_cap,
        overall_overlap: (sector + market_cap) / 2.0,
    }
}

/// Look up two schemes by code and compute their overlap.
///
/// Fails with [`Error::NotFound`] when either code is unknown.
pub fn fund_overlap<L>(lookup: &L, scheme1_code: &str, scheme2_code: &str) -> Result<FundOverlap>
where
    L: SchemeLookup + ?Sized,
{
    let scheme1 = lookup
        .find_scheme(scheme1_code)
        .ok_or_else(|| Error::NotFound(format!("scheme {}", scheme1_code)))?;
    let scheme2 = lookup
        .find_scheme(scheme2_code)
        .ok_or_else(|| Error::NotFound(format!("scheme {}", scheme2_code)))?;

    Ok(scheme_overlap(scheme1, scheme2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::SchemeCatalog;
    use crate::types::SchemeType;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn banking_heavy() -> Allocation {
        Allocation::new()
            .with("Financial Services", 40.0)
            .with("IT", 25.0)
            .with("Energy", 20.0)
            .with("FMCG", 15.0)
    }

    fn tech_heavy() -> Allocation {
        Allocation::new()
            .with("IT", 45.0)
            .with("Financial Services", 30.0)
            .with("Healthcare", 25.0)
    }

    fn scheme(code: &str, sectors: Allocation, caps: MarketCapAllocation) -> SchemeMetadata {
        let mut scheme = SchemeMetadata::new(code, SchemeType::Equity, "Flexi Cap Fund");
        scheme.sector_allocation = sectors;
        scheme.market_cap_allocation = caps;
        scheme
    }

    #[test]
    fn test_sector_overlap() {
        // min(40, 30) + min(25, 45) + 0 + 0 + 0 = 55
        assert_relative_eq!(sector_overlap(&banking_heavy(), &tech_heavy()), 55.0);
        assert_relative_eq!(sector_overlap(&tech_heavy(), &banking_heavy()), 55.0);
    }

    #[test]
    fn test_sector_overlap_disjoint_and_empty() {
        let a = Allocation::new().with("Energy", 100.0);
        let b = Allocation::new().with("IT", 100.0);

        assert_eq!(sector_overlap(&a, &b), 0.0);
        assert_eq!(sector_overlap(&a, &Allocation::new()), 0.0);
    }

    #[test]
    fn test_sector_self_overlap() {
        let a = banking_heavy();
        assert_relative_eq!(sector_overlap(&a, &a), a.total());
    }

    #[test]
    fn test_market_cap_overlap() {
        let a = MarketCapAllocation::new(70.0, 20.0, 10.0);
        let b = MarketCapAllocation::new(50.0, 30.0, 20.0);

        // 50 + 20 + 10
        assert_relative_eq!(market_cap_overlap(&a, &b), 80.0);
    }

    #[test]
    fn test_fund_overlap() {
        let catalog = SchemeCatalog::in_memory(vec![
            scheme("A", banking_heavy(), MarketCapAllocation::new(70.0, 20.0, 10.0)),
            scheme("B", tech_heavy(), MarketCapAllocation::new(50.0, 30.0, 20.0)),
        ]);

        let overlap = fund_overlap(&catalog, "A", "B").unwrap();

        assert_relative_eq!(overlap.sector_overlap, 55.0);
        assert_relative_eq!(overlap.market_cap_overlap, 80.0);
        assert_relative_eq!(overlap.overall_overlap, 67.5);
    }

    #[test]
    fn test_fund_overlap_not_found() {
        let catalog = SchemeCatalog::in_memory(vec![scheme(
            "A",
            banking_heavy(),
            MarketCapAllocation::default(),
        )]);

        assert!(matches!(fund_overlap(&catalog, "A", "Z"), Err(Error::NotFound(_))));
        assert!(matches!(fund_overlap(&catalog, "Z", "A"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_fund_overlap_over_slice() {
        let schemes = vec![
            scheme("A", banking_heavy(), MarketCapAllocation::default()),
            scheme("B", banking_heavy(), MarketCapAllocation::default()),
        ];

        let overlap = fund_overlap(schemes.as_slice(), "a", "b").unwrap();
        assert_relative_eq!(overlap.sector_overlap, 100.0);
        assert_eq!(overlap.market_cap_overlap, 0.0);
    }

    fn weights_summing_to_100(n: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(1.0f64..100.0, n).prop_map(|raw| {
            let total: f64 = raw.iter().sum();
            raw.iter().map(|w| w / total * 100.0).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_sector_overlap_bounded(
            a in weights_summing_to_100(6),
            b in weights_summing_to_100(6)
        ) {
            let sectors = ["IT", "Energy", "FMCG", "Auto", "Pharma", "Metals"];
            let first: Allocation = sectors.iter().copied().zip(a.iter().copied()).collect();
            // Second portfolio skips the first sector and adds one of its own
            let second: Allocation = sectors[1..]
                .iter()
                .copied()
                .chain(std::iter::once("Telecom"))
                .zip(b.iter().copied())
                .collect();

            let overlap = sector_overlap(&first, &second);
            prop_assert!(overlap >= 0.0);
            prop_assert!(overlap <= 100.0 + 1e-9);
            prop_assert!((sector_overlap(&first, &first) - first.total()).abs() < 1e-9);
        }
    }
}
