// stride-core/src/selector.rs
// Risk level and attack-pattern selection per applicable category

use crate::catalog::Catalog;
use crate::features::ComponentFeatures;
use crate::types::{RiskLevel, StrideCategory};
use indexmap::IndexSet;

pub const MAX_CAPECS: usize = 5;

/// Scores one category for a component: its risk level and up to five pattern IDs.
pub fn score(
    catalog: &Catalog,
    category: StrideCategory,
    features: &ComponentFeatures,
) -> (RiskLevel, Vec<String>) {
    (risk_level(category, features), select_capecs(catalog, category, features))
}

/// First matching rule wins; everything else is Medium.
pub fn risk_level(category: StrideCategory, features: &ComponentFeatures) -> RiskLevel {
    let high = match category {
        StrideCategory::InformationDisclosure => features.stores_data,
        StrideCategory::Spoofing => features.has_auth,
        StrideCategory::DenialOfService => features.is_entry_point,
        StrideCategory::ElevationOfPrivilege => features.has_auth,
        // Extension of the four base rules; without it Tampering is always Medium
        StrideCategory::Tampering => features.stores_data,
        StrideCategory::Repudiation => false,
    };

    if high {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

/// Common patterns first, then signal-triggered extras; first occurrence wins.
pub fn select_capecs(
    catalog: &Catalog,
    category: StrideCategory,
    features: &ComponentFeatures,
) -> Vec<String> {
    let merged: IndexSet<&String> = catalog
        .common_capecs(category)
        .iter()
        .chain(catalog.conditional_capecs(category, features))
        .collect();

    merged.into_iter().take(MAX_CAPECS).cloned().collect()
}
