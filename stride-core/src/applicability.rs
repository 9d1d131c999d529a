// stride-core/src/applicability.rs
// Decides which STRIDE categories apply to a component

use crate::features::ComponentFeatures;
use crate::types::StrideCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Applicability flag per category; all six categories are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability(BTreeMap<StrideCategory, bool>);

impl Applicability {
    pub fn is_applicable(&self, category: StrideCategory) -> bool {
        self.0.get(&category).copied().unwrap_or(false)
    }

    /// Applicable categories in canonical order
    pub fn applicable(&self) -> impl Iterator<Item = StrideCategory> + '_ {
        self.0
            .iter()
            .filter(|(_, applies)| **applies)
            .map(|(category, _)| *category)
    }

    pub fn count(&self) -> usize {
        self.applicable().count()
    }

    pub fn as_map(&self) -> &BTreeMap<StrideCategory, bool> {
        &self.0
    }
}

/// Applies one independent boolean rule per category.
///
/// Tampering, Information Disclosure and Elevation of Privilege hold for every
/// in-scope component; for those three the out-of-scope flag is the gate that
/// matters. This broad default is intentional.
pub fn resolve(features: &ComponentFeatures) -> Applicability {
    let in_scope = !features.out_of_scope;

    let map = StrideCategory::ALL
        .iter()
        .map(|&category| {
            let applies = match category {
                StrideCategory::Spoofing => features.has_auth || features.is_external_entity,
                StrideCategory::Tampering => in_scope,
                StrideCategory::Repudiation => features.has_auth,
                StrideCategory::InformationDisclosure => features.stores_data || in_scope,
                StrideCategory::DenialOfService => features.is_entry_point || features.is_process(),
                StrideCategory::ElevationOfPrivilege => features.has_auth || in_scope,
            };
            (category, applies)
        })
        .collect();

    Applicability(map)
}
