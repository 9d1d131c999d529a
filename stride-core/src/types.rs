// stride-core/src/types.rs
// Shared value types: STRIDE categories, risk levels, analysis results and threat records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The six STRIDE threat categories, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrideCategory {
    Spoofing,
    Tampering,
    Repudiation,
    #[serde(rename = "Information Disclosure")]
    InformationDisclosure,
    #[serde(rename = "Denial of Service")]
    DenialOfService,
    #[serde(rename = "Elevation of Privilege")]
    ElevationOfPrivilege,
}

impl StrideCategory {
    pub const ALL: [StrideCategory; 6] = [
        StrideCategory::Spoofing,
        StrideCategory::Tampering,
        StrideCategory::Repudiation,
        StrideCategory::InformationDisclosure,
        StrideCategory::DenialOfService,
        StrideCategory::ElevationOfPrivilege,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            StrideCategory::Spoofing => "Spoofing",
            StrideCategory::Tampering => "Tampering",
            StrideCategory::Repudiation => "Repudiation",
            StrideCategory::InformationDisclosure => "Information Disclosure",
            StrideCategory::DenialOfService => "Denial of Service",
            StrideCategory::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }

    /// Maps a threat type label onto a category.
    ///
    /// Accepts the canonical names and the sentence-case spellings used by
    /// older threat models ("Denial of service"). Anything else is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Spoofing" => Some(StrideCategory::Spoofing),
            "Tampering" => Some(StrideCategory::Tampering),
            "Repudiation" => Some(StrideCategory::Repudiation),
            "Information Disclosure" | "Information disclosure" => {
                Some(StrideCategory::InformationDisclosure)
            }
            "Denial of Service" | "Denial of service" => Some(StrideCategory::DenialOfService),
            "Elevation of Privilege" | "Elevation of privilege" => {
                Some(StrideCategory::ElevationOfPrivilege)
            }
            _ => None,
        }
    }
}

impl fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse risk bucket assigned per applicable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Total mapping from a free-text risk label. Unrecognized labels are Medium.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one applicable category for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatAnalysis {
    pub applicable: bool,
    pub risk: RiskLevel,
    /// At most five pattern IDs, unique, in selection order
    pub capecs: Vec<String>,
    pub description: String,
}

/// Per-component analysis, keyed (and therefore ordered) by category
pub type AnalysisMap = BTreeMap<StrideCategory, ThreatAnalysis>;

pub const THREAT_TYPE_STRIDE: &str = "STRIDE";
pub const THREAT_STATUS_OPEN: &str = "Open";

/// Display/storage record for one applicable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub threat_type: String,
    pub stride_type: StrideCategory,
    pub status: String,
    pub severity: RiskLevel,
    pub description: String,
    pub mitigation: String,
    pub capecs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_label_mapping_is_total() {
        assert_eq!(RiskLevel::from_label("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("medium"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label("Low"), RiskLevel::Low);
        assert_eq!(RiskLevel::from_label("critical"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label(""), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label("Alto"), RiskLevel::Medium);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in StrideCategory::ALL {
            assert_eq!(StrideCategory::from_name(category.name()), Some(category));
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }

    #[test]
    fn test_sentence_case_aliases() {
        assert_eq!(
            StrideCategory::from_name("Denial of service"),
            Some(StrideCategory::DenialOfService)
        );
        assert_eq!(
            StrideCategory::from_name("Information disclosure"),
            Some(StrideCategory::InformationDisclosure)
        );
        assert_eq!(StrideCategory::from_name("spoofing"), None);
        assert_eq!(StrideCategory::from_name("LINDDUN"), None);
    }

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![
            StrideCategory::ElevationOfPrivilege,
            StrideCategory::Spoofing,
            StrideCategory::DenialOfService,
            StrideCategory::Repudiation,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                StrideCategory::Spoofing,
                StrideCategory::Repudiation,
                StrideCategory::DenialOfService,
                StrideCategory::ElevationOfPrivilege,
            ]
        );
    }

    #[test]
    fn test_record_field_names() {
        let record = ThreatRecord {
            title: "Tampering".to_string(),
            threat_type: THREAT_TYPE_STRIDE.to_string(),
            stride_type: StrideCategory::Tampering,
            status: THREAT_STATUS_OPEN.to_string(),
            severity: RiskLevel::Medium,
            description: String::new(),
            mitigation: String::new(),
            capecs: "CAPEC-94".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "STRIDE");
        assert_eq!(value["strideType"], "Tampering");
        assert_eq!(value["severity"], "Medium");
        assert_eq!(value["status"], "Open");
    }
}
