// stride-core/src/profile.rs
// Coarse type/name driven threat profile

use crate::component::Component;
use crate::types::{RiskLevel, StrideCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub applicable: bool,
    pub risk: RiskLevel,
    pub capecs: Vec<String>,
}

impl Default for CategoryProfile {
    fn default() -> Self {
        Self {
            applicable: false,
            risk: RiskLevel::Low,
            capecs: Vec::new(),
        }
    }
}

/// All six categories, each either untouched (Low, not applicable) or set by a rule.
pub type TypeProfile = BTreeMap<StrideCategory, CategoryProfile>;

struct ProfileRule {
    matches: fn(&ProfileInput) -> bool,
    effects: &'static [(StrideCategory, RiskLevel, &'static [&'static str])],
}

struct ProfileInput {
    component_type: String,
    name: String,
    description: String,
}

// Applied in order; a later rule replaces the whole slot of an earlier one.
const PROFILE_RULES: &[ProfileRule] = &[
    ProfileRule {
        matches: |c| c.component_type.contains("Process"),
        effects: &[
            (StrideCategory::Tampering, RiskLevel::Medium, &["123", "248", "250"]),
            (StrideCategory::DenialOfService, RiskLevel::Medium, &["125", "130"]),
        ],
    },
    ProfileRule {
        matches: |c| c.component_type.contains("Store"),
        effects: &[
            (StrideCategory::InformationDisclosure, RiskLevel::High, &["150", "118", "37"]),
            (StrideCategory::Tampering, RiskLevel::High, &["129", "276"]),
        ],
    },
    ProfileRule {
        matches: |c| c.component_type.contains("Actor") || c.name.contains("user"),
        effects: &[(StrideCategory::Spoofing, RiskLevel::High, &["151", "98", "416"])],
    },
    ProfileRule {
        matches: |c| c.component_type.contains("Flow") || c.name.contains("data"),
        effects: &[
            (StrideCategory::InformationDisclosure, RiskLevel::High, &["94", "167", "116"]),
            (StrideCategory::Tampering, RiskLevel::Medium, &["94", "183"]),
        ],
    },
    ProfileRule {
        matches: |c| {
            c.name.contains("auth") || c.name.contains("login") || c.description.contains("autenticação")
        },
        effects: &[
            (StrideCategory::Spoofing, RiskLevel::High, &["151", "196", "593"]),
            (StrideCategory::ElevationOfPrivilege, RiskLevel::High, &["123", "233", "122"]),
        ],
    },
    ProfileRule {
        matches: |c| c.name.contains("api") || c.name.contains("service") || c.description.contains("serviço"),
        effects: &[
            (StrideCategory::DenialOfService, RiskLevel::High, &["125", "227", "130"]),
            (StrideCategory::InformationDisclosure, RiskLevel::Medium, &["116", "664"]),
        ],
    },
    ProfileRule {
        matches: |c| c.name.contains("db") || c.name.contains("database") || c.description.contains("dados"),
        effects: &[
            (StrideCategory::InformationDisclosure, RiskLevel::High, &["66", "118", "150"]),
            (StrideCategory::Tampering, RiskLevel::High, &["248", "66", "255"]),
        ],
    },
    ProfileRule {
        matches: |c| {
            c.name.contains("alb") || c.name.contains("load balancer") || c.description.contains("balanceador")
        },
        effects: &[
            (StrideCategory::DenialOfService, RiskLevel::High, &["125", "482", "490", "494"]),
            (StrideCategory::Spoofing, RiskLevel::Medium, &["154", "148", "151"]),
        ],
    },
];

/// Quick first-look profile from the component's type tag, label and description.
///
/// Unlike the full analyzer this does not deduplicate or merge: each matching
/// rule overwrites the categories it names.
pub fn quick_profile(component: &Component) -> TypeProfile {
    let input = ProfileInput {
        component_type: component.component_type.clone().unwrap_or_default(),
        name: component.label_text().unwrap_or_default().to_lowercase(),
        description: component.description().unwrap_or_default().to_lowercase(),
    };

    let mut profile: TypeProfile = StrideCategory::ALL
        .iter()
        .map(|&category| (category, CategoryProfile::default()))
        .collect();

    for rule in PROFILE_RULES.iter().filter(|rule| (rule.matches)(&input)) {
        for (category, risk, capecs) in rule.effects {
            profile.insert(
                *category,
                CategoryProfile {
                    applicable: true,
                    risk: *risk,
                    capecs: capecs.iter().map(|id| id.to_string()).collect(),
                },
            );
        }
    }

    profile
}
