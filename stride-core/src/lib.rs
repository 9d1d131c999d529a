// stride-core/src/lib.rs
// Rule-based STRIDE/CAPEC threat classification for threat-model components

pub mod analyzer;
pub mod applicability;
pub mod catalog;
pub mod component;
pub mod error;
pub mod features;
pub mod generator;
pub mod profile;
pub mod reference;
pub mod selector;
pub mod types;


pub use analyzer::ThreatAnalyzer;
pub use catalog::{AttackPatternDetail, Catalog};
pub use component::Component;
pub use error::{Result, StrideError};
pub use features::ComponentFeatures;
pub use types::*;

/// Classifies one component with the built-in catalog and renders its threat records.
pub fn analyze_component(component: &Component) -> Vec<ThreatRecord> {
    ThreatAnalyzer::new().threats_for(component)
}
