// stride-core/src/analyzer.rs
// Threat analyzer: features → applicability → scoring → records

use crate::applicability::{self, Applicability};
use crate::catalog::Catalog;
use crate::component::Component;
use crate::features::{self, ComponentFeatures};
use crate::generator;
use crate::selector;
use crate::types::{AnalysisMap, RiskLevel, ThreatAnalysis, ThreatRecord};
use tracing::debug;

/// Stateless classifier over a read-only catalog. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ThreatAnalyzer {
    catalog: Catalog,
}

impl ThreatAnalyzer {
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Analyzes a component; only applicable categories are present in the result.
    pub fn analyze_component(&self, component: &Component) -> AnalysisMap {
        let features = self.extract_component_info(component);
        debug!("Component features: {:?}", features);

        let applicable = self.determine_applicable_threats(&features);
        debug!("Applicable categories: {:?}", applicable.as_map());

        let analysis = self.select_relevant_capecs(&applicable, &features);
        debug!("Component analysis: {:?}", analysis);

        analysis
    }

    pub fn extract_component_info(&self, component: &Component) -> ComponentFeatures {
        features::extract(component)
    }

    pub fn determine_applicable_threats(&self, features: &ComponentFeatures) -> Applicability {
        applicability::resolve(features)
    }

    pub fn select_relevant_capecs(
        &self,
        applicable: &Applicability,
        features: &ComponentFeatures,
    ) -> AnalysisMap {
        applicable
            .applicable()
            .map(|category| {
                let (risk, capecs) = selector::score(&self.catalog, category, features);
                let analysis = ThreatAnalysis {
                    applicable: true,
                    risk,
                    capecs,
                    description: self.catalog.description(category).to_string(),
                };
                (category, analysis)
            })
            .collect()
    }

    pub fn generate_threat_descriptions(&self, analysis: &AnalysisMap) -> Vec<ThreatRecord> {
        generator::generate(&self.catalog, analysis)
    }

    /// Full pipeline for one component
    pub fn threats_for(&self, component: &Component) -> Vec<ThreatRecord> {
        let analysis = self.analyze_component(component);
        let records = self.generate_threat_descriptions(&analysis);
        debug!(
            "Generated {} threat records for component {:?}",
            records.len(),
            component.id
        );
        records
    }

    pub fn map_risk_to_severity(&self, risk: &str) -> RiskLevel {
        generator::map_risk_to_severity(risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrideCategory;

    #[test]
    fn test_analyzer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreatAnalyzer>();
    }

    #[test]
    fn test_analysis_carries_catalog_description() {
        let analyzer = ThreatAnalyzer::new();
        let analysis = analyzer.analyze_component(&Component::new("tm.Process", "Login"));

        let spoofing = &analysis[&StrideCategory::Spoofing];
        assert!(spoofing.applicable);
        assert_eq!(spoofing.risk, RiskLevel::High);
        assert_eq!(spoofing.description, "Falsificação de identidade ou origem");
        assert_eq!(spoofing.capecs, vec!["151", "98", "416", "154", "103"]);
    }

    #[test]
    fn test_custom_catalog_is_used() {
        let mut catalog = Catalog::builtin();
        for entry in catalog.entries.iter_mut() {
            entry.description = format!("custom {}", entry.category);
        }
        let analyzer = ThreatAnalyzer::with_catalog(catalog);
        let records = analyzer.threats_for(&Component::new("tm.Process", "Worker"));

        assert!(!records.is_empty());
        for record in &records {
            assert!(record.description.starts_with("custom "));
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let analyzer = std::sync::Arc::new(ThreatAnalyzer::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let analyzer = analyzer.clone();
                std::thread::spawn(move || {
                    let component = Component::new("tm.Process", &format!("Worker {}", i));
                    analyzer.threats_for(&component).len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4);
        }
    }
}
