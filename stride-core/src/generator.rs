// stride-core/src/generator.rs
// Renders category analyses into display/storage threat records

use crate::catalog::Catalog;
use crate::types::{
    AnalysisMap, RiskLevel, StrideCategory, ThreatAnalysis, ThreatRecord, THREAT_STATUS_OPEN,
    THREAT_TYPE_STRIDE,
};
use std::fmt::Write;

/// One record per applicable category, in canonical category order.
pub fn generate(catalog: &Catalog, analysis: &AnalysisMap) -> Vec<ThreatRecord> {
    analysis
        .iter()
        .filter(|(_, entry)| entry.applicable)
        .map(|(category, entry)| render(catalog, *category, entry))
        .collect()
}

pub fn render(catalog: &Catalog, category: StrideCategory, analysis: &ThreatAnalysis) -> ThreatRecord {
    let mut description = format!("{}\n\n", analysis.description);
    let _ = write!(description, "Nível de risco: {}\n\n", analysis.risk);
    description.push_str("CAPECs associados:\n");

    let mut mitigation = String::from("Mitigações recomendadas:\n");

    for id in &analysis.capecs {
        let detail = catalog.pattern_detail(id);
        let _ = write!(
            description,
            "- CAPEC-{}: {}\n  {}\n",
            id, detail.name, detail.description
        );
        let _ = writeln!(mitigation, "- Para CAPEC-{}: {}", id, detail.mitigation);
    }

    ThreatRecord {
        title: category.name().to_string(),
        threat_type: THREAT_TYPE_STRIDE.to_string(),
        stride_type: category,
        status: THREAT_STATUS_OPEN.to_string(),
        severity: map_risk_to_severity(analysis.risk.as_str()),
        description,
        mitigation,
        capecs: join_capecs(&analysis.capecs),
    }
}

/// Severity from a risk label; unknown labels are Medium.
pub fn map_risk_to_severity(risk: &str) -> RiskLevel {
    RiskLevel::from_label(risk)
}

pub fn join_capecs(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("CAPEC-{}", id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(risk: RiskLevel, capecs: &[&str]) -> ThreatAnalysis {
        ThreatAnalysis {
            applicable: true,
            risk,
            capecs: capecs.iter().map(|s| s.to_string()).collect(),
            description: "Negação de ações realizadas por uma entidade".to_string(),
        }
    }

    #[test]
    fn test_render_text_layout() {
        let catalog = Catalog::builtin();
        let record = render(
            &catalog,
            StrideCategory::Repudiation,
            &analysis(RiskLevel::Medium, &["268", "571"]),
        );

        assert_eq!(
            record.description,
            "Negação de ações realizadas por uma entidade\n\n\
             Nível de risco: Medium\n\n\
             CAPECs associados:\n\
             - CAPEC-268: Audit Log Manipulation\n  Alteração ou exclusão de logs para ocultar atividades\n\
             - CAPEC-571: CAPEC-571\n  Padrão de ataque comum\n"
        );
        assert_eq!(
            record.mitigation,
            "Mitigações recomendadas:\n\
             - Para CAPEC-268: Implementar logs seguros, assinados e distribuídos, com backup imediato\n\
             - Para CAPEC-571: Implementar medidas de segurança apropriadas\n"
        );
        assert_eq!(record.capecs, "CAPEC-268, CAPEC-571");
        assert_eq!(record.title, "Repudiation");
        assert_eq!(record.stride_type, StrideCategory::Repudiation);
        assert_eq!(record.threat_type, "STRIDE");
        assert_eq!(record.status, "Open");
        assert_eq!(record.severity, RiskLevel::Medium);
    }

    #[test]
    fn test_generate_skips_non_applicable() {
        let catalog = Catalog::builtin();
        let mut map = AnalysisMap::new();
        map.insert(StrideCategory::Tampering, analysis(RiskLevel::High, &["94"]));
        let mut skipped = analysis(RiskLevel::Low, &[]);
        skipped.applicable = false;
        map.insert(StrideCategory::Spoofing, skipped);

        let records = generate(&catalog, &map);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stride_type, StrideCategory::Tampering);
        assert_eq!(records[0].severity, RiskLevel::High);
    }

    #[test]
    fn test_empty_pattern_list() {
        let catalog = Catalog::builtin();
        let record = render(&catalog, StrideCategory::Spoofing, &analysis(RiskLevel::Low, &[]));
        assert_eq!(record.capecs, "");
        assert!(record.description.ends_with("CAPECs associados:\n"));
        assert_eq!(record.mitigation, "Mitigações recomendadas:\n");
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(map_risk_to_severity("HIGH"), RiskLevel::High);
        assert_eq!(map_risk_to_severity("low"), RiskLevel::Low);
        assert_eq!(map_risk_to_severity("severe"), RiskLevel::Medium);
    }
}
