// stride-agent/src/report.rs
// Per-component reports written to stdout

use crate::narrative::Narrative;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use stride_core::profile::{quick_profile, TypeProfile};
use stride_core::reference::{relevant_patterns, ReferencePattern};
use stride_core::{Component, ThreatAnalyzer, ThreatRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub component_id: Option<String>,
    pub threats: Vec<ThreatRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<TypeProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<&'static ReferencePattern>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub include_profile: bool,
    pub include_references: bool,
}

/// Runs the classifier; the narrative, if any, is attached by the caller.
pub fn build_report(
    analyzer: &ThreatAnalyzer,
    component: &Component,
    options: ReportOptions,
) -> ComponentReport {
    let threats = analyzer.threats_for(component);
    let references = options
        .include_references
        .then(|| relevant_patterns(&threats));

    ComponentReport {
        component_id: component.id.clone(),
        profile: options.include_profile.then(|| quick_profile(component)),
        references,
        threats,
        narrative: None,
    }
}

pub fn write_reports<W: Write>(writer: &mut W, reports: &[ComponentReport], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, reports)?;
    } else {
        serde_json::to_writer(&mut *writer, reports)?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_extras() {
        let analyzer = ThreatAnalyzer::new();
        let component = Component::new("tm.Actor", "Customer").with_id("actor-1");
        let report = build_report(&analyzer, &component, ReportOptions::default());

        assert_eq!(report.component_id.as_deref(), Some("actor-1"));
        assert_eq!(report.threats.len(), 4);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["componentId"], "actor-1");
        assert!(value.get("profile").is_none());
        assert!(value.get("references").is_none());
        assert!(value.get("narrative").is_none());
    }

    #[test]
    fn test_report_with_profile_and_references() {
        let analyzer = ThreatAnalyzer::new();
        let component = Component::new("tm.Store", "Orders DB");
        let options = ReportOptions {
            include_profile: true,
            include_references: true,
        };
        let report = build_report(&analyzer, &component, options);

        assert_eq!(report.profile.as_ref().map(|p| p.len()), Some(6));
        let ids: Vec<&str> = report
            .references
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        // Tampering, Information Disclosure, Elevation of Privilege
        assert_eq!(ids, vec!["66", "137", "116", "118", "122", "233"]);
    }

    #[test]
    fn test_write_reports_emits_one_json_document() {
        let analyzer = ThreatAnalyzer::new();
        let reports = vec![build_report(
            &analyzer,
            &Component::default().with_out_of_scope(true),
            ReportOptions::default(),
        )];

        let mut buffer = Vec::new();
        write_reports(&mut buffer, &reports, false).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "[{\"componentId\":null,\"threats\":[]}]\n");
    }
}
