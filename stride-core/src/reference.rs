// stride-core/src/reference.rs
// Offline attack-pattern reference grouped by STRIDE category

use crate::types::{RiskLevel, StrideCategory, ThreatRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Number of reference patterns taken per threat record
pub const PATTERNS_PER_THREAT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencePattern {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub risk: RiskLevel,
}

const fn pattern(
    id: &'static str,
    name: &'static str,
    summary: &'static str,
    risk: RiskLevel,
) -> ReferencePattern {
    ReferencePattern {
        id,
        name,
        summary,
        risk,
    }
}

const SPOOFING: &[ReferencePattern] = &[
    pattern("151", "Identity Spoofing", "Um atacante usa informações de identificação de outra entidade para se passar por ela.", RiskLevel::High),
    pattern("196", "Session Credential Falsification through Forging", "Um atacante falsifica as credenciais da sessão para se autenticar como outro usuário.", RiskLevel::High),
    pattern("593", "Session Hijacking", "Um atacante rouba uma sessão ativa de outro usuário após a autenticação.", RiskLevel::High),
];

const TAMPERING: &[ReferencePattern] = &[
    pattern("66", "SQL Injection", "Um atacante modifica consultas SQL enviadas de um aplicativo para o banco de dados.", RiskLevel::High),
    pattern("137", "Parameter Injection", "Um atacante manipula os parâmetros trocados entre o cliente e o servidor.", RiskLevel::Medium),
    pattern("268", "Audit Log Manipulation", "Um atacante manipula os registros de auditoria para ocultar atividades maliciosas.", RiskLevel::Medium),
];

const REPUDIATION: &[ReferencePattern] = &[
    pattern("93", "Log Injection-Tampering-Forging", "Um atacante falsifica ou manipula informações em registros de log.", RiskLevel::Medium),
    pattern("638", "Altered Audit Trail", "Um atacante altera os registros de auditoria para remover evidências.", RiskLevel::Medium),
    pattern("305", "Reflection Attack in Authentication Protocol", "Um atacante reflete dados de autenticação para enganar um sistema.", RiskLevel::High),
];

const INFORMATION_DISCLOSURE: &[ReferencePattern] = &[
    pattern("116", "Excavation", "Um atacante extrai sistematicamente informações protegidas de fontes públicas.", RiskLevel::Medium),
    pattern("118", "Cache Poisoning", "Um atacante corrompe o cache de DNS para redirecionar tráfego.", RiskLevel::High),
    pattern("545", "Pull Data from System Resources", "Um atacante extrai dados de recursos do sistema.", RiskLevel::Medium),
];

const DENIAL_OF_SERVICE: &[ReferencePattern] = &[
    pattern("125", "Flooding", "Um atacante consome recursos enviando um volume excessivo de requisições.", RiskLevel::High),
    pattern("130", "Excessive Allocation", "Um atacante aloca recursos excessivamente para causar escassez.", RiskLevel::Medium),
    pattern("146", "Resource Exhaustion through Allocation", "Um atacante esgota os recursos do sistema através de múltiplas alocações.", RiskLevel::High),
];

const ELEVATION_OF_PRIVILEGE: &[ReferencePattern] = &[
    pattern("122", "Privilege Escalation", "Um atacante ganha acesso privilegiado a recursos protegidos.", RiskLevel::High),
    pattern("233", "Privilege Escalation", "Um atacante explora vulnerabilidades para elevar seus privilégios no sistema.", RiskLevel::High),
    pattern("17", "Using Malicious Files", "Um atacante usa arquivos maliciosos para executar código privilegiado.", RiskLevel::High),
];

pub fn patterns_for(category: StrideCategory) -> &'static [ReferencePattern] {
    match category {
        StrideCategory::Spoofing => SPOOFING,
        StrideCategory::Tampering => TAMPERING,
        StrideCategory::Repudiation => REPUDIATION,
        StrideCategory::InformationDisclosure => INFORMATION_DISCLOSURE,
        StrideCategory::DenialOfService => DENIAL_OF_SERVICE,
        StrideCategory::ElevationOfPrivilege => ELEVATION_OF_PRIVILEGE,
    }
}

/// First pattern with this id, searching S, T, R, I, D, E in order
pub fn find_pattern(id: &str) -> Option<&'static ReferencePattern> {
    StrideCategory::ALL
        .iter()
        .flat_map(|category| patterns_for(*category).iter())
        .find(|p| p.id == id)
}

/// Reference patterns for a set of threat records.
///
/// Takes the first two patterns of each record's category and drops repeats,
/// keeping the first occurrence. Records of an unknown type are skipped.
pub fn relevant_patterns(threats: &[ThreatRecord]) -> Vec<&'static ReferencePattern> {
    let mut seen = HashSet::new();

    threats
        .iter()
        .filter_map(|threat| StrideCategory::from_name(&threat.title))
        .flat_map(|category| patterns_for(category).iter().take(PATTERNS_PER_THREAT))
        .filter(|p| seen.insert(p.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{THREAT_STATUS_OPEN, THREAT_TYPE_STRIDE};

    fn record(title: &str, category: StrideCategory) -> ThreatRecord {
        ThreatRecord {
            title: title.to_string(),
            threat_type: THREAT_TYPE_STRIDE.to_string(),
            stride_type: category,
            status: THREAT_STATUS_OPEN.to_string(),
            severity: RiskLevel::Medium,
            description: String::new(),
            mitigation: String::new(),
            capecs: String::new(),
        }
    }

    #[test]
    fn test_every_category_has_references() {
        for category in StrideCategory::ALL {
            assert_eq!(patterns_for(category).len(), 3);
        }
    }

    #[test]
    fn test_find_pattern() {
        assert_eq!(find_pattern("638").map(|p| p.name), Some("Altered Audit Trail"));
        assert_eq!(find_pattern("233").map(|p| p.risk), Some(RiskLevel::High));
        assert!(find_pattern("0").is_none());
    }

    #[test]
    fn test_relevant_patterns_take_two_per_threat() {
        let threats = vec![
            record("Spoofing", StrideCategory::Spoofing),
            record("Denial of Service", StrideCategory::DenialOfService),
        ];
        let ids: Vec<&str> = relevant_patterns(&threats).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["151", "196", "125", "130"]);
    }

    #[test]
    fn test_relevant_patterns_deduplicate_and_skip_unknown() {
        let threats = vec![
            record("Tampering", StrideCategory::Tampering),
            record("Custom threat", StrideCategory::Tampering),
            record("Tampering", StrideCategory::Tampering),
        ];
        let ids: Vec<&str> = relevant_patterns(&threats).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["66", "137"]);
    }
}
