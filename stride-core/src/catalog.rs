// stride-core/src/catalog.rs
// STRIDE → CAPEC knowledge base

use crate::error::{Result, StrideError};
use crate::features::ComponentFeatures;
use crate::types::StrideCategory;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

pub const PLACEHOLDER_DESCRIPTION: &str = "Padrão de ataque comum";
pub const PLACEHOLDER_MITIGATION: &str = "Implementar medidas de segurança apropriadas";

/// Named group of attack patterns within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub name: String,
    pub capecs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: StrideCategory,
    pub description: String,
    pub categories: Vec<SubCategory>,
    pub common_capecs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPatternDetail {
    pub name: String,
    pub description: String,
    pub mitigation: String,
}

/// Component signal that can pull extra patterns into a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    HasAuth,
    StoresData,
    EntryPoint,
    ExternalEntity,
    ProcessType,
}

impl Signal {
    pub fn holds(&self, features: &ComponentFeatures) -> bool {
        match self {
            Signal::HasAuth => features.has_auth,
            Signal::StoresData => features.stores_data,
            Signal::EntryPoint => features.is_entry_point,
            Signal::ExternalEntity => features.is_external_entity,
            Signal::ProcessType => features.is_process(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalPatterns {
    pub category: StrideCategory,
    pub signal: Signal,
    pub capecs: Vec<String>,
}

/// Read-only lookup tables consulted by the resolver, selector and generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<CategoryEntry>,
    pub details: HashMap<String, AttackPatternDetail>,
    pub conditional: Vec<ConditionalPatterns>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in knowledge base.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(category, description, groups, common)| CategoryEntry {
                category: *category,
                description: description.to_string(),
                categories: groups
                    .iter()
                    .map(|(name, ids)| SubCategory {
                        name: name.to_string(),
                        capecs: to_owned_ids(ids),
                    })
                    .collect(),
                common_capecs: to_owned_ids(common),
            })
            .collect();

        let details = BUILTIN_DETAILS
            .iter()
            .map(|(id, name, description, mitigation)| {
                (
                    id.to_string(),
                    AttackPatternDetail {
                        name: name.to_string(),
                        description: description.to_string(),
                        mitigation: mitigation.to_string(),
                    },
                )
            })
            .collect();

        let conditional = BUILTIN_CONDITIONAL
            .iter()
            .map(|(category, signal, ids)| ConditionalPatterns {
                category: *category,
                signal: *signal,
                capecs: to_owned_ids(ids),
            })
            .collect();

        Self {
            entries,
            details,
            conditional,
        }
    }

    /// Loads a catalog from JSON and checks that all six categories are present.
    pub fn from_json(text: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(text)
            .map_err(|e| StrideError::Catalog(format!("invalid catalog JSON: {}", e)))?;
        catalog.validate()?;
        debug!(
            "Loaded catalog with {} categories and {} pattern details",
            catalog.entries.len(),
            catalog.details.len()
        );
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        for category in StrideCategory::ALL {
            let count = self
                .entries
                .iter()
                .filter(|e| e.category == category)
                .count();
            if count != 1 {
                return Err(StrideError::Catalog(format!(
                    "expected exactly one entry for {}, found {}",
                    category, count
                )));
            }
        }
        Ok(())
    }

    pub fn entry(&self, category: StrideCategory) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    pub fn description(&self, category: StrideCategory) -> &str {
        self.entry(category)
            .map(|e| e.description.as_str())
            .unwrap_or_default()
    }

    pub fn common_capecs(&self, category: StrideCategory) -> &[String] {
        self.entry(category)
            .map(|e| e.common_capecs.as_slice())
            .unwrap_or_default()
    }

    /// Extra pattern IDs for `category` whose triggering signal holds, in table order
    pub fn conditional_capecs<'a>(
        &'a self,
        category: StrideCategory,
        features: &'a ComponentFeatures,
    ) -> impl Iterator<Item = &'a String> + 'a {
        self.conditional
            .iter()
            .filter(move |c| c.category == category && c.signal.holds(features))
            .flat_map(|c| c.capecs.iter())
    }

    /// Detail lookup with the generic placeholder for uncatalogued IDs.
    pub fn pattern_detail(&self, id: &str) -> Cow<'_, AttackPatternDetail> {
        match self.details.get(id) {
            Some(detail) => Cow::Borrowed(detail),
            None => Cow::Owned(AttackPatternDetail {
                name: format!("CAPEC-{}", id),
                description: PLACEHOLDER_DESCRIPTION.to_string(),
                mitigation: PLACEHOLDER_MITIGATION.to_string(),
            }),
        }
    }
}

fn to_owned_ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

type EntryRow = (
    StrideCategory,
    &'static str,
    &'static [(&'static str, &'static [&'static str])],
    &'static [&'static str],
);

const BUILTIN_ENTRIES: &[EntryRow] = &[
    (
        StrideCategory::Spoofing,
        "Falsificação de identidade ou origem",
        &[
            ("Identity Spoofing", &["151", "89", "98", "165", "164", "656", "473", "479"]),
            (
                "Content Spoofing",
                &["148", "216", "600", "627", "628", "275", "583", "545", "544", "433", "587", "196"],
            ),
            ("Action Spoofing", &["175", "181", "222", "103", "201", "654", "506", "504"]),
            (
                "Resource Location Spoofing",
                &["154", "141", "142", "505", "616", "611", "615", "617", "630", "631", "632", "667"],
            ),
            (
                "Social Engineering",
                &["416", "417", "407", "426", "425", "429", "414", "415", "413", "412"],
            ),
        ],
        &["151", "98", "416", "154", "103", "196"],
    ),
    (
        StrideCategory::Tampering,
        "Modificação não autorizada de dados ou código",
        &[
            ("Hardware Tampering", &["276", "438", "624"]),
            ("Data Structure Manipulation", &["255", "129", "133", "149", "252", "253"]),
            ("Command Injection", &["183", "248", "77", "78", "79"]),
            ("Man in the Middle", &["94"]),
            ("Buffer Manipulation", &["122", "123", "135", "130", "463"]),
        ],
        &["94", "248", "255", "183", "129"],
    ),
    (
        StrideCategory::Repudiation,
        "Negação de ações realizadas por uma entidade",
        &[
            ("Audit Log Manipulation", &["268", "81", "93"]),
            ("Identity Spoofing", &["195", "597", "599"]),
            ("Log Tampering", &["197", "93", "268"]),
            ("Blocking Audit", &["571"]),
        ],
        &["268", "93", "81", "571"],
    ),
    (
        StrideCategory::InformationDisclosure,
        "Exposição de informações a entidades não autorizadas",
        &[
            ("Data Gathering", &["116", "169", "224", "309", "651"]),
            ("Information Leakage", &["150", "118", "12", "13", "144", "16", "165", "166"]),
            ("Session Hijacking", &["167", "31", "37", "39", "65"]),
            ("Reverse Engineering", &["188", "187", "190", "191"]),
            ("Code Analysis", &["192", "107", "108", "157"]),
        ],
        &["118", "31", "150", "116", "65", "37"],
    ),
    (
        StrideCategory::DenialOfService,
        "Negação ou degradação de serviço para usuários legítimos",
        &[
            (
                "Flooding",
                &[
                    "125", "482", "488", "489", "490", "491", "492", "493", "494", "495", "496",
                    "497", "498", "499", "500", "501", "502", "546", "601", "841",
                ],
            ),
            ("Resource Exhaustion", &["130", "131", "197", "601"]),
            ("Protocol Exploitation", &["192", "227"]),
            ("Service Lockout", &["2"]),
        ],
        &["125", "130", "131", "2", "227", "490", "494"],
    ),
    (
        StrideCategory::ElevationOfPrivilege,
        "Obtenção de acesso ou privilégios não autorizados",
        &[
            ("Privilege Abuse", &["122", "233"]),
            ("Buffer Exploitation", &["123", "100", "14", "24", "35", "44", "45", "46", "47"]),
            ("Injection Attacks", &["248", "250", "251", "252", "253", "76", "242"]),
            ("Process Hijacking", &["234"]),
            ("Execution Attacks", &["17", "159", "43", "69"]),
        ],
        &["233", "123", "248", "76", "17", "234"],
    ),
];

const BUILTIN_DETAILS: &[(&str, &str, &str, &str)] = &[
    // Spoofing
    (
        "151",
        "Identity Spoofing",
        "Falsificação de identidade para ganhar acesso não autorizado",
        "Implementar autenticação forte, multifator e verificação contínua de identidade",
    ),
    (
        "98",
        "Phishing",
        "Enganar usuários para revelar informações sensíveis",
        "Treinamento de usuários, filtros anti-phishing e autenticação multifator",
    ),
    (
        "103",
        "Clickjacking",
        "Enganar usuários a clicar em algo diferente do que percebem",
        "Implementar cabeçalhos X-Frame-Options e Content-Security-Policy",
    ),
    // Tampering
    (
        "94",
        "Man in the Middle Attack",
        "Interceptação de comunicação entre duas partes",
        "Usar HTTPS, pinning de certificados e HSTS",
    ),
    (
        "248",
        "Command Injection",
        "Injeção de comandos do sistema através de entradas não sanitizadas",
        "Validar e sanitizar entradas, usar APIs seguras ao invés de chamadas de sistema",
    ),
    (
        "255",
        "Manipulate Data Structures",
        "Manipulação de estruturas de dados internas para alterar o comportamento do programa",
        "Validar estruturas de dados, implementar verificações de integridade",
    ),
    // Repudiation
    (
        "268",
        "Audit Log Manipulation",
        "Alteração ou exclusão de logs para ocultar atividades",
        "Implementar logs seguros, assinados e distribuídos, com backup imediato",
    ),
    (
        "93",
        "Log Injection/Tampering/Forging",
        "Manipulação de logs para inserir, modificar ou remover entradas",
        "Sanitizar entradas de log, usar formatos à prova de injeção",
    ),
    // Information Disclosure
    (
        "118",
        "Data Leakage",
        "Exposição não intencional de dados confidenciais",
        "Classificar dados, implementar controles de acesso e criptografia adequada",
    ),
    (
        "31",
        "Accessing/Intercepting/Modifying HTTP Cookies",
        "Manipulação de cookies para roubar informações ou sessões",
        "Usar cookies HttpOnly, Secure e SameSite; implementar validação de sessão",
    ),
    (
        "150",
        "Information Disclosure",
        "Exposição não autorizada de informações sensíveis",
        "Implementar controle de acesso rigoroso, criptografia e princípio do menor privilégio",
    ),
    // Denial of Service
    (
        "125",
        "Flooding",
        "Sobrecarregar recursos com volume excessivo de solicitações",
        "Implementar rate limiting, escalabilidade automática e proteção contra DDoS",
    ),
    (
        "130",
        "Excessive Allocation",
        "Alocar recursos excessivos para esgotar a disponibilidade do sistema",
        "Implementar limites de alocação, monitoramento e timeout de solicitações",
    ),
    (
        "494",
        "TCP SYN Flood",
        "Inundar o sistema com pacotes SYN incompletos",
        "Implementar SYN cookies, firewall e proteção contra DDoS",
    ),
    // Elevation of Privilege
    (
        "233",
        "Privilege Escalation",
        "Explorar falhas para ganhar privilégios adicionais",
        "Aplicar princípio do menor privilégio, atualizações de segurança regulares",
    ),
    (
        "123",
        "Buffer Overflow",
        "Explorar gerenciamento inadequado de memória para executar código",
        "Usar linguagens seguras, sanitização de entrada e validação de limites",
    ),
    (
        "76",
        "Manipulating Input to File System Calls",
        "Manipular entradas para acessar ou modificar arquivos não autorizados",
        "Validar caminhos, usar listas de permissão e controles de acesso",
    ),
];

const BUILTIN_CONDITIONAL: &[(StrideCategory, Signal, &[&str])] = &[
    (StrideCategory::Spoofing, Signal::HasAuth, &["151", "98"]),
    (StrideCategory::Spoofing, Signal::ExternalEntity, &["196", "416"]),
    (StrideCategory::Tampering, Signal::StoresData, &["248", "76"]),
    (StrideCategory::Tampering, Signal::EntryPoint, &["94", "183"]),
    (StrideCategory::InformationDisclosure, Signal::StoresData, &["118", "150"]),
    (StrideCategory::InformationDisclosure, Signal::EntryPoint, &["31", "94"]),
    (StrideCategory::DenialOfService, Signal::EntryPoint, &["125", "494"]),
    (StrideCategory::DenialOfService, Signal::ProcessType, &["130", "131"]),
    (StrideCategory::ElevationOfPrivilege, Signal::HasAuth, &["233", "122"]),
    (StrideCategory::ElevationOfPrivilege, Signal::EntryPoint, &["248", "76"]),
];
