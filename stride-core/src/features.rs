// stride-core/src/features.rs
// Component feature extraction

use crate::component::Component;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Componente sem nome";
pub const DEFAULT_TYPE: &str = "tm.Process";

pub const AUTH_KEYWORDS: &[&str] = &["auth", "login", "senha", "password", "credential", "token"];
pub const DATA_KEYWORDS: &[&str] = &["database", "db", "store", "dados", "data", "storage"];
pub const ENTRY_POINT_KEYWORDS: &[&str] =
    &["api", "endpoint", "interface", "gateway", "entrada", "entry"];
pub const EXTERNAL_KEYWORDS: &[&str] =
    &["external", "third party", "user", "cliente", "client", "externo"];

/// Signals derived from a component, resolved once per analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFeatures {
    pub id: Option<String>,
    pub name: String,
    /// Declared type, or the generic process tag when none was declared
    pub component_type: String,
    pub declared_type: Option<String>,
    pub description: String,
    pub out_of_scope: bool,
    pub has_auth: bool,
    pub stores_data: bool,
    pub is_entry_point: bool,
    pub is_external_entity: bool,
}

impl ComponentFeatures {
    /// True only when the component explicitly declares a type containing `marker`.
    pub fn declares_type(&self, marker: &str) -> bool {
        self.declared_type
            .as_deref()
            .map_or(false, |t| t.contains(marker))
    }

    pub fn is_process(&self) -> bool {
        self.declares_type("Process")
    }
}

/// Extracts the feature set of a component. Never fails.
///
/// Keyword checks are plain case-insensitive substring searches over the raw
/// label text and description, so "db" also fires inside longer words.
pub fn extract(component: &Component) -> ComponentFeatures {
    let attributes = component.attributes.as_ref();

    let name = component
        .label_text()
        .filter(|s| !s.is_empty())
        .or_else(|| attributes.and_then(|a| a.name.as_deref()))
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string();

    let declared_type = component
        .component_type
        .clone()
        .filter(|t| !t.is_empty());

    let description = component
        .description()
        .filter(|s| !s.is_empty())
        .or_else(|| {
            attributes
                .and_then(|a| a.attrs.as_ref())
                .and_then(|nested| nested.description.as_deref())
        })
        .unwrap_or_default()
        .to_string();

    let out_of_scope = attributes.and_then(|a| a.out_of_scope).unwrap_or(false);

    let text = format!(
        "{} {}",
        component.label_text().unwrap_or_default(),
        component.description().unwrap_or_default()
    )
    .to_lowercase();

    let declares = |marker: &str| declared_type.as_deref().map_or(false, |t| t.contains(marker));

    ComponentFeatures {
        id: component.id.clone(),
        name,
        component_type: declared_type.clone().unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        description,
        out_of_scope,
        has_auth: contains_any(&text, AUTH_KEYWORDS),
        stores_data: contains_any(&text, DATA_KEYWORDS) || declares("Store"),
        is_entry_point: contains_any(&text, ENTRY_POINT_KEYWORDS),
        is_external_entity: contains_any(&text, EXTERNAL_KEYWORDS) || declares("Actor"),
        declared_type,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
