// stride-core/src/component.rs
// Diagram component records as supplied by the threat-model editor

use crate::error::{Result, StrideError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A node of a threat-model diagram.
///
/// Every field is optional; the editor produces loosely-shaped records and
/// defaults are resolved once, in feature extraction. A field holding a value
/// of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub component_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub attributes: Option<ComponentAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAttributes {
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<Label>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub attrs: Option<NestedAttrs>,
    #[serde(default, deserialize_with = "lenient")]
    pub out_of_scope: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedAttrs {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

impl Component {
    pub fn new(component_type: &str, label: &str) -> Self {
        Self {
            id: None,
            component_type: Some(component_type.to_string()),
            attributes: Some(ComponentAttributes {
                label: Some(Label {
                    text: Some(label.to_string()),
                }),
                ..Default::default()
            }),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.attributes
            .get_or_insert_with(Default::default)
            .description = Some(description.to_string());
        self
    }

    pub fn with_out_of_scope(mut self, out_of_scope: bool) -> Self {
        self.attributes
            .get_or_insert_with(Default::default)
            .out_of_scope = Some(out_of_scope);
        self
    }

    /// Parses a single component from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Converts a JSON value into a component; only objects are records
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(StrideError::InvalidComponent(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| StrideError::InvalidComponent(e.to_string()))
    }

    /// Parses either one component object or an array of them
    pub fn list_from_json(text: &str) -> Result<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match value {
            serde_json::Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            other => Ok(vec![Self::from_value(other)?]),
        }
    }

    pub fn label_text(&self) -> Option<&str> {
        self.attributes
            .as_ref()?
            .label
            .as_ref()?
            .text
            .as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes.as_ref()?.description.as_deref()
    }
}

/// Decodes an optional field, mapping a mistyped value to `None`
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
