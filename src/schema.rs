use crate::graph::{FormNode, GraphModel};
use serde::{Deserialize, Serialize};

/// Semantic type assumed when a property declares none.
pub const DEFAULT_FIELD_TYPE: &str = "text";

/// A projection of one schema property onto a fillable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub required: bool,
}

/// Projects the fields of a form. Implemented by `GraphModel`.
pub trait FieldLookup {
    fn fields_of(&self, form: &FormNode) -> Vec<Field>;
}

impl FieldLookup for GraphModel {
    fn fields_of(&self, form: &FormNode) -> Vec<Field> {
        let Some(schema) = form
            .component_id
            .as_deref()
            .and_then(|component_id| self.schema(component_id))
        else {
            return Vec::new();
        };
        let Some(properties) = &schema.properties else {
            return Vec::new();
        };

        properties
            .iter()
            .map(|(key, prop)| Field {
                id: key.clone(),
                name: non_empty(&prop.title).unwrap_or(key.as_str()).to_string(),
                field_type: non_empty(&prop.domain_type)
                    .or_else(|| non_empty(&prop.value_type))
                    .unwrap_or(DEFAULT_FIELD_TYPE)
                    .to_string(),
                format: prop.format.clone(),
                required: schema
                    .required
                    .as_ref()
                    .is_some_and(|required| required.iter().any(|r| r == key)),
            })
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl GraphModel {
    /// Finds a single field of a form by id.
    pub fn field(&self, form: &FormNode, field_id: &str) -> Option<Field> {
        self.fields_of(form).into_iter().find(|f| f.id == field_id)
    }
}
