use super::blueprint::{BlueprintForm, BlueprintGraph, BlueprintNode, BlueprintProperty};
use super::definition::{FieldSchema, FormNode, GraphModel, PropertySchema};
use crate::error::GraphLoadError;

/// A trait for payload models that can be converted into a `GraphModel`.
///
/// This is the seam between a graph transport and the core. `BlueprintGraph`
/// implements it for the JSON blueprint format; other formats can provide
/// their own translation.
///
/// # Example
///
/// ```rust
/// use prefill::error::GraphLoadError;
/// use prefill::graph::{FormNode, GraphModel, IntoGraph};
///
/// struct Chain(Vec<&'static str>);
///
/// impl IntoGraph for Chain {
///     fn into_graph(self) -> Result<GraphModel, GraphLoadError> {
///         let nodes = self
///             .0
///             .windows(2)
///             .map(|pair| FormNode {
///                 id: pair[1].to_string(),
///                 kind: "form".to_string(),
///                 name: pair[1].to_string(),
///                 component_id: None,
///                 prerequisites: vec![pair[0].to_string()],
///             })
///             .collect();
///         Ok(GraphModel::new(nodes, Vec::new()))
///     }
/// }
///
/// let graph = Chain(vec!["a", "b", "c"]).into_graph().unwrap();
/// assert_eq!(graph.node("c").unwrap().prerequisites, vec!["b"]);
/// ```
pub trait IntoGraph {
    /// Consumes the payload and converts it into the core graph model.
    fn into_graph(self) -> Result<GraphModel, GraphLoadError>;
}

impl IntoGraph for BlueprintGraph {
    fn into_graph(self) -> Result<GraphModel, GraphLoadError> {
        let nodes = self.nodes.ok_or_else(|| {
            GraphLoadError::InvalidPayload("payload has no 'nodes' collection".to_string())
        })?;

        let nodes = nodes.into_iter().map(convert_node).collect();
        let schemas = self
            .forms
            .unwrap_or_default()
            .into_iter()
            .map(convert_form)
            .collect();

        Ok(GraphModel::new(nodes, schemas))
    }
}

impl GraphModel {
    /// Parses a blueprint JSON document and converts it into a graph.
    pub fn from_json_str(json: &str) -> Result<Self, GraphLoadError> {
        let payload: BlueprintGraph =
            serde_json::from_str(json).map_err(|e| GraphLoadError::Parse(e.to_string()))?;
        payload.into_graph()
    }
}

fn convert_node(raw: BlueprintNode) -> FormNode {
    let name = raw.data.name.unwrap_or_else(|| raw.id.clone());
    FormNode {
        name,
        kind: raw.node_type,
        component_id: raw.data.component_id,
        prerequisites: raw.data.prerequisites.unwrap_or_default(),
        id: raw.id,
    }
}

fn convert_form(raw: BlueprintForm) -> FieldSchema {
    let (properties, required) = match raw.field_schema {
        Some(schema) => (
            schema.properties.map(|props| {
                props
                    .into_iter()
                    .map(|(key, prop)| (key, convert_property(prop)))
                    .collect()
            }),
            schema.required,
        ),
        None => (None, None),
    };
    FieldSchema {
        id: raw.id,
        properties,
        required,
    }
}

fn convert_property(raw: BlueprintProperty) -> PropertySchema {
    PropertySchema {
        title: raw.title,
        domain_type: raw.avantos_type,
        value_type: raw
            .value_type
            .and_then(|v| v.as_str().map(str::to_string)),
        format: raw.format,
    }
}
