use indexmap::IndexMap;
use serde::Deserialize;

/// Raw blueprint graph payload as served by the workflow graph endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BlueprintGraph {
    /// Required; a payload without `nodes` is rejected during conversion.
    #[serde(default)]
    pub nodes: Option<Vec<BlueprintNode>>,
    #[serde(default)]
    pub forms: Option<Vec<BlueprintForm>>,
}

/// Graph vertex wrapper
#[derive(Debug, Deserialize, Clone)]
pub struct BlueprintNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub data: BlueprintNodeData,
}

/// Per-node payload data
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BlueprintNodeData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "componentId")]
    pub component_id: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<Vec<String>>,
}

/// Form component definition with its field schema
#[derive(Debug, Deserialize, Clone)]
pub struct BlueprintForm {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "fieldSchema")]
    pub field_schema: Option<BlueprintFieldSchema>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BlueprintFieldSchema {
    #[serde(default)]
    pub properties: Option<IndexMap<String, BlueprintProperty>>,
    #[serde(default)]
    pub required: Option<Vec<String>>,
}

/// A field schema property. `type` is kept as raw JSON since schemas may use
/// type arrays; only string types are honoured.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BlueprintProperty {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "avantosType")]
    pub avantos_type: Option<String>,
    #[serde(rename = "type", default)]
    pub value_type: Option<serde_json::Value>,
    #[serde(default)]
    pub format: Option<String>,
}
