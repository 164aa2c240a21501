use ahash::AHashMap;
use indexmap::IndexMap;

/// Node kind that marks a fillable form.
pub const FORM_KIND: &str = "form";

/// A single vertex of the intake workflow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNode {
    pub id: String,
    pub kind: String,
    pub name: String,
    /// Links the node to the `FieldSchema` with the same id.
    pub component_id: Option<String>,
    /// Upstream form ids, in declaration order.
    pub prerequisites: Vec<String>,
}

impl FormNode {
    pub fn is_form(&self) -> bool {
        self.kind == FORM_KIND
    }
}

/// The field schema of a form component, keyed by component id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    pub id: String,
    pub properties: Option<IndexMap<String, PropertySchema>>,
    pub required: Option<Vec<String>>,
}

/// One entry of a schema's property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    pub title: Option<String>,
    /// Domain-specific semantic type tag (e.g. `short-text`, `multi-line-text`).
    pub domain_type: Option<String>,
    /// Generic JSON-schema type (e.g. `string`, `object`).
    pub value_type: Option<String>,
    pub format: Option<String>,
}

/// The immutable, already-loaded graph of forms and their schemas.
///
/// Lookups go through id indexes built once at construction. When an id
/// appears more than once the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<FormNode>,
    schemas: Vec<FieldSchema>,
    node_index: AHashMap<String, usize>,
    schema_index: AHashMap<String, usize>,
}

impl GraphModel {
    pub fn new(nodes: Vec<FormNode>, schemas: Vec<FieldSchema>) -> Self {
        let mut node_index = AHashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(idx);
        }
        let mut schema_index = AHashMap::with_capacity(schemas.len());
        for (idx, schema) in schemas.iter().enumerate() {
            schema_index.entry(schema.id.clone()).or_insert(idx);
        }
        Self {
            nodes,
            schemas,
            node_index,
            schema_index,
        }
    }

    pub fn node(&self, id: &str) -> Option<&FormNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> &[FormNode] {
        &self.nodes
    }

    /// Iterates the nodes whose kind is `form`, in graph order.
    pub fn forms(&self) -> impl Iterator<Item = &FormNode> {
        self.nodes.iter().filter(|n| n.is_form())
    }

    pub fn schema(&self, component_id: &str) -> Option<&FieldSchema> {
        self.schema_index
            .get(component_id)
            .map(|&idx| &self.schemas[idx])
    }

    pub fn schemas(&self) -> &[FieldSchema] {
        &self.schemas
    }
}
