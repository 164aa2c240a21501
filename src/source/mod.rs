//! Data source providers and their registry.
//!
//! A provider enumerates candidate sources for the form being configured and
//! resolves a saved mapping back to a value. Providers receive everything they
//! need through a [`SourceContext`]; the registry maps each source-type tag to
//! one provider.

use crate::graph::{FormNode, GraphModel};
use crate::mapping::{MappingSource, PrefillMapping};
use crate::resolver::DependencyLookup;
use crate::schema::FieldLookup;
use serde::Serialize;

mod builtin;
mod provider;
mod request;

pub use builtin::*;
pub use provider::*;
pub use request::*;

/// Tags of the built-in source types.
pub mod source_type {
    pub const FORM_FIELD: &str = "form_field";
    pub const GLOBAL: &str = "global";
    pub const URL_PARAM: &str = "url_param";
}

/// Type information used for validation and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub field_type: Option<String>,
    pub form_name: Option<String>,
    pub field_name: Option<String>,
}

/// A candidate source of a value. Regenerated on every enumeration, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub display_name: String,
    pub category: String,
    pub metadata: SourceMetadata,
    /// The source-specific fields a mapping to this source will carry.
    #[serde(flatten)]
    pub binding: MappingSource,
    /// Value captured at enumeration time, if the provider knows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DataSource {
    pub fn source_type(&self) -> &str {
        self.binding.source_type()
    }

    pub fn field_type(&self) -> Option<&str> {
        self.metadata.field_type.as_deref()
    }
}

/// All sources contributed by one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    pub source_type: String,
    pub name: String,
    pub sources: Vec<DataSource>,
}

/// A resolved mapping. `value` is `None` when the source has nothing to offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'m> {
    pub value: Option<String>,
    pub source: &'m PrefillMapping,
}

/// Capabilities handed to providers for one enumeration or resolution.
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    pub form: &'a FormNode,
    pub graph: &'a GraphModel,
    pub dependencies: &'a dyn DependencyLookup,
    pub fields: &'a dyn FieldLookup,
    pub request: &'a RequestContext,
}

impl<'a> SourceContext<'a> {
    /// Builds a context whose dependency and field lookups are the graph itself.
    pub fn new(graph: &'a GraphModel, form: &'a FormNode, request: &'a RequestContext) -> Self {
        Self {
            form,
            graph,
            dependencies: graph,
            fields: graph,
            request,
        }
    }

    pub fn with_dependencies(mut self, dependencies: &'a dyn DependencyLookup) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_fields(mut self, fields: &'a dyn FieldLookup) -> Self {
        self.fields = fields;
        self
    }
}
