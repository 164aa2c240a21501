use super::provider::DataSourceProvider;
use super::{source_type, DataSource, SourceContext, SourceMetadata};
use crate::error::ProviderError;
use crate::graph::FormNode;
use crate::mapping::{BuiltinSource, FormFieldSource, GlobalSource, MappingSource, PrefillMapping};
use crate::schema::DEFAULT_FIELD_TYPE;
use itertools::Itertools;

pub const DIRECT_DEPENDENCY: &str = "Direct Dependency";
pub const TRANSITIVE_DEPENDENCY: &str = "Transitive Dependency";

/// Offers every field of every form the active form depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFieldProvider;

impl FormFieldProvider {
    fn sources_of(form: &FormNode, category: &str, ctx: &SourceContext<'_>) -> Vec<DataSource> {
        ctx.fields
            .fields_of(form)
            .into_iter()
            .map(|field| DataSource {
                id: format!("{}.{}", form.id, field.id),
                display_name: format!("{} → {}", form.name, field.name),
                category: category.to_string(),
                metadata: SourceMetadata {
                    field_type: Some(field.field_type.clone()),
                    form_name: Some(form.name.clone()),
                    field_name: Some(field.name.clone()),
                },
                binding: MappingSource::form_field(FormFieldSource {
                    source_form_id: form.id.clone(),
                    source_field_id: field.id,
                    source_form_name: form.name.clone(),
                    source_field_name: field.name,
                    source_field_type: Some(field.field_type),
                }),
                value: None,
            })
            .collect()
    }
}

impl DataSourceProvider for FormFieldProvider {
    fn source_type(&self) -> &str {
        source_type::FORM_FIELD
    }

    fn name(&self) -> &str {
        "Form Fields"
    }

    fn enumerate(&self, ctx: &SourceContext<'_>) -> Result<Vec<DataSource>, ProviderError> {
        let deps = ctx.dependencies.dependencies(&ctx.form.id);
        let direct = deps
            .direct
            .iter()
            .flat_map(|form| Self::sources_of(form, DIRECT_DEPENDENCY, ctx));
        let transitive = deps
            .transitive
            .iter()
            .flat_map(|form| Self::sources_of(form, TRANSITIVE_DEPENDENCY, ctx));
        Ok(direct.chain(transitive).collect())
    }

    /// Runtime form data is not available at configuration time, so the
    /// value describes where it will come from.
    fn resolve(&self, mapping: &PrefillMapping, _ctx: &SourceContext<'_>) -> Option<String> {
        match &mapping.source {
            MappingSource::Builtin(BuiltinSource::FormField(s)) => Some(format!(
                "Value from {}.{}",
                s.source_form_name, s.source_field_name
            )),
            _ => None,
        }
    }
}

/// An entry of the global profile catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub id: String,
    pub display_name: String,
    pub category: String,
    pub field_type: String,
    pub value: Option<String>,
}

impl ProfileEntry {
    pub fn new(id: &str, display_name: &str, category: &str, field_type: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            category: category.to_string(),
            field_type: field_type.to_string(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

/// Offers a fixed catalog of profile-level values.
#[derive(Debug, Clone)]
pub struct GlobalProvider {
    entries: Vec<ProfileEntry>,
}

impl Default for GlobalProvider {
    fn default() -> Self {
        Self::new(vec![
            ProfileEntry::new("user_email", "User Email", "User Profile", "email")
                .with_value("patient@example.com"),
            ProfileEntry::new("user_name", "User Name", "User Profile", "text")
                .with_value("John Smith"),
            ProfileEntry::new("org_name", "Organization Name", "Organization", "text")
                .with_value("City Medical Center"),
        ])
    }
}

impl GlobalProvider {
    pub fn new(entries: Vec<ProfileEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }
}

impl DataSourceProvider for GlobalProvider {
    fn source_type(&self) -> &str {
        source_type::GLOBAL
    }

    fn name(&self) -> &str {
        "Global Data"
    }

    fn enumerate(&self, _ctx: &SourceContext<'_>) -> Result<Vec<DataSource>, ProviderError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| DataSource {
                id: entry.id.clone(),
                display_name: entry.display_name.clone(),
                category: entry.category.clone(),
                metadata: SourceMetadata {
                    field_type: Some(entry.field_type.clone()),
                    ..SourceMetadata::default()
                },
                binding: MappingSource::global(GlobalSource {
                    global_id: entry.id.clone(),
                    source_name: entry.display_name.clone(),
                    source_field_type: Some(entry.field_type.clone()),
                }),
                value: entry.value.clone(),
            })
            .collect())
    }

    fn resolve(&self, mapping: &PrefillMapping, _ctx: &SourceContext<'_>) -> Option<String> {
        let MappingSource::Builtin(BuiltinSource::Global(s)) = &mapping.source else {
            return None;
        };
        self.entries
            .iter()
            .find(|entry| entry.id == s.global_id)
            .and_then(|entry| entry.value.clone())
    }
}

/// Offers one source per query parameter of the current request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlParamProvider;

impl DataSourceProvider for UrlParamProvider {
    fn source_type(&self) -> &str {
        source_type::URL_PARAM
    }

    fn name(&self) -> &str {
        "URL Parameters"
    }

    fn enumerate(&self, ctx: &SourceContext<'_>) -> Result<Vec<DataSource>, ProviderError> {
        Ok(ctx
            .request
            .params()
            .unique_by(|(key, _)| *key)
            .map(|(key, value)| DataSource {
                id: key.to_string(),
                display_name: format!("URL Param: {}", key),
                category: "URL Parameters".to_string(),
                metadata: SourceMetadata {
                    field_type: Some(DEFAULT_FIELD_TYPE.to_string()),
                    ..SourceMetadata::default()
                },
                binding: MappingSource::url_param(key),
                value: Some(value.to_string()),
            })
            .collect())
    }

    fn resolve(&self, mapping: &PrefillMapping, ctx: &SourceContext<'_>) -> Option<String> {
        let MappingSource::Builtin(BuiltinSource::UrlParam(s)) = &mapping.source else {
            return None;
        };
        ctx.request
            .get(&s.param_key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}
