use crate::source::source_type;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by `PrefillMapping` itself. Extension fields never use them.
pub const RESERVED_KEYS: &[&str] = &[
    "targetFieldId",
    "createdAt",
    "transform",
    "condition",
    "fallback",
    "sourceType",
];

/// A persisted binding from a target field to a data source.
///
/// The source-specific fields are flattened next to the common ones, so the
/// document reads as a single JSON object tagged by `sourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillMapping {
    pub target_field_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub transform: Option<Value>,
    #[serde(default)]
    pub condition: Option<Value>,
    #[serde(default)]
    pub fallback: Option<Value>,
    #[serde(flatten)]
    pub source: MappingSource,
}

impl PrefillMapping {
    pub fn new(
        target_field_id: impl Into<String>,
        source: MappingSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_field_id: target_field_id.into(),
            created_at,
            transform: None,
            condition: None,
            fallback: None,
            source,
        }
    }

    pub fn source_type(&self) -> &str {
        self.source.source_type()
    }
}

/// The source-specific half of a mapping, discriminated by `sourceType`.
///
/// Built-in source types have fixed shapes and are decoded strictly. Source
/// types contributed by other providers land in `Extension` with their
/// fields kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MappingSource {
    Builtin(BuiltinSource),
    Extension(ExtensionSource),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "snake_case")]
pub enum BuiltinSource {
    FormField(FormFieldSource),
    Global(GlobalSource),
    UrlParam(UrlParamSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldSource {
    pub source_form_id: String,
    pub source_field_id: String,
    #[serde(default)]
    pub source_form_name: String,
    pub source_field_name: String,
    #[serde(default)]
    pub source_field_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSource {
    pub global_id: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub source_field_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlParamSource {
    pub param_key: String,
    pub source_field_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSource {
    pub source_type: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MappingSource {
    pub fn form_field(source: FormFieldSource) -> Self {
        MappingSource::Builtin(BuiltinSource::FormField(source))
    }

    pub fn global(source: GlobalSource) -> Self {
        MappingSource::Builtin(BuiltinSource::Global(source))
    }

    pub fn url_param(param_key: impl Into<String>) -> Self {
        MappingSource::Builtin(BuiltinSource::UrlParam(UrlParamSource {
            param_key: param_key.into(),
            source_field_type: crate::schema::DEFAULT_FIELD_TYPE.to_string(),
        }))
    }

    /// Builds a third-party source. Fields named like a [`RESERVED_KEYS`]
    /// entry are dropped.
    pub fn extension(source_type: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(*key);
        }
        MappingSource::Extension(ExtensionSource {
            source_type: source_type.into(),
            fields,
        })
    }

    pub fn source_type(&self) -> &str {
        match self {
            MappingSource::Builtin(BuiltinSource::FormField(_)) => source_type::FORM_FIELD,
            MappingSource::Builtin(BuiltinSource::Global(_)) => source_type::GLOBAL,
            MappingSource::Builtin(BuiltinSource::UrlParam(_)) => source_type::URL_PARAM,
            MappingSource::Extension(ext) => &ext.source_type,
        }
    }

    /// Short provenance text, e.g. `← Intake Form` or `← URL: ref`.
    pub fn display(&self) -> String {
        match self {
            MappingSource::Builtin(BuiltinSource::FormField(s)) => {
                format!("← {}", or_default(&s.source_form_name, "Unknown Form"))
            }
            MappingSource::Builtin(BuiltinSource::Global(s)) => {
                format!("← {}", or_default(&s.source_name, "Global Data"))
            }
            MappingSource::Builtin(BuiltinSource::UrlParam(s)) => format!("← URL: {}", s.param_key),
            MappingSource::Extension(_) => "← Unknown source".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for MappingSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = match fields.get("sourceType") {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => return Err(de::Error::custom("`sourceType` must be a string")),
            None => return Err(de::Error::missing_field("sourceType")),
        };
        match tag.as_str() {
            source_type::FORM_FIELD | source_type::GLOBAL | source_type::URL_PARAM => {
                BuiltinSource::deserialize(Value::Object(fields))
                    .map(MappingSource::Builtin)
                    .map_err(|e| de::Error::custom(format!("invalid `{}` mapping: {}", tag, e)))
            }
            _ => {
                fields.remove("sourceType");
                Ok(MappingSource::Extension(ExtensionSource {
                    source_type: tag,
                    fields,
                }))
            }
        }
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
