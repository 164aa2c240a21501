use crate::schema::Field;
use crate::source::DataSource;
use ahash::AHashMap;

/// Advisory type-compatibility checks between a target field and a candidate source.
///
/// The table maps a target type to the source types it accepts. It is
/// deliberately asymmetric (`text` accepts `email`, `number` does not accept
/// `text`). A target type missing from the table accepts only itself.
#[derive(Debug, Clone)]
pub struct MappingValidator {
    compatible: AHashMap<String, Vec<String>>,
}

impl Default for MappingValidator {
    fn default() -> Self {
        Self::empty()
            .with_rule("email", &["email", "text", "string", "short-text"])
            .with_rule("number", &["number", "integer", "float"])
            .with_rule("date", &["date", "datetime", "string"])
            .with_rule("boolean", &["boolean", "checkbox"])
            .with_rule("text", &["text", "string", "email", "url", "tel", "short-text"])
            .with_rule("short-text", &["text", "string", "email", "short-text"])
            .with_rule("multi-line-text", &["text", "string", "multi-line-text"])
    }
}

impl MappingValidator {
    /// A validator without compatibility rules; only identical types pass.
    pub fn empty() -> Self {
        Self {
            compatible: AHashMap::new(),
        }
    }

    /// Sets the accepted source types for a target type, replacing any existing rule.
    pub fn with_rule(mut self, target_type: &str, accepted: &[&str]) -> Self {
        self.compatible.insert(
            target_type.to_string(),
            accepted.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn accepts(&self, target_type: &str, source_type: &str) -> bool {
        if target_type == source_type {
            return true;
        }
        self.compatible
            .get(target_type)
            .is_some_and(|accepted| accepted.iter().any(|t| t == source_type))
    }

    /// Returns the warnings for binding `candidate` to `target`. Never fails;
    /// a missing type on either side skips the check.
    pub fn validate(&self, target: &Field, candidate: &DataSource) -> Vec<String> {
        let target_type = target.field_type.as_str();
        let Some(source_type) = candidate.field_type() else {
            return Vec::new();
        };
        if target_type.is_empty() || source_type.is_empty() {
            return Vec::new();
        }

        if self.accepts(target_type, source_type) {
            Vec::new()
        } else {
            vec![format!("Type mismatch: {} → {}", source_type, target_type)]
        }
    }
}
