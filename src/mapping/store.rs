use super::model::PrefillMapping;
use crate::error::StoreError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type FormMappings = IndexMap<String, PrefillMapping>;

/// The canonical mapping document: form id → field id → mapping.
///
/// Insertion order is preserved, so serializing a reloaded store reproduces
/// the original text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingStore {
    forms: IndexMap<String, FormMappings>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, form_id: &str, field_id: &str) -> Option<&PrefillMapping> {
        self.forms.get(form_id)?.get(field_id)
    }

    pub fn form(&self, form_id: &str) -> Option<&FormMappings> {
        self.forms.get(form_id)
    }

    pub fn contains(&self, form_id: &str, field_id: &str) -> bool {
        self.get(form_id, field_id).is_some()
    }

    /// Inserts or replaces the mapping at `(form_id, mapping.target_field_id)`,
    /// returning the mapping it replaced.
    pub fn upsert(&mut self, form_id: &str, mapping: PrefillMapping) -> Option<PrefillMapping> {
        self.forms
            .entry(form_id.to_string())
            .or_default()
            .insert(mapping.target_field_id.clone(), mapping)
    }

    /// Removes a mapping. Form entries left without mappings are dropped.
    pub fn remove(&mut self, form_id: &str, field_id: &str) -> Option<PrefillMapping> {
        let fields = self.forms.get_mut(form_id)?;
        let removed = fields.shift_remove(field_id)?;
        if fields.is_empty() {
            self.forms.shift_remove(form_id);
        }
        Some(removed)
    }

    pub fn is_empty(&self) -> bool {
        self.forms.values().all(IndexMap::is_empty)
    }

    /// Total number of mappings across all forms.
    pub fn len(&self) -> usize {
        self.forms.values().map(IndexMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &PrefillMapping)> {
        self.forms.iter().flat_map(|(form_id, fields)| {
            fields
                .iter()
                .map(move |(field_id, mapping)| (form_id.as_str(), field_id.as_str(), mapping))
        })
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Malformed(e.to_string()))
    }
}
