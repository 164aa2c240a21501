//! Common test utilities for building graphs, notifiers and clocks.
use chrono::{DateTime, Utc};
use prefill::prelude::*;
use std::cell::RefCell;

/// A small intake workflow:
///
/// `f1` (Contact) <- `f2` (Intake) <- `f3` (Consent), plus `f4`, a node that is not a form.
#[allow(dead_code)]
pub const INTAKE_GRAPH_JSON: &str = r#"{
    "nodes": [
        {
            "id": "f1",
            "type": "form",
            "data": { "name": "Contact Form", "component_id": "c1", "prerequisites": [] }
        },
        {
            "id": "f2",
            "type": "form",
            "data": { "name": "Intake", "component_id": "c2", "prerequisites": ["f1"] }
        },
        {
            "id": "f3",
            "type": "form",
            "data": { "name": "Consent", "component_id": "c3", "prerequisites": ["f2"] }
        },
        {
            "id": "f4",
            "type": "branch",
            "data": { "prerequisites": ["f3"] }
        }
    ],
    "edges": [
        { "source": "f1", "target": "f2" },
        { "source": "f2", "target": "f3" }
    ],
    "forms": [
        {
            "id": "c1",
            "name": "Contact",
            "field_schema": {
                "type": "object",
                "properties": {
                    "email": { "avantos_type": "email", "title": "Email", "type": "string", "format": "email" },
                    "full_name": { "avantos_type": "short-text", "title": "Full Name", "type": "string" }
                },
                "required": ["email"]
            }
        },
        {
            "id": "c2",
            "name": "Intake",
            "field_schema": {
                "type": "object",
                "properties": {
                    "patient_email": { "avantos_type": "email", "title": "Patient Email" },
                    "age": { "avantos_type": "number", "title": "Age" },
                    "notes": {}
                }
            }
        },
        {
            "id": "c3",
            "name": "Consent",
            "field_schema": {
                "type": "object",
                "properties": {
                    "agreed": { "type": "boolean", "title": "Agreed" }
                },
                "required": ["agreed"]
            }
        }
    ]
}"#;

#[allow(dead_code)]
pub fn intake_graph() -> GraphModel {
    GraphModel::from_json_str(INTAKE_GRAPH_JSON).expect("fixture graph should parse")
}

/// Builds a form node without a schema.
#[allow(dead_code)]
pub fn node(id: &str, prerequisites: &[&str]) -> FormNode {
    FormNode {
        id: id.to_string(),
        kind: "form".to_string(),
        name: id.to_string(),
        component_id: None,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    }
}

/// `A` depends on `B` and `C`; both depend on `D`.
#[allow(dead_code)]
pub fn diamond_graph() -> GraphModel {
    GraphModel::new(
        vec![
            node("A", &["B", "C"]),
            node("B", &["D"]),
            node("C", &["D"]),
            node("D", &[]),
        ],
        Vec::new(),
    )
}

#[allow(dead_code)]
pub fn ids(forms: &[FormNode]) -> Vec<&str> {
    forms.iter().map(|f| f.id.as_str()).collect()
}

/// Collects every notification for later assertions.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<(String, Severity)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .borrow_mut()
            .push((message.to_string(), severity));
    }
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.borrow().clone()
    }

    pub fn contains(&self, message: &str, severity: Severity) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(m, s)| m == message && *s == severity)
    }
}

#[allow(dead_code)]
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
