//! # Prefill - Dependency-Aware Field Prefill Configuration
//!
//! **Prefill** configures where the fields of an intake form take their initial
//! values from. A form may declare prerequisite forms; any field of a form it
//! depends on (directly or transitively), a global profile value, or a request
//! parameter can be bound to one of its fields.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Graph**: Parse a blueprint payload into a `GraphModel`, either
//!     through `GraphModel::from_json_str` or an async `GraphSource` with `load_graph`.
//! 2.  **Enumerate Sources**: Build a `SourceContext` for the selected form and ask the
//!     `SourceRegistry` for every candidate source, grouped by provider.
//! 3.  **Configure**: Drive a `PrefillManager` with the intents `begin_configure`,
//!     `select_candidate` and `save`. Type mismatches produce a warning on the first
//!     save and commit on the second.
//! 4.  **Persist and Resolve**: Every mutation is written through a `MappingPersistence`.
//!     Saved mappings are resolved back to a value through the registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use prefill::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let graph = GraphModel::from_json_str(
//!         r#"{
//!             "nodes": [
//!                 { "id": "f1", "type": "form", "data": { "name": "Contact", "component_id": "c1", "prerequisites": [] } },
//!                 { "id": "f2", "type": "form", "data": { "name": "Intake", "component_id": "c2", "prerequisites": ["f1"] } }
//!             ],
//!             "forms": [
//!                 { "id": "c1", "field_schema": { "properties": { "email": { "avantos_type": "email" } } } },
//!                 { "id": "c2", "field_schema": { "properties": { "patient_email": { "avantos_type": "email" } } } }
//!             ]
//!         }"#,
//!     )?;
//!
//!     let form = graph.node("f2").ok_or("missing form")?;
//!     let request = RequestContext::new();
//!     let ctx = SourceContext::new(&graph, form, &request);
//!     let registry = SourceRegistry::default();
//!
//!     let candidate = registry
//!         .find_source(&ctx, &TracingNotifier, "form_field", "f1.email")
//!         .ok_or("missing source")?;
//!
//!     let mut manager = PrefillManager::builder(Box::new(MemoryPersistence::new())).open()?;
//!     manager.select_form("f2");
//!     manager.begin_configure("patient_email")?;
//!     manager.select_candidate(candidate)?;
//!
//!     match manager.save_in(&graph)? {
//!         SaveOutcome::Committed(mapping) => println!("saved binding from {}", mapping.source_type()),
//!         SaveOutcome::NeedsConfirmation(warnings) => println!("warnings: {:?}", warnings),
//!     }
//!
//!     assert_eq!(manager.display("f2", "patient_email").as_deref(), Some("← Contact"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod graph;
pub mod mapping;
pub mod notify;
pub mod persistence;
pub mod prelude;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod validation;
