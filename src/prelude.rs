//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the prefill crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use prefill::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = GraphModel::from_json_str(&std::fs::read_to_string("path/to/graph.json")?)?;
//! let form = graph.node("form-b").ok_or("form not found")?;
//!
//! let deps = graph.dependencies(&form.id);
//! println!("{} direct, {} transitive", deps.direct.len(), deps.transitive.len());
//!
//! let request = RequestContext::new();
//! let ctx = SourceContext::new(&graph, form, &request);
//! let registry = SourceRegistry::default();
//! for group in registry.enumerate_all(&ctx, &TracingNotifier) {
//!     println!("{}: {} sources", group.name, group.sources.len());
//! }
//! # Ok(())
//! # }
//! ```

// Graph model and loading
pub use crate::graph::{FormNode, GraphModel, GraphSource, IntoGraph, load_graph};

// Dependency resolution and field projection
pub use crate::resolver::{DependencyLookup, DependencySets};
pub use crate::schema::{Field, FieldLookup};

// Data sources
pub use crate::source::{
    DataSource, DataSourceProvider, RequestContext, Resolved, SourceContext, SourceGroup,
    SourceRegistry,
};

// Mappings
pub use crate::mapping::{FieldState, MappingSource, MappingStore, PrefillManager, PrefillMapping, SaveOutcome};
pub use crate::persistence::{JsonFilePersistence, MappingPersistence, MemoryPersistence};
pub use crate::validation::MappingValidator;

// Notifications
pub use crate::notify::{Notifier, Severity, TracingNotifier};

// Error types
pub use crate::error::{GraphLoadError, LifecycleError, ProviderError, StoreError};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
