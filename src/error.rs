use thiserror::Error;

/// Errors that can occur while fetching or decoding the blueprint graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphLoadError {
    #[error("Failed to read graph from '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse graph JSON: {0}")]
    Parse(String),

    #[error("Invalid data format received from graph source: {0}")]
    InvalidPayload(String),
}

/// Errors that can occur while reading or writing the mapping document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Could not access mapping document '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Persisted mapping document is malformed: {0}")]
    Malformed(String),

    #[error("Failed to serialize mapping document: {0}")]
    Serialize(String),
}

/// Raised by a data source provider that cannot enumerate its sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Source type '{source_type}' is unavailable: {message}")]
    Unavailable {
        source_type: String,
        message: String,
    },
}

/// Errors caused by calling the configuration intents out of order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("No form is selected")]
    NoFormSelected,

    #[error("No field is being configured")]
    NotConfiguring,

    #[error("No candidate source has been selected")]
    NoCandidate,

    #[error("Form '{0}' not found in the graph")]
    FormNotFound(String),

    #[error("Field '{field_id}' not found on form '{form_id}'")]
    FieldNotFound { form_id: String, field_id: String },

    #[error("Save targets field '{found}', but field '{expected}' is being configured")]
    TargetMismatch { expected: String, found: String },
}
