use super::blueprint::BlueprintGraph;
use super::conversion::IntoGraph;
use super::definition::GraphModel;
use crate::error::GraphLoadError;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use tracing::info;

/// Supplies the raw blueprint graph. Implementations own the transport.
pub trait GraphSource {
    fn fetch(&self) -> impl Future<Output = Result<BlueprintGraph, GraphLoadError>>;
}

/// Reads the blueprint graph from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileGraphSource {
    path: PathBuf,
}

impl FileGraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileGraphSource {
    fn fetch(&self) -> impl Future<Output = Result<BlueprintGraph, GraphLoadError>> {
        let path = self.path.clone();
        async move {
            let json = fs::read_to_string(&path).map_err(|e| GraphLoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            serde_json::from_str(&json).map_err(|e| GraphLoadError::Parse(e.to_string()))
        }
    }
}

/// Serves a blueprint graph held in memory as JSON text.
#[derive(Debug, Clone)]
pub struct StaticGraphSource {
    json: String,
}

impl StaticGraphSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl GraphSource for StaticGraphSource {
    fn fetch(&self) -> impl Future<Output = Result<BlueprintGraph, GraphLoadError>> {
        let parsed = serde_json::from_str(&self.json).map_err(|e| GraphLoadError::Parse(e.to_string()));
        async move { parsed }
    }
}

/// Fetches the graph once and converts it. Either the whole graph is
/// returned or an error is; nothing is partially applied.
pub async fn load_graph<S: GraphSource>(source: &S) -> Result<GraphModel, GraphLoadError> {
    let payload = source.fetch().await?;
    let graph = payload.into_graph()?;
    info!(
        nodes = graph.nodes().len(),
        schemas = graph.schemas().len(),
        "loaded blueprint graph"
    );
    Ok(graph)
}
