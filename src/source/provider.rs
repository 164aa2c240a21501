use super::builtin::{FormFieldProvider, GlobalProvider, UrlParamProvider};
use super::{DataSource, Resolved, SourceContext, SourceGroup};
use crate::error::ProviderError;
use crate::mapping::PrefillMapping;
use crate::notify::{Notifier, Severity};
use indexmap::IndexMap;
use tracing::{error, warn};

/// Defines the contract for one source type.
pub trait DataSourceProvider: Send + Sync {
    /// The tag this provider is registered under, e.g. `form_field`.
    fn source_type(&self) -> &str;

    /// Human-readable group name, e.g. `Form Fields`.
    fn name(&self) -> &str;

    fn enumerate(&self, ctx: &SourceContext<'_>) -> Result<Vec<DataSource>, ProviderError>;

    /// Computes the value a saved mapping currently points at.
    fn resolve(&self, mapping: &PrefillMapping, ctx: &SourceContext<'_>) -> Option<String>;
}

/// Maps source-type tags to providers, in registration order.
///
/// Registering under a tag that is already taken replaces the previous
/// provider (last write wins) and logs a warning.
pub struct SourceRegistry {
    providers: IndexMap<String, Box<dyn DataSourceProvider>>,
}

impl Default for SourceRegistry {
    /// A registry with the form-field, global and URL-parameter providers.
    fn default() -> Self {
        Self::new()
            .with_provider(Box::new(FormFieldProvider))
            .with_provider(Box::new(GlobalProvider::default()))
            .with_provider(Box::new(UrlParamProvider))
    }
}

impl SourceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            providers: IndexMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn DataSourceProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Registers a provider, returning the one it replaced.
    pub fn register(
        &mut self,
        provider: Box<dyn DataSourceProvider>,
    ) -> Option<Box<dyn DataSourceProvider>> {
        let tag = provider.source_type().to_string();
        let previous = self.providers.insert(tag.clone(), provider);
        if previous.is_some() {
            warn!(source_type = %tag, "data source already registered, overwriting");
        }
        previous
    }

    pub fn get(&self, source_type: &str) -> Option<&dyn DataSourceProvider> {
        self.providers.get(source_type).map(Box::as_ref)
    }

    pub fn contains(&self, source_type: &str) -> bool {
        self.providers.contains_key(source_type)
    }

    pub fn source_types(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Enumerates every provider. A failing provider is reported to the
    /// notifier and contributes an empty group.
    pub fn enumerate_all(&self, ctx: &SourceContext<'_>, notifier: &dyn Notifier) -> Vec<SourceGroup> {
        self.providers
            .iter()
            .map(|(tag, provider)| {
                let sources = provider.enumerate(ctx).unwrap_or_else(|e| {
                    error!(source_type = %tag, error = %e, "error getting sources");
                    notifier.notify(
                        &format!("Error loading {} sources", provider.name()),
                        Severity::Error,
                    );
                    Vec::new()
                });
                SourceGroup {
                    source_type: tag.clone(),
                    name: provider.name().to_string(),
                    sources,
                }
            })
            .collect()
    }

    /// Finds one enumerated source by its tag and id.
    pub fn find_source(
        &self,
        ctx: &SourceContext<'_>,
        notifier: &dyn Notifier,
        source_type: &str,
        id: &str,
    ) -> Option<DataSource> {
        let provider = self.get(source_type)?;
        match provider.enumerate(ctx) {
            Ok(sources) => sources.into_iter().find(|s| s.id == id),
            Err(e) => {
                error!(source_type, error = %e, "error getting sources");
                notifier.notify(
                    &format!("Error loading {} sources", provider.name()),
                    Severity::Error,
                );
                None
            }
        }
    }

    /// Resolves a mapping through the provider registered for its source type.
    /// Unregistered source types resolve to `None`.
    pub fn resolve<'m>(
        &self,
        mapping: &'m PrefillMapping,
        ctx: &SourceContext<'_>,
    ) -> Option<Resolved<'m>> {
        let Some(provider) = self.get(mapping.source_type()) else {
            warn!(source_type = mapping.source_type(), "unknown data source type");
            return None;
        };
        Some(Resolved {
            value: provider.resolve(mapping, ctx),
            source: mapping,
        })
    }
}
