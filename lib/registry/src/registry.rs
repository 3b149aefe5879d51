use crate::backend::RegistryBackend;
use crate::config::RegistryConfig;
use crate::response::SearchResponse;
use registry_common::error::RegistryError;
use registry_common::{FacetSearchBackend, SearchResult};
use registry_model::{Facets, FilterSelection};
use std::sync::Arc;

/// The entry point of the registry search. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Registry {
    backend: Arc<RegistryBackend>,
}

impl Registry {
    pub fn new(backend: RegistryBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates the registry described by `config`.
    pub async fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(RegistryBackend::from_config(&config.backend).await?))
    }

    pub fn backend(&self) -> &RegistryBackend {
        &self.backend
    }

    /// Searches and reshapes the matching entities for display.
    ///
    /// Failures are reported in [SearchResponse::error].
    pub async fn search(&self, selection: &FilterSelection) -> SearchResponse {
        match self.try_search(selection).await {
            Ok(result) => result.into(),
            Err(error) => {
                tracing::warn!(%error, "Search failed");
                SearchResponse::failed(error)
            }
        }
    }

    /// Searches and returns the matching entities as they are.
    pub async fn try_search(&self, selection: &FilterSelection) -> Result<SearchResult, RegistryError> {
        self.backend.search(selection).await
    }

    /// Returns the facet values that are available without any filter.
    pub async fn facet_options(&self) -> Result<Facets, RegistryError> {
        self.backend.facet_options().await
    }
}
