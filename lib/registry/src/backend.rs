use crate::config::{is_endpoint, BackendConfig};
use async_trait::async_trait;
use registry_common::error::RegistryError;
use registry_common::{FacetSearchBackend, SearchResult};
use registry_engine::{EntityGraphStore, InMemorySearch};
use registry_model::{Facets, FilterSelection};
use registry_sparql::{
    DeclarativeQuerySearch, FileSparqlExecutor, HttpSparqlExecutor, QueryExecutionAdapter,
    QueryTemplate, SparqlExecutor,
};
use std::sync::Arc;

/// The search backends of the registry. Callers only depend on [FacetSearchBackend].
#[derive(Clone, Debug)]
pub enum RegistryBackend {
    InMemory(InMemorySearch),
    DeclarativeQuery(DeclarativeQuerySearch),
}

impl RegistryBackend {
    /// Creates the backend described by `config`.
    ///
    /// A configured template file is read and checked here. The entity document of the in-memory
    /// backend is only read on the first search.
    pub async fn from_config(config: &BackendConfig) -> Result<Self, RegistryError> {
        Ok(match config {
            BackendConfig::InMemory { data_file } => {
                let store = EntityGraphStore::from_file(data_file);
                Self::InMemory(InMemorySearch::new(Arc::new(store)))
            }
            BackendConfig::DeclarativeQuery {
                sources,
                template,
                timeout,
            } => {
                let adapter =
                    QueryExecutionAdapter::new(executor_for(sources)).with_timeout(*timeout);
                let mut backend = DeclarativeQuerySearch::new(adapter, sources.clone());
                if let Some(template) = template {
                    backend = backend.with_template(QueryTemplate::from_file(template).await?);
                }
                Self::DeclarativeQuery(backend)
            }
        })
    }

    fn as_backend(&self) -> &dyn FacetSearchBackend {
        match self {
            Self::InMemory(backend) => backend,
            Self::DeclarativeQuery(backend) => backend,
        }
    }
}

/// Picks the executor for `sources`. Endpoints are queried over HTTP, anything else is a file.
pub fn executor_for(sources: &[String]) -> Arc<dyn SparqlExecutor> {
    if !sources.is_empty() && sources.iter().all(|source| is_endpoint(source)) {
        Arc::new(HttpSparqlExecutor::new(reqwest::Client::new()))
    } else {
        Arc::new(FileSparqlExecutor)
    }
}

#[async_trait]
impl FacetSearchBackend for RegistryBackend {
    async fn search(&self, selection: &FilterSelection) -> Result<SearchResult, RegistryError> {
        self.as_backend().search(selection).await
    }

    async fn facet_options(&self) -> Result<Facets, RegistryError> {
        self.as_backend().facet_options().await
    }
}
