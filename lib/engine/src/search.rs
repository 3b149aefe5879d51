use crate::{aggregate_all, matches, EntityGraphStore};
use async_trait::async_trait;
use registry_common::error::RegistryError;
use registry_common::{FacetSearchBackend, SearchResult};
use registry_model::{FacetKeying, FilterSelection};
use std::sync::Arc;
use std::time::Instant;

/// Evaluates searches by filtering the entities of an [EntityGraphStore] in memory.
///
/// Facets are computed for every known dimension on every search, whether the caller renders them
/// or not.
#[derive(Clone, Debug)]
pub struct InMemorySearch {
    store: Arc<EntityGraphStore>,
}

impl InMemorySearch {
    /// Creates a new [InMemorySearch] over `store`.
    pub fn new(store: Arc<EntityGraphStore>) -> Self {
        Self { store }
    }

    /// Returns the store that is searched.
    pub fn store(&self) -> &EntityGraphStore {
        &self.store
    }
}

#[async_trait]
impl FacetSearchBackend for InMemorySearch {
    async fn search(&self, selection: &FilterSelection) -> Result<SearchResult, RegistryError> {
        let start = Instant::now();
        let graph = self.store.entities().await?;

        let entities = graph
            .iter()
            .filter(|entity| matches(entity, selection))
            .cloned()
            .collect::<Vec<_>>();
        let facets = aggregate_all(&entities, FacetKeying::Label);

        tracing::debug!(
            total = graph.len(),
            matched = entities.len(),
            elapsed = ?start.elapsed(),
            "Evaluated in-memory search"
        );
        Ok(SearchResult { entities, facets })
    }
}
