use crate::error::RegistryError;
use async_trait::async_trait;
use registry_model::{Entity, Facets, FilterSelection};
use std::fmt::Debug;
use std::sync::Arc;

/// The result of a faceted search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// The entities that match the filter selection.
    pub entities: Vec<Arc<Entity>>,
    /// The facet counts over `entities`, one entry per known dimension.
    pub facets: Facets,
}

/// A backend that can evaluate a faceted search.
///
/// Implementations differ in where the filtering happens (in memory or in a query engine), but
/// they share the filter semantics: OR within a dimension, AND across dimensions, and facet counts
/// computed on the filtered entities only.
#[async_trait]
pub trait FacetSearchBackend: Debug + Send + Sync {
    /// Returns the entities matching `selection` together with the facet counts over them.
    async fn search(&self, selection: &FilterSelection) -> Result<SearchResult, RegistryError>;

    /// Returns the facet values available without any filter.
    ///
    /// The default implementation computes the facets of an unconstrained search.
    async fn facet_options(&self) -> Result<Facets, RegistryError> {
        Ok(self.search(&FilterSelection::new()).await?.facets)
    }
}
