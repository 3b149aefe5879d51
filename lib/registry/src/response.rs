use crate::adapter::{to_display_properties, ServiceWithProperties};
use registry_common::SearchResult;
use registry_model::Facets;
use serde::Serialize;
use std::fmt::Display;

/// The outcome of a search as presented to callers.
///
/// A failed search is an empty response with `error` set, so that "no matches" can always be told
/// apart from "the search failed".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub services: Vec<ServiceWithProperties>,
    pub facets: Facets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Creates the response of a failed search.
    pub fn failed(error: impl Display) -> Self {
        Self {
            services: Vec::new(),
            facets: Facets::new(),
            error: Some(error.to_string()),
        }
    }

    /// Returns whether the search succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            services: result
                .entities
                .iter()
                .map(|entity| to_display_properties(entity))
                .collect(),
            facets: result.facets,
            error: None,
        }
    }
}
