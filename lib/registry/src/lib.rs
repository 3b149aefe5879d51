#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod adapter;
mod backend;
mod config;
mod registry;
mod response;

pub use adapter::{to_display_properties, GroupedProperty, PropertyValue, ServiceWithProperties};
pub use backend::{executor_for, RegistryBackend};
pub use config::{
    BackendConfig, RegistryConfig, DEFAULT_DATA_FILE, DEFAULT_SPARQL_ENDPOINT, SPARQL_ENDPOINT_ENV,
};
pub use registry::Registry;
pub use response::SearchResponse;

pub use registry_common::{FacetSearchBackend, SearchResult};

pub mod error {
    pub use registry_common::error::*;
}

pub mod model {
    pub use registry_model::*;
}

pub mod engine {
    pub use registry_engine::*;
}

pub mod sparql {
    pub use registry_sparql::*;
}
