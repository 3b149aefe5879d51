mod backend;
pub mod error;

pub use backend::{FacetSearchBackend, SearchResult};
