//! The in-memory backend of the registry search.
//!
//! The [EntityGraphStore] loads the entity collection once and shares it read-only. The
//! [InMemorySearch] backend evaluates a [FilterSelection](registry_model::FilterSelection) against
//! it with [matches] and computes the facet counts of the result with [aggregate].

mod aggregate;
mod filter;
mod search;
mod store;

pub use aggregate::{aggregate, aggregate_all};
pub use filter::matches;
pub use search::InMemorySearch;
pub use store::{EntityGraph, EntityGraphStore, EntitySource, DEFAULT_TYPE_MARKERS};
