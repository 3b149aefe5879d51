//! The declarative backend of the registry search.
//!
//! A [FilterSelection](registry_model::FilterSelection) is translated into a SPARQL query by
//! injecting one generated [FilterClause] per constrained dimension into a [QueryTemplate]. The
//! query is run by a [SparqlExecutor] behind the [QueryExecutionAdapter], and the resulting
//! binding rows are assembled into entities by [DeclarativeQuerySearch].

mod assemble;
mod backend;
mod clause;
pub mod executor;
mod template;

pub use assemble::assemble_entities;
pub use backend::{facet_options_from_rows, DeclarativeQuerySearch};
pub use clause::{filter_clauses, render_clauses, sanitize_variable_token, FilterClause};
pub use executor::{
    BindingRow, FileSparqlExecutor, HttpSparqlExecutor, QueryExecutionAdapter, SparqlExecutor,
};
pub use template::{build_query, dataservice_facets_query, QueryTemplate, FILTER_MARKER};
