//! Execution of SPARQL queries against named sources.
//!
//! A [SparqlExecutor] hides the concrete engine (a remote endpoint, a local RDF file). The
//! [QueryExecutionAdapter] puts the execution boundary around it: query file resolution, a
//! timeout and normalization of the solutions into [BindingRow]s.

mod file;
mod http;

pub use file::FileSparqlExecutor;
pub use http::HttpSparqlExecutor;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use registry_common::error::{QueryExecutionError, QueryExecutionErrorKind};
use registry_model::{Term, Variable};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One solution as produced by an execution engine.
pub type Solution = Vec<(Variable, Term)>;

/// The solutions of a query, in the order the engine yields them.
pub type SolutionStream = BoxStream<'static, Result<Solution, QueryExecutionErrorKind>>;

/// One row of a query result: variable name to the string value of its binding.
///
/// Unbound variables are absent.
pub type BindingRow = BTreeMap<String, String>;

/// The extension of files that hold a query rather than being one.
pub const QUERY_FILE_EXTENSION: &str = ".rq";

/// The default bound on a single query execution.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// An engine that evaluates SPARQL SELECT queries against a list of sources.
#[async_trait]
pub trait SparqlExecutor: Debug + Send + Sync {
    /// Starts evaluating `query` against `sources` and returns the stream of solutions.
    async fn execute(
        &self,
        query: &str,
        sources: &[String],
    ) -> Result<SolutionStream, QueryExecutionErrorKind>;
}

/// Runs queries through a [SparqlExecutor] and collects their results.
#[derive(Clone, Debug)]
pub struct QueryExecutionAdapter {
    executor: Arc<dyn SparqlExecutor>,
    timeout: Duration,
}

impl QueryExecutionAdapter {
    /// Creates a new adapter with the [DEFAULT_QUERY_TIMEOUT].
    pub fn new(executor: Arc<dyn SparqlExecutor>) -> Self {
        Self {
            executor,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Bounds every execution by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes `query` against `sources` and drains all solutions.
    ///
    /// If `query` ends with [QUERY_FILE_EXTENSION] it is read from that file first. Nothing is
    /// returned unless the whole result was received within the timeout.
    pub async fn execute(
        &self,
        query: &str,
        sources: &[String],
    ) -> Result<Vec<BindingRow>, QueryExecutionError> {
        let query = resolve_query(query)
            .await
            .map_err(|kind| QueryExecutionError::new(query, kind))?;

        let result = tokio::time::timeout(self.timeout, self.collect(&query, sources)).await;
        match result {
            Ok(Ok(rows)) => {
                tracing::debug!(sources = sources.len(), rows = rows.len(), "Executed query");
                Ok(rows)
            }
            Ok(Err(kind)) => {
                tracing::warn!(sources = sources.len(), error = %kind, "Query execution failed");
                Err(QueryExecutionError::new(query, kind))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Query execution timed out");
                Err(QueryExecutionError::new(
                    query,
                    QueryExecutionErrorKind::Timeout(self.timeout),
                ))
            }
        }
    }

    async fn collect(
        &self,
        query: &str,
        sources: &[String],
    ) -> Result<Vec<BindingRow>, QueryExecutionErrorKind> {
        if sources.is_empty() {
            return Err(QueryExecutionErrorKind::NoSources);
        }

        let mut solutions = self.executor.execute(query, sources).await?;
        let mut rows = Vec::new();
        while let Some(solution) = solutions.try_next().await? {
            rows.push(binding_row(solution));
        }
        Ok(rows)
    }
}

async fn resolve_query(query: &str) -> Result<Cow<'_, str>, QueryExecutionErrorKind> {
    if !query.ends_with(QUERY_FILE_EXTENSION) {
        return Ok(Cow::Borrowed(query));
    }

    let path = Path::new(query);
    tokio::fs::read_to_string(path)
        .await
        .map(Cow::Owned)
        .map_err(|error| QueryExecutionErrorKind::QueryFile {
            path: path.to_owned(),
            error,
        })
}

fn binding_row(solution: Solution) -> BindingRow {
    solution
        .into_iter()
        .map(|(variable, term)| (variable.into_string(), term_value(term)))
        .collect()
}

/// Returns the lexical value of `term`: the IRI of a named node, the identifier of a blank node
/// and the lexical form of a literal (without language tag or datatype).
pub fn term_value(term: Term) -> String {
    match term {
        Term::NamedNode(node) => node.into_string(),
        Term::BlankNode(node) => node.into_string(),
        Term::Literal(literal) => literal.value().to_owned(),
        #[allow(
            unreachable_patterns,
            reason = "Quoted triples only exist if RDF-star is enabled"
        )]
        other => other.to_string(),
    }
}
