use registry_model::IriParseError;
use spargebra::SparqlSyntaxError;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// An error raised by a search, regardless of the backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The entity collection could not be loaded or parsed.
    #[error(transparent)]
    DataUnavailable(#[from] DataUnavailableError),
    /// A query could not be generated from the template and the filter selection.
    #[error(transparent)]
    QueryBuild(#[from] QueryBuildError),
    /// The query execution engine reported a failure.
    #[error(transparent)]
    QueryExecution(#[from] QueryExecutionError),
}

/// An error raised while loading the entity collection.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DataUnavailableError {
    /// Error from the OS I/O layer.
    #[error("Could not read entity data from '{}': {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// The document is not valid JSON or a record is malformed.
    #[error("Could not parse entity data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document has no `@graph` array.
    #[error("The entity document has no '@graph' array")]
    MissingGraph,
}

/// An error raised while generating a query. These are always detected before execution.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryBuildError {
    /// The template does not contain the filter marker.
    #[error("The query template does not contain the filter marker")]
    MissingMarker,
    /// The template contains the filter marker more than once.
    #[error("The query template contains the filter marker {count} times, expected exactly once")]
    DuplicateMarker { count: usize },
    /// A filter value of a resource dimension is not a valid IRI.
    #[error("Invalid value '{value}' for facet '{dimension}': {error}")]
    InvalidResourceValue {
        dimension: String,
        value: String,
        #[source]
        error: IriParseError,
    },
    /// A generated variable name is not valid.
    #[error("Invalid variable name '{0}'")]
    InvalidVariable(String),
    /// The generated query text is not valid SPARQL.
    #[error("The generated query is invalid: {0}")]
    Syntax(#[from] SparqlSyntaxError),
    /// The template file could not be read.
    #[error("Could not read query template '{}': {error}", path.display())]
    TemplateIo {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// An error raised by the query execution boundary.
///
/// Carries the query that was attempted so that callers can report it.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct QueryExecutionError {
    query: String,
    #[source]
    kind: QueryExecutionErrorKind,
}

impl QueryExecutionError {
    /// Creates a new [QueryExecutionError] for the given `query`.
    pub fn new(query: impl Into<String>, kind: QueryExecutionErrorKind) -> Self {
        Self {
            query: query.into(),
            kind,
        }
    }

    /// The query text that failed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The reason of the failure.
    pub fn kind(&self) -> &QueryExecutionErrorKind {
        &self.kind
    }
}

/// The reason a query execution failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryExecutionErrorKind {
    /// No source was given.
    #[error("No source to execute the query against")]
    NoSources,
    /// A source could not be reached or read.
    #[error("Source '{source_name}' failed: {error}")]
    Source {
        source_name: String,
        #[source]
        error: Box<dyn Error + Send + Sync + 'static>,
    },
    /// A remote endpoint answered with an unsuccessful status code.
    #[error("Source '{source_name}' responded with status {status}: {body}")]
    Status {
        source_name: String,
        status: u16,
        body: String,
    },
    /// The query is an ASK, CONSTRUCT or DESCRIBE query.
    #[error("The query did not return solutions")]
    NotSolutions,
    /// The execution did not finish in time.
    #[error("The query execution timed out after {0:?}")]
    Timeout(Duration),
    /// A query given as a file reference could not be read.
    #[error("Could not read query file '{}': {error}", path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Any other error of the execution engine.
    #[error("{0}")]
    Engine(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl QueryExecutionErrorKind {
    /// Wraps an error of the execution engine.
    pub fn engine(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Engine(error.into())
    }
}
