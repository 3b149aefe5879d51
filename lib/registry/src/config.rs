use registry_sparql::executor::DEFAULT_QUERY_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;

/// The entity document read by the in-memory backend if nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "static/registry-data.json";

/// The environment variable holding the SPARQL endpoint of the declarative backend.
pub const SPARQL_ENDPOINT_ENV: &str = "SPARQL_ENDPOINT";

/// The SPARQL endpoint used if [SPARQL_ENDPOINT_ENV] is not set.
pub const DEFAULT_SPARQL_ENDPOINT: &str = "http://localhost:3030/registry/sparql";

/// Holds the configuration of a [Registry](crate::Registry).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Which backend evaluates searches.
    pub backend: BackendConfig,
}

/// Selects and configures the search backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// Filter a JSON entity document in memory.
    InMemory {
        /// The entity document.
        data_file: PathBuf,
    },
    /// Generate SPARQL queries and run them against `sources`.
    ///
    /// If every source is an `http://` or `https://` URL, the sources are queried as SPARQL
    /// endpoints. Otherwise they are read as local RDF files.
    DeclarativeQuery {
        sources: Vec<String>,
        /// Overrides the embedded details query template.
        template: Option<PathBuf>,
        /// Bounds every query execution.
        timeout: Duration,
    },
}

impl BackendConfig {
    /// Configures the in-memory backend over `data_file`.
    pub fn in_memory(data_file: impl Into<PathBuf>) -> Self {
        Self::InMemory {
            data_file: data_file.into(),
        }
    }

    /// Configures the declarative backend over `sources` with the embedded template.
    pub fn declarative(sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::DeclarativeQuery {
            sources: sources.into_iter().map(Into::into).collect(),
            template: None,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Configures the declarative backend over the endpoint named by [SPARQL_ENDPOINT_ENV], or
    /// [DEFAULT_SPARQL_ENDPOINT].
    pub fn declarative_from_env() -> Self {
        let endpoint = std::env::var(SPARQL_ENDPOINT_ENV)
            .ok()
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| DEFAULT_SPARQL_ENDPOINT.to_owned());
        Self::declarative([endpoint])
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::in_memory(DEFAULT_DATA_FILE)
    }
}

pub(crate) fn is_endpoint(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
