use anyhow::anyhow;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use registry::{BackendConfig, DEFAULT_DATA_FILE, SPARQL_ENDPOINT_ENV};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(about, version, name = "registry")]
/// Faceted search over a registry of data services
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Selects the search backend. Without a SPARQL source the entity document is searched in memory.
#[derive(ClapArgs)]
pub struct BackendArgs {
    /// The JSON entity document searched in memory
    #[arg(
        long,
        global = true,
        env = "REGISTRY_DATA_FILE",
        default_value = DEFAULT_DATA_FILE,
        value_hint = ValueHint::FilePath
    )]
    pub data_file: PathBuf,
    /// SPARQL endpoints or local RDF files to run generated queries against
    ///
    /// Setting a source switches to the SPARQL backend. Endpoints are given as http(s) URLs.
    #[arg(long, global = true, env = SPARQL_ENDPOINT_ENV, value_delimiter = ',', value_hint = ValueHint::Url)]
    pub sparql_source: Vec<String>,
    /// A file holding the details query template, replacing the embedded one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub template: Option<PathBuf>,
    /// The maximum duration of a single query, in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl BackendArgs {
    pub fn to_config(&self) -> BackendConfig {
        if self.sparql_source.is_empty() {
            BackendConfig::in_memory(&self.data_file)
        } else {
            BackendConfig::DeclarativeQuery {
                sources: self.sparql_source.clone(),
                template: self.template.clone(),
                timeout: self.timeout(),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the registry HTTP server
    Serve {
        /// Host and port to listen to
        #[arg(short, long, default_value = "localhost:7878", value_hint = ValueHint::Hostname)]
        bind: String,
        /// Allows cross-origin requests
        #[arg(long)]
        cors: bool,
    },
    /// Search the registry and print the matching services with their facets as JSON
    Search {
        /// A filter like "Publisher=Org A"
        ///
        /// Values of the same dimension are alternatives, different dimensions must all match.
        /// Filters on unknown dimensions are skipped with a warning.
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },
    /// Run a SPARQL query and print its binding rows as JSON
    Query {
        /// The query text, or the path of a file ending with ".rq"
        query: String,
        /// SPARQL endpoints or local RDF files to query
        ///
        /// By default the SPARQL sources of the backend are used.
        #[arg(long, value_hint = ValueHint::AnyPath)]
        source: Vec<String>,
    },
}

fn parse_filter(filter: &str) -> anyhow::Result<(String, String)> {
    let (dimension, value) = filter
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected DIMENSION=VALUE, found '{filter}'"))?;
    Ok((dimension.trim().to_owned(), value.trim().to_owned()))
}
