#![allow(clippy::print_stdout)]
use crate::cli::{Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use registry::model::{FacetDimension, FilterSelection};
use registry::sparql::QueryExecutionAdapter;
use registry::{executor_for, Registry, RegistryConfig, DEFAULT_SPARQL_ENDPOINT};
use registry_web::ServerConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = RegistryConfig {
        backend: args.backend.to_config(),
    };
    tracing::debug!(backend = ?config.backend, "Resolved registry configuration");
    match args.command {
        Command::Serve { bind, cors } => {
            let registry = Registry::from_config(&config).await?;
            registry_web::serve(ServerConfig {
                registry,
                bind,
                cors,
            })
            .await
        }
        Command::Search { filter } => {
            let registry = Registry::from_config(&config).await?;
            let mut selection = FilterSelection::new();
            for (name, value) in filter {
                match FacetDimension::from_name(&name) {
                    Some(dimension) => selection.insert(dimension, value),
                    None => tracing::warn!(dimension = %name, "Skipping filter on unknown dimension"),
                }
            }

            let response = registry.search(&selection).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if let Some(error) = response.error {
                bail!("The search failed: {error}")
            }
            Ok(())
        }
        Command::Query { query, source } => {
            let sources = if !source.is_empty() {
                source
            } else if !args.backend.sparql_source.is_empty() {
                args.backend.sparql_source.clone()
            } else {
                vec![DEFAULT_SPARQL_ENDPOINT.to_owned()]
            };
            let adapter =
                QueryExecutionAdapter::new(executor_for(&sources)).with_timeout(args.backend.timeout());
            let rows = adapter
                .execute(&query, &sources)
                .await
                .with_context(|| format!("Could not run the query against {}", sources.join(", ")))?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
