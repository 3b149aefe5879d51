use crate::executor::{Solution, SolutionStream, SparqlExecutor};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use registry_common::error::QueryExecutionErrorKind;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Evaluates queries over local RDF files.
///
/// All sources are loaded into one in-memory store, so the query sees the union of their
/// triples. The RDF format of a source is guessed from its file extension. Loading and
/// evaluation run on the blocking thread pool.
///
/// Dropping the returned future, for example when the caller times out, cancels the evaluation
/// at the next source or solution boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSparqlExecutor;

#[async_trait]
impl SparqlExecutor for FileSparqlExecutor {
    async fn execute(
        &self,
        query: &str,
        sources: &[String],
    ) -> Result<SolutionStream, QueryExecutionErrorKind> {
        let query = query.to_owned();
        let sources = sources.to_vec();
        let cancel = CancelOnDrop::default();
        let cancelled = Arc::clone(&cancel.0);
        let solutions =
            tokio::task::spawn_blocking(move || evaluate(&query, &sources, &cancelled))
                .await
                .map_err(QueryExecutionErrorKind::engine)??;
        drop(cancel);
        Ok(stream::iter(solutions.into_iter().map(Ok)).boxed())
    }
}

/// Sets the shared flag when the owning future is dropped.
#[derive(Debug, Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn check_cancelled(cancelled: &AtomicBool) -> Result<(), QueryExecutionErrorKind> {
    if cancelled.load(Ordering::Relaxed) {
        return Err(QueryExecutionErrorKind::engine(
            "Query evaluation was cancelled",
        ));
    }
    Ok(())
}

fn evaluate(
    query: &str,
    sources: &[String],
    cancelled: &AtomicBool,
) -> Result<Vec<Solution>, QueryExecutionErrorKind> {
    let store = Store::new().map_err(QueryExecutionErrorKind::engine)?;
    for source in sources {
        check_cancelled(cancelled)?;
        load_source(&store, source)?;
    }

    check_cancelled(cancelled)?;
    match store.query(query).map_err(QueryExecutionErrorKind::engine)? {
        QueryResults::Solutions(solutions) => solutions
            .map(|solution| {
                check_cancelled(cancelled)?;
                let solution = solution.map_err(QueryExecutionErrorKind::engine)?;
                Ok(solution
                    .iter()
                    .map(|(variable, term)| (variable.clone(), term.clone()))
                    .collect::<Solution>())
            })
            .collect(),
        QueryResults::Boolean(_) | QueryResults::Graph(_) => {
            Err(QueryExecutionErrorKind::NotSolutions)
        }
    }
}

fn load_source(store: &Store, source: &str) -> Result<(), QueryExecutionErrorKind> {
    let source_error = |error: Box<dyn std::error::Error + Send + Sync>| {
        QueryExecutionErrorKind::Source {
            source_name: source.to_owned(),
            error,
        }
    };

    let path = Path::new(source);
    let format = path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(RdfFormat::from_extension)
        .ok_or_else(|| source_error(format!("Unknown RDF format of '{source}'").into()))?;
    let file = File::open(path).map_err(|error| source_error(error.into()))?;

    store
        .load_from_reader(format, BufReader::new(file))
        .map_err(|error| source_error(error.into()))?;
    tracing::debug!(source, ?format, "Loaded RDF file");
    Ok(())
}
