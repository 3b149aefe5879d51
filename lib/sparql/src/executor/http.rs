use crate::executor::{Solution, SolutionStream, SparqlExecutor};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use registry_common::error::QueryExecutionErrorKind;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};
use std::sync::Arc;

const SPARQL_QUERY_MEDIA_TYPE: &str = "application/sparql-query";

/// Evaluates queries on remote endpoints with the SPARQL 1.1 protocol.
///
/// The sources are endpoint URLs. They are queried one after another and their solutions are
/// concatenated in source order.
#[derive(Clone, Debug, Default)]
pub struct HttpSparqlExecutor {
    client: Client,
}

impl HttpSparqlExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SparqlExecutor for HttpSparqlExecutor {
    async fn execute(
        &self,
        query: &str,
        sources: &[String],
    ) -> Result<SolutionStream, QueryExecutionErrorKind> {
        let client = self.client.clone();
        let query: Arc<str> = query.into();

        let solutions = stream::iter(sources.to_vec())
            .then(move |endpoint| {
                let client = client.clone();
                let query = Arc::clone(&query);
                async move { query_endpoint(&client, &endpoint, &query).await }
            })
            .flat_map(|result| match result {
                Ok(solutions) => stream::iter(solutions.into_iter().map(Ok)).left_stream(),
                Err(error) => stream::once(async move { Err(error) }).right_stream(),
            })
            .boxed();
        Ok(solutions)
    }
}

async fn query_endpoint(
    client: &Client,
    endpoint: &str,
    query: &str,
) -> Result<Vec<Solution>, QueryExecutionErrorKind> {
    let source_error = |error: reqwest::Error| QueryExecutionErrorKind::Source {
        source_name: endpoint.to_owned(),
        error: Box::new(error),
    };

    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, SPARQL_QUERY_MEDIA_TYPE)
        .header(ACCEPT, QueryResultsFormat::Json.media_type())
        .body(query.to_owned())
        .send()
        .await
        .map_err(source_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => format!("<response body could not be read: {error}>"),
        };
        return Err(QueryExecutionErrorKind::Status {
            source_name: endpoint.to_owned(),
            status: status.as_u16(),
            body,
        });
    }

    let format = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(QueryResultsFormat::from_media_type)
        .unwrap_or(QueryResultsFormat::Json);
    let body = response.bytes().await.map_err(source_error)?;

    let parse_error = |error: sparesults::QueryResultsParseError| QueryExecutionErrorKind::Source {
        source_name: endpoint.to_owned(),
        error: Box::new(error),
    };
    match QueryResultsParser::from_format(format)
        .for_reader(body.as_ref())
        .map_err(parse_error)?
    {
        ReaderQueryResultsParserOutput::Solutions(solutions) => solutions
            .map(|solution| {
                let solution = solution.map_err(parse_error)?;
                Ok(solution
                    .iter()
                    .map(|(variable, term)| (variable.clone(), term.clone()))
                    .collect::<Solution>())
            })
            .collect(),
        ReaderQueryResultsParserOutput::Boolean(_) => Err(QueryExecutionErrorKind::NotSolutions),
    }
}
