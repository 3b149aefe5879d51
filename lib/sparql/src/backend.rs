use crate::assemble::assemble_entities;
use crate::executor::{BindingRow, QueryExecutionAdapter};
use crate::template::{dataservice_facets_query, QueryTemplate};
use async_trait::async_trait;
use registry_common::error::RegistryError;
use registry_common::{FacetSearchBackend, SearchResult};
use registry_engine::aggregate_all;
use registry_model::{
    normalize_type_label, vocab, FacetCount, FacetDimension, FacetKeying, Facets,
    FilterSelection,
};
use std::sync::Arc;

/// Evaluates searches by generating SPARQL queries and running them against the configured
/// sources.
///
/// Filter values are resource identifiers for resource dimensions (see
/// [ValueKind](registry_model::ValueKind)), so the facets of this backend are keyed by resource.
/// The `value` of each returned [FacetCount] can be used as a filter value again.
#[derive(Clone, Debug)]
pub struct DeclarativeQuerySearch {
    adapter: QueryExecutionAdapter,
    template: QueryTemplate,
    sources: Vec<String>,
}

impl DeclarativeQuerySearch {
    /// Creates a backend that uses the embedded data service details template.
    pub fn new(adapter: QueryExecutionAdapter, sources: Vec<String>) -> Self {
        Self {
            adapter,
            template: QueryTemplate::dataservice_details(),
            sources,
        }
    }

    /// Replaces the details template.
    ///
    /// The template must select the variables the entities are assembled from, `?service` first.
    #[must_use]
    pub fn with_template(mut self, template: QueryTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

#[async_trait]
impl FacetSearchBackend for DeclarativeQuerySearch {
    async fn search(&self, selection: &FilterSelection) -> Result<SearchResult, RegistryError> {
        let query = self.template.build(selection)?;
        let rows = self.adapter.execute(&query, &self.sources).await?;

        let entities = assemble_entities(&rows)
            .into_iter()
            .map(Arc::new)
            .collect::<Vec<_>>();
        let facets = aggregate_all(&entities, FacetKeying::Resource);

        tracing::debug!(
            rows = rows.len(),
            entities = entities.len(),
            "Evaluated declarative search"
        );
        Ok(SearchResult { entities, facets })
    }

    async fn facet_options(&self) -> Result<Facets, RegistryError> {
        let rows = self
            .adapter
            .execute(dataservice_facets_query(), &self.sources)
            .await?;
        Ok(facet_options_from_rows(&rows))
    }
}

/// Groups the rows of the facet listing query by dimension.
///
/// Rows of unknown dimensions or without a value are skipped. A missing label falls back to the
/// value (normalized for types). Entries are ordered by descending count, ties keep row order.
pub fn facet_options_from_rows(rows: &[BindingRow]) -> Facets {
    let mut facets = FacetDimension::ALL
        .into_iter()
        .map(|dimension| (dimension, Vec::new()))
        .collect::<Facets>();

    for row in rows {
        let Some(dimension) = row
            .get("facet")
            .and_then(|name| FacetDimension::from_name(name))
        else {
            continue;
        };
        let Some(value) = row.get("value") else {
            continue;
        };

        let label = match row.get("label") {
            Some(label) => label.clone(),
            None if dimension == FacetDimension::Type => {
                normalize_type_label(&vocab::compact_iri(value))
            }
            None => value.clone(),
        };
        let count = row
            .get("count")
            .and_then(|count| count.parse().ok())
            .unwrap_or_default();

        if let Some(entries) = facets.get_mut(&dimension) {
            entries.push(FacetCount {
                label,
                value: value.clone(),
                count,
            });
        }
    }

    for entries in facets.values_mut() {
        entries.sort_by(|a, b| b.count.cmp(&a.count));
    }
    facets
}
