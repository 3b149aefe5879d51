use crate::clause::{filter_clauses, render_clauses};
use registry_common::error::QueryBuildError;
use registry_model::{FacetDimension, FilterSelection, Variable};
use spargebra::Query;
use std::path::Path;

/// The placeholder that marks where generated filter clauses are inserted into a template.
pub const FILTER_MARKER: &str = "# PLACEHOLDER: Dynamic filters will be injected here";

const DATASERVICE_DETAILS: &str = include_str!("../queries/dataservice-details.rq");
const DATASERVICE_FACETS: &str = include_str!("../queries/dataservice-facets.rq");

/// A SPARQL query skeleton with exactly one [FILTER_MARKER].
///
/// ```
/// # use registry_model::{FacetDimension, FilterSelection};
/// # use registry_sparql::QueryTemplate;
/// let template = QueryTemplate::new(
///     "SELECT ?service WHERE { ?service a ?type . # PLACEHOLDER: Dynamic filters will be injected here\n}",
/// )?;
/// let selection = FilterSelection::new().with(FacetDimension::Type, ["http://www.w3.org/ns/dcat#Catalog"]);
/// let query = template.build(&selection)?;
/// assert!(query.contains("IN (<http://www.w3.org/ns/dcat#Catalog>)"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
    subject: Variable,
    bound: Vec<(FacetDimension, Variable)>,
}

impl QueryTemplate {
    /// Creates a template from `text`, binding filters to `?service`.
    pub fn new(text: impl Into<String>) -> Result<Self, QueryBuildError> {
        let text = text.into();
        match text.matches(FILTER_MARKER).count() {
            0 => Err(QueryBuildError::MissingMarker),
            1 => Ok(Self {
                text,
                subject: Variable::new_unchecked("service"),
                bound: Vec::new(),
            }),
            count => Err(QueryBuildError::DuplicateMarker { count }),
        }
    }

    /// Reads a template from a file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, QueryBuildError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| QueryBuildError::TemplateIo {
                path: path.to_owned(),
                error,
            })?;
        Self::new(text)
    }

    /// The embedded template that selects data services and catalogs with their details.
    ///
    /// The template binds the recognized type of each result to `?type`, so type filters apply
    /// to that binding and not to every `rdf:type` of the subject.
    pub fn dataservice_details() -> Self {
        Self {
            text: DATASERVICE_DETAILS.to_owned(),
            subject: Variable::new_unchecked("service"),
            bound: Vec::new(),
        }
        .with_bound_variable(FacetDimension::Type, Variable::new_unchecked("type"))
    }

    /// Uses `subject` as the variable the filter clauses constrain.
    #[must_use]
    pub fn with_subject(mut self, subject: Variable) -> Self {
        self.subject = subject;
        self
    }

    /// Filters `dimension` on `variable`, which the template already binds, instead of matching
    /// the dimension's property path from the subject.
    #[must_use]
    pub fn with_bound_variable(mut self, dimension: FacetDimension, variable: Variable) -> Self {
        self.bound.retain(|(d, _)| *d != dimension);
        self.bound.push((dimension, variable));
        self
    }

    /// The template text, including the marker.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Generates the query for `selection`.
    ///
    /// Each constrained dimension contributes one clause. The clauses replace the marker; without
    /// any constraint the marker is replaced with nothing and the rest of the text is unchanged.
    /// The result is parsed before it is returned, so a template that is not valid SPARQL is
    /// reported here and never reaches an execution engine.
    pub fn build(&self, selection: &FilterSelection) -> Result<String, QueryBuildError> {
        let clauses = filter_clauses(&self.subject, selection.constraints())?
            .into_iter()
            .map(|clause| match self.bound_variable(clause.dimension()) {
                Some(variable) => clause.bound_to(variable.clone()),
                None => clause,
            })
            .collect::<Vec<_>>();
        let query = self
            .text
            .replacen(FILTER_MARKER, &render_clauses(&clauses), 1);
        Query::parse(&query, None)?;

        tracing::debug!(clauses = clauses.len(), "Generated query from template");
        Ok(query)
    }

    fn bound_variable(&self, dimension: FacetDimension) -> Option<&Variable> {
        self.bound
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, variable)| variable)
    }
}

/// Generates the query for `selection` from the template text `template`.
pub fn build_query(template: &str, selection: &FilterSelection) -> Result<String, QueryBuildError> {
    QueryTemplate::new(template)?.build(selection)
}

/// The embedded query listing the facet values of all data services with their counts.
///
/// Rows bind `?facet` (a dimension name), `?value`, `?label` (may be unbound) and `?count`.
pub fn dataservice_facets_query() -> &'static str {
    DATASERVICE_FACETS
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_model::FacetDimension;

    #[test]
    fn test_missing_marker() {
        let result = QueryTemplate::new("SELECT * WHERE { ?s ?p ?o }");
        assert!(matches!(result, Err(QueryBuildError::MissingMarker)));
    }

    #[test]
    fn test_duplicate_marker() {
        let text = format!("SELECT * WHERE {{ {FILTER_MARKER}\n ?s ?p ?o {FILTER_MARKER}\n}}");
        let result = QueryTemplate::new(text);
        assert!(matches!(
            result,
            Err(QueryBuildError::DuplicateMarker { count: 2 })
        ));
    }

    #[test]
    fn test_embedded_templates_are_valid() {
        let details = QueryTemplate::dataservice_details();
        assert_eq!(
            QueryTemplate::new(details.text())
                .unwrap()
                .with_bound_variable(FacetDimension::Type, Variable::new_unchecked("type")),
            details
        );
        details.build(&FilterSelection::new()).unwrap();
        Query::parse(dataservice_facets_query(), None).unwrap();
    }

    #[test]
    fn test_invalid_template_is_rejected_before_execution() {
        let template = QueryTemplate::new(format!("SELECT WHERE {{ {FILTER_MARKER}\n")).unwrap();
        let result = template.build(&FilterSelection::new());
        assert!(matches!(result, Err(QueryBuildError::Syntax(_))));
    }

    #[test]
    fn test_custom_subject() {
        let template = QueryTemplate::new(format!("SELECT ?s WHERE {{ ?s ?p ?o . {FILTER_MARKER}\n}}"))
            .unwrap()
            .with_subject(Variable::new_unchecked("s"));
        let selection = FilterSelection::new().with(FacetDimension::Publisher, ["http://org/A"]);

        let query = template.build(&selection).unwrap();
        assert!(query.contains("?s <http://purl.org/dc/terms/publisher> ?filterVal_"));
    }

    #[test]
    fn test_type_filter_uses_recognized_type() {
        let selection =
            FilterSelection::new().with(FacetDimension::Type, ["http://www.w3.org/ns/dcat#Resource"]);

        let query = QueryTemplate::dataservice_details().build(&selection).unwrap();
        assert!(query.contains("FILTER(?type IN (<http://www.w3.org/ns/dcat#Resource>))"));
        assert!(!query.contains("?service <http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"));
    }
}
