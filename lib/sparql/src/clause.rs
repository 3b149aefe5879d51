use registry_common::error::QueryBuildError;
use registry_model::{FacetDimension, Literal, NamedNode, NamedNodeRef, Term, ValueKind, Variable};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Write};

/// The prefix of the variables bound by generated filter clauses.
const FILTER_VARIABLE_PREFIX: &str = "filterVal_";

/// A generated filter for one constrained dimension: a graph pattern that binds a fresh variable
/// to the values of the dimension, and a membership constraint on that variable.
///
/// All escaping of user-supplied values happens when a clause is created. Rendering cannot fail
/// and never produces text that escapes its position in the query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterClause {
    dimension: FacetDimension,
    subject: Variable,
    path: &'static [NamedNodeRef<'static>],
    variable: Variable,
    allowed: Vec<Term>,
}

impl FilterClause {
    /// Creates the clause that restricts `subject` to the `allowed` values of `dimension`.
    ///
    /// Values of resource dimensions must be absolute IRIs. Values of literal dimensions are
    /// embedded as escaped string literals.
    pub fn try_new<'a>(
        subject: Variable,
        dimension: FacetDimension,
        allowed: impl IntoIterator<Item = &'a String>,
    ) -> Result<Self, QueryBuildError> {
        let descriptor = dimension.descriptor();
        let variable = filter_variable(descriptor.property())?;
        let allowed = allowed
            .into_iter()
            .map(|value| value_term(dimension, descriptor.value_kind, value))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            dimension,
            subject,
            path: descriptor.path,
            variable,
            allowed,
        })
    }

    /// Constrains `variable`, which the surrounding query already binds to the values of the
    /// dimension, instead of binding a fresh variable.
    #[must_use]
    pub fn bound_to(mut self, variable: Variable) -> Self {
        self.path = &[];
        self.variable = variable;
        self
    }

    pub fn dimension(&self) -> FacetDimension {
        self.dimension
    }

    /// Returns the variable constrained by this clause.
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Returns the terms the variable may take.
    pub fn allowed(&self) -> &[Term] {
        &self.allowed
    }
}

impl Display for FilterClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n    # Filter by {}\n    ", self.dimension)?;
        if !self.path.is_empty() {
            write!(f, "{} ", self.subject)?;
            for (i, property) in self.path.iter().enumerate() {
                if i > 0 {
                    f.write_char('/')?;
                }
                write!(f, "{property}")?;
            }
            write!(f, " {} .\n    ", self.variable)?;
        }
        write!(f, "FILTER({} IN (", self.variable)?;
        for (i, term) in self.allowed.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        f.write_str("))")
    }
}

/// Generates the clauses of all constrained dimensions of `constraints`, in dimension order.
pub fn filter_clauses<'a>(
    subject: &Variable,
    constraints: impl IntoIterator<Item = (FacetDimension, &'a BTreeSet<String>)>,
) -> Result<Vec<FilterClause>, QueryBuildError> {
    constraints
        .into_iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .map(|(dimension, allowed)| FilterClause::try_new(subject.clone(), dimension, allowed))
        .collect()
}

/// Renders `clauses` as the text that replaces the filter marker.
pub fn render_clauses(clauses: &[FilterClause]) -> String {
    clauses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_variable_token(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn filter_variable(property: NamedNodeRef<'_>) -> Result<Variable, QueryBuildError> {
    let name = format!(
        "{FILTER_VARIABLE_PREFIX}{}",
        sanitize_variable_token(property.as_str())
    );
    Variable::new(&name).map_err(|_| QueryBuildError::InvalidVariable(name))
}

fn value_term(
    dimension: FacetDimension,
    kind: ValueKind,
    value: &str,
) -> Result<Term, QueryBuildError> {
    match kind {
        ValueKind::Resource => NamedNode::new(value)
            .map(Term::from)
            .map_err(|error| QueryBuildError::InvalidResourceValue {
                dimension: dimension.name().to_owned(),
                value: value.to_owned(),
                error,
            }),
        ValueKind::Literal => Ok(Literal::new_simple_literal(value).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Variable {
        Variable::new_unchecked("service")
    }

    fn values(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn test_sanitize_variable_token() {
        assert_eq!(
            sanitize_variable_token("http://purl.org/dc/terms/publisher"),
            "http___purl_org_dc_terms_publisher"
        );
        assert_eq!(sanitize_variable_token("abc123"), "abc123");
        assert_eq!(sanitize_variable_token("\u{e9}-x"), "__x");
    }

    #[test]
    fn test_render_resource_clause() {
        let allowed = values(&["http://org/A", "http://org/B"]);
        let clause = FilterClause::try_new(service(), FacetDimension::Publisher, &allowed).unwrap();

        assert_eq!(
            clause.to_string(),
            "\n    # Filter by Publisher\n    \
             ?service <http://purl.org/dc/terms/publisher> ?filterVal_http___purl_org_dc_terms_publisher .\n    \
             FILTER(?filterVal_http___purl_org_dc_terms_publisher IN (<http://org/A>, <http://org/B>))"
        );
    }

    #[test]
    fn test_render_literal_clause_with_path() {
        let allowed = values(&["USA"]);
        let clause = FilterClause::try_new(service(), FacetDimension::Country, &allowed).unwrap();

        assert_eq!(
            clause.variable().as_str(),
            "filterVal_http___www_w3_org_2006_vcard_ns_country_name"
        );
        assert_eq!(
            clause.to_string(),
            "\n    # Filter by Country\n    \
             ?service <http://purl.org/dc/terms/publisher>/<http://www.w3.org/2006/vcard/ns#country-name> \
             ?filterVal_http___www_w3_org_2006_vcard_ns_country_name .\n    \
             FILTER(?filterVal_http___www_w3_org_2006_vcard_ns_country_name IN (\"USA\"))"
        );
    }

    #[test]
    fn test_literal_values_are_escaped() {
        let allowed = values(&["USA\")) } DROP ALL #"]);
        let clause = FilterClause::try_new(service(), FacetDimension::Country, &allowed).unwrap();
        assert_eq!(clause.allowed(), [Term::from(Literal::new_simple_literal("USA\")) } DROP ALL #"))]);
        assert!(clause.to_string().contains(r#"IN ("USA\")) } DROP ALL #"))"#));
    }

    #[test]
    fn test_resource_values_must_be_iris() {
        for value in ["Org A", "http://org/A> } #", "relative/path"] {
            let allowed = values(&[value]);
            let result = FilterClause::try_new(service(), FacetDimension::Publisher, &allowed);
            assert!(
                matches!(result, Err(QueryBuildError::InvalidResourceValue { .. })),
                "{value} was accepted"
            );
        }
    }

    #[test]
    fn test_render_clause_on_bound_variable() {
        let allowed = values(&["http://www.w3.org/ns/dcat#Catalog"]);
        let clause = FilterClause::try_new(service(), FacetDimension::Type, &allowed)
            .unwrap()
            .bound_to(Variable::new_unchecked("type"));

        assert_eq!(
            clause.to_string(),
            "\n    # Filter by Type\n    FILTER(?type IN (<http://www.w3.org/ns/dcat#Catalog>))"
        );
    }

    #[test]
    fn test_empty_constraints_are_skipped() {
        let empty = BTreeSet::new();
        let clauses = filter_clauses(&service(), [(FacetDimension::Type, &empty)]).unwrap();
        assert!(clauses.is_empty());
        assert_eq!(render_clauses(&clauses), "");
    }
}
