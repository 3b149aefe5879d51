use crate::FacetDimension;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

/// The active filters of a search: for each constrained dimension, the set of allowed values.
///
/// A dimension that is absent, or present with an empty set, imposes no constraint. Within a
/// dimension, values are alternatives (OR). Across dimensions, constraints are conjunctive (AND).
///
/// Filter input is untrusted. Unknown dimension names and values that are not lists of strings
/// are ignored rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    constraints: BTreeMap<FacetDimension, BTreeSet<String>>,
}

impl FilterSelection {
    /// Creates a selection without any constraint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from `(dimension name, values)` pairs, skipping unknown names.
    pub fn from_named<I, K, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for (name, values) in entries {
            let Some(dimension) = FacetDimension::from_name(name.as_ref()) else {
                tracing::debug!(name = name.as_ref(), "Ignoring unknown facet dimension");
                continue;
            };
            selection.extend(dimension, values);
        }
        selection
    }

    /// Builds a selection from a JSON object such as `{"Publisher": ["Org A"]}`.
    ///
    /// Anything that is not an object yields an empty selection. Members whose value is not an
    /// array, and array items that are not strings, are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new();
        };

        let entries = object.iter().filter_map(|(name, values)| {
            let values = values.as_array()?;
            Some((
                name,
                values
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_owned),
            ))
        });
        Self::from_named(entries)
    }

    /// Adds `value` to the allowed values of `dimension`.
    pub fn insert(&mut self, dimension: FacetDimension, value: impl Into<String>) {
        self.constraints
            .entry(dimension)
            .or_default()
            .insert(value.into());
    }

    /// Adds all `values` to the allowed values of `dimension`.
    pub fn extend(
        &mut self,
        dimension: FacetDimension,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.constraints
            .entry(dimension)
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Builder-style variant of [Self::extend].
    #[must_use]
    pub fn with(
        mut self,
        dimension: FacetDimension,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.extend(dimension, values);
        self
    }

    /// Returns the allowed values of `dimension` if it is constrained.
    pub fn allowed(&self, dimension: FacetDimension) -> Option<&BTreeSet<String>> {
        self.constraints
            .get(&dimension)
            .filter(|values| !values.is_empty())
    }

    /// Iterates over the constrained dimensions in table order, skipping empty value sets.
    pub fn constraints(&self) -> impl Iterator<Item = (FacetDimension, &BTreeSet<String>)> {
        self.constraints
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(dimension, values)| (*dimension, values))
    }

    /// Returns whether no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.constraints().next().is_none()
    }
}

impl<'de> Deserialize<'de> for FilterSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_value_set_is_unconstrained() {
        let selection = FilterSelection::new().with(FacetDimension::Publisher, Vec::<String>::new());
        assert!(selection.is_unconstrained());
        assert_eq!(selection.allowed(FacetDimension::Publisher), None);
    }

    #[test]
    fn test_values_are_a_set() {
        let selection =
            FilterSelection::new().with(FacetDimension::Country, ["USA", "UK", "USA"]);
        let allowed = selection.allowed(FacetDimension::Country).unwrap();
        assert_eq!(allowed.len(), 2);
    }

    #[test]
    fn test_from_json_ignores_unknown_and_malformed_members() {
        let selection = FilterSelection::from_json(&json!({
            "Publisher": ["Org A", 7],
            "Keyword": ["ignored"],
            "Country": "USA",
            "Contact Point": []
        }));

        let constraints = selection.constraints().collect::<Vec<_>>();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].0, FacetDimension::Publisher);
        assert!(constraints[0].1.contains("Org A"));
    }

    #[test]
    fn test_from_json_non_object() {
        assert!(FilterSelection::from_json(&json!(["Publisher"])).is_unconstrained());
    }

    #[test]
    fn test_deserialize() {
        let selection: FilterSelection =
            serde_json::from_str(r#"{"Contains Process": ["P1: Validate"]}"#).unwrap();
        assert_eq!(
            selection,
            FilterSelection::new().with(FacetDimension::ContainsProcess, ["P1: Validate"])
        );
    }
}
