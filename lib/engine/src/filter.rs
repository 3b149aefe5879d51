use registry_model::{Entity, FacetKeying, FilterSelection};

/// Decides whether `entity` satisfies `selection`.
///
/// For each constrained dimension, at least one of the values extracted from the entity must be
/// allowed. An entity without values for a constrained dimension never matches it. An
/// unconstrained selection matches every entity.
pub fn matches(entity: &Entity, selection: &FilterSelection) -> bool {
    selection.constraints().all(|(dimension, allowed)| {
        dimension
            .extract(entity)
            .iter()
            .any(|value| allowed.contains(value.key(FacetKeying::Label)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_model::{FacetDimension, Organization, Process};

    fn service(publisher: &str, country: &str) -> Entity {
        let mut entity = Entity::new(format!("http://example.org/{publisher}"), ["dcat:DataService"]);
        entity.publisher = Some(Organization {
            id: format!("http://org/{publisher}"),
            types: Vec::new(),
            name: Some(publisher.to_owned()),
            country_name: Some(country.to_owned()),
        });
        entity
    }

    #[test]
    fn test_unconstrained_matches_everything() {
        let entity = Entity::new("http://example.org/bare", ["dcat:DataService"]);
        assert!(matches(&entity, &FilterSelection::new()));
    }

    #[test]
    fn test_or_within_dimension() {
        let entity = service("Org A", "USA");
        let selection = FilterSelection::new().with(FacetDimension::Publisher, ["Org B", "Org A"]);
        assert!(matches(&entity, &selection));
    }

    #[test]
    fn test_and_across_dimensions() {
        let entity = service("Org A", "USA");
        let both = FilterSelection::new()
            .with(FacetDimension::Publisher, ["Org A"])
            .with(FacetDimension::Country, ["USA"]);
        let conflicting = FilterSelection::new()
            .with(FacetDimension::Publisher, ["Org A"])
            .with(FacetDimension::Country, ["UK"]);
        assert!(matches(&entity, &both));
        assert!(!matches(&entity, &conflicting));
    }

    #[test]
    fn test_missing_values_fail_closed() {
        let entity = Entity::new("http://example.org/bare", ["dcat:DataService"]);
        let selection = FilterSelection::new().with(FacetDimension::Country, ["USA"]);
        assert!(!matches(&entity, &selection));
    }

    #[test]
    fn test_multi_valued_dimension() {
        let mut entity = service("Org A", "USA");
        entity.contains_process = vec![Process {
            id: "http://cpp/1".to_owned(),
            types: Vec::new(),
            title: "Validate".to_owned(),
            label: Some("P1".to_owned()),
            page: None,
        }];
        let by_display = FilterSelection::new().with(FacetDimension::ContainsProcess, ["P1: Validate"]);
        let by_title = FilterSelection::new().with(FacetDimension::ContainsProcess, ["Validate"]);
        assert!(matches(&entity, &by_display));
        assert!(!matches(&entity, &by_title));
    }

    #[test]
    fn test_type_uses_normalized_label() {
        let entity = service("Org A", "USA");
        let selection = FilterSelection::new().with(FacetDimension::Type, ["Data Service"]);
        assert!(matches(&entity, &selection));
    }
}
