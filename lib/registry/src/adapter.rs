use registry_model::vocab::compact_iri;
use registry_model::{normalize_type_label, Entity};
use serde::Serialize;

/// An entity reshaped for generic display: its identifier, title and description, and its
/// remaining attributes as labelled property groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWithProperties {
    pub service_uri: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<GroupedProperty>,
}

/// All values of one property of an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedProperty {
    /// The property identifier as a prefixed name, e.g. `dct:publisher`.
    pub prop_uri: String,
    pub prop_label: String,
    pub values: Vec<PropertyValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub val: String,
    pub val_label: String,
}

/// Reshapes `entity` into property groups.
///
/// Attributes are visited in a fixed order: publisher, country, type, contact points with their
/// emails, endpoint, landing page, documentation and contained processes. Groups appear in the
/// order in which their first value is visited. Absent and empty values are skipped.
pub fn to_display_properties(entity: &Entity) -> ServiceWithProperties {
    let mut properties = PropertyGroups::default();

    if let Some(publisher) = &entity.publisher {
        properties.add("Publisher", "dct:publisher", publisher.name.as_deref(), None);
        properties.add(
            "Country",
            "vcard:country-name",
            publisher.country_name.as_deref(),
            None,
        );
    }

    if let Some(primary_type) = entity.primary_type() {
        let label = normalize_type_label(&compact_iri(primary_type));
        properties.add("Type", "rdf:type", Some(&label), None);
    }

    for contact in &entity.contact_point {
        properties.add(
            "Contact Point",
            "dcat:contactPoint",
            contact.full_name.as_deref(),
            None,
        );
        if let Some(email) = &contact.email {
            let display = email.strip_prefix("mailto:").unwrap_or(email);
            properties.add("Email", "vcard:hasEmail", Some(email), Some(display));
        }
    }

    properties.add(
        "Endpoint",
        "dcat:endpointURL",
        entity.endpoint_url.as_deref(),
        None,
    );
    properties.add(
        "Landing Page",
        "dcat:landingPage",
        entity.landing_page.as_deref(),
        None,
    );
    for documentation in &entity.documentation {
        properties.add("Documentation", "foaf:page", Some(documentation), None);
    }

    for process in &entity.contains_process {
        let label = process.display_label();
        properties.add(
            "Contains Process",
            "obo:BFO_0000067",
            Some(process.link()),
            Some(&label),
        );
    }

    ServiceWithProperties {
        service_uri: entity.id.clone(),
        title: entity.title.clone(),
        description: entity.description.clone(),
        properties: properties.0,
    }
}

#[derive(Default)]
struct PropertyGroups(Vec<GroupedProperty>);

impl PropertyGroups {
    fn add(&mut self, label: &str, uri: &str, value: Option<&str>, display: Option<&str>) {
        let Some(value) = value.filter(|value| !value.is_empty()) else {
            return;
        };

        let index = match self.0.iter().position(|group| group.prop_label == label) {
            Some(index) => index,
            None => {
                self.0.push(GroupedProperty {
                    prop_uri: uri.to_owned(),
                    prop_label: label.to_owned(),
                    values: Vec::new(),
                });
                self.0.len() - 1
            }
        };
        self.0[index].values.push(PropertyValue {
            val: value.to_owned(),
            val_label: display.unwrap_or(value).to_owned(),
        });
    }
}
