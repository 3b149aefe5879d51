use crate::vocab::{compact_iri, dcat, dct, obo, rdf, vcard};
use crate::{normalize_type_label, Entity};
use oxrdf::NamedNodeRef;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The facet counts of a search, one ordered list per dimension.
pub type Facets = BTreeMap<FacetDimension, Vec<FacetCount>>;

/// A named axis along which entities can be filtered and counted.
///
/// The set of dimensions is closed. Their names are case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetDimension {
    Publisher,
    Country,
    Type,
    ContactPoint,
    ContainsProcess,
}

impl FacetDimension {
    /// All dimensions, in the order in which they are computed and rendered.
    pub const ALL: [FacetDimension; 5] = [
        FacetDimension::Publisher,
        FacetDimension::Country,
        FacetDimension::Type,
        FacetDimension::ContactPoint,
        FacetDimension::ContainsProcess,
    ];

    /// Returns the display name of the dimension. This is also the key used in filter input.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks up a dimension by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        DIMENSIONS
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.dimension)
    }

    /// Returns the table entry of this dimension.
    pub fn descriptor(self) -> &'static DimensionDescriptor {
        &DIMENSIONS[self as usize]
    }

    /// Extracts the values `entity` contributes to this dimension.
    pub fn extract(self, entity: &Entity) -> Vec<FacetValue> {
        (self.descriptor().extract)(entity)
    }
}

impl Display for FacetDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown facet dimension '{0}'")]
pub struct UnknownDimensionError(String);

impl FromStr for FacetDimension {
    type Err = UnknownDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownDimensionError(s.to_owned()))
    }
}

impl Serialize for FacetDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// How the values of a dimension are written into a generated query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// The values are IRIs of linked resources.
    Resource,
    /// The values are plain string literals.
    Literal,
}

/// Which part of a [FacetValue] identifies it when filtering and counting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacetKeying {
    /// Values are identified by their display label.
    #[default]
    Label,
    /// Values are identified by the linked resource, if there is one.
    Resource,
}

/// A single value an entity contributes to a dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetValue {
    /// The display form.
    pub label: String,
    /// The identifier of the resource the value was taken from, if any.
    pub resource: Option<String>,
}

impl FacetValue {
    fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            resource: None,
        }
    }

    fn linked(label: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            resource: Some(resource.into()),
        }
    }

    /// Returns the string that identifies this value under the given `keying`.
    pub fn key(&self, keying: FacetKeying) -> &str {
        match keying {
            FacetKeying::Label => &self.label,
            FacetKeying::Resource => self.resource.as_deref().unwrap_or(&self.label),
        }
    }
}

/// One entry of a facet: how many entities of the current result contribute `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub label: String,
    pub value: String,
    pub count: usize,
}

/// Describes how a [FacetDimension] is evaluated in memory and in a generated query.
pub struct DimensionDescriptor {
    pub dimension: FacetDimension,
    pub name: &'static str,
    pub extract: fn(&Entity) -> Vec<FacetValue>,
    /// The property path from the entity to the value. The last element is the property
    /// identifier of the dimension.
    pub path: &'static [NamedNodeRef<'static>],
    pub value_kind: ValueKind,
}

impl DimensionDescriptor {
    /// Returns the property identifier of the dimension.
    pub fn property(&self) -> NamedNodeRef<'static> {
        match self.path.last() {
            Some(property) => *property,
            None => rdf::TYPE,
        }
    }
}

/// Adding a dimension only requires a new enum variant and a new entry here.
/// Entries are in declaration order of [FacetDimension].
static DIMENSIONS: [DimensionDescriptor; 5] = [
    DimensionDescriptor {
        dimension: FacetDimension::Publisher,
        name: "Publisher",
        extract: extract_publisher,
        path: &[dct::PUBLISHER],
        value_kind: ValueKind::Resource,
    },
    DimensionDescriptor {
        dimension: FacetDimension::Country,
        name: "Country",
        extract: extract_country,
        path: &[dct::PUBLISHER, vcard::COUNTRY_NAME],
        value_kind: ValueKind::Literal,
    },
    DimensionDescriptor {
        dimension: FacetDimension::Type,
        name: "Type",
        extract: extract_type,
        path: &[rdf::TYPE],
        value_kind: ValueKind::Resource,
    },
    DimensionDescriptor {
        dimension: FacetDimension::ContactPoint,
        name: "Contact Point",
        extract: extract_contact_points,
        path: &[dcat::CONTACT_POINT],
        value_kind: ValueKind::Resource,
    },
    DimensionDescriptor {
        dimension: FacetDimension::ContainsProcess,
        name: "Contains Process",
        extract: extract_processes,
        path: &[obo::CONTAINS_PROCESS],
        value_kind: ValueKind::Resource,
    },
];

fn extract_publisher(entity: &Entity) -> Vec<FacetValue> {
    entity
        .publisher
        .iter()
        .filter_map(|p| Some(FacetValue::linked(p.name.as_deref()?, &p.id)))
        .collect()
}

fn extract_country(entity: &Entity) -> Vec<FacetValue> {
    entity
        .publisher
        .iter()
        .filter_map(|p| p.country_name.as_deref())
        .map(FacetValue::labelled)
        .collect()
}

fn extract_type(entity: &Entity) -> Vec<FacetValue> {
    entity
        .primary_type()
        .map(|t| FacetValue::linked(normalize_type_label(&compact_iri(t)), t))
        .into_iter()
        .collect()
}

fn extract_contact_points(entity: &Entity) -> Vec<FacetValue> {
    entity
        .contact_point
        .iter()
        .filter_map(|c| Some(FacetValue::linked(c.full_name.as_deref()?, &c.id)))
        .collect()
}

fn extract_processes(entity: &Entity) -> Vec<FacetValue> {
    entity
        .contains_process
        .iter()
        .map(|p| FacetValue::linked(p.display_label(), &p.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Contact, Organization, Process};

    fn service() -> Entity {
        let mut entity = Entity::new("http://example.org/s1", ["dcat:DataService"]);
        entity.publisher = Some(Organization {
            id: "http://org/A".to_owned(),
            types: Vec::new(),
            name: Some("Org A".to_owned()),
            country_name: Some("USA".to_owned()),
        });
        entity.contact_point = vec![
            Contact {
                id: "http://contact/1".to_owned(),
                types: Vec::new(),
                full_name: Some("Jane Doe".to_owned()),
                email: None,
                url: None,
            },
            Contact {
                id: "http://contact/2".to_owned(),
                types: Vec::new(),
                full_name: None,
                email: None,
                url: None,
            },
        ];
        entity.contains_process = vec![
            Process {
                id: "http://cpp/1".to_owned(),
                types: Vec::new(),
                title: "Validate".to_owned(),
                label: Some("P1".to_owned()),
                page: None,
            },
            Process {
                id: "http://cpp/2".to_owned(),
                types: Vec::new(),
                title: "Validate".to_owned(),
                label: None,
                page: None,
            },
        ];
        entity
    }

    fn labels(dimension: FacetDimension, entity: &Entity) -> Vec<String> {
        dimension
            .extract(entity)
            .into_iter()
            .map(|v| v.label)
            .collect()
    }

    #[test]
    fn test_table_matches_declaration_order() {
        for dimension in FacetDimension::ALL {
            assert_eq!(dimension.descriptor().dimension, dimension);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for dimension in FacetDimension::ALL {
            assert_eq!(FacetDimension::from_name(dimension.name()), Some(dimension));
        }
        assert_eq!(FacetDimension::from_name("publisher"), None);
        assert_eq!(FacetDimension::from_name("Keyword"), None);
    }

    #[test]
    fn test_extract_single_valued() {
        let entity = service();
        assert_eq!(labels(FacetDimension::Publisher, &entity), ["Org A"]);
        assert_eq!(labels(FacetDimension::Country, &entity), ["USA"]);
        assert_eq!(labels(FacetDimension::Type, &entity), ["Data Service"]);
    }

    #[test]
    fn test_extract_multi_valued() {
        let entity = service();
        assert_eq!(labels(FacetDimension::ContactPoint, &entity), ["Jane Doe"]);
        assert_eq!(
            labels(FacetDimension::ContainsProcess, &entity),
            ["P1: Validate", "Validate"]
        );
    }

    #[test]
    fn test_extract_type_from_full_iri() {
        let entity = Entity::new("http://example.org/s3", [dcat::DATA_SERVICE.as_str()]);
        let values = FacetDimension::Type.extract(&entity);
        assert_eq!(values[0].label, "Data Service");
        assert_eq!(values[0].resource.as_deref(), Some(dcat::DATA_SERVICE.as_str()));
    }

    #[test]
    fn test_extract_missing_publisher() {
        let entity = Entity::new("http://example.org/s2", ["dcat:DataService"]);
        assert!(FacetDimension::Publisher.extract(&entity).is_empty());
        assert!(FacetDimension::Country.extract(&entity).is_empty());
    }

    #[test]
    fn test_resource_keying_falls_back_to_label() {
        let entity = service();
        let publisher = &FacetDimension::Publisher.extract(&entity)[0];
        assert_eq!(publisher.key(FacetKeying::Label), "Org A");
        assert_eq!(publisher.key(FacetKeying::Resource), "http://org/A");

        let country = &FacetDimension::Country.extract(&entity)[0];
        assert_eq!(country.key(FacetKeying::Resource), "USA");
    }

    #[test]
    fn test_property_identifier() {
        assert_eq!(
            FacetDimension::Country.descriptor().property(),
            vcard::COUNTRY_NAME
        );
        assert_eq!(FacetDimension::Type.descriptor().property(), rdf::TYPE);
    }
}
