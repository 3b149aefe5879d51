use serde::{Deserialize, Deserializer, Serialize};

/// A record of the registry, usually a data service or a catalog.
///
/// Entities are read from a JSON-LD style document or assembled from the solutions of a SPARQL
/// query. Once built they are never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// The stable identifier (usually an IRI).
    #[serde(alias = "@id")]
    pub id: String,
    /// The type labels. Either prefixed names (`dcat:DataService`) or full IRIs.
    #[serde(rename = "type", alias = "@type", deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "endpointURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub documentation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Organization>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact_point: Vec<Contact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains_process: Vec<Process>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theme: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyword: Vec<String>,
}

impl Entity {
    /// Creates an entity that only has an identifier and the given types.
    pub fn new(id: impl Into<String>, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            types: types.into_iter().map(Into::into).collect(),
            title: None,
            description: None,
            endpoint_url: None,
            landing_page: None,
            documentation: Vec::new(),
            publisher: None,
            contact_point: Vec::new(),
            contains_process: Vec::new(),
            theme: Vec::new(),
            keyword: Vec::new(),
        }
    }

    /// Returns the first type label, which is the one used for display and faceting.
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Returns whether any type label contains one of the given `markers`.
    pub fn has_type_marker(&self, markers: &[impl AsRef<str>]) -> bool {
        self.types
            .iter()
            .any(|t| markers.iter().any(|m| t.contains(m.as_ref())))
    }
}

/// The organization that publishes an [`Entity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(alias = "@id")]
    pub id: String,
    #[serde(
        default,
        rename = "type",
        alias = "@type",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

/// A contact point of an [`Entity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(alias = "@id")]
    pub id: String,
    #[serde(
        default,
        rename = "type",
        alias = "@type",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    /// The formatted name (`vcard:fn`).
    #[serde(default, rename = "fn", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Usually a `mailto:` IRI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "hasURL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A sub-process contained in a data service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(alias = "@id")]
    pub id: String,
    #[serde(
        default,
        rename = "type",
        alias = "@type",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    pub title: String,
    /// An optional short label, e.g. `P1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// An explicit page describing the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl Process {
    /// Returns `"{label}: {title}"` if the process has a short label, otherwise the title.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}: {}", self.title),
            None => self.title.clone(),
        }
    }

    /// Returns the page of the process, falling back to its identifier.
    pub fn link(&self) -> &str {
        self.page.as_deref().unwrap_or(&self.id)
    }
}

/// Accepts either a single string or a list of strings.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
