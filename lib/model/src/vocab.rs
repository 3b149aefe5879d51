//! IRIs of the vocabularies used to describe registered data services.

use std::borrow::Cow;

pub mod dcat {
    //! [DCAT](https://www.w3.org/TR/vocab-dcat-3/) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const CATALOG: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Catalog");
    pub const CONTACT_POINT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#contactPoint");
    pub const DATA_SERVICE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#DataService");
    pub const ENDPOINT_URL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#endpointURL");
    pub const LANDING_PAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#landingPage");
}

pub mod dct {
    //! [Dublin Core terms](https://www.dublincore.org/specifications/dublin-core/dcmi-terms/).
    use oxrdf::NamedNodeRef;

    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
    pub const PUBLISHER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/publisher");
    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
}

pub mod foaf {
    use oxrdf::NamedNodeRef;

    pub const NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");
    pub const PAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/page");
}

pub mod obo {
    use oxrdf::NamedNodeRef;

    /// `BFO_0000067`, "occurs in". Links a data service to the processes it contains.
    pub const CONTAINS_PROCESS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.obolibrary.org/obo/BFO_0000067");
}

pub mod skos {
    use oxrdf::NamedNodeRef;

    pub const NOTATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#notation");
}

pub mod vcard {
    //! [vCard ontology](https://www.w3.org/TR/vcard-rdf/).
    use oxrdf::NamedNodeRef;

    pub const COUNTRY_NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2006/vcard/ns#country-name");
    pub const FN: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2006/vcard/ns#fn");
    pub const HAS_EMAIL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2006/vcard/ns#hasEmail");
}

pub use oxrdf::vocab::rdf;

/// Namespace prefixes used in the entity documents, in the order they are tried.
pub const PREFIXES: [(&str, &str); 8] = [
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("dct", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("obo", "http://purl.obolibrary.org/obo/"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Shortens `iri` to a prefixed name (`dcat:DataService`) if it is in one of the [PREFIXES]
/// namespaces. Other strings are returned as they are.
pub fn compact_iri(iri: &str) -> Cow<'_, str> {
    PREFIXES
        .iter()
        .find_map(|(prefix, namespace)| {
            let local = iri.strip_prefix(namespace)?;
            (!local.is_empty()).then(|| Cow::Owned(format!("{prefix}:{local}")))
        })
        .unwrap_or(Cow::Borrowed(iri))
}
