use registry_common::error::QueryBuildError;
use registry_model::{FacetDimension, FilterSelection};
use registry_sparql::{build_query, QueryTemplate, FILTER_MARKER};

const TEMPLATE: &str = "PREFIX dcat: <http://www.w3.org/ns/dcat#>
SELECT ?service ?title
WHERE {
    ?service a dcat:DataService .
# PLACEHOLDER: Dynamic filters will be injected here
    OPTIONAL { ?service <http://purl.org/dc/terms/title> ?title }
}
";

#[test]
fn test_publisher_selection() {
    let selection =
        FilterSelection::new().with(FacetDimension::Publisher, ["http://org/A", "http://org/B"]);
    let query = build_query(TEMPLATE, &selection).unwrap();

    insta::assert_snapshot!(query, @r"
    PREFIX dcat: <http://www.w3.org/ns/dcat#>
    SELECT ?service ?title
    WHERE {
        ?service a dcat:DataService .

        # Filter by Publisher
        ?service <http://purl.org/dc/terms/publisher> ?filterVal_http___purl_org_dc_terms_publisher .
        FILTER(?filterVal_http___purl_org_dc_terms_publisher IN (<http://org/A>, <http://org/B>))
        OPTIONAL { ?service <http://purl.org/dc/terms/title> ?title }
    }
    ");
    assert_eq!(query.matches("# Filter by").count(), 1);
    assert_eq!(query.matches("FILTER(").count(), 1);
}

#[test]
fn test_clauses_per_dimension_are_conjoined() {
    let selection = FilterSelection::new()
        .with(FacetDimension::Country, ["UK", "USA"])
        .with(FacetDimension::ContainsProcess, ["http://cpp/validate"]);
    let query = build_query(TEMPLATE, &selection).unwrap();

    insta::assert_snapshot!(query, @r#"
    PREFIX dcat: <http://www.w3.org/ns/dcat#>
    SELECT ?service ?title
    WHERE {
        ?service a dcat:DataService .

        # Filter by Country
        ?service <http://purl.org/dc/terms/publisher>/<http://www.w3.org/2006/vcard/ns#country-name> ?filterVal_http___www_w3_org_2006_vcard_ns_country_name .
        FILTER(?filterVal_http___www_w3_org_2006_vcard_ns_country_name IN ("UK", "USA"))

        # Filter by Contains Process
        ?service <http://purl.obolibrary.org/obo/BFO_0000067> ?filterVal_http___purl_obolibrary_org_obo_BFO_0000067 .
        FILTER(?filterVal_http___purl_obolibrary_org_obo_BFO_0000067 IN (<http://cpp/validate>))
        OPTIONAL { ?service <http://purl.org/dc/terms/title> ?title }
    }
    "#);
}

#[test]
fn test_empty_selection_only_removes_marker() {
    let query = build_query(TEMPLATE, &FilterSelection::new()).unwrap();
    assert_eq!(query, TEMPLATE.replacen(FILTER_MARKER, "", 1));

    let (before, after) = TEMPLATE.split_once(FILTER_MARKER).unwrap();
    assert_eq!(query, format!("{before}{after}"));
}

#[test]
fn test_empty_value_sets_generate_nothing() {
    let selection = FilterSelection::new().with(FacetDimension::Publisher, Vec::<String>::new());
    let query = build_query(TEMPLATE, &selection).unwrap();
    assert_eq!(query, build_query(TEMPLATE, &FilterSelection::new()).unwrap());
}

#[test]
fn test_template_without_marker() {
    let result = build_query("SELECT * WHERE { ?s ?p ?o }", &FilterSelection::new());
    assert!(matches!(result, Err(QueryBuildError::MissingMarker)));
}

#[test]
fn test_injection_through_resource_value_is_rejected() {
    let selection = FilterSelection::new().with(
        FacetDimension::Publisher,
        ["http://org/A>)) } DELETE WHERE { ?s ?p ?o } #"],
    );
    let result = build_query(TEMPLATE, &selection);
    assert!(matches!(
        result,
        Err(QueryBuildError::InvalidResourceValue { .. })
    ));
}

#[test]
fn test_label_is_not_a_resource_value() {
    let selection = FilterSelection::new().with(FacetDimension::Publisher, ["Org A"]);
    let error = build_query(TEMPLATE, &selection).unwrap_err();
    assert!(error.to_string().contains("'Org A'"));
}

#[test]
fn test_embedded_template_with_all_dimensions() {
    let selection = FilterSelection::new()
        .with(FacetDimension::Publisher, ["http://org/A-us"])
        .with(FacetDimension::Country, ["USA"])
        .with(FacetDimension::Type, ["http://www.w3.org/ns/dcat#DataService"])
        .with(FacetDimension::ContactPoint, ["http://contact/jane"])
        .with(FacetDimension::ContainsProcess, ["http://cpp/validate"]);

    let query = QueryTemplate::dataservice_details().build(&selection).unwrap();
    assert_eq!(query.matches("# Filter by").count(), 5);
    assert!(!query.contains(FILTER_MARKER));
}
