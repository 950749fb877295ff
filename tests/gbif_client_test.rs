//! GBIF client against a mock server
//!
//! Covers the name match, the regional count, retry on 5xx and the
//! LOOKUP_ERROR degradation.

use serde_json::json;
use species_map_common::StatusClassification;
use species_map_rust::config::GbifConfig;
use species_map_rust::gbif::{fetch_occurrences, GbifClient, OccurrenceQuery, SpeciesLookup};
use species_map_rust::validator::{GbifValidator, SpeciesValidator, ValidatorConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GbifConfig {
    GbifConfig {
        base_url: server.uri(),
        request_delay_ms: 0,
        backoff_base_ms: 1,
        max_retries: 2,
        timeout_seconds: 5,
        ..Default::default()
    }
}

async fn mount_match(server: &MockServer, name: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/species/match"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn accepted(key: u64) -> serde_json::Value {
    json!({
        "usageKey": key,
        "scientificName": "Euterpe oleracea Mart.",
        "rank": "SPECIES",
        "status": "ACCEPTED",
        "matchType": "EXACT",
        "confidence": 99
    })
}

/// Accepted name with regional occurrences
#[tokio::test]
async fn test_validate_present() {
    let server = MockServer::start().await;
    mount_match(&server, "Euterpe oleracea", accepted(2735117)).await;
    Mock::given(method("GET"))
        .and(path("/occurrence/search"))
        .and(query_param("taxonKey", "2735117"))
        .and(query_param("country", "BR"))
        .and(query_param("limit", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0, "limit": 0, "endOfRecords": false, "count": 840, "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let validator = GbifValidator::new(
        client,
        ValidatorConfig {
            region: Some("BR".into()),
            record_limit: 0,
        },
    );
    let result = validator.validate("Euterpe oleracea").await;

    assert_eq!(result.status, StatusClassification::ValidPresent);
    assert_eq!(result.taxon_key, Some(2735117));
    assert_eq!(result.occurrence_count, 840);
}

/// Fuzzy match counts as not found and skips the count query
#[tokio::test]
async fn test_validate_fuzzy_is_not_found() {
    let server = MockServer::start().await;
    mount_match(
        &server,
        "Euterpe olerasea",
        json!({ "usageKey": 2735117, "status": "ACCEPTED", "matchType": "FUZZY", "confidence": 90 }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/occurrence/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let validator = GbifValidator::new(client, ValidatorConfig::default());
    let result = validator.validate("Euterpe olerasea").await;

    assert_eq!(result.status, StatusClassification::NotFound);
    assert_eq!(result.taxon_key, None);
}

/// A 503 is retried and the retry succeeds
#[tokio::test]
async fn test_retry_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/species/match"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_match(&server, "Euterpe oleracea", accepted(2735117)).await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let matched = client.match_name("Euterpe oleracea").await.expect("match");
    assert_eq!(matched.accepted_key(), Some(2735117));
}

/// A 404 is not retried; the validator reports LOOKUP_ERROR
#[tokio::test]
async fn test_client_error_is_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/species/match"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let validator = GbifValidator::new(client, ValidatorConfig::default());
    let result = validator.validate("Inga edulis").await;

    assert_eq!(result.status, StatusClassification::LookupError);
    assert!(result.error_message.as_deref().unwrap_or("").contains("404"));
    assert!(result.label(None).starts_with("API ERROR: "));
}

/// Retries run out on a persistent 500
#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/species/match"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let err = client.match_name("Inga edulis").await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

/// Malformed body is an API parse error, not a transport error
#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/species/match"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let err = client.match_name("Inga edulis").await.unwrap_err();
    assert!(matches!(
        err,
        species_map_rust::error::SpeciesMapError::ApiParse(_)
    ));
}

/// Occurrence paging sends the search filters
#[tokio::test]
async fn test_fetch_occurrences_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/occurrence/search"))
        .and(query_param("taxonKey", "7"))
        .and(query_param("hasCoordinate", "true"))
        .and(query_param("hasGeospatialIssue", "false"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0,
            "limit": 50,
            "endOfRecords": true,
            "count": 2,
            "results": [
                { "key": 1, "decimalLatitude": -1.44, "decimalLongitude": -48.48 },
                { "key": 2, "decimalLatitude": -1.45 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GbifClient::new(&config(&server)).expect("client");
    let query = OccurrenceQuery {
        taxon_key: 7,
        has_coordinate: Some(true),
        has_geospatial_issue: Some(false),
        ..Default::default()
    };
    let points = fetch_occurrences(&client, "Inga edulis", &query, 50).await;

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].species, "Inga edulis");
    assert_eq!(points[0].longitude, -48.48);
}
