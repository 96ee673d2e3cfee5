//! HTTP-level tests for `Client` using wiremock.

use serde_json::json;
use wbi_connectivity::{ApiError, Client, CountriesStore, FetchStatus, StatsSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn country_body() -> serde_json::Value {
    json!([
        {"page":1,"pages":1,"per_page":"300","total":2},
        [
            {"id":"USA","iso2Code":"US","name":"United States",
             "region":{"id":"NAC","iso2code":"XU","value":"North America"},
             "capitalCity":"Washington D.C.","longitude":"-77.032","latitude":"38.8895"},
            {"id":"ZZZ","iso2Code":"ZZ","name":"Aggregates",
             "region":{"id":"NA","iso2code":"NA","value":"Aggregates"},
             "capitalCity":"","longitude":"","latitude":""}
        ]
    ])
}

fn series_entry(date: &str, value: Option<f64>) -> serde_json::Value {
    json!({
        "indicator":{"id":"IT.CEL.SETS.P2","value":"Mobile cellular subscriptions (per 100 people)"},
        "country":{"id":"US","value":"United States"},
        "countryiso3code":"USA",
        "date":date,
        "value":value,
        "unit":"",
        "obs_status":"",
        "decimal":0
    })
}

#[tokio::test]
async fn list_countries_requests_one_large_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country"))
        .and(query_param("format", "json"))
        .and(query_param("per_page", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let countries = client.list_countries().await.unwrap();

    // The client returns raw records; filtering belongs to the store.
    assert_eq!(countries.len(), 2);
}

#[tokio::test]
async fn store_over_http_drops_aggregates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body()))
        .mount(&server)
        .await;

    let store = CountriesStore::new(Client::with_base_url(server.uri()).unwrap());
    store.load_catalog().await.unwrap();

    let catalog = store.catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].id, "USA");
}

#[tokio::test]
async fn indicator_series_passes_max_points() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country/USA/indicator/IT.CEL.SETS.P2"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"page":1,"pages":1,"per_page":5,"total":2},
            [series_entry("2022", Some(110.0)), series_entry("2021", None)]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let points = client
        .indicator_series("USA", "IT.CEL.SETS.P2", 5)
        .await
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, "2022");
    assert_eq!(points[1].value, None);
}

#[tokio::test]
async fn empty_series_decodes_as_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country/TUV/indicator/IT.NET.BBND.P2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"page":0,"pages":0,"per_page":10,"total":0}, null
        ])))
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let points = client
        .indicator_series("TUV", "IT.NET.BBND.P2", 10)
        .await
        .unwrap();
    assert!(points.is_empty());
}

#[tokio::test]
async fn latest_value_uses_most_recent_non_empty_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country/USA/indicator/IT.CEL.SETS.P2"))
        .and(query_param("per_page", "1"))
        .and(query_param("mrnev", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"page":1,"pages":1,"per_page":1,"total":1},
            [series_entry("2022", Some(110.2))]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let value = client.latest_value("USA", "IT.CEL.SETS.P2").await.unwrap();
    assert_eq!(value, Some(110.2));
}

#[tokio::test]
async fn non_success_status_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let err = client.list_countries().await.unwrap_err();
    match err {
        ApiError::Network { message, .. } => assert!(message.contains("503"), "{}", message),
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_request_is_made_once_and_surfaces_in_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = CountriesStore::new(Client::with_base_url(server.uri()).unwrap());
    assert!(store.load_catalog().await.is_err());
    assert!(matches!(store.get_state().status, FetchStatus::Error(_)));
    assert!(store.catalog().is_empty());
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Nothing listens on the discard port.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client.list_countries().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }), "{:?}", err);
}

#[tokio::test]
async fn html_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = Client::with_base_url(server.uri()).unwrap();
    let err = client.list_countries().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "{:?}", err);
}
