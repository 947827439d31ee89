#![allow(clippy::unwrap_used)]
// Integration tests for `NominatimClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use greenstream_api::{Error, NominatimClient};

async fn setup() -> (MockServer, NominatimClient) {
    let server = MockServer::start().await;
    let client = NominatimClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_search_city_and_country() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("city", "Paris"))
        .and(query_param("country", "France"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "place_id": 88066702,
                "lat": "48.8588897",
                "lon": "2.3200410",
                "display_name": "Paris, Île-de-France, France"
            }
        ])))
        .mount(&server)
        .await;

    let places = client.search("Paris", Some("France")).await.unwrap();

    assert_eq!(places.len(), 1);
    assert!((places[0].lat - 48.858_889_7).abs() < 1e-9);
    assert!((places[0].lon - 2.320_041).abs() < 1e-9);
}

#[tokio::test]
async fn test_search_without_country_omits_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("city", "Marseille"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let places = client.search("Marseille", None).await.unwrap();

    assert!(places.is_empty());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].url.query().unwrap_or_default().contains("country"),
        "country should not be sent"
    );
}

#[tokio::test]
async fn test_search_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client.search("Paris", None).await.unwrap_err();

    assert!(matches!(err, Error::Status { status: 429, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_status_endpoint() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    assert!(client.status().await.unwrap());
}
