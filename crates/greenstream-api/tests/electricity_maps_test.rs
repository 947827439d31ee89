#![allow(clippy::unwrap_used)]
// Integration tests for `ElectricityMapsClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use greenstream_api::{ElectricityMapsClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ElectricityMapsClient) {
    let server = MockServer::start().await;
    let token = SecretString::from("test-token".to_string());
    let client =
        ElectricityMapsClient::new(&server.uri(), &token, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Zone lookup ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_zone_at_sends_coordinates_and_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/latest"))
        .and(query_param("lat", "48.8566"))
        .and(query_param("lon", "2.3522"))
        .and(header("auth-token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zone": "FR",
            "carbonIntensity": 42,
            "datetime": "2024-06-15T10:00:00.000Z"
        })))
        .mount(&server)
        .await;

    let zone = client.zone_at(48.8566, 2.3522).await.unwrap();

    assert_eq!(zone.zone, "FR");
    assert_eq!(zone.carbon_intensity, Some(42.0));
}

#[tokio::test]
async fn test_zone_at_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/latest"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.zone_at(0.0, 0.0).await;

    assert!(
        matches!(result, Err(Error::Unauthorized { .. })),
        "expected Unauthorized error, got: {result:?}"
    );
}

// ── Forecast ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_forecast_parses_points() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/forecast"))
        .and(query_param("zone", "FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zone": "FR",
            "forecast": [
                { "carbonIntensity": 100, "datetime": "2024-06-15T10:00:00.000Z" },
                { "carbonIntensity": 50.5, "datetime": "2024-06-15T11:00:00.000Z" }
            ],
            "updatedAt": "2024-06-15T09:45:00.000Z"
        })))
        .mount(&server)
        .await;

    let forecast = client.forecast("FR").await.unwrap();

    assert_eq!(forecast.zone.as_deref(), Some("FR"));
    assert_eq!(forecast.forecast.len(), 2);
    assert!((forecast.forecast[0].carbon_intensity - 100.0).abs() < f64::EPSILON);
    assert!((forecast.forecast[1].carbon_intensity - 50.5).abs() < f64::EPSILON);
    assert_eq!(
        forecast.forecast[1].datetime.to_rfc3339(),
        "2024-06-15T11:00:00+00:00"
    );
}

#[tokio::test]
async fn test_forecast_error_payload_with_http_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Zone 'XX' does not exist" })),
        )
        .mount(&server)
        .await;

    let result = client.forecast("XX").await;

    match result {
        Err(Error::Upstream { message, .. }) => assert!(message.contains("XX")),
        other => panic!("expected Upstream error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_forecast_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.forecast("FR").await.unwrap_err();

    assert!(matches!(err, Error::Status { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_forecast_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.forecast("FR").await;

    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert!(client.health().await.unwrap());
}

#[tokio::test]
async fn test_health_down() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert!(!client.health().await.unwrap());
}
