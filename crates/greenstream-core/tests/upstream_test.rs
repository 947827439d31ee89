#![allow(clippy::unwrap_used)]
// Upstream-backed collaborators against a wiremock Electricity Maps.

use std::num::NonZeroU32;

use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use greenstream_core::aggregate::aggregate;
use greenstream_core::{CoreError, ForecastProvider, UpstreamConfig, upstream};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
}

async fn serve_forecast(stamps: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    let points: Vec<_> = stamps
        .iter()
        .map(|s| json!({ "carbonIntensity": 10, "datetime": s }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v3/carbon-intensity/forecast"))
        .and(query_param("zone", "FR"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "zone": "FR", "forecast": points })),
        )
        .mount(&server)
        .await;
    server
}

fn provider_for(server: &MockServer) -> impl ForecastProvider {
    let mut config = UpstreamConfig::new(SecretString::from("test-token".to_string()));
    config.electricity_maps_url = server.uri();
    config.nominatim_url = server.uri();
    let (_, forecasts) = upstream::connect(&config).unwrap();
    forecasts
}

#[tokio::test]
async fn test_hourly_forecast_is_aggregated() {
    let server = serve_forecast(&["2026-06-01T10:00:00Z", "2026-06-01T11:00:00Z"]).await;
    let curve = provider_for(&server).forecast("FR").await.unwrap();

    assert_eq!(curve.samples().len(), 2);
    assert_eq!(curve.samples()[0].at, at(10, 0));
    let result = aggregate(at(10, 30), NonZeroU32::new(60).unwrap(), &curve, at(10, 0)).unwrap();
    assert!((result.intensity - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_off_hour_samples_are_unavailable() {
    let server = serve_forecast(&["2026-06-01T10:30:00Z", "2026-06-01T11:30:00Z"]).await;
    let err = provider_for(&server).forecast("FR").await.unwrap_err();

    assert!(matches!(err, CoreError::ForecastUnavailable { ref zone, .. } if zone == "FR"));
}
