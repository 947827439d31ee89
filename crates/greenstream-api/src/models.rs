// Wire types for the upstream services.
//
// Field names follow the upstream JSON; domain code never sees these
// directly -- `greenstream-core` converts them into its own model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Nominatim ────────────────────────────────────────────────────────

/// A single geocoding hit from `GET /search?format=json`.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<u64>,
    #[serde(deserialize_with = "f64_from_str_or_number")]
    pub lat: f64,
    #[serde(deserialize_with = "f64_from_str_or_number")]
    pub lon: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

fn f64_from_str_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ── Electricity Maps ─────────────────────────────────────────────────

/// Response of `GET /v3/carbon-intensity/latest?lat=..&lon=..`.
///
/// Only the zone is consumed; the latest intensity is kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResponse {
    pub zone: String,
    #[serde(default)]
    pub carbon_intensity: Option<f64>,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
}

/// Response of `GET /v3/carbon-intensity/forecast?zone=..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    #[serde(default)]
    pub zone: Option<String>,
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One hourly forecast point (gCO2eq/kWh).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub carbon_intensity: f64,
    pub datetime: DateTime<Utc>,
}

/// Electricity Maps reports failures as `{"error": "..."}`, sometimes with HTTP 200.
#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamError {
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpstreamError {
    pub(crate) fn message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(match error {
            serde_json::Value::String(s) => s.clone(),
            other => self.message.clone().unwrap_or_else(|| other.to_string()),
        })
    }
}
