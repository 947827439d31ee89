// Async HTTP client for the Electricity Maps API (v3).
//
// Base path: /v3/
// Auth: `auth-token` header

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ForecastResponse, UpstreamError, ZoneResponse};
use crate::transport::TransportConfig;

const SERVICE: &str = "Electricity Maps";

/// Public endpoint of the Electricity Maps API.
pub const DEFAULT_BASE_URL: &str = "https://api.electricitymap.org/";

/// Async client for the Electricity Maps carbon-intensity API.
pub struct ElectricityMapsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ElectricityMapsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an auth token and transport config.
    ///
    /// Injects `auth-token` as a default header on every request.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value =
            HeaderValue::from_str(token.expose_secret()).map_err(|_| Error::Unauthorized {
                service: SERVICE,
            })?;
        value.set_sensitive(true);
        headers.insert("auth-token", value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Find the zone covering a coordinate.
    ///
    /// `GET /v3/carbon-intensity/latest?lat=..&lon=..`
    pub async fn zone_at(&self, lat: f64, lon: f64) -> Result<ZoneResponse, Error> {
        let url = self.url("v3/carbon-intensity/latest")?;
        debug!(lat, lon, "looking up zone");
        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let resp = self.http.get(url).query(&params).send().await?;
        self.handle_response(resp).await
    }

    /// Fetch the hourly carbon-intensity forecast of a zone.
    ///
    /// `GET /v3/carbon-intensity/forecast?zone=..`
    pub async fn forecast(&self, zone: &str) -> Result<ForecastResponse, Error> {
        let url = self.url("v3/carbon-intensity/forecast")?;
        debug!(zone, "fetching forecast");
        let resp = self.http.get(url).query(&[("zone", zone)]).send().await?;
        let forecast: ForecastResponse = self.handle_response(resp).await?;
        trace!(zone, points = forecast.forecast.len(), "forecast received");
        Ok(forecast)
    }

    /// Whether the service answers its health endpoint with a success status.
    ///
    /// `GET /health`
    pub async fn health(&self) -> Result<bool, Error> {
        let url = self.url("health")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }

    // ── Response handling ────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized { service: SERVICE });
        }

        let body = resp.text().await?;

        // The API reports failures as `{"error": ...}`, sometimes with HTTP 200.
        if let Ok(wrapper) = serde_json::from_str::<UpstreamError>(&body) {
            if let Some(message) = wrapper.message() {
                return Err(Error::Upstream {
                    service: SERVICE,
                    message,
                });
            }
        }

        if !status.is_success() {
            return Err(Error::Status {
                service: SERVICE,
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// Ensure the base URL ends with `/` so relative joins keep its path.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub(crate) fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
