// Async HTTP client for the Nominatim (OpenStreetMap) geocoding API.
//
// No authentication; the usage policy requires an identifying user agent,
// which `TransportConfig` supplies.

use tracing::debug;
use url::Url;

use crate::electricity_maps::{normalize_base_url, preview};
use crate::error::Error;
use crate::models::Place;
use crate::transport::TransportConfig;

const SERVICE: &str = "Nominatim";

/// Public endpoint of the OpenStreetMap Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Async client for free-form city/country geocoding.
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NominatimClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Geocode a city, optionally narrowed to a country.
    ///
    /// `GET /search?city=..&country=..&format=json`. An empty result set is
    /// returned as an empty `Vec`; deciding whether that is fatal belongs
    /// to the caller.
    pub async fn search(&self, city: &str, country: Option<&str>) -> Result<Vec<Place>, Error> {
        let url = self.base_url.join("search")?;
        debug!(city, ?country, "geocoding");

        let mut params = vec![("city", city), ("format", "json")];
        if let Some(country) = country {
            params.push(("country", country));
        }

        let resp = self.http.get(url).query(&params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

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

    /// Whether the service answers its status endpoint with a success status.
    ///
    /// `GET /status`
    pub async fn status(&self) -> Result<bool, Error> {
        let url = self.base_url.join("status")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }
}
