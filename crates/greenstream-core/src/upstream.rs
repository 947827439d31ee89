// ── Upstream-backed collaborators ──
//
// Bind `ZoneResolver` and `ForecastProvider` to the Nominatim and
// Electricity Maps clients. API errors are translated here, explicitly,
// into the core variant of the collaborator that failed.

use std::sync::Arc;

use greenstream_api::{ElectricityMapsClient, NominatimClient};
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::error::CoreError;
use crate::model::{ForecastCurve, ForecastSample, GeographicZone, floor_hour};
use crate::ports::{ForecastProvider, ZoneResolver};

/// Geocode with Nominatim, then ask Electricity Maps which zone covers
/// the first hit.
#[derive(Clone)]
pub struct UpstreamZoneResolver {
    geocoder: Arc<NominatimClient>,
    zones: Arc<ElectricityMapsClient>,
}

impl UpstreamZoneResolver {
    pub fn new(geocoder: Arc<NominatimClient>, zones: Arc<ElectricityMapsClient>) -> Self {
        Self { geocoder, zones }
    }
}

impl ZoneResolver for UpstreamZoneResolver {
    async fn resolve(&self, zone: &GeographicZone) -> Result<String, CoreError> {
        let places = self
            .geocoder
            .search(zone.city(), zone.country())
            .await
            .map_err(|e| CoreError::zone_unresolved(zone, e))?;
        let Some(place) = places.first() else {
            return Err(CoreError::zone_unresolved(zone, "no geocoding match"));
        };
        debug!(%zone, lat = place.lat, lon = place.lon, "geocoded");

        let found = self
            .zones
            .zone_at(place.lat, place.lon)
            .await
            .map_err(|e| CoreError::zone_unresolved(zone, e))?;
        debug!(%zone, code = %found.zone, "resolved forecast zone");
        Ok(found.zone)
    }

    async fn available(&self) -> bool {
        self.geocoder.status().await.unwrap_or_else(|e| {
            warn!(error = %e, "geocoding status check failed");
            false
        })
    }
}

/// Hourly forecasts from Electricity Maps.
#[derive(Clone)]
pub struct UpstreamForecastProvider {
    client: Arc<ElectricityMapsClient>,
}

impl UpstreamForecastProvider {
    pub fn new(client: Arc<ElectricityMapsClient>) -> Self {
        Self { client }
    }
}

impl ForecastProvider for UpstreamForecastProvider {
    async fn forecast(&self, zone_code: &str) -> Result<ForecastCurve, CoreError> {
        let response = self
            .client
            .forecast(zone_code)
            .await
            .map_err(|e| CoreError::forecast_unavailable(zone_code, e))?;
        if let Some(p) = response
            .forecast
            .iter()
            .find(|p| p.datetime != floor_hour(p.datetime))
        {
            return Err(CoreError::forecast_unavailable(
                zone_code,
                format!("sample at {} is not on an hour boundary", p.datetime),
            ));
        }
        let samples = response
            .forecast
            .iter()
            .map(|p| ForecastSample::new(p.datetime, p.carbon_intensity))
            .collect();
        let curve = ForecastCurve::new(zone_code, samples)?;
        debug!(zone = zone_code, samples = curve.samples().len(), "fetched forecast");
        Ok(curve)
    }

    async fn available(&self) -> bool {
        self.client.health().await.unwrap_or_else(|e| {
            warn!(error = %e, "forecast health check failed");
            false
        })
    }
}

/// Build both upstream collaborators from one config, sharing the
/// Electricity Maps client.
pub fn connect(
    config: &UpstreamConfig,
) -> Result<(UpstreamZoneResolver, UpstreamForecastProvider), CoreError> {
    let transport = config.transport();
    let setup = |e: greenstream_api::Error| CoreError::Config {
        message: e.to_string(),
    };

    let geocoder = Arc::new(NominatimClient::new(&config.nominatim_url, &transport).map_err(setup)?);
    let electricity = Arc::new(
        ElectricityMapsClient::new(&config.electricity_maps_url, &config.token, &transport)
            .map_err(setup)?,
    );

    Ok((
        UpstreamZoneResolver::new(geocoder, Arc::clone(&electricity)),
        UpstreamForecastProvider::new(electricity),
    ))
}
