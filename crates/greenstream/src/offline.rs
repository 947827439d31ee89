//! Collaborators for commands answered from the catalog and history alone.
//!
//! `servers list` and `history *` must work without an Electricity Maps
//! token, so the service is built with this stand-in instead of the
//! network-backed adapters. It is never asked to resolve anything on
//! those paths; if it is, it fails the way a dead upstream would.

use greenstream_core::{CoreError, ForecastCurve, ForecastProvider, GeographicZone, ZoneResolver};

const REASON: &str = "upstream services are not configured for this command";

#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl ZoneResolver for Offline {
    async fn resolve(&self, zone: &GeographicZone) -> Result<String, CoreError> {
        Err(CoreError::ZoneUnresolved {
            location: zone.to_string(),
            reason: REASON.into(),
        })
    }

    async fn available(&self) -> bool {
        false
    }
}

impl ForecastProvider for Offline {
    async fn forecast(&self, zone_code: &str) -> Result<ForecastCurve, CoreError> {
        Err(CoreError::ForecastUnavailable {
            zone: zone_code.into(),
            reason: REASON.into(),
        })
    }

    async fn available(&self) -> bool {
        false
    }
}
