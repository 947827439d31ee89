// ── Collaborator interfaces ──
//
// Everything the core needs from the outside world. Network-backed
// implementations live in `upstream`, stores in `store`; tests supply
// in-memory versions.

use std::future::Future;

use crate::error::CoreError;
use crate::model::{ForecastCurve, GeographicZone, HistoryEntry, Scope};

/// Maps a place to a forecast-zone code.
pub trait ZoneResolver: Send + Sync {
    /// Fails with `ZoneUnresolved` when the place is unknown or lookup fails.
    fn resolve(&self, zone: &GeographicZone) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Whether the backing service currently answers.
    fn available(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }
}

/// Supplies a fresh hourly forecast for a zone code.
pub trait ForecastProvider: Send + Sync {
    /// Fails with `ForecastUnavailable` on lookup failure or error payload.
    fn forecast(&self, zone_code: &str) -> impl Future<Output = Result<ForecastCurve, CoreError>> + Send;

    fn available(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }
}

/// Write side of the footprint history.
pub trait HistorySink: Send + Sync {
    fn record(&self, entry: HistoryEntry) -> Result<(), CoreError>;
}

/// Read and maintenance side of the footprint history.
pub trait HistoryStore: HistorySink {
    /// Entries in `scope`, oldest first.
    fn entries(&self, scope: &Scope) -> Result<Vec<HistoryEntry>, CoreError>;

    /// Recorded footprint values in `scope`.
    fn footprints(&self, scope: &Scope) -> Result<Vec<f64>, CoreError> {
        Ok(self.entries(scope)?.into_iter().map(|e| e.footprint).collect())
    }

    /// Remove every entry in `scope`, returning how many were removed.
    fn clear(&self, scope: &Scope) -> Result<usize, CoreError>;
}
