// ── GreenStream service facade ──
//
// Wires the collaborators together. Footprint and server-offer operations
// live in `footprint.rs` and `offer.rs`; this file holds construction,
// health and the history/catalog reads.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::auth::{Action, Caller, authorize};
use crate::catalog::ServerCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::error::CoreError;
use crate::model::{CloudServer, HistoryEntry, Provider, history};
use crate::ports::{ForecastProvider, HistoryStore, ZoneResolver};

/// Entry point for every computation.
///
/// Generic over its collaborators so tests can run it against in-memory
/// resolvers, forecasts and stores.
pub struct GreenStream<Z, F, H> {
    pub(crate) resolver: Z,
    pub(crate) forecasts: F,
    pub(crate) history: H,
    pub(crate) catalog: ServerCatalog,
    pub(crate) config: ServiceConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

/// Reachability of the upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamHealth {
    pub forecast: bool,
    pub geocoding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthMode {
    Ok,
    Degraded,
}

impl UpstreamHealth {
    pub fn mode(&self) -> HealthMode {
        if self.forecast && self.geocoding {
            HealthMode::Ok
        } else {
            HealthMode::Degraded
        }
    }

    /// Operations usable in the current mode. Degraded mode keeps only
    /// those served from the catalog and history.
    pub fn available_operations(&self) -> Vec<Action> {
        let mut ops = vec![
            Action::ListServers,
            Action::ViewHistory,
            Action::ClearHistory,
            Action::FootprintStats,
        ];
        if self.mode() == HealthMode::Ok {
            ops.extend([
                Action::ComputeFootprint,
                Action::EligibleServers,
                Action::RankServers,
            ]);
        }
        ops
    }
}

impl<Z, F, H> GreenStream<Z, F, H>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    pub fn new(
        resolver: Z,
        forecasts: F,
        history: H,
        catalog: ServerCatalog,
        config: ServiceConfig,
    ) -> Self {
        Self {
            resolver,
            forecasts,
            history,
            catalog,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, typically with a `FixedClock` in tests.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ServerCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &Z {
        &self.resolver
    }

    pub fn forecasts(&self) -> &F {
        &self.forecasts
    }

    pub fn history_store(&self) -> &H {
        &self.history
    }

    pub(crate) fn providers_or_default(&self, providers: &[Provider]) -> Vec<Provider> {
        if providers.is_empty() {
            self.config.default_providers.clone()
        } else {
            providers.to_vec()
        }
    }

    // ── Health ───────────────────────────────────────────────────────

    /// Probe both upstream services concurrently.
    pub async fn health(&self) -> UpstreamHealth {
        let (forecast, geocoding) =
            futures_util::join!(self.forecasts.available(), self.resolver.available());
        let health = UpstreamHealth {
            forecast,
            geocoding,
        };
        info!(forecast, geocoding, mode = %health.mode(), "upstream health");
        health
    }

    // ── Catalog ──────────────────────────────────────────────────────

    /// Catalog servers of `providers` (all defaults when empty).
    pub fn list_servers(
        &self,
        caller: &Caller,
        providers: &[Provider],
    ) -> Result<Vec<CloudServer>, CoreError> {
        authorize(caller, Action::ListServers)?;
        Ok(self.catalog.servers(&self.providers_or_default(providers)))
    }

    // ── History ──────────────────────────────────────────────────────

    pub fn history(&self, caller: &Caller) -> Result<Vec<HistoryEntry>, CoreError> {
        let scope = authorize(caller, Action::ViewHistory)?;
        self.history.entries(&scope)
    }

    /// Remove the caller's entries (every entry for an admin).
    pub fn clear_history(&self, caller: &Caller) -> Result<usize, CoreError> {
        let scope = authorize(caller, Action::ClearHistory)?;
        let removed = self.history.clear(&scope)?;
        info!(caller = %caller, removed, "history cleared");
        Ok(removed)
    }

    /// Mean recorded footprint, `0.0` with no history.
    pub fn average_footprint(&self, caller: &Caller) -> Result<f64, CoreError> {
        let scope = authorize(caller, Action::FootprintStats)?;
        Ok(history::average(&self.history.footprints(&scope)?))
    }

    /// Sum of recorded footprints, `0.0` with no history.
    pub fn total_footprint(&self, caller: &Caller) -> Result<f64, CoreError> {
        let scope = authorize(caller, Action::FootprintStats)?;
        Ok(history::total(&self.history.footprints(&scope)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_mode_keeps_catalog_and_history() {
        let health = UpstreamHealth {
            forecast: false,
            geocoding: true,
        };
        assert_eq!(health.mode(), HealthMode::Degraded);
        let ops = health.available_operations();
        assert!(ops.contains(&Action::ListServers));
        assert!(ops.contains(&Action::ViewHistory));
        assert!(!ops.contains(&Action::ComputeFootprint));
        assert!(!ops.contains(&Action::RankServers));
    }

    #[test]
    fn ok_mode_allows_everything() {
        let health = UpstreamHealth {
            forecast: true,
            geocoding: true,
        };
        assert_eq!(health.mode(), HealthMode::Ok);
        assert_eq!(health.available_operations().len(), 7);
    }
}
