// ── Footprint calculation ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{AggregationResult, aggregate, ensure_fresh};
use crate::auth::{Action, Caller, authorize};
use crate::energy::{EnergyEstimate, estimate_energy};
use crate::error::CoreError;
use crate::model::{HistoryEntry, ViewingRequest, floor_minute};
use crate::ports::{ForecastProvider, HistoryStore, ZoneResolver};
use crate::service::GreenStream;

/// A computed footprint and the figures it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintReport {
    /// gCO2eq, rounded to one decimal.
    pub footprint: f64,
    pub zone: String,
    pub start: DateTime<Utc>,
    pub energy: EnergyEstimate,
    pub aggregation: AggregationResult,
}

/// `energy * intensity`, rounded to one decimal.
pub fn footprint_value(energy_kwh: f64, intensity: f64) -> f64 {
    (energy_kwh * intensity * 10.0).round() / 10.0
}

impl<Z, F, H> GreenStream<Z, F, H>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    /// Footprint of one viewing, recorded in the caller's history.
    ///
    /// Parameters are checked before any upstream call. A history write
    /// failure is logged and does not affect the result.
    pub async fn compute_footprint(
        &self,
        caller: &Caller,
        request: &ViewingRequest,
    ) -> Result<FootprintReport, CoreError> {
        authorize(caller, Action::ComputeFootprint)?;
        let energy = estimate_energy(request, &self.config.parameters)?;

        let now = self.clock.now();
        let start = floor_minute(request.start_or(now));
        ensure_fresh(start, now)?;

        let zone = self.resolver.resolve(request.zone()).await?;
        let curve = self.forecasts.forecast(&zone).await?;
        let aggregation = aggregate(start, request.duration(), &curve, now)?;
        let footprint = footprint_value(energy.kwh, aggregation.intensity);

        info!(
            caller = %caller,
            %zone,
            minutes = request.duration_minutes(),
            intensity = aggregation.intensity,
            footprint,
            "footprint computed"
        );

        let entry = HistoryEntry::new(caller.id(), request, start, now, footprint);
        if let Err(err) = self.history.record(entry) {
            warn!(caller = %caller, error = %err, "could not record footprint history");
        }

        Ok(FootprintReport {
            footprint,
            zone,
            start,
            energy,
            aggregation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert!((footprint_value(0.5, 83.333) - 41.7).abs() < 1e-9);
        assert!((footprint_value(2.0, 10.0) - 20.0).abs() < 1e-9);
        assert!(footprint_value(0.0, 500.0).abs() < 1e-9);
    }
}
