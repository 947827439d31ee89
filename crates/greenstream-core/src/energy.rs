// ── Energy model ──
//
// Pure function of a viewing request and the parameter tables.

use serde::Serialize;

use crate::error::CoreError;
use crate::model::ViewingRequest;
use crate::params::ParameterTables;

pub const FRAMES_PER_SECOND: f64 = 25.0;
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Energy needed to stream one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    /// Bytes transferred for the whole playback.
    pub bytes: f64,
    /// Energy in kWh.
    pub kwh: f64,
}

/// Estimate the energy of `request` from `tables`.
///
/// `bytes = pixels * fps * 60 * minutes` and
/// `kwh = minutes * device_power + bytes * (connection + datacenter)`.
pub fn estimate_energy(
    request: &ViewingRequest,
    tables: &ParameterTables,
) -> Result<EnergyEstimate, CoreError> {
    let pixels = tables.resolution(request.resolution())?.pixels();
    let power = tables.device_power(request.device())?;
    let per_byte = tables.connection_energy(request.connection())?;

    let minutes = f64::from(request.duration_minutes());
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let pixels = pixels as f64;

    let bytes = pixels * FRAMES_PER_SECOND * SECONDS_PER_MINUTE * minutes;
    let kwh = minutes * power + bytes * (per_byte + tables.datacenter_energy);

    Ok(EnergyEstimate { bytes, kwh })
}
