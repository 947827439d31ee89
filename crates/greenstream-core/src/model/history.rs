// ── Footprint history ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::viewing::{ConnectionType, DeviceClass, Resolution, ViewingRequest};

/// One computed footprint, as recorded for its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub caller: String,
    pub requested_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub start: DateTime<Utc>,
    pub resolution: Resolution,
    pub device: DeviceClass,
    pub connection: ConnectionType,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// gCO2eq, rounded to one decimal.
    pub footprint: f64,
}

impl HistoryEntry {
    pub fn new(
        caller: impl Into<String>,
        request: &ViewingRequest,
        start: DateTime<Utc>,
        requested_at: DateTime<Utc>,
        footprint: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            caller: caller.into(),
            requested_at,
            duration_minutes: request.duration_minutes(),
            start,
            resolution: request.resolution(),
            device: request.device(),
            connection: request.connection(),
            city: request.zone().city().to_owned(),
            country: request.zone().country().map(str::to_owned),
            footprint,
        }
    }
}

/// Which callers' history an operation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every caller.
    All,
    /// A single caller.
    Caller(String),
}

impl Scope {
    pub fn includes(&self, caller: &str) -> bool {
        match self {
            Self::All => true,
            Self::Caller(id) => id == caller,
        }
    }
}

/// Arithmetic mean of `footprints`, `0.0` when empty.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn average(footprints: &[f64]) -> f64 {
    if footprints.is_empty() {
        return 0.0;
    }
    total(footprints) / footprints.len() as f64
}

/// Sum of `footprints`, `0.0` when empty.
pub fn total(footprints: &[f64]) -> f64 {
    footprints.iter().sum()
}
