// ── Core error types ──
//
// User-facing errors from greenstream-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The upstream adapters translate transport-layer errors into the
// variant that matches the collaborator that failed.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Which enumerated request parameter was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterKind {
    Resolution,
    Device,
    Connection,
    Provider,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    #[error("Unknown {kind}: {value}")]
    UnknownParameter { kind: ParameterKind, value: String },

    #[error("Viewing window starts at {start}, before the current forecast hour {floor}")]
    StaleWindow {
        start: DateTime<Utc>,
        floor: DateTime<Utc>,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("Carbon-intensity forecast unavailable for {zone}: {reason}")]
    ForecastUnavailable { zone: String, reason: String },

    #[error("Location not recognized: {location} ({reason})")]
    ZoneUnresolved { location: String, reason: String },

    // ── Policy errors ────────────────────────────────────────────────
    #[error("Caller '{caller}' is not allowed to {action}")]
    Forbidden { caller: String, action: String },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("History store error: {message}")]
    History { message: String },

    #[error("Server catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn forecast_unavailable(zone: impl Into<String>, reason: impl ToString) -> Self {
        Self::ForecastUnavailable {
            zone: zone.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn zone_unresolved(location: impl ToString, reason: impl ToString) -> Self {
        Self::ZoneUnresolved {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if the caller's input caused this error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::StaleWindow { .. }
                | Self::InvalidRequest { .. }
                | Self::ZoneUnresolved { .. }
        )
    }

    /// Returns `true` if an upstream dependency caused this error.
    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Self::ForecastUnavailable { .. })
    }
}
