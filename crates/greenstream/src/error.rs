//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use greenstream_config::ConfigError;
use greenstream_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const UPSTREAM: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Request ──────────────────────────────────────────────────────

    #[error("Unknown {kind} '{value}'")]
    #[diagnostic(
        code(greenstream::unknown_parameter),
        help("Run: greenstream footprint --help to see accepted {kind} values")
    )]
    UnknownParameter { kind: String, value: String },

    #[error("Window start {start} is before the current forecast hour {floor}")]
    #[diagnostic(
        code(greenstream::stale_window),
        help("Pass a --start at or after {floor}, or omit --start to use the current time.")
    )]
    StaleWindow { start: String, floor: String },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(greenstream::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(greenstream::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Upstream ─────────────────────────────────────────────────────

    #[error("Location '{location}' could not be resolved to a forecast zone")]
    #[diagnostic(
        code(greenstream::zone_unresolved),
        help("Check the spelling of --city, and add --country to disambiguate.\nCause: {reason}")
    )]
    ZoneUnresolved { location: String, reason: String },

    #[error("No carbon-intensity forecast for zone {zone}: {reason}")]
    #[diagnostic(
        code(greenstream::forecast_unavailable),
        help(
            "Forecasts cover roughly the next day. Try a shorter --duration or an \
             earlier --start, and check: greenstream status"
        )
    )]
    ForecastUnavailable { zone: String, reason: String },

    // ── Authorization ────────────────────────────────────────────────

    #[error("No {credential} configured")]
    #[diagnostic(
        code(greenstream::no_credentials),
        help(
            "Store one with: greenstream config set-token\n\
             Or set the ELECTRICITY_MAPS_TOKEN environment variable."
        )
    )]
    NoCredentials { credential: String },

    #[error("Authentication failed: {reason}")]
    #[diagnostic(
        code(greenstream::auth_failed),
        help("Check --admin-token against: greenstream config set-token --admin")
    )]
    AuthFailed { reason: String },

    #[error("No caller given")]
    #[diagnostic(
        code(greenstream::no_caller),
        help("Pass --caller <ID> (and --role provider for server commands), or --admin-token.")
    )]
    NoCaller,

    #[error("{caller} is not allowed to {action}")]
    #[diagnostic(
        code(greenstream::forbidden),
        help(
            "Consumers compute footprints and read their history, providers list and \
             rank servers. Use --role or --admin-token to act in another role."
        )
    )]
    Forbidden { caller: String, action: String },

    // ── Storage / Config ─────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(greenstream::storage))]
    Storage { message: String },

    #[error("{0}")]
    #[diagnostic(
        code(greenstream::config),
        help("Inspect the active configuration with: greenstream config show")
    )]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownParameter { .. }
            | Self::StaleWindow { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoCaller => exit_code::USAGE,
            Self::NoCredentials { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ZoneUnresolved { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::ForecastUnavailable { .. } => exit_code::UPSTREAM,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownParameter { kind, value } => CliError::UnknownParameter {
                kind: kind.to_string(),
                value,
            },

            CoreError::StaleWindow { start, floor } => CliError::StaleWindow {
                start: start.to_rfc3339(),
                floor: floor.to_rfc3339(),
            },

            CoreError::InvalidRequest { message } => CliError::Validation {
                field: "request".into(),
                reason: message,
            },

            CoreError::ForecastUnavailable { zone, reason } => {
                CliError::ForecastUnavailable { zone, reason }
            }

            CoreError::ZoneUnresolved { location, reason } => {
                CliError::ZoneUnresolved { location, reason }
            }

            CoreError::Forbidden { caller, action } => CliError::Forbidden { caller, action },

            CoreError::History { message } | CoreError::Catalog { message } => {
                CliError::Storage { message }
            }

            CoreError::Config { message } => CliError::Config(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { credential } => CliError::NoCredentials { credential },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use greenstream_core::ParameterKind;

    use super::*;

    #[test]
    fn request_errors_are_usage_errors() {
        let err: CliError = CoreError::UnknownParameter {
            kind: ParameterKind::Resolution,
            value: "999p".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Unknown resolution '999p'");

        let at = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        let stale: CliError = CoreError::StaleWindow {
            start: at,
            floor: at,
        }
        .into();
        assert_eq!(stale.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn upstream_and_policy_codes() {
        let forecast: CliError = CoreError::ForecastUnavailable {
            zone: "FR".into(),
            reason: "timeout".into(),
        }
        .into();
        assert_eq!(forecast.exit_code(), exit_code::UPSTREAM);

        let zone: CliError = CoreError::ZoneUnresolved {
            location: "Atlantis".into(),
            reason: "no geocoding match".into(),
        }
        .into();
        assert_eq!(zone.exit_code(), exit_code::NOT_FOUND);

        let forbidden: CliError = CoreError::Forbidden {
            caller: "consumer:alice".into(),
            action: "rank servers".into(),
        }
        .into();
        assert_eq!(forbidden.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err: CliError = ConfigError::NoCredentials {
            credential: "Electricity Maps token".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
