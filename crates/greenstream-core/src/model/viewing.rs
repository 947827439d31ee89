// ── Viewing request domain types ──
//
// Everything the energy model needs to know about one video playback.
// Enumerated parameters parse strictly: unknown values are rejected with
// `UnknownParameter`, never defaulted.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::zone::GeographicZone;
use crate::error::{CoreError, ParameterKind};

// ── Resolution ──────────────────────────────────────────────────────

/// Vertical resolution in lines (`720` for 1280x720).
///
/// Any number parses; whether it is a *recognized* resolution is decided
/// by the parameter tables when the energy model runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resolution(u32);

impl Resolution {
    pub const fn new(lines: u32) -> Self {
        Self(lines)
    }

    pub const fn lines(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    /// Accepts `720` and `720p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('p')
            .or_else(|| trimmed.strip_suffix('P'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| unknown(ParameterKind::Resolution, s))
    }
}

// ── Device / connection ─────────────────────────────────────────────

/// Class of the playback device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceClass {
    Computer,
    Mobile,
}

/// How the device reaches the network.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConnectionType {
    Wifi,
    Cellular,
    Cable,
}

/// Parse a device class, mapping failures to `UnknownParameter`.
pub fn parse_device(raw: &str) -> Result<DeviceClass, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| unknown(ParameterKind::Device, raw))
}

/// Parse a connection type, mapping failures to `UnknownParameter`.
pub fn parse_connection(raw: &str) -> Result<ConnectionType, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| unknown(ParameterKind::Connection, raw))
}

pub(crate) fn unknown(kind: ParameterKind, value: &str) -> CoreError {
    CoreError::UnknownParameter {
        kind,
        value: value.to_owned(),
    }
}

// ── ViewingRequest ──────────────────────────────────────────────────

/// One video playback to estimate.
///
/// Immutable once built. `start` left unset means "now", resolved by the
/// service clock when the footprint is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewingRequest {
    duration: NonZeroU32,
    resolution: Resolution,
    device: DeviceClass,
    connection: ConnectionType,
    start: Option<DateTime<Utc>>,
    zone: GeographicZone,
}

impl ViewingRequest {
    /// Build a request; `duration_minutes` must be positive.
    pub fn new(
        duration_minutes: u32,
        resolution: Resolution,
        device: DeviceClass,
        connection: ConnectionType,
        zone: GeographicZone,
    ) -> Result<Self, CoreError> {
        let duration = NonZeroU32::new(duration_minutes).ok_or_else(|| {
            CoreError::InvalidRequest {
                message: "duration must be at least one minute".into(),
            }
        })?;
        Ok(Self {
            duration,
            resolution,
            device,
            connection,
            start: None,
            zone,
        })
    }

    /// Fix the viewing start instead of using "now".
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn duration(&self) -> NonZeroU32 {
        self.duration
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration.get()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn connection(&self) -> ConnectionType {
        self.connection
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// The explicit start, or `now` when none was given.
    pub fn start_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.start.unwrap_or(now)
    }

    pub fn zone(&self) -> &GeographicZone {
        &self.zone
    }
}
