//! Carbon-footprint estimation for video streaming.
//!
//! This crate owns the computations and the domain model of GreenStream:
//!
//! - **Energy model** ([`energy`]) converts duration, resolution, device and
//!   connection into kWh using the data-driven [`ParameterTables`].
//!
//! - **Temporal aggregation** ([`aggregate`]) combines an hourly
//!   [`ForecastCurve`] with an arbitrary viewing window into one
//!   time-weighted average carbon intensity.
//!
//! - **[`GreenStream`]** is the service facade: footprints, eligible and
//!   ranked cloud servers, history and upstream health. It is generic over
//!   its collaborators ([`ZoneResolver`], [`ForecastProvider`],
//!   [`HistoryStore`]) so it runs unchanged against the real upstream
//!   services ([`upstream`]) or in-memory test doubles.
//!
//! - **[`authorize`]** is the single authorization policy, driven by an
//!   explicit [`Caller`].

pub mod aggregate;
pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod energy;
pub mod error;
pub mod footprint;
pub mod model;
pub mod offer;
pub mod params;
pub mod ports;
pub mod service;
pub mod store;
pub mod upstream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{AggregationResult, Segment};
pub use auth::{Action, Caller, authorize};
pub use catalog::ServerCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ServiceConfig, UpstreamConfig};
pub use energy::{EnergyEstimate, estimate_energy};
pub use error::{CoreError, ParameterKind};
pub use footprint::FootprintReport;
pub use offer::{RankedServer, RankedServers, RankingRequest};
pub use params::ParameterTables;
pub use ports::{ForecastProvider, HistorySink, HistoryStore, ZoneResolver};
pub use service::{GreenStream, HealthMode, UpstreamHealth};
pub use store::{FileHistory, MemoryHistory};
pub use upstream::{UpstreamForecastProvider, UpstreamZoneResolver};

pub use model::{
    CloudServer, ConnectionType, DeviceClass, ForecastCurve, ForecastSample, GeographicZone,
    HistoryEntry, Provider, Resolution, Scope, ViewingRequest,
};
