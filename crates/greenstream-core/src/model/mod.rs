// ── Domain model ──

pub mod forecast;
pub mod history;
pub mod server;
pub mod viewing;
pub mod zone;

pub use forecast::{ForecastCurve, ForecastSample, floor_hour, floor_minute};
pub use history::{HistoryEntry, Scope};
pub use server::{CloudServer, Provider};
pub use viewing::{
    ConnectionType, DeviceClass, Resolution, ViewingRequest, parse_connection, parse_device,
};
pub use zone::GeographicZone;
