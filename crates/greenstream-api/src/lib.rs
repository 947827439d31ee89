// greenstream-api: Async Rust clients for the upstream services GreenStream
// depends on -- Nominatim (geocoding) and Electricity Maps (carbon intensity).

pub mod electricity_maps;
pub mod error;
pub mod models;
pub mod nominatim;
pub mod transport;

pub use electricity_maps::ElectricityMapsClient;
pub use error::Error;
pub use models::{ForecastPoint, ForecastResponse, Place, ZoneResponse};
pub use nominatim::NominatimClient;
pub use transport::TransportConfig;
