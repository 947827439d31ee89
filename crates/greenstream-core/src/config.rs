// ── Runtime service configuration ──
//
// These types describe how the service computes and whom it talks to.
// They never touch disk: the CLI builds them from its config file and
// hands them in.

use std::time::Duration;

use greenstream_api::{electricity_maps, nominatim, transport};
use secrecy::SecretString;

use crate::model::Provider;
use crate::params::ParameterTables;

/// Tuning for the computations themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Per-server forecast fetch deadline during ranking.
    pub forecast_timeout: Duration,
    /// Providers considered when a request does not name any.
    pub default_providers: Vec<Provider>,
    pub parameters: ParameterTables,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            forecast_timeout: Duration::from_secs(10),
            default_providers: Provider::all(),
            parameters: ParameterTables::default(),
        }
    }
}

/// Where the upstream services live and how to reach them.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub nominatim_url: String,
    pub electricity_maps_url: String,
    /// Electricity Maps `auth-token`.
    pub token: SecretString,
    pub user_agent: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Public endpoints with default transport settings.
    pub fn new(token: SecretString) -> Self {
        Self {
            nominatim_url: nominatim::DEFAULT_BASE_URL.into(),
            electricity_maps_url: electricity_maps::DEFAULT_BASE_URL.into(),
            token,
            user_agent: transport::DEFAULT_USER_AGENT.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> transport::TransportConfig {
        transport::TransportConfig {
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}
