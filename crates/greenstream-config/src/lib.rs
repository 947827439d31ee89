//! Configuration for the GreenStream CLI.
//!
//! TOML file + environment layering, credential resolution (env var ->
//! keyring -> plaintext), and translation into the runtime
//! `greenstream_core` configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenstream_core::{ParameterTables, Provider, ServerCatalog, ServiceConfig, UpstreamConfig};

/// Keyring service name for stored credentials.
pub const KEYRING_SERVICE: &str = "greenstream";

/// Overrides the config file location when set.
pub const CONFIG_PATH_ENV: &str = "GREENSTREAM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {credential} configured")]
    NoCredentials { credential: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Admin token (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    /// Environment variable holding the admin token.
    #[serde(default = "default_admin_token_env")]
    pub admin_token_env: Option<String>,

    /// Per-server forecast fetch deadline during ranking (seconds).
    #[serde(default = "default_forecast_timeout")]
    pub forecast_timeout: u64,

    /// Providers used when a command names none. Empty means all.
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub upstream: Upstream,

    #[serde(default)]
    pub storage: Storage,

    /// Replacement energy-model parameter tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterTables>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_token: None,
            admin_token_env: default_admin_token_env(),
            forecast_timeout: default_forecast_timeout(),
            providers: Vec::new(),
            defaults: Defaults::default(),
            upstream: Upstream::default(),
            storage: Storage::default(),
            parameters: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// HTTP timeout for upstream calls (seconds).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

/// Upstream service endpoints and the Electricity Maps token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstream {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    #[serde(default = "default_electricity_maps_url")]
    pub electricity_maps_url: String,

    /// Electricity Maps token (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable holding the Electricity Maps token.
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            electricity_maps_url: default_electricity_maps_url(),
            token: None,
            token_env: default_token_env(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Storage {
    /// JSON-lines footprint history. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,

    /// Server catalog replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_forecast_timeout() -> u64 {
    10
}
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/".into()
}
fn default_electricity_maps_url() -> String {
    "https://api.electricitymap.org/".into()
}
#[allow(clippy::unnecessary_wraps)]
fn default_token_env() -> Option<String> {
    Some("ELECTRICITY_MAPS_TOKEN".into())
}
#[allow(clippy::unnecessary_wraps)]
fn default_admin_token_env() -> Option<String> {
    Some("GREENSTREAM_ADMIN_TOKEN".into())
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "greenstream", "greenstream")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("greenstream");
    p
}

/// Resolve the config file path: `GREENSTREAM_CONFIG`, else platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default history file location.
pub fn default_history_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("history.jsonl"),
        |dirs| dirs.data_dir().join("history.jsonl"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` layered under `GREENSTREAM_*` environment variables
/// (`__` separates nested keys, e.g. `GREENSTREAM_UPSTREAM__TOKEN`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GREENSTREAM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// A secret the CLI may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    ElectricityMapsToken,
    AdminToken,
}

impl Credential {
    /// Keyring account name.
    pub fn account(self) -> &'static str {
        match self {
            Self::ElectricityMapsToken => "electricity-maps-token",
            Self::AdminToken => "admin-token",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::ElectricityMapsToken => "Electricity Maps token",
            Self::AdminToken => "admin token",
        }
    }

    fn sources(self, cfg: &Config) -> (Option<&str>, Option<&str>) {
        match self {
            Self::ElectricityMapsToken => {
                (cfg.upstream.token_env.as_deref(), cfg.upstream.token.as_deref())
            }
            Self::AdminToken => (cfg.admin_token_env.as_deref(), cfg.admin_token.as_deref()),
        }
    }
}

/// Resolve a credential: named env var, then system keyring, then
/// plaintext in the config file.
pub fn resolve_credential(cfg: &Config, credential: Credential) -> Result<SecretString, ConfigError> {
    let (env_name, plaintext) = credential.sources(cfg);

    // 1. Env var
    if let Some(val) = env_name
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, credential.account()) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(val) = plaintext.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(val.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        credential: credential.describe().into(),
    })
}

/// Electricity Maps token from the credential chain.
pub fn resolve_token(cfg: &Config) -> Result<SecretString, ConfigError> {
    resolve_credential(cfg, Credential::ElectricityMapsToken)
}

/// Admin token from the credential chain, if one is configured anywhere.
pub fn resolve_admin_token(cfg: &Config) -> Option<SecretString> {
    resolve_credential(cfg, Credential::AdminToken).ok()
}

/// Store a credential in the system keyring.
pub fn store_credential(credential: Credential, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, credential.account())
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))?;
    entry
        .set_password(secret)
        .map_err(|e| ConfigError::Keyring(format!("failed to store {}: {e}", credential.describe())))
}

// ── Translation to runtime config ───────────────────────────────────

impl Config {
    /// Parse the configured default providers.
    pub fn default_providers(&self) -> Result<Vec<Provider>, ConfigError> {
        Provider::parse_list(&self.providers.join(",")).map_err(|e| ConfigError::Validation {
            field: "providers".into(),
            reason: e.to_string(),
        })
    }

    /// Build the core `ServiceConfig`.
    pub fn service_config(&self) -> Result<ServiceConfig, ConfigError> {
        if self.forecast_timeout == 0 {
            return Err(ConfigError::Validation {
                field: "forecast_timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        Ok(ServiceConfig {
            forecast_timeout: Duration::from_secs(self.forecast_timeout),
            default_providers: self.default_providers()?,
            parameters: self.parameters.clone().unwrap_or_default(),
        })
    }

    /// Build the core `UpstreamConfig` around an already-resolved token.
    pub fn upstream_config(
        &self,
        token: SecretString,
        timeout: Option<u64>,
    ) -> Result<UpstreamConfig, ConfigError> {
        for (field, raw) in [
            ("upstream.nominatim_url", &self.upstream.nominatim_url),
            ("upstream.electricity_maps_url", &self.upstream.electricity_maps_url),
        ] {
            url::Url::parse(raw).map_err(|e| ConfigError::Validation {
                field: field.into(),
                reason: format!("invalid URL '{raw}': {e}"),
            })?;
        }

        let mut upstream = UpstreamConfig::new(token);
        upstream.nominatim_url.clone_from(&self.upstream.nominatim_url);
        upstream
            .electricity_maps_url
            .clone_from(&self.upstream.electricity_maps_url);
        if let Some(ref agent) = self.upstream.user_agent {
            upstream.user_agent.clone_from(agent);
        }
        upstream.timeout = Duration::from_secs(timeout.unwrap_or(self.defaults.timeout));
        Ok(upstream)
    }

    /// History file to use.
    pub fn history_path(&self) -> PathBuf {
        self.storage
            .history_path
            .clone()
            .unwrap_or_else(default_history_path)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<ServerCatalog, ConfigError> {
        let loaded = match self.storage.catalog_path {
            Some(ref path) => ServerCatalog::from_path(path),
            None => ServerCatalog::builtin(),
        };
        loaded.map_err(|e| ConfigError::Validation {
            field: "storage.catalog_path".into(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.defaults.output, "table");
        assert_eq!(parsed.forecast_timeout, 10);
        assert_eq!(parsed.upstream.token_env.as_deref(), Some("ELECTRICITY_MAPS_TOKEN"));
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "providers = [\"aws\"]\nforecast_timeout = 3\n\n[upstream]\ntoken = \"abc\"\n\n[parameters]\ndatacenter_energy = 1.0e-10\n"
        )
        .unwrap();

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.upstream.token.as_deref(), Some("abc"));

        let service = cfg.service_config().unwrap();
        assert_eq!(service.default_providers, vec![Provider::Aws]);
        assert_eq!(service.forecast_timeout, Duration::from_secs(3));
        assert!((service.parameters.datacenter_energy - 1.0e-10).abs() < f64::EPSILON);
        assert_eq!(service.parameters.resolutions.len(), 8);
    }

    #[test]
    fn unknown_provider_is_a_validation_error() {
        let cfg = Config {
            providers: vec!["aws".into(), "ibm".into()],
            ..Config::default()
        };
        assert!(matches!(
            cfg.service_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "providers"
        ));
    }

    #[test]
    fn token_resolves_from_plaintext() {
        let mut cfg = Config::default();
        cfg.upstream.token_env = Some("GREENSTREAM_TEST_UNSET_TOKEN_VAR".into());
        cfg.upstream.token = Some("from-file".into());
        // A keyring entry on the host would take precedence.
        assert!(resolve_token(&cfg).is_ok());
    }

    #[test]
    fn upstream_config_applies_overrides() {
        let mut cfg = Config::default();
        cfg.upstream.nominatim_url = "http://127.0.0.1:9000/".into();
        cfg.upstream.user_agent = Some("tests/1.0".into());

        let upstream = cfg
            .upstream_config(SecretString::from("t".to_owned()), Some(5))
            .unwrap();
        assert_eq!(upstream.nominatim_url, "http://127.0.0.1:9000/");
        assert_eq!(upstream.user_agent, "tests/1.0");
        assert_eq!(upstream.timeout, Duration::from_secs(5));
        assert_eq!(upstream.token.expose_secret(), "t");
    }

    #[test]
    fn bad_url_is_rejected() {
        let mut cfg = Config::default();
        cfg.upstream.electricity_maps_url = "not a url".into();
        assert!(cfg.upstream_config(SecretString::from("t".to_owned()), None).is_err());
    }

    #[test]
    fn builtin_catalog_is_default() {
        assert!(!Config::default().catalog().unwrap().is_empty());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let cfg = Config {
            storage: Storage {
                catalog_path: Some(PathBuf::from("/definitely/not/here.toml")),
                history_path: None,
            },
            ..Config::default()
        };
        assert!(matches!(cfg.catalog(), Err(ConfigError::Validation { .. })));
    }
}
