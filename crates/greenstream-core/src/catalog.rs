// ── Server catalog ──
//
// The known cloud regions. A catalog ships with the crate; deployments can
// replace it with their own TOML file of `[[server]]` tables.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{CloudServer, GeographicZone, Provider};

const BUILTIN: &str = include_str!("../data/servers.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    server: Vec<ServerRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerRecord {
    id: String,
    name: String,
    region_code: String,
    provider: Provider,
    availability_zones: BTreeSet<String>,
    city: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    forecast_zone: Option<String>,
}

impl TryFrom<ServerRecord> for CloudServer {
    type Error = CoreError;

    fn try_from(r: ServerRecord) -> Result<Self, Self::Error> {
        let location = GeographicZone::new(r.city, r.country).map_err(|e| CoreError::Catalog {
            message: format!("server '{}': {e}", r.id),
        })?;
        Ok(Self {
            id: r.id,
            name: r.name,
            region_code: r.region_code,
            provider: r.provider,
            availability_zones: r.availability_zones,
            location,
            forecast_zone: r.forecast_zone,
        })
    }
}

/// Ordered set of known servers with unique ids.
#[derive(Debug, Clone)]
pub struct ServerCatalog {
    servers: Vec<CloudServer>,
}

impl ServerCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(servers: Vec<CloudServer>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        if let Some(dup) = servers.iter().find(|s| !seen.insert(s.id.as_str())) {
            return Err(CoreError::Catalog {
                message: format!("duplicate server id '{}'", dup.id),
            });
        }
        Ok(Self { servers })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_toml(BUILTIN)
    }

    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = toml::from_str(text).map_err(|e| CoreError::Catalog {
            message: e.to_string(),
        })?;
        let servers = file
            .server
            .into_iter()
            .map(CloudServer::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(servers)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Catalog {
            message: format!("{}: {e}", path.display()),
        })?;
        let catalog = Self::from_toml(&text)?;
        debug!(path = %path.display(), servers = catalog.len(), "loaded server catalog");
        Ok(catalog)
    }

    /// Servers operated by one of `providers`, in catalog order.
    pub fn servers(&self, providers: &[Provider]) -> Vec<CloudServer> {
        self.servers
            .iter()
            .filter(|s| providers.contains(&s.provider))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&CloudServer> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn all(&self) -> &[CloudServer] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
