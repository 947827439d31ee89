// ── Cloud servers ──

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::zone::GeographicZone;
use crate::error::{CoreError, ParameterKind};
use crate::model::viewing::unknown;

/// Cloud provider operating a server.
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
#[serde(try_from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum Provider {
    #[strum(serialize = "AWS")]
    Aws,
    #[strum(serialize = "GCP")]
    Gcp,
    #[strum(serialize = "Azure")]
    Azure,
}

impl TryFrom<String> for Provider {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.to_string()
    }
}

impl Provider {
    /// Every known provider, in declaration order.
    pub fn all() -> Vec<Self> {
        use strum::IntoEnumIterator;
        Self::iter().collect()
    }

    /// Parse a provider name, mapping failures to `UnknownParameter`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        raw.trim()
            .parse()
            .map_err(|_| unknown(ParameterKind::Provider, raw))
    }

    /// Parse a comma-separated provider list (`"aws,gcp"`).
    ///
    /// An empty list selects every provider.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, CoreError> {
        let mut out = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let provider = Self::parse(part)?;
            if !out.contains(&provider) {
                out.push(provider);
            }
        }
        if out.is_empty() {
            return Ok(Self::all());
        }
        Ok(out)
    }
}

/// A server that can host video delivery.
///
/// Equality keys on `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudServer {
    pub id: String,
    pub name: String,
    pub region_code: String,
    pub provider: Provider,
    pub availability_zones: BTreeSet<String>,
    pub location: GeographicZone,
    /// Forecast zone to use directly instead of resolving `location`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_zone: Option<String>,
}

impl CloudServer {
    /// Whether this server's provider is selected and it serves `zone_code`.
    pub fn serves(&self, providers: &[Provider], zone_code: &str) -> bool {
        providers.contains(&self.provider) && self.availability_zones.contains(zone_code)
    }
}

impl PartialEq for CloudServer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CloudServer {}

impl fmt::Display for CloudServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(Provider::parse("aws").unwrap(), Provider::Aws);
        assert_eq!(Provider::parse("Gcp").unwrap(), Provider::Gcp);
        assert_eq!(Provider::parse("AZURE").unwrap(), Provider::Azure);
        assert_eq!(Provider::Azure.to_string(), "Azure");
        assert_eq!(Provider::Aws.to_string(), "AWS");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(matches!(
            Provider::parse("ovh"),
            Err(CoreError::UnknownParameter {
                kind: ParameterKind::Provider,
                ..
            })
        ));
    }

    #[test]
    fn provider_list_dedups_and_defaults_to_all() {
        assert_eq!(
            Provider::parse_list("aws, AWS,azure").unwrap(),
            vec![Provider::Aws, Provider::Azure]
        );
        assert_eq!(Provider::parse_list("").unwrap(), Provider::all());
        assert!(Provider::parse_list("aws,ibm").is_err());
    }

    #[test]
    fn serves_requires_provider_and_zone() {
        let server = CloudServer {
            id: "aws-eu-west-3".into(),
            name: "AWS Paris".into(),
            region_code: "eu-west-3".into(),
            provider: Provider::Aws,
            availability_zones: ["FR".to_owned()].into_iter().collect(),
            location: GeographicZone::new("Paris", Some("France".into())).unwrap(),
            forecast_zone: None,
        };
        assert!(server.serves(&[Provider::Aws], "FR"));
        assert!(!server.serves(&[Provider::Gcp], "FR"));
        assert!(!server.serves(&[Provider::Aws], "DE"));
    }
}
