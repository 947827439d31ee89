// ── Geographic zone ──

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A place named by city and optional country.
///
/// Resolved to a provider-specific forecast zone code by a `ZoneResolver`;
/// the only local validation is a non-empty city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeographicZone {
    city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

impl GeographicZone {
    pub fn new(city: impl Into<String>, country: Option<String>) -> Result<Self, CoreError> {
        let city = city.into().trim().to_owned();
        if city.is_empty() {
            return Err(CoreError::InvalidRequest {
                message: "city must not be empty".into(),
            });
        }
        let country = country
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        Ok(Self { city, country })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl fmt::Display for GeographicZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}, {country}", self.city),
            None => f.write_str(&self.city),
        }
    }
}
