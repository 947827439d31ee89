// ── Carbon-intensity forecast ──
//
// A forecast curve is an ascending, hourly sequence of samples for a
// single zone. Curves are built fresh for each call and never mutated.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Truncate a timestamp to the start of its hour.
pub fn floor_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    floor_minute(at) - TimeDelta::minutes(i64::from(at.minute()))
}

/// Truncate a timestamp to the start of its minute.
pub fn floor_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at - TimeDelta::seconds(i64::from(at.second()))
        - TimeDelta::nanoseconds(i64::from(at.nanosecond()))
}

/// One hourly forecast point, in gCO2eq/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub at: DateTime<Utc>,
    pub intensity: f64,
}

impl ForecastSample {
    /// Sample at exactly `at`.
    pub fn new(at: DateTime<Utc>, intensity: f64) -> Self {
        Self { at, intensity }
    }
}

/// Ascending forecast samples for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCurve {
    zone: String,
    samples: Vec<ForecastSample>,
}

impl ForecastCurve {
    /// Sort `samples` by timestamp and validate them.
    ///
    /// Negative or non-finite intensities and duplicate timestamps make the
    /// curve unusable and are reported as `ForecastUnavailable`.
    pub fn new(zone: impl Into<String>, mut samples: Vec<ForecastSample>) -> Result<Self, CoreError> {
        let zone = zone.into();
        samples.sort_by_key(|s| s.at);

        if let Some(bad) = samples
            .iter()
            .find(|s| !s.intensity.is_finite() || s.intensity < 0.0)
        {
            return Err(CoreError::forecast_unavailable(
                zone,
                format!("invalid intensity {} at {}", bad.intensity, bad.at),
            ));
        }
        if let Some(pair) = samples.windows(2).find(|w| w[0].at == w[1].at) {
            return Err(CoreError::forecast_unavailable(
                zone,
                format!("duplicate sample at {}", pair[0].at),
            ));
        }

        Ok(Self { zone, samples })
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Last sample timestamp plus one hour; `None` for an empty curve.
    pub fn horizon(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.at + TimeDelta::hours(1))
    }

    /// Index of the sample stamped exactly `at`.
    pub(crate) fn position(&self, at: DateTime<Utc>) -> Option<usize> {
        self.samples.binary_search_by_key(&at, |s| s.at).ok()
    }
}
