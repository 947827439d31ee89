// ── Energy model parameter tables ──
//
// The only tunable constants of the energy model. They are plain data so
// a deployment can replace them from configuration (`[parameters]`)
// without touching the algorithm.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ParameterKind};
use crate::model::viewing::unknown;
use crate::model::{ConnectionType, DeviceClass, Resolution};

/// Frame dimensions for one recognized resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEntry {
    pub lines: u32,
    pub width: u32,
    pub height: u32,
}

impl ResolutionEntry {
    /// Pixels per frame.
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Average power draw of a device class, in kWh per minute of playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub device: DeviceClass,
    pub power: f64,
}

/// Transmission energy of a connection type, in kWh per byte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub connection: ConnectionType,
    pub energy_per_byte: f64,
}

/// Lookup tables consumed by [`estimate_energy`](crate::energy::estimate_energy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterTables {
    pub resolutions: Vec<ResolutionEntry>,
    pub devices: Vec<DeviceEntry>,
    pub connections: Vec<ConnectionEntry>,
    /// Data-center energy per byte served, shared by every request.
    pub datacenter_energy: f64,
}

const fn res(lines: u32, width: u32, height: u32) -> ResolutionEntry {
    ResolutionEntry {
        lines,
        width,
        height,
    }
}

impl Default for ParameterTables {
    fn default() -> Self {
        Self {
            resolutions: vec![
                res(240, 426, 240),
                res(360, 640, 360),
                res(480, 854, 480),
                res(720, 1280, 720),
                res(1080, 1920, 1080),
                res(1440, 2560, 1440),
                res(2160, 3840, 2160),
                res(4320, 7680, 4320),
            ],
            devices: vec![
                DeviceEntry {
                    device: DeviceClass::Computer,
                    power: 3.2e-4,
                },
                DeviceEntry {
                    device: DeviceClass::Mobile,
                    power: 1.1e-4,
                },
            ],
            connections: vec![
                ConnectionEntry {
                    connection: ConnectionType::Wifi,
                    energy_per_byte: 1.52e-10,
                },
                ConnectionEntry {
                    connection: ConnectionType::Cellular,
                    energy_per_byte: 8.84e-10,
                },
                ConnectionEntry {
                    connection: ConnectionType::Cable,
                    energy_per_byte: 4.29e-10,
                },
            ],
            datacenter_energy: 7.2e-11,
        }
    }
}

impl ParameterTables {
    pub fn resolution(&self, resolution: Resolution) -> Result<&ResolutionEntry, CoreError> {
        self.resolutions
            .iter()
            .find(|r| r.lines == resolution.lines())
            .ok_or_else(|| unknown(ParameterKind::Resolution, &resolution.to_string()))
    }

    pub fn device_power(&self, device: DeviceClass) -> Result<f64, CoreError> {
        self.devices
            .iter()
            .find(|d| d.device == device)
            .map(|d| d.power)
            .ok_or_else(|| unknown(ParameterKind::Device, &device.to_string()))
    }

    pub fn connection_energy(&self, connection: ConnectionType) -> Result<f64, CoreError> {
        self.connections
            .iter()
            .find(|c| c.connection == connection)
            .map(|c| c.energy_per_byte)
            .ok_or_else(|| unknown(ParameterKind::Connection, &connection.to_string()))
    }

    /// Recognized resolutions, ascending.
    pub fn known_resolutions(&self) -> Vec<Resolution> {
        let mut out: Vec<_> = self
            .resolutions
            .iter()
            .map(|r| Resolution::new(r.lines))
            .collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_device_and_connection() {
        use strum::IntoEnumIterator;

        let tables = ParameterTables::default();
        for device in DeviceClass::iter() {
            assert!(tables.device_power(device).is_ok(), "{device}");
        }
        for connection in ConnectionType::iter() {
            assert!(tables.connection_energy(connection).is_ok(), "{connection}");
        }
    }

    #[test]
    fn hd_is_1280_by_720() {
        let tables = ParameterTables::default();
        let entry = tables.resolution(Resolution::new(720)).unwrap();
        assert_eq!(entry.pixels(), 1280 * 720);
    }

    #[test]
    fn unrecognized_resolution_is_unknown_parameter() {
        let tables = ParameterTables::default();
        let err = tables.resolution(Resolution::new(725)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownParameter {
                kind: ParameterKind::Resolution,
                ..
            }
        ));
    }

    #[test]
    fn trimmed_table_rejects_missing_device() {
        let tables = ParameterTables {
            devices: Vec::new(),
            ..ParameterTables::default()
        };
        assert!(tables.device_power(DeviceClass::Mobile).is_err());
    }

    #[test]
    fn partial_toml_override_keeps_other_tables() {
        let tables: ParameterTables = toml::from_str("datacenter_energy = 1.0e-10\n").unwrap();
        assert!((tables.datacenter_energy - 1.0e-10).abs() < f64::EPSILON);
        assert_eq!(tables.resolutions.len(), 8);
    }
}
