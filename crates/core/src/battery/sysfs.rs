//! Kernel sysfs battery probe.

use std::path::PathBuf;

use super::{BatteryProbe, BatterySnapshot};

/// Default attribute directory exposed by the kernel power-supply class
/// (Android exposes the same layout).
const BATTERY_PATH: &str = "/sys/class/power_supply/battery";

/// Reads battery attributes from sysfs, one file per attribute. A file
/// that is missing or unreadable yields that attribute's default.
#[derive(Debug)]
pub struct SysfsProbe {
    base: PathBuf,
}

impl SysfsProbe {
    pub fn new() -> Self {
        Self {
            base: PathBuf::from(BATTERY_PATH),
        }
    }

    /// Probe rooted at a different directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn read_attr(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.base.join(name))
            .ok()
            .map(|s| s.trim().to_owned())
    }
}

impl Default for SysfsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryProbe for SysfsProbe {
    fn read(&self) -> BatterySnapshot {
        // `temp` is reported in tenths of a degree
        let temperature = self
            .read_attr("temp")
            .and_then(|raw| raw.parse::<f64>().ok())
            .map(|tenths| tenths / 10.0)
            .unwrap_or(0.0);

        BatterySnapshot {
            percentage: self.read_attr("capacity").unwrap_or_else(|| "Unknown".to_owned()),
            status: self.read_attr("status").unwrap_or_else(|| "N/A".to_owned()),
            temperature,
            plugged: self.read_attr("charge_type").unwrap_or_else(|| "N/A".to_owned()),
            health: self.read_attr("health").unwrap_or_else(|| "N/A".to_owned()),
            current: self.read_attr("current_now").unwrap_or_else(|| "N/A".to_owned()),
        }
    }
}
