//! Battery state sampling.

pub mod sysfs;

pub use sysfs::SysfsProbe;

/// One point-in-time reading of the battery attributes.
///
/// Always constructible: every attribute is read independently and falls
/// back to its documented default when the source is missing, so a probe
/// never fails — it just reports what it could see.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySnapshot {
    /// Charge percentage as reported, or `"Unknown"`.
    pub percentage: String,
    /// Charging status string (`Charging`, `Discharging`, ...).
    pub status: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Plug type (`AC`, `USB`, ...), `"N/A"` when absent.
    pub plugged: String,
    /// Battery health string.
    pub health: String,
    /// Instantaneous current in microamps, as reported.
    pub current: String,
}

impl Default for BatterySnapshot {
    fn default() -> Self {
        Self {
            percentage: "Unknown".to_owned(),
            status: "N/A".to_owned(),
            temperature: 0.0,
            plugged: "N/A".to_owned(),
            health: "N/A".to_owned(),
            current: "N/A".to_owned(),
        }
    }
}

impl BatterySnapshot {
    /// Parsed charge percentage, `None` when the source reported a
    /// non-numeric value.
    pub fn percent(&self) -> Option<i64> {
        self.percentage.trim().parse().ok()
    }

    /// True iff the percentage is numeric and at or below `threshold`.
    pub fn is_critical(&self, threshold: u8) -> bool {
        self.percent().is_some_and(|p| p <= i64::from(threshold))
    }
}

/// Snapshot source. The runtime only ever asks for the current state;
/// tests substitute [`FixedProbe`].
pub trait BatteryProbe: Send + Sync {
    fn read(&self) -> BatterySnapshot;
}

/// Probe returning a fixed snapshot — for tests.
#[derive(Debug, Clone)]
pub struct FixedProbe(pub BatterySnapshot);

impl BatteryProbe for FixedProbe {
    fn read(&self) -> BatterySnapshot {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_percentage(raw: &str) -> BatterySnapshot {
        BatterySnapshot {
            percentage: raw.to_owned(),
            ..BatterySnapshot::default()
        }
    }

    #[test]
    fn non_numeric_percentage_never_critical() {
        for raw in ["Unknown", "", "N/A", "five", "5.5"] {
            let snap = with_percentage(raw);
            for threshold in [0u8, 15, 100, 255] {
                assert!(!snap.is_critical(threshold), "{raw} vs {threshold}");
            }
        }
    }

    #[test]
    fn numeric_percentage_compares_against_threshold() {
        for (raw, threshold, expected) in [
            ("5", 15u8, true),
            ("15", 15, true),
            ("16", 15, false),
            ("100", 15, false),
            ("0", 0, true),
            ("1", 0, false),
        ] {
            assert_eq!(
                with_percentage(raw).is_critical(threshold),
                expected,
                "{raw} vs {threshold}"
            );
        }
    }

    #[test]
    fn percent_parses_trimmed_integers() {
        assert_eq!(with_percentage(" 42 ").percent(), Some(42));
        assert_eq!(with_percentage("Unknown").percent(), None);
    }

    #[test]
    fn default_snapshot_uses_documented_fallbacks() {
        let snap = BatterySnapshot::default();
        assert_eq!(snap.percentage, "Unknown");
        assert_eq!(snap.temperature, 0.0);
        assert_eq!(snap.plugged, "N/A");
        assert!(!snap.is_critical(100));
    }
}
