//! Human-readable rendering of a [`BatterySnapshot`].
//!
//! Pure functions — the runtime decides where the text goes. Messages
//! are sent with HTML parse mode, so the warning may carry tags.

use crate::battery::BatterySnapshot;

/// Status report shown in the chat, one bullet per attribute.
pub fn format_status(battery: &BatterySnapshot) -> String {
    format!(
        "🔋 Battery Status:\n\
         • Charge Level: {}%\n\
         • Charging State: {}\n\
         • Status: {}\n\
         • Temperature: {:.1}°C\n\
         • Health: {}\n\
         • Current: {} µA\n",
        battery.percentage,
        plugged_label(&battery.plugged),
        status_label(&battery.status),
        battery.temperature,
        health_label(&battery.health),
        battery.current,
    )
}

/// Urgent alert sent when the charge drops to the critical threshold.
pub fn format_critical_warning(battery: &BatterySnapshot) -> String {
    format!(
        "⚠️ <b>Critical Battery Warning</b> ⚠️\n\
         Battery level is critically low at {}%.\n\
         Please connect the charger immediately!",
        battery.percentage,
    )
}

fn plugged_label(raw: &str) -> &'static str {
    match raw {
        "AC" => "Connected to charger",
        "USB" => "Connected via USB",
        "Wireless" => "Wireless charging",
        "Fast" => "Fast charging",
        "N/A" => "Not connected",
        _ => "Unknown",
    }
}

fn status_label(raw: &str) -> &'static str {
    match raw {
        "Charging" => "Charging",
        "Discharging" => "Discharging",
        "Full" => "Full",
        "Not charging" => "Not charging",
        _ => "Unknown",
    }
}

fn health_label(raw: &str) -> &'static str {
    match raw {
        "Good" => "Good condition",
        "Overheat" => "Overheating",
        "Dead" => "Battery dead",
        "Unspecified" => "Unspecified",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BatterySnapshot {
        BatterySnapshot {
            percentage: "5".to_owned(),
            status: "Discharging".to_owned(),
            temperature: 35.2,
            plugged: "N/A".to_owned(),
            health: "Good".to_owned(),
            current: "120".to_owned(),
        }
    }

    #[test]
    fn status_report_renders_every_attribute() {
        let text = format_status(&sample());
        assert!(text.starts_with("🔋 Battery Status:\n"));
        assert!(text.contains("• Charge Level: 5%"));
        assert!(text.contains("• Charging State: Not connected"));
        assert!(text.contains("• Status: Discharging"));
        assert!(text.contains("• Temperature: 35.2°C"));
        assert!(text.contains("• Health: Good condition"));
        assert!(text.contains("• Current: 120 µA"));
    }

    #[test]
    fn critical_snapshot_yields_both_messages() {
        let battery = sample();
        assert!(battery.is_critical(15));
        let status = format_status(&battery);
        let warning = format_critical_warning(&battery);
        assert!(!status.is_empty());
        assert!(warning.contains("<b>Critical Battery Warning</b>"));
        assert!(warning.contains("critically low at 5%"));
    }

    #[test]
    fn unknown_raw_values_map_to_unknown_labels() {
        let battery = BatterySnapshot {
            plugged: "Solar".to_owned(),
            status: "Levitating".to_owned(),
            health: "Mystery".to_owned(),
            ..BatterySnapshot::default()
        };
        let text = format_status(&battery);
        assert!(text.contains("• Charging State: Unknown"));
        assert!(text.contains("• Status: Unknown"));
        assert!(text.contains("• Health: Unknown"));
    }

    #[test]
    fn temperature_rounds_to_one_decimal() {
        let battery = BatterySnapshot {
            temperature: 31.26,
            ..BatterySnapshot::default()
        };
        assert!(format_status(&battery).contains("• Temperature: 31.3°C"));
    }
}
