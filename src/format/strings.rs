//! Localisable labels used by the formatters

use crate::data::{PressureUnit, UvRiskLevel, WindDirection, WindSpeedUnit};

/// Every user-visible word the formatters emit
///
/// Passed explicitly to each formatting call; `Default` gives English.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStrings {
    pub wind: String,
    pub pressure: String,
    pub humidity: String,
    pub no_data: String,
    /// m/s, kph, mph, kn
    pub speed_units: [String; 4],
    /// hPa, kPa, mm Hg, in Hg
    pub pressure_units: [String; 4],
    /// Sixteen compass abbreviations, clockwise from North
    pub directions: [String; 16],
    /// Eight arrows, clockwise from North
    pub arrows: [String; 8],
    /// Beaufort force names 0 through 12
    pub beaufort: [String; 13],
    /// Low, moderate, high, very high, extreme, no info
    pub uv_levels: [String; 6],
}

impl Default for DisplayStrings {
    fn default() -> Self {
        Self {
            wind: "Wind".to_string(),
            pressure: "Pressure".to_string(),
            humidity: "Humidity".to_string(),
            no_data: "No data".to_string(),
            speed_units: ["m/s", "kph", "mph", "kn"].map(String::from),
            pressure_units: ["hPa", "kPa", "mm Hg", "in Hg"].map(String::from),
            directions: [
                "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W",
                "WNW", "NW", "NNW",
            ]
            .map(String::from),
            // Arrows point where the wind blows to
            arrows: ["↓", "↙", "←", "↖", "↑", "↗", "→", "↘"].map(String::from),
            beaufort: [
                "Calm",
                "Light air",
                "Light breeze",
                "Gentle breeze",
                "Moderate breeze",
                "Fresh breeze",
                "Strong breeze",
                "High wind",
                "Gale",
                "Strong gale",
                "Storm",
                "Violent storm",
                "Hurricane",
            ]
            .map(String::from),
            uv_levels: ["Low", "Moderate", "High", "Very high", "Extreme", "No info"]
                .map(String::from),
        }
    }
}

impl DisplayStrings {
    /// Label for a speed unit; Beaufort has none
    pub fn speed_unit(&self, unit: WindSpeedUnit) -> Option<&str> {
        let index = match unit {
            WindSpeedUnit::MetersPerSecond => 0,
            WindSpeedUnit::KilometersPerHour => 1,
            WindSpeedUnit::MilesPerHour => 2,
            WindSpeedUnit::Knots => 3,
            WindSpeedUnit::Beaufort => return None,
        };
        Some(&self.speed_units[index])
    }

    pub fn pressure_unit(&self, unit: PressureUnit) -> &str {
        let index = match unit {
            PressureUnit::HectoPascal => 0,
            PressureUnit::KiloPascal => 1,
            PressureUnit::MillimetersOfMercury => 2,
            PressureUnit::InchesOfMercury => 3,
        };
        &self.pressure_units[index]
    }

    pub fn direction(&self, direction: WindDirection) -> &str {
        &self.directions[direction.index()]
    }

    /// Arrow for `direction`, which should be one of the eight principal points
    pub fn arrow(&self, direction: WindDirection) -> &str {
        &self.arrows[direction.index() / 2]
    }

    pub fn beaufort_name(&self, force: u8) -> &str {
        let index = usize::from(force).min(self.beaufort.len() - 1);
        &self.beaufort[index]
    }

    pub fn uv_level(&self, level: UvRiskLevel) -> &str {
        let index = match level {
            UvRiskLevel::Low => 0,
            UvRiskLevel::Moderate => 1,
            UvRiskLevel::High => 2,
            UvRiskLevel::VeryHigh => 3,
            UvRiskLevel::Extreme => 4,
            UvRiskLevel::NoInfo => 5,
        };
        &self.uv_levels[index]
    }
}
