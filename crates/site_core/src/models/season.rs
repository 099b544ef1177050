//! Hunting season phases and weather conditions.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    EarlySeason,
    PreRut,
    Rut,
    PostRut,
    LateSeason,
}

impl Season {
    pub const ALL: [Season; 5] =
        [Season::EarlySeason, Season::PreRut, Season::Rut, Season::PostRut, Season::LateSeason];

    /// Season phase for a calendar date (northern-hemisphere whitetail calendar).
    ///
    /// Months outside the hunting calendar map to `EarlySeason`.
    pub fn from_date(date: NaiveDate) -> Self {
        match (date.month(), date.day()) {
            (9, _) => Season::EarlySeason,
            (10, d) if d <= 25 => Season::PreRut,
            (10, _) => Season::Rut,
            (11, d) if d <= 20 => Season::Rut,
            (11, _) => Season::PostRut,
            (12, d) if d <= 15 => Season::PostRut,
            (12, _) | (1, _) => Season::LateSeason,
            _ => Season::EarlySeason,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Overcast,
    LightRain,
    HeavyRain,
    Snow,
    ColdFront,
}

impl Weather {
    pub const ALL: [Weather; 6] = [
        Weather::Clear,
        Weather::Overcast,
        Weather::LightRain,
        Weather::HeavyRain,
        Weather::Snow,
        Weather::ColdFront,
    ];

    /// Share of clear-sky thermal strength that survives this weather.
    pub fn thermal_factor(self) -> f64 {
        match self {
            Weather::Clear | Weather::ColdFront => 1.0,
            Weather::Overcast => 0.5,
            Weather::Snow => 0.4,
            Weather::LightRain => 0.3,
            Weather::HeavyRain => 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(Season::from_date(date(9, 15)), Season::EarlySeason);
        assert_eq!(Season::from_date(date(10, 25)), Season::PreRut);
        assert_eq!(Season::from_date(date(10, 26)), Season::Rut);
        assert_eq!(Season::from_date(date(11, 20)), Season::Rut);
        assert_eq!(Season::from_date(date(11, 21)), Season::PostRut);
        assert_eq!(Season::from_date(date(12, 16)), Season::LateSeason);
        assert_eq!(Season::from_date(date(1, 10)), Season::LateSeason);
        assert_eq!(Season::from_date(date(6, 1)), Season::EarlySeason);
    }

    #[test]
    fn test_heavy_rain_suppresses_thermals() {
        assert!(Weather::HeavyRain.thermal_factor() < Weather::Overcast.thermal_factor());
        assert_eq!(Weather::default(), Weather::Clear);
    }
}
