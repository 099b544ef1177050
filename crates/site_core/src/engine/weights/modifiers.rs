use serde::{Deserialize, Serialize};

use crate::models::{Factor, Season, Weather};

/// Per-factor multipliers; omitted factors default to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorMultipliers {
    pub aspect: f64,
    pub wind: f64,
    pub thermal: f64,
    pub terrain: f64,
    pub cover: f64,
    pub travel: f64,
    pub proximity: f64,
}

impl Default for FactorMultipliers {
    fn default() -> Self {
        Self::neutral()
    }
}

impl FactorMultipliers {
    pub const fn neutral() -> Self {
        Self { aspect: 1.0, wind: 1.0, thermal: 1.0, terrain: 1.0, cover: 1.0, travel: 1.0, proximity: 1.0 }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Aspect => self.aspect,
            Factor::Wind => self.wind,
            Factor::Thermal => self.thermal,
            Factor::Terrain => self.terrain,
            Factor::Cover => self.cover,
            Factor::Travel => self.travel,
            Factor::Proximity => self.proximity,
        }
    }

    pub(crate) fn has_negative(&self) -> bool {
        Factor::ALL.iter().any(|f| self.get(*f) < 0.0)
    }
}

/// Season multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonModifiers {
    pub early_season: FactorMultipliers,
    pub pre_rut: FactorMultipliers,
    pub rut: FactorMultipliers,
    pub post_rut: FactorMultipliers,
    pub late_season: FactorMultipliers,
}

impl Default for SeasonModifiers {
    fn default() -> Self {
        let n = FactorMultipliers::neutral();
        Self {
            early_season: FactorMultipliers { proximity: 1.1, ..n },
            pre_rut: FactorMultipliers { travel: 1.3, ..n },
            // Bucks cruise: travel corridors matter more than bedding cover
            rut: FactorMultipliers { travel: 1.6, cover: 0.7, ..n },
            post_rut: FactorMultipliers { cover: 1.2, proximity: 1.2, ..n },
            late_season: FactorMultipliers { proximity: 1.4, aspect: 1.2, ..n },
        }
    }
}

impl SeasonModifiers {
    pub fn for_season(&self, season: Season) -> &FactorMultipliers {
        match season {
            Season::EarlySeason => &self.early_season,
            Season::PreRut => &self.pre_rut,
            Season::Rut => &self.rut,
            Season::PostRut => &self.post_rut,
            Season::LateSeason => &self.late_season,
        }
    }
}

/// Weather multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherModifiers {
    pub clear: FactorMultipliers,
    pub overcast: FactorMultipliers,
    pub light_rain: FactorMultipliers,
    pub heavy_rain: FactorMultipliers,
    pub snow: FactorMultipliers,
    pub cold_front: FactorMultipliers,
}

impl Default for WeatherModifiers {
    fn default() -> Self {
        let n = FactorMultipliers::neutral();
        Self {
            clear: n,
            overcast: FactorMultipliers { thermal: 0.8, ..n },
            light_rain: FactorMultipliers { cover: 1.2, ..n },
            heavy_rain: FactorMultipliers { cover: 1.5, travel: 0.7, ..n },
            snow: FactorMultipliers { aspect: 1.3, proximity: 1.2, ..n },
            cold_front: FactorMultipliers { travel: 1.3, proximity: 1.2, ..n },
        }
    }
}

impl WeatherModifiers {
    pub fn for_weather(&self, weather: Weather) -> &FactorMultipliers {
        match weather {
            Weather::Clear => &self.clear,
            Weather::Overcast => &self.overcast,
            Weather::LightRain => &self.light_rain,
            Weather::HeavyRain => &self.heavy_rain,
            Weather::Snow => &self.snow,
            Weather::ColdFront => &self.cold_front,
        }
    }
}
