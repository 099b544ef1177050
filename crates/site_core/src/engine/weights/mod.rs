//! Factor weight tables.
//!
//! Each category has a base weight row over the seven [`Factor`]s. Season and
//! weather multipliers scale that row, and the result is renormalized so the
//! effective weights for a category always sum to 1.0.

pub mod modifiers;

use serde::{Deserialize, Serialize};

use crate::engine::config::PerCategory;
use crate::models::{Category, Factor, Season, Weather};

pub use modifiers::{FactorMultipliers, SeasonModifiers, WeatherModifiers};

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One weight per factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub aspect: f64,
    pub wind: f64,
    pub thermal: f64,
    pub terrain: f64,
    pub cover: f64,
    pub travel: f64,
    pub proximity: f64,
}

impl FactorWeights {
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

    fn get_mut(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::Aspect => &mut self.aspect,
            Factor::Wind => &mut self.wind,
            Factor::Thermal => &mut self.thermal,
            Factor::Terrain => &mut self.terrain,
            Factor::Cover => &mut self.cover,
            Factor::Travel => &mut self.travel,
            Factor::Proximity => &mut self.proximity,
        }
    }

    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Scale each weight by its multiplier.
    pub fn scaled(mut self, multipliers: &FactorMultipliers) -> Self {
        for factor in Factor::ALL {
            *self.get_mut(factor) *= multipliers.get(factor);
        }
        self
    }

    /// Weights rescaled to sum to 1.0, or `None` if they sum to zero.
    pub fn normalized(mut self) -> Option<Self> {
        let total = self.sum();
        if total <= 0.0 {
            return None;
        }
        for factor in Factor::ALL {
            *self.get_mut(factor) /= total;
        }
        Some(self)
    }
}

/// Base rows plus season and weather modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTables {
    pub base: PerCategory<FactorWeights>,
    pub season: SeasonModifiers,
    pub weather: WeatherModifiers,
}

impl Default for WeightTables {
    fn default() -> Self {
        Self {
            base: PerCategory {
                bedding: FactorWeights {
                    aspect: 0.25,
                    wind: 0.15,
                    thermal: 0.10,
                    terrain: 0.15,
                    cover: 0.25,
                    travel: 0.05,
                    proximity: 0.05,
                },
                feeding: FactorWeights {
                    aspect: 0.10,
                    wind: 0.20,
                    thermal: 0.10,
                    terrain: 0.10,
                    cover: 0.15,
                    travel: 0.15,
                    proximity: 0.20,
                },
                stand: FactorWeights {
                    aspect: 0.05,
                    wind: 0.30,
                    thermal: 0.20,
                    terrain: 0.10,
                    cover: 0.10,
                    travel: 0.20,
                    proximity: 0.05,
                },
                camera: FactorWeights {
                    aspect: 0.05,
                    wind: 0.10,
                    thermal: 0.05,
                    terrain: 0.15,
                    cover: 0.10,
                    travel: 0.35,
                    proximity: 0.20,
                },
            },
            season: SeasonModifiers::default(),
            weather: WeatherModifiers::default(),
        }
    }
}

impl WeightTables {
    /// Effective weights for a category under a season and weather.
    ///
    /// Falls back to the unmodified base row if the modifiers zero it out.
    pub fn effective(&self, category: Category, season: Season, weather: Weather) -> FactorWeights {
        let base = self.base.get(category);
        base.scaled(self.season.for_season(season))
            .scaled(self.weather.for_weather(weather))
            .normalized()
            .or_else(|| base.normalized())
            .unwrap_or(base)
    }

    /// Check every base row sums to 1.0 and no weight or multiplier is negative.
    pub fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let row = self.base.get(category);
            if Factor::ALL.iter().any(|f| row.get(*f) < 0.0) {
                return Err(format!("{} weights contain a negative value", category.as_str()));
            }
            let sum = row.sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(format!("{} weights sum to {sum:.6}, expected 1.0", category.as_str()));
            }
        }
        for season in Season::ALL {
            if self.season.for_season(season).has_negative() {
                return Err(format!("season modifier {season:?} contains a negative value"));
            }
        }
        for weather in Weather::ALL {
            if self.weather.for_weather(weather).has_negative() {
                return Err(format!("weather modifier {weather:?} contains a negative value"));
            }
        }
        Ok(())
    }
}
