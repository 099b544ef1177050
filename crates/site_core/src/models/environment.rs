//! Instantaneous wind and thermal state for one request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::bearing;
use crate::engine::config::ThermalConfig;
use crate::models::season::Weather;

/// Diurnal air drainage, distinct from the prevailing wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThermalPhase {
    #[default]
    None,
    MorningUpslope,
    EveningDownslope,
}

/// Wind, temperature and thermal descriptor. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindThermalState {
    /// Bearing the wind blows *from*
    pub wind_bearing_degrees: f64,
    pub wind_speed_mph: f64,
    pub temperature_f: f64,
    pub thermal_active: bool,
    pub thermal_phase: ThermalPhase,
    /// 0–1
    pub thermal_strength: f64,
}

impl WindThermalState {
    pub fn new(
        wind_bearing_degrees: f64,
        wind_speed_mph: f64,
        temperature_f: f64,
        thermal_phase: ThermalPhase,
        thermal_strength: f64,
    ) -> Self {
        let strength = if thermal_phase == ThermalPhase::None {
            0.0
        } else {
            thermal_strength.clamp(0.0, 1.0)
        };
        Self {
            wind_bearing_degrees: bearing::normalize(wind_bearing_degrees),
            wind_speed_mph: wind_speed_mph.max(0.0),
            temperature_f,
            thermal_active: strength > 0.0,
            thermal_phase,
            thermal_strength: strength,
        }
    }

    /// State used when no wind observation is available: zero speed, so every
    /// wind weight resolves to 0.
    pub fn calm(temperature_f: f64, thermal_phase: ThermalPhase, thermal_strength: f64) -> Self {
        Self::new(0.0, 0.0, temperature_f, thermal_phase, thermal_strength)
    }

    pub fn has_wind(&self) -> bool {
        self.wind_speed_mph > 0.0
    }

    pub fn leeward_bearing(&self) -> f64 {
        bearing::leeward(self.wind_bearing_degrees)
    }

    /// Bearing thermals carry scent toward, relative to the slope, if any.
    pub fn thermal_drift_bearing(&self, uphill_bearing: f64, downhill_bearing: f64) -> Option<f64> {
        if !self.thermal_active {
            return None;
        }
        match self.thermal_phase {
            ThermalPhase::MorningUpslope => Some(uphill_bearing),
            ThermalPhase::EveningDownslope => Some(downhill_bearing),
            ThermalPhase::None => None,
        }
    }
}

/// Thermal phase and strength for a local clock hour.
///
/// Strength follows a half-sine over each configured window, peaking at its
/// midpoint, and is damped by cloud or precipitation.
pub fn derive_thermal(local_hour: f64, weather: Weather, config: &ThermalConfig) -> (ThermalPhase, f64) {
    let windows = [
        (ThermalPhase::MorningUpslope, config.morning_start_hour, config.morning_end_hour),
        (ThermalPhase::EveningDownslope, config.evening_start_hour, config.evening_end_hour),
    ];

    for (phase, start, end) in windows {
        if end > start && local_hour >= start && local_hour < end {
            let progress = (local_hour - start) / (end - start);
            let strength = (std::f64::consts::PI * progress).sin() * weather.thermal_factor();
            if strength >= config.min_strength {
                return (phase, strength.clamp(0.0, 1.0));
            }
            return (ThermalPhase::None, 0.0);
        }
    }
    (ThermalPhase::None, 0.0)
}
