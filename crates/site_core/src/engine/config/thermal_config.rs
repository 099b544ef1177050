use serde::{Deserialize, Serialize};

/// Local clock windows for diurnal thermal drafts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    pub morning_start_hour: f64,
    pub morning_end_hour: f64,
    pub evening_start_hour: f64,
    pub evening_end_hour: f64,
    /// Derived strengths below this are treated as no thermal (0.0 - 1.0)
    pub min_strength: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            morning_start_hour: 7.0,
            morning_end_hour: 11.0,
            evening_start_hour: 16.0,
            evening_end_hour: 20.0,
            min_strength: 0.05,
        }
    }
}
