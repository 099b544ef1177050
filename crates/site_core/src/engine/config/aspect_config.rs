use serde::{Deserialize, Serialize};

/// Aspect scoring thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    /// Above this wind speed, leeward shelter dominates aspect scoring (mph)
    pub wind_shelter_threshold_mph: f64,
    /// Full credit within this angle of leeward (degrees)
    pub full_credit_deg: f64,
    /// No credit beyond this angle of leeward (degrees)
    pub zero_credit_deg: f64,
    /// Below this temperature, south-facing slopes are preferred (°F)
    pub cold_threshold_f: f64,
    /// Above this temperature, north-facing slopes are preferred (°F)
    pub hot_threshold_f: f64,
    /// Score for mild temperatures and flat ground
    pub neutral_score: f64,
    /// Slopes steeper than this are penalized (degrees)
    pub steep_slope_deg: f64,
    pub steep_slope_penalty: f64,
    /// Inclusive slope band that earns a bonus (degrees)
    pub bonus_slope_min_deg: f64,
    pub bonus_slope_max_deg: f64,
    pub slope_bonus: f64,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            wind_shelter_threshold_mph: 10.0,
            full_credit_deg: 30.0,
            zero_credit_deg: 90.0,
            cold_threshold_f: 32.0,
            hot_threshold_f: 75.0,
            neutral_score: 50.0,
            steep_slope_deg: 30.0,
            steep_slope_penalty: 20.0,
            bonus_slope_min_deg: 10.0,
            bonus_slope_max_deg: 25.0,
            slope_bonus: 10.0,
        }
    }
}
