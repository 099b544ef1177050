use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Wind weight applied below `below_mph` when thermals are active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindBreakpoint {
    pub below_mph: f64,
    pub weight: f64,
}

/// Stand standoff distance per role (meters)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDistances {
    pub primary: f64,
    pub secondary: f64,
    pub escape: f64,
    pub emergency: f64,
    pub morning: f64,
    pub evening: f64,
    pub all_day: f64,
}

impl Default for RoleDistances {
    fn default() -> Self {
        Self {
            primary: 80.0,
            secondary: 100.0,
            escape: 40.0,
            emergency: 60.0,
            morning: 90.0,
            evening: 70.0,
            all_day: 80.0,
        }
    }
}

impl RoleDistances {
    pub fn for_role(&self, role: Role) -> f64 {
        match role {
            Role::Primary => self.primary,
            Role::Secondary => self.secondary,
            Role::Escape => self.escape,
            Role::Emergency => self.emergency,
            Role::Morning => self.morning,
            Role::Evening => self.evening,
            Role::AllDay => self.all_day,
        }
    }
}

/// Stand positioning thresholds.
///
/// The slope threshold and wind breakpoints are field-tuned values; presets
/// adjust them per terrain type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandConfig {
    /// At or below this slope, terrain is treated as flat (degrees)
    pub gentle_slope_deg: f64,
    /// At or above this wind speed, wind dominates placement (mph)
    pub strong_wind_mph: f64,
    /// Wind share of the blend under strong wind
    pub strong_wind_weight: f64,
    /// Ascending thermal-state breakpoints; speeds past the last one use `strong_wind_weight`
    pub thermal_breakpoints: Vec<WindBreakpoint>,
    /// Wind share cap without thermals
    pub open_wind_weight_cap: f64,
    /// Wind share without thermals is `speed / open_wind_divisor_mph`
    pub open_wind_divisor_mph: f64,
    /// Pull of morning/evening roles toward uphill/downhill (0.0 - 1.0)
    pub role_bias_weight: f64,
    pub crosswind_offset_deg: f64,
    pub role_distances: RoleDistances,
    /// Standoff multiplier under strong wind
    pub strong_wind_distance_factor: f64,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            gentle_slope_deg: 5.0,
            strong_wind_mph: 20.0,
            strong_wind_weight: 0.6,
            thermal_breakpoints: vec![
                WindBreakpoint { below_mph: 5.0, weight: 0.0 },
                WindBreakpoint { below_mph: 10.0, weight: 0.05 },
                WindBreakpoint { below_mph: 15.0, weight: 0.15 },
                WindBreakpoint { below_mph: 20.0, weight: 0.25 },
            ],
            open_wind_weight_cap: 0.4,
            open_wind_divisor_mph: 50.0,
            role_bias_weight: 0.5,
            crosswind_offset_deg: 90.0,
            role_distances: RoleDistances::default(),
            strong_wind_distance_factor: 1.2,
        }
    }
}
