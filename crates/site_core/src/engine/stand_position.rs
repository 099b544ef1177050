//! Stand positioning: resolves a bearing and standoff distance for a stand
//! role by blending deer movement with the wind-opposing bearing.

use serde::{Deserialize, Serialize};

use crate::engine::bearing::{self, blend, circular_mean, nearest_to};
use crate::engine::config::StandConfig;
use crate::models::{Role, WindThermalState};

/// Which inputs decided the bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Slope steers deer; role bias plus wind blend
    TerrainBased,
    /// Flat ground; wind-opposing bearing only
    WindOnly,
    /// Flat ground and no usable wind; deer movement only
    MovementOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandPlacement {
    pub bearing: f64,
    pub distance_m: f64,
    pub wind_weight: f64,
    pub mode: PlacementMode,
    pub rationale: Vec<String>,
}

pub trait StandPositioner: Send + Sync {
    /// Wind share of the placement blend, 0–1.
    fn wind_weight(&self, wind: &WindThermalState) -> f64;

    /// Whether the slope is steep enough for terrain-based placement.
    fn uses_terrain(&self, slope: f64) -> bool;

    fn calculate(
        &self,
        role: Role,
        deer_movement_bearing: f64,
        uphill_bearing: f64,
        downhill_bearing: f64,
        wind: &WindThermalState,
        slope: f64,
    ) -> StandPlacement;
}

#[derive(Debug, Clone, Default)]
pub struct StandPositionCalculator {
    config: StandConfig,
}

impl StandPositionCalculator {
    pub fn new(config: StandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StandConfig {
        &self.config
    }

    fn is_strong_wind(&self, wind: &WindThermalState) -> bool {
        wind.wind_speed_mph >= self.config.strong_wind_mph
    }

    /// Deer-side bearing for a role before the wind blend.
    fn deer_component(
        &self,
        role: Role,
        movement: f64,
        uphill: f64,
        downhill: f64,
        wind: &WindThermalState,
        rationale: &mut Vec<String>,
    ) -> f64 {
        let c = &self.config;
        if self.is_strong_wind(wind) {
            rationale.push(format!(
                "{:.0} mph sustained wind overrides thermal drafts and role bias",
                wind.wind_speed_mph
            ));
            return bearing::normalize(movement);
        }

        match role {
            Role::Evening => {
                rationale.push("evening: biased downhill to intercept deer moving to feed".into());
                blend(movement, downhill, c.role_bias_weight)
            }
            Role::Morning => {
                rationale.push("morning: biased uphill to intercept deer returning to bed".into());
                blend(movement, uphill, c.role_bias_weight)
            }
            Role::AllDay => {
                let options = [
                    bearing::offset(wind.wind_bearing_degrees, c.crosswind_offset_deg),
                    bearing::offset(wind.wind_bearing_degrees, -c.crosswind_offset_deg),
                ];
                let cross = nearest_to(movement, &options).unwrap_or(options[0]);
                rationale.push(format!(
                    "all-day: crosswind {cross:.0}° hedges against wind shifts"
                ));
                cross
            }
            _ => bearing::normalize(movement),
        }
    }
}

impl StandPositioner for StandPositionCalculator {
    fn wind_weight(&self, wind: &WindThermalState) -> f64 {
        let c = &self.config;
        let speed = wind.wind_speed_mph;

        if speed >= c.strong_wind_mph {
            return c.strong_wind_weight;
        }
        if wind.thermal_active {
            return c
                .thermal_breakpoints
                .iter()
                .find(|bp| speed < bp.below_mph)
                .map(|bp| bp.weight)
                .unwrap_or(c.strong_wind_weight);
        }
        (speed / c.open_wind_divisor_mph).min(c.open_wind_weight_cap)
    }

    fn uses_terrain(&self, slope: f64) -> bool {
        slope > self.config.gentle_slope_deg
    }

    fn calculate(
        &self,
        role: Role,
        deer_movement_bearing: f64,
        uphill_bearing: f64,
        downhill_bearing: f64,
        wind: &WindThermalState,
        slope: f64,
    ) -> StandPlacement {
        let c = &self.config;
        let weight = self.wind_weight(wind);
        let leeward = wind.leeward_bearing();
        let mut rationale = Vec::new();

        let (bearing, mode) = if self.uses_terrain(slope) {
            let deer = self.deer_component(
                role,
                deer_movement_bearing,
                uphill_bearing,
                downhill_bearing,
                wind,
                &mut rationale,
            );
            let blended = circular_mean(&[(deer, 1.0 - weight), (leeward, weight)]).unwrap_or(deer);
            rationale.push(format!(
                "wind weight {weight:.2} blends {deer:.0}° deer movement with {leeward:.0}° downwind"
            ));
            (blended, PlacementMode::TerrainBased)
        } else if wind.has_wind() {
            rationale.push(format!(
                "slope {slope:.1}° is flat: wind-only placement downwind at {leeward:.0}°"
            ));
            (leeward, PlacementMode::WindOnly)
        } else {
            rationale.push("flat ground and no usable wind: following deer movement".into());
            (bearing::normalize(deer_movement_bearing), PlacementMode::MovementOnly)
        };

        let mut distance_m = c.role_distances.for_role(role);
        if self.is_strong_wind(wind) {
            distance_m *= c.strong_wind_distance_factor;
            rationale.push("standoff extended for strong wind".into());
        }

        StandPlacement { bearing, distance_m, wind_weight: weight, mode, rationale }
    }
}
