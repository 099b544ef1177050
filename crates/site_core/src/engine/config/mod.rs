//! # Engine Configuration
//!
//! Every tuning constant the engine uses lives here and is handed to each
//! component at construction. Nothing reads global mutable state.
//!
//! ## Presets
//! - `default()` - general purpose
//! - `flatland()` - agricultural/prairie terrain, lower slope threshold
//! - `mountain()` - broken ridge country, higher slope threshold
//!
//! ## Usage
//! ```rust
//! use site_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert!(config.validate().is_ok());
//! let mountain = EngineConfig::mountain();
//! assert!(mountain.stand.gentle_slope_deg > config.stand.gentle_slope_deg);
//! ```
//!
//! ## Environment Variables
//! - `SITE_CONFIG_PATH`: JSON or YAML config file
//! - `SITE_CONFIG_PROFILE`: preset name (default, flatland, mountain)

mod aspect_config;
mod generator_config;
mod stand_config;
mod thermal_config;
mod validation_config;

pub use aspect_config::AspectConfig;
pub use generator_config::{GeneratorConfig, PerCategory, SlopeRange};
pub use stand_config::{RoleDistances, StandConfig, WindBreakpoint};
pub use thermal_config::ThermalConfig;
pub use validation_config::ValidationConfig;

pub use crate::engine::weights::WeightTables;

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SiteError};
use crate::models::Category;

pub const CONFIG_PATH_ENV: &str = "SITE_CONFIG_PATH";
pub const CONFIG_PROFILE_ENV: &str = "SITE_CONFIG_PROFILE";

/// Full engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub aspect: AspectConfig,
    #[serde(default)]
    pub stand: StandConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub thermal: ThermalConfig,
    #[serde(default)]
    pub weights: WeightTables,
}

impl EngineConfig {
    /// Open agricultural terrain: gentle rolls already steer deer, so terrain
    /// placement kicks in earlier.
    pub fn flatland() -> Self {
        let mut cfg = Self::default();
        cfg.stand.gentle_slope_deg = 3.0;
        cfg.generator.slope_ranges.bedding = SlopeRange { min_deg: 3.0, max_deg: 15.0 };
        cfg.generator.camera_max_distance_m = 200.0;
        cfg
    }

    /// Broken ridge country: small undulations are noise, so the threshold rises.
    pub fn mountain() -> Self {
        let mut cfg = Self::default();
        cfg.stand.gentle_slope_deg = 8.0;
        cfg.aspect.steep_slope_deg = 35.0;
        cfg.generator.slope_ranges.bedding = SlopeRange { min_deg: 12.0, max_deg: 30.0 };
        cfg.generator.bedding_distance_m = 200.0;
        cfg
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" => Some(Self::default()),
            "flatland" => Some(Self::flatland()),
            "mountain" => Some(Self::mountain()),
            _ => None,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        debug!(path = %path.display(), "loading engine config");
        match ext.as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            other => Err(SiteError::InvalidConfig(format!(
                "unsupported config extension '{other}' for {}",
                path.display()
            ))),
        }
    }

    /// Config file from `SITE_CONFIG_PATH`, else preset from
    /// `SITE_CONFIG_PROFILE`, else default.
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let path = path.trim();
            if !path.is_empty() {
                info!(path, "engine config from {CONFIG_PATH_ENV}");
                return Self::from_file(Path::new(path));
            }
        }

        let profile = env::var(CONFIG_PROFILE_ENV).unwrap_or_default();
        Self::preset(&profile).ok_or_else(|| {
            SiteError::InvalidConfig(format!("unknown {CONFIG_PROFILE_ENV} preset '{profile}'"))
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SiteError::InvalidConfig(msg));

        self.weights.validate().map_err(SiteError::InvalidConfig)?;

        let a = &self.aspect;
        if a.full_credit_deg >= a.zero_credit_deg {
            return invalid(format!(
                "aspect.full_credit_deg ({}) must be below zero_credit_deg ({})",
                a.full_credit_deg, a.zero_credit_deg
            ));
        }
        if a.cold_threshold_f >= a.hot_threshold_f {
            return invalid("aspect.cold_threshold_f must be below hot_threshold_f".to_string());
        }
        if a.bonus_slope_min_deg > a.bonus_slope_max_deg {
            return invalid("aspect bonus slope band is inverted".to_string());
        }

        let s = &self.stand;
        if s.gentle_slope_deg < 0.0 {
            return invalid("stand.gentle_slope_deg must be non-negative".to_string());
        }
        if !(0.0..=1.0).contains(&s.strong_wind_weight) || !(0.0..=1.0).contains(&s.role_bias_weight) {
            return invalid("stand weights must lie in [0, 1]".to_string());
        }
        if s.open_wind_divisor_mph <= 0.0 {
            return invalid("stand.open_wind_divisor_mph must be positive".to_string());
        }
        let mut last_mph = f64::NEG_INFINITY;
        for bp in &s.thermal_breakpoints {
            if bp.below_mph <= last_mph {
                return invalid("stand.thermal_breakpoints must be strictly ascending".to_string());
            }
            if !(0.0..=1.0).contains(&bp.weight) {
                return invalid(format!("thermal breakpoint weight {} outside [0, 1]", bp.weight));
            }
            last_mph = bp.below_mph;
        }
        if last_mph > s.strong_wind_mph {
            return invalid("last thermal breakpoint exceeds stand.strong_wind_mph".to_string());
        }

        let g = &self.generator;
        if g.camera_min_distance_m <= 0.0 || g.camera_min_distance_m >= g.camera_max_distance_m {
            return invalid(format!(
                "camera distance band [{}, {}] is invalid",
                g.camera_min_distance_m, g.camera_max_distance_m
            ));
        }
        if g.camera_min_pitch_deg > g.camera_max_pitch_deg {
            return invalid("camera pitch band is inverted".to_string());
        }
        if g.separation_step_m <= 0.0 {
            return invalid("generator.separation_step_m must be positive".to_string());
        }
        for category in Category::ALL {
            let range = g.slope_ranges.get(category);
            if range.min_deg > range.max_deg {
                return invalid(format!("{} slope range is inverted", category.as_str()));
            }
            if g.min_separation_m.get(category) < 0.0 {
                return invalid(format!("{} min separation is negative", category.as_str()));
            }
        }

        let v = &self.validation;
        if v.mismatch_delta_pct > v.critical_delta_pct {
            return invalid("validation.mismatch_delta_pct exceeds critical_delta_pct".to_string());
        }

        Ok(())
    }
}

// ========== Tests ==========
