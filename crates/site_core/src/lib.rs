//! # site_core - Deterministic Site Scoring and Placement Engine
//!
//! Turns already-fetched terrain, wind, temperature, thermal and vegetation
//! values into ranked, justified candidate locations for bedding, feeding,
//! stand and camera sites.
//!
//! ## Features
//! - 100% deterministic (same request = same bytes out)
//! - Every candidate carries its raw factor scores and a rationale
//! - Baseline cross-checks lower confidence instead of rejecting sites
//! - JSON API with a generated JSON Schema for requests
//!
//! ## Modules
//! | Module | Role |
//! |--------|------|
//! | [`terrain`] | elevation grid / sample coverage, slope and aspect, mapped features |
//! | [`models`] | candidates, wind/thermal state, season, weather, requests |
//! | [`engine`] | scorers, stand positioning, generation, validation, ranking |
//! | [`api`] | JSON entry points |
//! | [`error`] | fatal errors and recovered degradations |

// Scoring functions take the full environment tuple
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod terrain;

pub use api::{
    evaluate_batch_json, evaluate_site_json, evaluate_site_json_with_config, request_schema_json,
    SiteResponse,
};
pub use engine::config::EngineConfig;
pub use engine::{CategoryReport, SiteEngine, SiteReport};
pub use error::{Degradation, Result, SiteError};
pub use models::{Candidate, Category, Factor, Role, Season, SiteRequest, Weather, WindThermalState};
pub use terrain::{TerrainModel, TerrainPoint};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response schema version
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SiteEngine>();
    }
}
