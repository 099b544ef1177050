use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that stop an evaluation. No candidates are produced.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Coordinates ({latitude:.6}, {longitude:.6}) are outside terrain coverage")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteError {
    /// Whether a caller can retry with corrected input rather than giving up.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SiteError::InvalidCoordinates { .. } => false,
            SiteError::InvalidInput(_) => true,
            SiteError::InvalidConfig(_) => true,
            SiteError::Json(_) => true,
            SiteError::Yaml(_) => true,
            SiteError::Io(_) => true,
        }
    }

    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            SiteError::InvalidCoordinates { .. } => "invalid_coordinates",
            SiteError::InvalidInput(_) => "invalid_input",
            SiteError::InvalidConfig(_) => "invalid_config",
            SiteError::Json(_) => "json",
            SiteError::Yaml(_) => "yaml",
            SiteError::Io(_) => "io",
        }
    }
}

impl From<validator::ValidationErrors> for SiteError {
    fn from(err: validator::ValidationErrors) -> Self {
        SiteError::InvalidInput(err.to_string())
    }
}

/// Input problems that were recovered locally. Reported next to the results.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    #[error("Wind data missing; placement falls back to terrain and deer movement")]
    MissingWindData,

    #[error("Terrain is flat at the target; all roles use wind-only bearings")]
    DegenerateTerrain,

    #[error("Vegetation baselines disagree; confidence capped on {candidates} candidate(s)")]
    StaleBaselineMismatch { candidates: usize },
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinates_is_fatal() {
        let err = SiteError::InvalidCoordinates { latitude: 45.0, longitude: -90.0 };
        assert!(!err.is_recoverable());
        assert_eq!(err.code(), "invalid_coordinates");
        assert!(err.to_string().contains("outside terrain coverage"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: SiteError = parse.unwrap_err().into();
        assert_eq!(err.code(), "json");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_degradation_serializes_with_kind_tag() {
        let json = serde_json::to_value(Degradation::StaleBaselineMismatch { candidates: 3 }).unwrap();
        assert_eq!(json["kind"], "stale_baseline_mismatch");
        assert_eq!(json["candidates"], 3);
    }
}
