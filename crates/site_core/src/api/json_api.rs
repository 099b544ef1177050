use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::engine::config::EngineConfig;
use crate::engine::{SiteEngine, SiteReport};
use crate::error::{Result, SiteError};
use crate::models::SiteRequest;
use crate::SCHEMA_VERSION;

/// Config used by the plain entry points: `SITE_CONFIG_PATH` /
/// `SITE_CONFIG_PROFILE` when set and valid, else the default.
static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(|| {
    EngineConfig::from_env_or_default().unwrap_or_else(|err| {
        warn!(error = %err, "falling back to default engine config");
        EngineConfig::default()
    })
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteResponse {
    pub schema_version: u8,
    /// SHA256 hex of the request JSON exactly as received
    pub request_digest: String,
    pub report: SiteReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub recoverable: bool,
}

impl From<&SiteError> for ErrorResponse {
    fn from(err: &SiteError) -> Self {
        Self { code: err.code().to_string(), message: err.to_string(), recoverable: err.is_recoverable() }
    }
}

/// One batch slot: `{"ok": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchEntry {
    Ok(SiteResponse),
    Error(ErrorResponse),
}

pub fn request_digest(request_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request_json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Evaluate one request with the environment/default config.
pub fn evaluate_site_json(request_json: &str) -> Result<String> {
    evaluate_site_json_with_config(request_json, &DEFAULT_CONFIG)
}

pub fn evaluate_site_json_with_config(request_json: &str, config: &EngineConfig) -> Result<String> {
    let request: SiteRequest = serde_json::from_str(request_json)?;
    let engine = SiteEngine::new(config.clone())?;
    let report = engine.evaluate(&request)?;

    let response = SiteResponse {
        schema_version: SCHEMA_VERSION,
        request_digest: request_digest(request_json),
        report,
    };
    Ok(serde_json::to_string(&response)?)
}

/// Evaluate a JSON array of requests. A malformed or failing element yields an
/// error entry in its slot; only a malformed outer array is an error.
///
/// Each element's digest covers its compact re-serialization.
pub fn evaluate_batch_json(requests_json: &str) -> Result<String> {
    evaluate_batch_json_with_config(requests_json, &DEFAULT_CONFIG)
}

pub fn evaluate_batch_json_with_config(requests_json: &str, config: &EngineConfig) -> Result<String> {
    let values: Vec<serde_json::Value> = serde_json::from_str(requests_json)?;
    let engine = SiteEngine::new(config.clone())?;
    debug!(requests = values.len(), "batch evaluation");

    let parsed: Vec<Result<SiteRequest>> = values
        .iter()
        .map(|v| serde_json::from_value(v.clone()).map_err(SiteError::from))
        .collect();
    let valid: Vec<SiteRequest> = parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();
    let mut reports = engine.evaluate_batch(&valid).into_iter();

    let entries: Vec<BatchEntry> = values
        .iter()
        .zip(parsed)
        .map(|(value, parsed)| {
            let outcome = parsed.and_then(|_| {
                reports.next().unwrap_or_else(|| {
                    Err(SiteError::InvalidInput("batch result missing for request".to_string()))
                })
            });
            match outcome {
                Ok(report) => BatchEntry::Ok(SiteResponse {
                    schema_version: SCHEMA_VERSION,
                    request_digest: request_digest(&value.to_string()),
                    report,
                }),
                Err(err) => BatchEntry::Error(ErrorResponse::from(&err)),
            }
        })
        .collect();

    Ok(serde_json::to_string(&entries)?)
}

/// JSON Schema of [`SiteRequest`].
pub fn request_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(SiteRequest);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, FlagKind};

    const REQUEST: &str = r#"{
        "schema_version": 1,
        "latitude": 44.0,
        "longitude": -72.0,
        "timestamp": "2024-10-12T07:45:00-04:00",
        "terrain": {"type": "sample", "latitude": 44.0, "longitude": -72.0,
                    "elevation_m": 380.0, "slope_degrees": 14.0, "aspect_degrees": 200.0,
                    "coverage_radius_m": 1000.0},
        "wind": {"bearing_degrees": 300.0, "speed_mph": 7.0},
        "temperature_f": 36.0,
        "baselines": {"slow": {"cover_pct": 80.0, "observed_year": 2019},
                      "fast": {"cover_pct": 74.0, "observed_year": 2024}},
        "features": [{"kind": "water", "latitude": 43.9985, "longitude": -72.0008}]
    }"#;

    /// The request with one top-level field replaced.
    fn with_field(key: &str, value: serde_json::Value) -> String {
        let mut request: serde_json::Value = serde_json::from_str(REQUEST).unwrap();
        request[key] = value;
        request.to_string()
    }

    fn parse(json: &str) -> SiteResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_evaluate_site_json() {
        let out = evaluate_site_json_with_config(REQUEST, &EngineConfig::default()).unwrap();
        let response = parse(&out);
        assert_eq!(response.schema_version, 1);
        assert_eq!(response.request_digest, request_digest(REQUEST));
        assert_eq!(response.request_digest.len(), 64);
        assert_eq!(response.report.categories.len(), 4);
        assert!(response.report.best(Category::Feeding).is_some());
    }

    #[test]
    fn test_identical_input_identical_bytes() {
        let a = evaluate_site_json_with_config(REQUEST, &EngineConfig::default()).unwrap();
        let b = evaluate_site_json_with_config(REQUEST, &EngineConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stale_baseline_reported() {
        let stale = REQUEST.replace("\"cover_pct\": 74.0", "\"cover_pct\": 8.0");
        let response = parse(&evaluate_site_json_with_config(&stale, &EngineConfig::default()).unwrap());
        let best = response.report.best(Category::Bedding).unwrap();
        assert!(best.has_flag(FlagKind::TemporalMismatch));
        assert!(best.confidence() <= 50.0);
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = evaluate_site_json_with_config("{\"latitude\":", &EngineConfig::default()).unwrap_err();
        assert_eq!(err.code(), "json");
    }

    #[test]
    fn test_outside_coverage_error() {
        let far = with_field("longitude", serde_json::json!(-71.0));
        let err = evaluate_site_json_with_config(&far, &EngineConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_coordinates");
    }

    #[test]
    fn test_oversized_grid_is_invalid_input() {
        let request = with_field(
            "terrain",
            serde_json::json!({"type": "grid", "origin_latitude": 44.0, "origin_longitude": -72.0,
                               "cell_size_m": 30.0, "rows": 4294967296u64, "cols": 4294967296u64,
                               "elevations_m": []}),
        );
        let err = evaluate_site_json_with_config(&request, &EngineConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_batch_slots_in_order() {
        let far = with_field("latitude", serde_json::json!(45.0));
        let batch = format!("[{REQUEST}, {{\"latitude\": \"north\"}}, {far}]");
        let out = evaluate_batch_json_with_config(&batch, &EngineConfig::default()).unwrap();
        let entries: Vec<BatchEntry> = serde_json::from_str(&out).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], BatchEntry::Ok(_)));
        match &entries[1] {
            BatchEntry::Error(e) => assert_eq!(e.code, "json"),
            other => panic!("expected error, got {other:?}"),
        }
        match &entries[2] {
            BatchEntry::Error(e) => {
                assert_eq!(e.code, "invalid_coordinates");
                assert!(!e.recoverable);
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_rejects_non_array() {
        assert!(evaluate_batch_json_with_config("{}", &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_schema_accepts_sample_request() {
        let schema: serde_json::Value = serde_json::from_str(&request_schema_json().unwrap()).unwrap();
        let compiled = jsonschema::JSONSchema::compile(&schema).unwrap();

        let request: serde_json::Value = serde_json::from_str(REQUEST).unwrap();
        assert!(compiled.is_valid(&request));

        let mut missing = request.clone();
        missing.as_object_mut().unwrap().remove("terrain");
        assert!(!compiled.is_valid(&missing));
    }
}
