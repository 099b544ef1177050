//! Site CLI Library
//!
//! File plumbing around the `site_core` JSON API: request files in, ranked
//! reports out.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use site_core::api::{self, BatchEntry, SiteResponse};
use site_core::engine::config::EngineConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// Per-batch outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

/// Config file when given, else `SITE_CONFIG_PATH` / `SITE_CONFIG_PROFILE`,
/// else the default.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => EngineConfig::from_env_or_default().context("Failed to load config from environment"),
    }
}

/// Evaluate one request file. Returns the response JSON.
pub fn run_score(input: &Path, config: &EngineConfig, pretty: bool) -> Result<String> {
    let request_json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read request file: {}", input.display()))?;
    let response = api::evaluate_site_json_with_config(&request_json, config)
        .with_context(|| format!("Evaluation failed for {}", input.display()))?;
    if pretty {
        prettify(&response)
    } else {
        Ok(response)
    }
}

/// Evaluate a file holding a JSON array of requests.
pub fn run_batch(input: &Path, config: &EngineConfig, pretty: bool) -> Result<(String, BatchSummary)> {
    let requests_json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read batch file: {}", input.display()))?;
    let response = api::evaluate_batch_json_with_config(&requests_json, config)
        .with_context(|| format!("Batch evaluation failed for {}", input.display()))?;

    let entries: Vec<BatchEntry> =
        serde_json::from_str(&response).context("Failed to decode batch response")?;
    let ok = entries.iter().filter(|e| matches!(e, BatchEntry::Ok(_))).count();
    let summary = BatchSummary { total: entries.len(), ok, failed: entries.len() - ok };
    info!(total = summary.total, ok = summary.ok, failed = summary.failed, "batch scored");

    let out = if pretty { prettify(&response)? } else { response };
    Ok((out, summary))
}

/// Preset rendered as `json` or `yaml`.
pub fn render_config(preset: &str, format: &str) -> Result<String> {
    let Some(config) = EngineConfig::preset(preset) else {
        bail!("Unknown preset '{preset}' (expected default, flatland or mountain)");
    };
    match format {
        "json" => Ok(serde_json::to_string_pretty(&config)?),
        "yaml" => Ok(config.to_yaml()?),
        other => bail!("Unknown format '{other}' (expected json or yaml)"),
    }
}

pub fn render_schema() -> Result<String> {
    Ok(api::request_schema_json()?)
}

/// One line per category: best candidate with its confidence.
pub fn summary_lines(response_json: &str) -> Result<Vec<String>> {
    let response: SiteResponse =
        serde_json::from_str(response_json).context("Failed to decode site response")?;
    let report = &response.report;

    let mut lines: Vec<String> = report
        .categories
        .iter()
        .map(|r| match r.candidates.first() {
            Some(best) => format!(
                "{:<8} {:<10} {:>5.1}  {:>3.0}° {:>4.0} m  ({} candidate(s))",
                r.category.as_str(),
                best.role.as_str(),
                best.confidence(),
                best.bearing_degrees,
                best.distance_meters,
                r.candidates.len()
            ),
            None => format!("{:<8} no candidates", r.category.as_str()),
        })
        .collect();
    lines.extend(report.degradations.iter().map(|d| format!("degraded: {d}")));
    Ok(lines)
}

/// Write to `out` (creating parent directories) or stdout.
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
            }
            fs::write(path, content).with_context(|| format!("Failed to write output file: {}", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn prettify(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REQUEST: &str = r#"{
        "latitude": 44.0,
        "longitude": -72.0,
        "timestamp": "2024-09-20T18:00:00-04:00",
        "terrain": {"type": "sample", "latitude": 44.0, "longitude": -72.0,
                    "elevation_m": 300.0, "slope_degrees": 9.0, "aspect_degrees": 135.0,
                    "coverage_radius_m": 1000.0},
        "wind": {"bearing_degrees": 225.0, "speed_mph": 11.0},
        "temperature_f": 62.0
    }"#;

    fn temp_json(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_run_score_pretty() {
        let file = temp_json(REQUEST);
        let out = run_score(file.path(), &EngineConfig::default(), true).unwrap();
        assert!(out.contains("\n  \"report\""));
        let lines = summary_lines(&out).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("bedding")));
        assert!(lines.iter().any(|l| l.starts_with("camera")));
    }

    #[test]
    fn test_run_score_missing_file() {
        let err = run_score(Path::new("/nonexistent/req.json"), &EngineConfig::default(), false).unwrap_err();
        assert!(err.to_string().contains("Failed to read request file"));
    }

    #[test]
    fn test_run_batch_counts() {
        let file = temp_json(&format!("[{REQUEST}, {{\"latitude\": 1.0}}]"));
        let (out, summary) = run_batch(file.path(), &EngineConfig::default(), false).unwrap();
        assert_eq!(summary, BatchSummary { total: 2, ok: 1, failed: 1 });
        assert!(out.starts_with('['));
    }

    #[test]
    fn test_render_config() {
        let yaml = render_config("mountain", "yaml").unwrap();
        assert!(yaml.contains("gentle_slope_deg: 8.0"));
        let json = render_config("flatland", "json").unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert!((parsed.stand.gentle_slope_deg - 3.0).abs() < 1e-9);
        assert!(render_config("swamp", "json").is_err());
        assert!(render_config("default", "toml").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "validation:\n  mismatch_delta_pct: 35.0\n").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert!((config.validation.mismatch_delta_pct - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_output_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_output(Some(&path), "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_schema_renders() {
        let schema = render_schema().unwrap();
        assert!(schema.contains("\"SiteRequest\""));
    }
}
