use serde::{Deserialize, Serialize};

/// Baseline cross-check thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Slow/fast baseline disagreement that triggers a temporal mismatch (percentage points)
    pub mismatch_delta_pct: f64,
    /// Disagreement above which the mismatch is critical (percentage points)
    pub critical_delta_pct: f64,
    /// Confidence ceiling for temporally mismatched candidates
    pub mismatch_confidence_cap: f64,
    /// Readings below this quality count as low-confidence data (0.0 - 1.0)
    pub min_reading_quality: f64,
    /// Confidence ceiling when baseline data is missing or poor
    pub low_data_confidence_cap: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mismatch_delta_pct: 40.0,
            critical_delta_pct: 60.0,
            mismatch_confidence_cap: 50.0,
            min_reading_quality: 0.3,
            low_data_confidence_cap: 70.0,
        }
    }
}
