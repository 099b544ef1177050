//! Cross-checks candidates against slow- and fast-refresh vegetation
//! baselines. Flags only adjust confidence and presentation; a candidate is
//! never rejected here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::config::ValidationConfig;
use crate::models::{Candidate, FlagKind, Severity, ValidationFlag};

fn default_quality() -> f64 {
    1.0
}

/// One vegetation cover observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct BaselineReading {
    /// Canopy or ground cover, percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub cover_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_year: Option<i32>,
    #[serde(default = "default_quality")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub quality: f64,
}

impl BaselineReading {
    pub fn new(cover_pct: f64) -> Self {
        Self { cover_pct, observed_year: None, quality: default_quality() }
    }
}

/// A slowly refreshed survey (e.g. a multi-year canopy layer) next to a
/// recent observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct VegetationBaselines {
    #[serde(default)]
    #[validate]
    pub slow: Option<BaselineReading>,
    #[serde(default)]
    #[validate]
    pub fast: Option<BaselineReading>,
}

impl VegetationBaselines {
    /// Most recent cover figure available.
    pub fn current_cover(&self) -> Option<f64> {
        self.fast.or(self.slow).map(|r| r.cover_pct)
    }
}

pub trait BaselineValidator: Send + Sync {
    fn validate(
        &self,
        candidate: &Candidate,
        slow: Option<&BaselineReading>,
        fast: Option<&BaselineReading>,
    ) -> Option<ValidationFlag>;

    /// Attach the flag and cap confidence for its kind.
    fn apply(&self, candidate: &mut Candidate, flag: ValidationFlag);

    /// Validate and apply in one step. Returns the kind of flag attached.
    fn check(&self, candidate: &mut Candidate, baselines: &VegetationBaselines) -> Option<FlagKind> {
        let flag = self.validate(candidate, baselines.slow.as_ref(), baselines.fast.as_ref())?;
        let kind = flag.kind;
        self.apply(candidate, flag);
        Some(kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultBaselineValidator {
    config: ValidationConfig,
}

impl DefaultBaselineValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn cap_for(&self, kind: FlagKind) -> f64 {
        match kind {
            FlagKind::TemporalMismatch => self.config.mismatch_confidence_cap,
            FlagKind::LowDataConfidence => self.config.low_data_confidence_cap,
        }
    }

    fn mismatch(&self, slow: &BaselineReading, fast: &BaselineReading) -> Option<ValidationFlag> {
        let c = &self.config;
        let delta = (slow.cover_pct - fast.cover_pct).abs();
        if delta <= c.mismatch_delta_pct {
            return None;
        }

        let severity = if delta > c.critical_delta_pct { Severity::Critical } else { Severity::Warning };
        let years = match (slow.observed_year, fast.observed_year) {
            (Some(s), Some(f)) => format!(", observed {s} vs {f}"),
            _ => String::new(),
        };
        Some(ValidationFlag {
            kind: FlagKind::TemporalMismatch,
            severity,
            message: format!(
                "vegetation baselines disagree by {delta:.0} points (slow {:.0}%, fast {:.0}%){years}; confidence capped at {:.0}",
                slow.cover_pct, fast.cover_pct, c.mismatch_confidence_cap
            ),
        })
    }

    fn low_data(&self, slow: Option<&BaselineReading>, fast: Option<&BaselineReading>) -> Option<ValidationFlag> {
        let c = &self.config;
        let mut problems = Vec::new();
        for (name, reading) in [("slow", slow), ("fast", fast)] {
            match reading {
                None => problems.push(format!("{name} baseline missing")),
                Some(r) if r.quality < c.min_reading_quality => problems.push(format!(
                    "{name} baseline quality {:.2} below {:.2}",
                    r.quality, c.min_reading_quality
                )),
                Some(_) => {}
            }
        }
        if problems.is_empty() {
            return None;
        }
        Some(ValidationFlag {
            kind: FlagKind::LowDataConfidence,
            severity: Severity::Info,
            message: format!("{}; confidence capped at {:.0}", problems.join(", "), c.low_data_confidence_cap),
        })
    }
}

impl BaselineValidator for DefaultBaselineValidator {
    fn validate(
        &self,
        _candidate: &Candidate,
        slow: Option<&BaselineReading>,
        fast: Option<&BaselineReading>,
    ) -> Option<ValidationFlag> {
        if let (Some(s), Some(f)) = (slow, fast) {
            if let Some(flag) = self.mismatch(s, f) {
                return Some(flag);
            }
        }
        self.low_data(slow, fast)
    }

    fn apply(&self, candidate: &mut Candidate, flag: ValidationFlag) {
        let cap = self.cap_for(flag.kind);
        if candidate.confidence() > cap {
            candidate.set_confidence(cap);
        }
        candidate.flags.push(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Factor, Role};

    fn validator() -> DefaultBaselineValidator {
        DefaultBaselineValidator::new(ValidationConfig::default())
    }

    fn scored(confidence: f64) -> Candidate {
        let mut c = Candidate::new(Category::Bedding, Role::Primary, 0.0, 150.0);
        c.set_raw(Factor::Cover, 90.0);
        c.set_confidence(confidence);
        c
    }

    #[test]
    fn test_stale_canopy_is_temporal_mismatch() {
        let slow = BaselineReading::new(85.0);
        let fast = BaselineReading::new(10.0);
        let flag = validator().validate(&scored(80.0), Some(&slow), Some(&fast)).unwrap();
        insta::assert_json_snapshot!(flag, @r###"
        {
          "kind": "temporal_mismatch",
          "severity": "critical",
          "message": "vegetation baselines disagree by 75 points (slow 85%, fast 10%); confidence capped at 50"
        }
        "###);
    }

    #[test]
    fn test_mismatch_threshold_is_exclusive() {
        let slow = BaselineReading::new(70.0);
        let fast = BaselineReading::new(30.0);
        assert!(validator().validate(&scored(80.0), Some(&slow), Some(&fast)).is_none());

        let fast = BaselineReading::new(29.0);
        let flag = validator().validate(&scored(80.0), Some(&slow), Some(&fast)).unwrap();
        assert_eq!(flag.kind, FlagKind::TemporalMismatch);
        assert_eq!(flag.severity, Severity::Warning);
    }

    #[test]
    fn test_mismatch_caps_confidence_and_keeps_raw_scores() {
        let mut candidate = scored(82.0);
        let baselines = VegetationBaselines {
            slow: Some(BaselineReading { cover_pct: 90.0, observed_year: Some(2016), quality: 1.0 }),
            fast: Some(BaselineReading { cover_pct: 5.0, observed_year: Some(2024), quality: 1.0 }),
        };
        let kind = validator().check(&mut candidate, &baselines);
        assert_eq!(kind, Some(FlagKind::TemporalMismatch));
        assert_eq!(candidate.confidence(), 50.0);
        assert_eq!(candidate.raw(Factor::Cover), Some(90.0));
        assert!(candidate.flags[0].message.contains("2016 vs 2024"));
    }

    #[test]
    fn test_cap_never_raises_confidence() {
        let mut candidate = scored(30.0);
        let flag = validator()
            .validate(&candidate, Some(&BaselineReading::new(95.0)), Some(&BaselineReading::new(5.0)))
            .unwrap();
        validator().apply(&mut candidate, flag);
        assert_eq!(candidate.confidence(), 30.0);
        assert_eq!(candidate.flags.len(), 1);
    }

    #[test]
    fn test_missing_reading_is_low_data() {
        let mut candidate = scored(90.0);
        let baselines = VegetationBaselines { slow: Some(BaselineReading::new(60.0)), fast: None };
        assert_eq!(validator().check(&mut candidate, &baselines), Some(FlagKind::LowDataConfidence));
        assert_eq!(candidate.confidence(), 70.0);
        assert_eq!(candidate.flags[0].severity, Severity::Info);
        assert!(candidate.flags[0].message.contains("fast baseline missing"));
    }

    #[test]
    fn test_poor_quality_is_low_data() {
        let poor = BaselineReading { cover_pct: 60.0, observed_year: None, quality: 0.2 };
        let flag = validator()
            .validate(&scored(90.0), Some(&poor), Some(&BaselineReading::new(55.0)))
            .unwrap();
        assert_eq!(flag.kind, FlagKind::LowDataConfidence);
        assert!(flag.message.contains("slow baseline quality 0.20"));
    }

    #[test]
    fn test_agreeing_baselines_pass() {
        let mut candidate = scored(90.0);
        let baselines = VegetationBaselines {
            slow: Some(BaselineReading::new(80.0)),
            fast: Some(BaselineReading::new(75.0)),
        };
        assert_eq!(validator().check(&mut candidate, &baselines), None);
        assert_eq!(candidate.confidence(), 90.0);
        assert!(candidate.flags.is_empty());
    }

    #[test]
    fn test_reading_quality_defaults_to_one() {
        let reading: BaselineReading = serde_json::from_str(r#"{"cover_pct": 40.0}"#).unwrap();
        assert_eq!(reading.quality, 1.0);
        assert!(reading.validate().is_ok());
        let bad = BaselineReading { cover_pct: 140.0, observed_year: None, quality: 1.0 };
        assert!(bad.validate().is_err());
    }
}
