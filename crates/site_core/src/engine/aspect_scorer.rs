//! Aspect scoring: how well a slope's facing suits the current wind and
//! temperature.

use crate::engine::bearing::{angular_distance, leeward};
use crate::engine::config::AspectConfig;

/// Score with the reason that dominated it.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectScore {
    pub score: f64,
    pub rationale: String,
}

pub trait AspectScorer: Send + Sync {
    /// Score and explanation, 0–100.
    fn evaluate(
        &self,
        aspect: f64,
        wind_bearing: f64,
        wind_speed_mph: f64,
        temperature_f: f64,
        slope: f64,
    ) -> AspectScore;

    /// Score only, 0–100.
    fn score(
        &self,
        aspect: f64,
        wind_bearing: f64,
        wind_speed_mph: f64,
        temperature_f: f64,
        slope: f64,
    ) -> f64 {
        self.evaluate(aspect, wind_bearing, wind_speed_mph, temperature_f, slope).score
    }

    /// Score for ground with no defined aspect.
    fn flat_ground(&self) -> AspectScore;
}

/// Wind-shelter first, thermal comfort second, then slope adjustment.
#[derive(Debug, Clone, Default)]
pub struct DefaultAspectScorer {
    config: AspectConfig,
}

impl DefaultAspectScorer {
    pub fn new(config: AspectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AspectConfig {
        &self.config
    }

    /// 100 within `full_credit_deg` of leeward, 0 past `zero_credit_deg`,
    /// linear between.
    fn shelter_score(&self, aspect: f64, wind_bearing: f64) -> f64 {
        let c = &self.config;
        let d = angular_distance(aspect, leeward(wind_bearing));
        if d <= c.full_credit_deg {
            100.0
        } else if d >= c.zero_credit_deg {
            0.0
        } else {
            100.0 * (c.zero_credit_deg - d) / (c.zero_credit_deg - c.full_credit_deg)
        }
    }

    fn slope_adjustment(&self, slope: f64) -> (f64, Option<&'static str>) {
        let c = &self.config;
        if slope > c.steep_slope_deg {
            (-c.steep_slope_penalty, Some("steep slope penalized"))
        } else if (c.bonus_slope_min_deg..=c.bonus_slope_max_deg).contains(&slope) {
            (c.slope_bonus, Some("moderate slope bonus"))
        } else {
            (0.0, None)
        }
    }
}

impl AspectScorer for DefaultAspectScorer {
    fn evaluate(
        &self,
        aspect: f64,
        wind_bearing: f64,
        wind_speed_mph: f64,
        temperature_f: f64,
        slope: f64,
    ) -> AspectScore {
        let c = &self.config;

        let (base, mut rationale) = if wind_speed_mph > c.wind_shelter_threshold_mph {
            let s = self.shelter_score(aspect, wind_bearing);
            (s, format!("{wind_speed_mph:.0} mph wind: leeward shelter scored {s:.0}"))
        } else if temperature_f < c.cold_threshold_f {
            let s = 100.0 * (1.0 - angular_distance(aspect, 180.0) / 180.0);
            (s, format!("{temperature_f:.0}°F: south-facing warmth scored {s:.0}"))
        } else if temperature_f > c.hot_threshold_f {
            let s = 100.0 * (1.0 - angular_distance(aspect, 0.0) / 180.0);
            (s, format!("{temperature_f:.0}°F: north-facing shade scored {s:.0}"))
        } else {
            (c.neutral_score, "mild temperature: aspect neutral".to_string())
        };

        let (adjust, note) = self.slope_adjustment(slope);
        if let Some(note) = note {
            rationale.push_str("; ");
            rationale.push_str(note);
        }

        AspectScore { score: (base + adjust).clamp(0.0, 100.0), rationale }
    }

    fn flat_ground(&self) -> AspectScore {
        AspectScore {
            score: self.config.neutral_score.clamp(0.0, 100.0),
            rationale: "flat ground; aspect is neutral".to_string(),
        }
    }
}
