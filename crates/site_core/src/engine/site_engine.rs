//! SiteEngine - composition root for a full site evaluation.
//!
//! Pipeline per request:
//! 1. validate the request and build terrain and environment
//! 2. generate candidates per category
//! 3. score and rank
//! 4. cross-check baselines, cap confidence, re-rank
//!
//! Every component sits behind a trait so tests and callers can swap one
//! out through [`SiteEngineBuilder`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::aspect_scorer::{AspectScorer, DefaultAspectScorer};
use crate::engine::bearing;
use crate::engine::candidate_generator::{
    default_movement_bearing, CandidateGeneration, DefaultCandidateGenerator, GenerationContext,
};
use crate::engine::config::EngineConfig;
use crate::engine::scoring::ScoringEngine;
use crate::engine::stand_position::{StandPositionCalculator, StandPositioner};
use crate::engine::validation::{BaselineValidator, DefaultBaselineValidator};
use crate::error::{Degradation, Result};
use crate::models::{
    derive_thermal, Candidate, Category, FlagKind, Season, SiteRequest, Weather, WindThermalState,
};
use crate::terrain::{TerrainModel, TerrainPoint};

// ============================================================================
// Report
// ============================================================================

/// Ranked candidates for one category, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: Category,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub anchor: TerrainPoint,
    pub environment: WindThermalState,
    pub season: Season,
    pub weather: Weather,
    pub deer_movement_bearing: f64,
    pub categories: Vec<CategoryReport>,
    #[serde(default)]
    pub degradations: Vec<Degradation>,
}

impl SiteReport {
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|r| r.category == category)
    }

    /// Top-ranked candidate of a category.
    pub fn best(&self, category: Category) -> Option<&Candidate> {
        self.category(category).and_then(|r| r.candidates.first())
    }

    pub fn candidate_count(&self) -> usize {
        self.categories.iter().map(|r| r.candidates.len()).sum()
    }
}

// ============================================================================
// SiteEngine
// ============================================================================

pub struct SiteEngine {
    config: EngineConfig,
    aspect_scorer: Box<dyn AspectScorer>,
    positioner: Box<dyn StandPositioner>,
    generator: Box<dyn CandidateGeneration>,
    validator: Box<dyn BaselineValidator>,
    scoring: ScoringEngine,
}

impl std::fmt::Debug for SiteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteEngine").field("config", &self.config).finish_non_exhaustive()
    }
}

impl SiteEngine {
    /// Engine with the default component for every seam.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: EngineConfig) -> SiteEngineBuilder {
        SiteEngineBuilder::new(config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, request: &SiteRequest) -> Result<SiteReport> {
        request.check()?;

        let terrain = TerrainModel::new(request.terrain.clone())?;
        let anchor = terrain.point_at(request.latitude, request.longitude)?;
        let mut degradations = Vec::new();

        let season = request.season();
        let weather = request.weather();
        let (phase, strength) = match request.thermal {
            Some(t) => (t.phase, t.strength),
            None => derive_thermal(request.local_hour(), weather, &self.config.thermal),
        };
        let wind = match request.wind {
            Some(w) => WindThermalState::new(
                w.bearing_degrees,
                w.speed_mph,
                request.temperature_f,
                phase,
                strength,
            ),
            None => {
                warn!("no wind observation; wind weight forced to zero");
                degradations.push(Degradation::MissingWindData);
                WindThermalState::calm(request.temperature_f, phase, strength)
            }
        };
        if anchor.degenerate {
            warn!(
                latitude = request.latitude,
                longitude = request.longitude,
                "flat terrain at anchor; slope-driven placement disabled"
            );
            degradations.push(Degradation::DegenerateTerrain);
        }

        let deer_movement_bearing = request
            .deer_movement_bearing
            .map(bearing::normalize)
            .unwrap_or_else(|| default_movement_bearing(&anchor, &wind));

        let ctx = GenerationContext {
            terrain: &terrain,
            features: &request.features,
            deer_movement_bearing,
            baselines: &request.baselines,
            aspect_scorer: self.aspect_scorer.as_ref(),
            positioner: self.positioner.as_ref(),
        };

        let mut categories = Vec::new();
        let mut mismatched = 0;
        for category in request.categories() {
            let generated = self.generator.generate(category, &anchor, &wind, &request.roles, &ctx);
            let mut ranked = self.scoring.score_and_rank(generated, season, weather);
            for candidate in &mut ranked {
                if self.validator.check(candidate, &request.baselines) == Some(FlagKind::TemporalMismatch) {
                    mismatched += 1;
                }
            }
            let candidates = self.scoring.rank(ranked);
            debug!(category = category.as_str(), count = candidates.len(), "category ranked");
            categories.push(CategoryReport { category, candidates });
        }

        if mismatched > 0 {
            warn!(candidates = mismatched, "vegetation baselines disagree; confidence capped");
            degradations.push(Degradation::StaleBaselineMismatch { candidates: mismatched });
        }

        let report = SiteReport {
            anchor,
            environment: wind,
            season,
            weather,
            deer_movement_bearing,
            categories,
            degradations,
        };
        info!(
            candidates = report.candidate_count(),
            degradations = report.degradations.len(),
            season = ?season,
            "site evaluated"
        );
        Ok(report)
    }

    /// Independent evaluations in parallel, results in input order.
    pub fn evaluate_batch(&self, requests: &[SiteRequest]) -> Vec<Result<SiteReport>> {
        requests.par_iter().map(|r| self.evaluate(r)).collect()
    }
}

// ============================================================================
// SiteEngineBuilder
// ============================================================================

/// Consuming builder; unset components fall back to the defaults built
/// from the config.
pub struct SiteEngineBuilder {
    config: EngineConfig,
    aspect_scorer: Option<Box<dyn AspectScorer>>,
    positioner: Option<Box<dyn StandPositioner>>,
    generator: Option<Box<dyn CandidateGeneration>>,
    validator: Option<Box<dyn BaselineValidator>>,
    scoring: Option<ScoringEngine>,
}

impl SiteEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            aspect_scorer: None,
            positioner: None,
            generator: None,
            validator: None,
            scoring: None,
        }
    }

    pub fn aspect_scorer(mut self, scorer: impl AspectScorer + 'static) -> Self {
        self.aspect_scorer = Some(Box::new(scorer));
        self
    }

    pub fn positioner(mut self, positioner: impl StandPositioner + 'static) -> Self {
        self.positioner = Some(Box::new(positioner));
        self
    }

    pub fn generator(mut self, generator: impl CandidateGeneration + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn validator(mut self, validator: impl BaselineValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn scoring(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = Some(scoring);
        self
    }

    /// Validate the config and assemble the engine.
    pub fn build(self) -> Result<SiteEngine> {
        self.config.validate()?;
        let config = self.config;
        Ok(SiteEngine {
            aspect_scorer: self
                .aspect_scorer
                .unwrap_or_else(|| Box::new(DefaultAspectScorer::new(config.aspect.clone()))),
            positioner: self
                .positioner
                .unwrap_or_else(|| Box::new(StandPositionCalculator::new(config.stand.clone()))),
            generator: self
                .generator
                .unwrap_or_else(|| Box::new(DefaultCandidateGenerator::new(config.generator.clone()))),
            validator: self
                .validator
                .unwrap_or_else(|| Box::new(DefaultBaselineValidator::new(config.validation.clone()))),
            scoring: self.scoring.unwrap_or_else(|| ScoringEngine::from_config(&config)),
            config,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
