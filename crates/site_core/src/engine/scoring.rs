//! Weighted confidence, deterministic ranking and near-duplicate removal.

use std::cmp::Ordering;

use crate::engine::bearing::polar_separation_m;
use crate::engine::config::{EngineConfig, PerCategory};
use crate::engine::weights::WeightTables;
use crate::models::{Candidate, Factor, Season, Weather};

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: WeightTables,
    min_separation_m: PerCategory<f64>,
}

impl ScoringEngine {
    pub fn new(weights: WeightTables, min_separation_m: PerCategory<f64>) -> Self {
        Self { weights, min_separation_m }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.weights.clone(), config.generator.min_separation_m)
    }

    pub fn weights(&self) -> &WeightTables {
        &self.weights
    }

    /// Weighted mean of the raw scores present on the candidate.
    ///
    /// Factors without a raw score drop out and the remaining weights are
    /// renormalized.
    pub fn confidence(&self, candidate: &Candidate, season: Season, weather: Weather) -> f64 {
        let weights = self.weights.effective(candidate.category, season, weather);
        let (weighted, total) = Factor::ALL
            .iter()
            .filter_map(|f| candidate.raw(*f).map(|raw| (weights.get(*f), raw)))
            .fold((0.0, 0.0), |(acc, total), (w, raw)| (acc + w * raw, total + w));
        if total <= 0.0 {
            return 0.0;
        }
        (weighted / total).clamp(0.0, 100.0)
    }

    pub fn score(&self, candidate: &mut Candidate, season: Season, weather: Weather) {
        let confidence = self.confidence(candidate, season, weather);
        candidate.set_confidence(confidence);
    }

    pub fn score_and_rank(
        &self,
        mut candidates: Vec<Candidate>,
        season: Season,
        weather: Weather,
    ) -> Vec<Candidate> {
        for candidate in &mut candidates {
            self.score(candidate, season, weather);
        }
        self.dedup(self.rank(candidates))
    }

    /// Sort without re-scoring.
    pub fn rank(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(compare);
        candidates
    }

    /// Drop lower-ranked candidates within their category's minimum
    /// separation of a kept one. Input must already be ranked.
    pub fn dedup(&self, ranked: Vec<Candidate>) -> Vec<Candidate> {
        let mut kept: Vec<Candidate> = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            let min = self.min_separation_m.get(candidate.category);
            let crowded = kept.iter().any(|k| {
                k.category == candidate.category
                    && polar_separation_m(k.offset(), candidate.offset()) < min
            });
            if !crowded {
                kept.push(candidate);
            }
        }
        kept
    }
}

/// Confidence desc, aspect desc, role order, bearing asc, distance asc.
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    let aspect = |c: &Candidate| c.raw(Factor::Aspect).unwrap_or(0.0);
    b.confidence()
        .total_cmp(&a.confidence())
        .then_with(|| aspect(b).total_cmp(&aspect(a)))
        .then_with(|| a.role.cmp(&b.role))
        .then_with(|| a.bearing_degrees.total_cmp(&b.bearing_degrees))
        .then_with(|| a.distance_meters.total_cmp(&b.distance_meters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Role};
    use proptest::prelude::*;

    fn engine() -> ScoringEngine {
        ScoringEngine::from_config(&EngineConfig::default())
    }

    fn candidate(role: Role, bearing: f64, distance: f64, raw: f64) -> Candidate {
        let mut c = Candidate::new(Category::Bedding, role, bearing, distance);
        for factor in Factor::ALL {
            c.set_raw(factor, raw);
        }
        c
    }

    #[test]
    fn test_uniform_raw_scores_give_that_confidence() {
        let mut c = candidate(Role::Primary, 0.0, 150.0, 64.0);
        engine().score(&mut c, Season::Rut, Weather::HeavyRain);
        assert!((c.confidence() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_factor_renormalizes() {
        let mut c = Candidate::new(Category::Bedding, Role::Primary, 0.0, 150.0);
        c.set_raw(Factor::Aspect, 80.0);
        c.set_raw(Factor::Cover, 40.0);
        // Bedding weights aspect 0.25 and cover 0.25: equal share
        engine().score(&mut c, Season::EarlySeason, Weather::Clear);
        assert!((c.confidence() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_raw_scores_is_zero() {
        let mut c = Candidate::new(Category::Camera, Role::Primary, 0.0, 100.0);
        engine().score(&mut c, Season::Rut, Weather::Clear);
        assert_eq!(c.confidence(), 0.0);
    }

    #[test]
    fn test_rut_favours_travel() {
        let mut travel = Candidate::new(Category::Stand, Role::Primary, 0.0, 80.0);
        travel.set_raw(Factor::Travel, 100.0);
        travel.set_raw(Factor::Cover, 0.0);
        let early = engine().confidence(&travel, Season::EarlySeason, Weather::Clear);
        let rut = engine().confidence(&travel, Season::Rut, Weather::Clear);
        assert!(rut > early);
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let mut a = candidate(Role::Secondary, 30.0, 150.0, 60.0);
        let mut b = candidate(Role::Primary, 200.0, 150.0, 60.0);
        let mut c = candidate(Role::Primary, 100.0, 150.0, 60.0);
        let mut top = candidate(Role::Escape, 300.0, 75.0, 90.0);
        for x in [&mut a, &mut b, &mut c, &mut top] {
            engine().score(x, Season::Rut, Weather::Clear);
        }
        let ranked = engine().rank(vec![a, b, c, top]);
        let order: Vec<(Role, f64)> = ranked.iter().map(|c| (c.role, c.bearing_degrees)).collect();
        assert_eq!(
            order,
            vec![(Role::Escape, 300.0), (Role::Primary, 100.0), (Role::Primary, 200.0), (Role::Secondary, 30.0)]
        );
    }

    #[test]
    fn test_aspect_breaks_confidence_ties() {
        let mut low = Candidate::new(Category::Stand, Role::Primary, 0.0, 80.0);
        let mut high = Candidate::new(Category::Stand, Role::Secondary, 90.0, 80.0);
        low.set_raw(Factor::Aspect, 10.0);
        high.set_raw(Factor::Aspect, 90.0);
        low.set_confidence(55.0);
        high.set_confidence(55.0);
        let ranked = engine().rank(vec![low, high]);
        assert_eq!(ranked[0].role, Role::Secondary);
    }

    #[test]
    fn test_dedup_removes_crowded_lower_rank() {
        let near = candidate(Role::Secondary, 2.0, 150.0, 50.0);
        let best = candidate(Role::Primary, 0.0, 150.0, 80.0);
        let far = candidate(Role::Escape, 180.0, 150.0, 40.0);
        let mut other_category = candidate(Role::Primary, 0.0, 150.0, 70.0);
        other_category.category = Category::Feeding;
        let out = engine().score_and_rank(vec![near, best, far, other_category], Season::Rut, Weather::Clear);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|c| c.role != Role::Secondary));
    }

    proptest! {
        #[test]
        fn prop_confidence_in_bounds(raws in proptest::collection::vec(0.0f64..=100.0, 7)) {
            let mut c = Candidate::new(Category::Feeding, Role::Primary, 0.0, 200.0);
            for (factor, raw) in Factor::ALL.iter().zip(&raws) {
                c.set_raw(*factor, *raw);
            }
            for season in Season::ALL {
                for weather in Weather::ALL {
                    let conf = engine().confidence(&c, season, weather);
                    prop_assert!((0.0..=100.0).contains(&conf));
                }
            }
        }

        #[test]
        fn prop_ranking_is_order_independent(
            specs in proptest::collection::vec((0.0f64..360.0, 50.0f64..200.0, 0.0f64..100.0), 1..8)
        ) {
            let candidates: Vec<Candidate> = specs
                .iter()
                .map(|(b, d, raw)| {
                    let mut c = candidate(Role::Primary, *b, *d, *raw);
                    engine().score(&mut c, Season::PreRut, Weather::Overcast);
                    c
                })
                .collect();
            let mut reversed = candidates.clone();
            reversed.reverse();
            prop_assert_eq!(engine().rank(candidates), engine().rank(reversed));
        }
    }
}
