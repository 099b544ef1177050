//! Candidate generation for bedding, feeding, stand and camera sites.
//!
//! Each category resolves bearings and distances from the anchor terrain, the
//! wind and the mapped features, spreads them apart to the category's minimum
//! separation, then fills every raw factor score for the final location.

use tracing::debug;

use crate::engine::aspect_scorer::AspectScorer;
use crate::engine::bearing::{self, angular_distance, polar_separation_m};
use crate::engine::config::{GeneratorConfig, SlopeRange};
use crate::engine::stand_position::StandPositioner;
use crate::engine::validation::VegetationBaselines;
use crate::models::{CameraSetup, Candidate, Category, Factor, Role, WindThermalState};
use crate::terrain::features::{self, FeatureKind};
use crate::terrain::{TerrainFeature, TerrainModel, TerrainPoint};

/// Score used when a factor has nothing to measure against.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Request-scoped inputs shared by every category.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub terrain: &'a TerrainModel,
    pub features: &'a [TerrainFeature],
    pub deer_movement_bearing: f64,
    pub baselines: &'a VegetationBaselines,
    pub aspect_scorer: &'a dyn AspectScorer,
    pub positioner: &'a dyn StandPositioner,
}

pub trait CandidateGeneration: Send + Sync {
    /// Candidates for one category. Roles outside the category are ignored;
    /// an empty slice means the category's default roles.
    fn generate(
        &self,
        category: Category,
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        roles: &[Role],
        ctx: &GenerationContext<'_>,
    ) -> Vec<Candidate>;
}

/// Deer head uphill toward bedding on sloped ground and into the wind on
/// flat ground.
pub fn default_movement_bearing(anchor: &TerrainPoint, wind: &WindThermalState) -> f64 {
    if anchor.degenerate {
        wind.wind_bearing_degrees
    } else {
        anchor.uphill_bearing
    }
}

/// Requested roles filtered to those the category allows, in category order.
pub fn resolve_roles(category: Category, requested: &[Role]) -> Vec<Role> {
    let allowed = category.allowed_roles();
    if requested.is_empty() {
        return allowed.to_vec();
    }
    allowed.iter().copied().filter(|r| requested.contains(r)).collect()
}

/// Bearing and distance before scoring.
#[derive(Debug, Clone)]
struct Placement {
    role: Role,
    bearing: f64,
    distance_m: f64,
    rationale: Vec<String>,
}

impl Placement {
    fn new(role: Role, bearing: f64, distance_m: f64, reason: impl Into<String>) -> Self {
        Self {
            role,
            bearing: bearing::normalize(bearing),
            distance_m,
            rationale: vec![reason.into()],
        }
    }

    fn offset(&self) -> (f64, f64) {
        (self.bearing, self.distance_m)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultCandidateGenerator {
    config: GeneratorConfig,
}

impl DefaultCandidateGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Uphill or downhill on sloped ground, downwind on flat ground, deer
    /// movement when flat and calm.
    fn base_bearing(
        &self,
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        ctx: &GenerationContext<'_>,
        uphill: bool,
    ) -> (f64, String) {
        if !anchor.degenerate && ctx.positioner.uses_terrain(anchor.slope_degrees) {
            let (b, word) = if uphill {
                (anchor.uphill_bearing, "uphill")
            } else {
                (anchor.downhill_bearing, "downhill")
            };
            (b, format!("{:.0}° slope: {word} at {b:.0}°", anchor.slope_degrees))
        } else if wind.has_wind() {
            let b = wind.leeward_bearing();
            (b, format!("flat terrain: downwind at {b:.0}°"))
        } else {
            let b = bearing::normalize(ctx.deer_movement_bearing);
            (b, format!("flat terrain and no usable wind: along deer movement at {b:.0}°"))
        }
    }

    fn bedding_placements(
        &self,
        roles: &[Role],
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        ctx: &GenerationContext<'_>,
    ) -> Vec<Placement> {
        let c = &self.config;
        let (primary, why) = self.base_bearing(anchor, wind, ctx, true);
        let distance = c.bedding_distance_m;

        roles
            .iter()
            .filter_map(|&role| match role {
                Role::Primary => Some(Placement::new(role, primary, distance, why.clone())),
                Role::Secondary => Some(Placement::new(
                    role,
                    primary + c.secondary_offset_deg,
                    distance,
                    format!("secondary bed {:.0}° off the primary bearing", c.secondary_offset_deg),
                )),
                Role::Escape => Some(Placement::new(
                    role,
                    primary,
                    distance * c.escape_distance_factor,
                    "escape bed on the primary line, closer to cover",
                )),
                _ => None,
            })
            .collect()
    }

    fn feeding_placements(
        &self,
        roles: &[Role],
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        ctx: &GenerationContext<'_>,
    ) -> Vec<Placement> {
        let c = &self.config;
        let (primary, why) = self.base_bearing(anchor, wind, ctx, false);
        let distance = c.feeding_distance_m;

        roles
            .iter()
            .filter_map(|&role| match role {
                Role::Primary => Some(Placement::new(role, primary, distance, why.clone())),
                Role::Secondary => Some(Placement::new(
                    role,
                    primary + c.secondary_offset_deg,
                    distance,
                    format!("secondary feed {:.0}° off the primary bearing", c.secondary_offset_deg),
                )),
                Role::Emergency => Some(self.emergency_placement(primary, anchor, ctx)),
                _ => None,
            })
            .collect()
    }

    fn emergency_placement(
        &self,
        primary: f64,
        anchor: &TerrainPoint,
        ctx: &GenerationContext<'_>,
    ) -> Placement {
        let c = &self.config;
        let kinds = [FeatureKind::Water, FeatureKind::Food];
        match features::nearest(
            ctx.features,
            &kinds,
            anchor.latitude,
            anchor.longitude,
            c.emergency_search_radius_m,
        ) {
            Some(fix) => Placement::new(
                Role::Emergency,
                fix.bearing,
                fix.distance_m,
                format!(
                    "nearest {} at {:.0} m: proximity outweighs bearing purity",
                    feature_name(fix.feature.kind),
                    fix.distance_m
                ),
            ),
            None => Placement::new(
                Role::Emergency,
                primary,
                c.feeding_distance_m * c.emergency_fallback_factor,
                format!(
                    "no water or food within {:.0} m: emergency feed on the primary line",
                    c.emergency_search_radius_m
                ),
            ),
        }
    }

    fn stand_placements(
        &self,
        roles: &[Role],
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        ctx: &GenerationContext<'_>,
    ) -> Vec<Placement> {
        let c = &self.config;
        let place = |role: Role| {
            ctx.positioner.calculate(
                role,
                ctx.deer_movement_bearing,
                anchor.uphill_bearing,
                anchor.downhill_bearing,
                wind,
                anchor.slope_degrees,
            )
        };
        let primary = place(Role::Primary);

        roles
            .iter()
            .map(|&role| match role {
                Role::Primary => Placement {
                    role,
                    bearing: primary.bearing,
                    distance_m: primary.distance_m,
                    rationale: primary.rationale.clone(),
                },
                Role::Secondary => {
                    let secondary = place(Role::Secondary);
                    Placement::new(
                        role,
                        primary.bearing + c.secondary_offset_deg,
                        secondary.distance_m,
                        format!("secondary stand {:.0}° off the primary stand", c.secondary_offset_deg),
                    )
                }
                _ => {
                    let p = place(role);
                    Placement {
                        role,
                        bearing: bearing::normalize(p.bearing),
                        distance_m: p.distance_m,
                        rationale: p.rationale,
                    }
                }
            })
            .collect()
    }

    fn camera_placements(&self, roles: &[Role], anchor: &TerrainPoint, ctx: &GenerationContext<'_>) -> Vec<Placement> {
        let c = &self.config;
        let crossings_at = |bearing_deg: f64, distance_m: f64| {
            let (lat, lon) = bearing::destination(anchor.latitude, anchor.longitude, bearing_deg, distance_m);
            features::count_within(ctx.features, FeatureKind::Trail, lat, lon, c.trail_detection_radius_m)
        };
        let mut edges = features::within(
            ctx.features,
            &[FeatureKind::Edge],
            anchor.latitude,
            anchor.longitude,
            c.edge_influence_radius_m,
        );

        let spots: Vec<Placement> = if edges.is_empty() {
            let movement = bearing::normalize(ctx.deer_movement_bearing);
            let mid = c.camera_band_mid_m();
            [0.0, -c.camera_fan_offset_deg, c.camera_fan_offset_deg]
                .iter()
                .map(|off| {
                    let b = bearing::offset(movement, *off);
                    Placement::new(Role::Primary, b, mid, format!("no mapped edges: fan along deer movement at {b:.0}°"))
                })
                .collect()
        } else {
            let mid = c.camera_band_mid_m();
            let clamp = |d: f64| d.clamp(c.camera_min_distance_m, c.camera_max_distance_m);
            // Likely winners claim their spot first when separation pushes others aside
            edges.sort_by(|a, b| {
                crossings_at(b.bearing, clamp(b.distance_m))
                    .cmp(&crossings_at(a.bearing, clamp(a.distance_m)))
                    .then((a.distance_m - mid).abs().total_cmp(&(b.distance_m - mid).abs()))
                    .then(a.bearing.total_cmp(&b.bearing))
            });
            edges
                .iter()
                .map(|fix| {
                    Placement::new(
                        Role::Primary,
                        fix.bearing,
                        clamp(fix.distance_m),
                        format!("edge at {:.0}°, {:.0} m out", fix.bearing, fix.distance_m),
                    )
                })
                .collect()
        };

        // Crossings are counted where each camera finally sits.
        let mut ranked: Vec<(u32, Placement)> = self
            .enforce_separation(Category::Camera, spots)
            .into_iter()
            .map(|p| (crossings_at(p.bearing, p.distance_m), p))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.truncate(c.max_cameras);

        ranked
            .into_iter()
            .enumerate()
            .filter_map(|(i, (crossings, mut p))| {
                p.role = if i == 0 { Role::Primary } else { Role::Secondary };
                p.rationale.push(format!("{crossings} trail crossing(s) in view"));
                roles.contains(&p.role).then_some(p)
            })
            .collect()
    }

    /// Move violators along their own bearing: outward first, then inward for
    /// categories held to a distance band. Drop any that still violate after
    /// the step budget.
    fn enforce_separation(&self, category: Category, placements: Vec<Placement>) -> Vec<Placement> {
        let c = &self.config;
        let min = c.min_separation_m.get(category);
        let band = match category {
            Category::Camera => Some((c.camera_min_distance_m, c.camera_max_distance_m)),
            _ => None,
        };
        let mut kept: Vec<Placement> = Vec::with_capacity(placements.len());

        for mut p in placements {
            let Some(distance) = Self::separated_distance(c, &kept, &p, min, band) else {
                debug!(
                    category = category.as_str(),
                    role = p.role.as_str(),
                    "candidate dropped: cannot reach minimum separation"
                );
                continue;
            };
            let moved = distance - p.distance_m;
            if moved > 0.0 {
                p.rationale.push(format!("moved {moved:.0} m outward to keep {min:.0} m from neighbouring sites"));
            } else if moved < 0.0 {
                p.rationale.push(format!("moved {:.0} m inward to keep {min:.0} m from neighbouring sites", -moved));
            }
            p.distance_m = distance;
            kept.push(p);
        }
        kept
    }

    fn separated_distance(
        c: &GeneratorConfig,
        kept: &[Placement],
        p: &Placement,
        min: f64,
        band: Option<(f64, f64)>,
    ) -> Option<f64> {
        let clear = |d: f64| kept.iter().all(|k| polar_separation_m(k.offset(), (p.bearing, d)) >= min);
        if clear(p.distance_m) {
            return Some(p.distance_m);
        }
        let ceiling = band.map_or(f64::INFINITY, |(_, hi)| hi);
        // Unbanded categories only move outward
        let floor = band.map_or(f64::INFINITY, |(lo, _)| lo);
        let (step_m, max_steps) = (c.separation_step_m, c.separation_max_steps);
        let steps = move || (1..=max_steps).map(move |k| k as f64 * step_m);

        steps()
            .map(|d| p.distance_m + d)
            .take_while(|d| *d <= ceiling)
            .chain(steps().map(|d| p.distance_m - d).take_while(|d| *d >= floor))
            .find(|d| clear(*d))
    }

    fn build_candidate(
        &self,
        category: Category,
        placement: Placement,
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        ctx: &GenerationContext<'_>,
    ) -> Candidate {
        let c = &self.config;
        let mut candidate = Candidate::new(category, placement.role, placement.bearing, placement.distance_m);
        let (lat, lon) = bearing::destination(
            anchor.latitude,
            anchor.longitude,
            candidate.bearing_degrees,
            candidate.distance_meters,
        );
        candidate.latitude = lat;
        candidate.longitude = lon;
        candidate.rationale = placement.rationale;

        let site = ctx.terrain.try_point_at(lat, lon).unwrap_or(*anchor);
        let b = candidate.bearing_degrees;

        let aspect = if site.degenerate {
            ctx.aspect_scorer.flat_ground()
        } else {
            ctx.aspect_scorer.evaluate(
                site.aspect_degrees,
                wind.wind_bearing_degrees,
                wind.wind_speed_mph,
                wind.temperature_f,
                site.slope_degrees,
            )
        };
        candidate.set_raw(Factor::Aspect, aspect.score);
        candidate.push_rationale(format!("aspect: {}", aspect.rationale));

        candidate.set_raw(Factor::Wind, wind_score(b, wind));
        candidate.set_raw(Factor::Thermal, thermal_score(b, anchor, wind));
        candidate.set_raw(
            Factor::Terrain,
            slope_fit(site.slope_degrees, c.slope_ranges.get(category), c.slope_falloff_per_deg),
        );

        let cover = match ctx.baselines.current_cover() {
            Some(pct) => {
                let target = c.cover_targets_pct.get(category);
                100.0 - (pct - target).abs() * c.cover_falloff_per_pct.get(category)
            }
            None => NEUTRAL_SCORE,
        };
        candidate.set_raw(Factor::Cover, cover);

        let alignment = 100.0 * (1.0 - angular_distance(b, ctx.deer_movement_bearing) / 180.0);
        match category {
            Category::Camera => {
                let crossings =
                    features::count_within(ctx.features, FeatureKind::Trail, lat, lon, c.trail_detection_radius_m);
                let pitch = (c.camera_min_pitch_deg + site.slope_degrees)
                    .clamp(c.camera_min_pitch_deg, c.camera_max_pitch_deg);
                candidate.camera = Some(CameraSetup { pitch_degrees: pitch, expected_trail_crossings: crossings });
                candidate.set_raw(Factor::Travel, 0.5 * alignment + (25.0 * crossings as f64).min(50.0));
                candidate.set_raw(
                    Factor::Proximity,
                    proximity_score(ctx.features, &[FeatureKind::Edge], lat, lon, c.edge_influence_radius_m),
                );
            }
            Category::Stand => {
                candidate.set_raw(Factor::Travel, alignment);
                candidate.set_raw(
                    Factor::Proximity,
                    proximity_score(ctx.features, &[FeatureKind::Edge], lat, lon, c.edge_influence_radius_m),
                );
            }
            Category::Feeding => {
                candidate.set_raw(Factor::Travel, alignment);
                candidate.set_raw(
                    Factor::Proximity,
                    proximity_score(
                        ctx.features,
                        &[FeatureKind::Water, FeatureKind::Food],
                        lat,
                        lon,
                        c.emergency_search_radius_m,
                    ),
                );
            }
            Category::Bedding => {
                candidate.set_raw(Factor::Travel, alignment);
                candidate.set_raw(Factor::Proximity, NEUTRAL_SCORE);
            }
        }

        candidate
    }
}

impl CandidateGeneration for DefaultCandidateGenerator {
    fn generate(
        &self,
        category: Category,
        anchor: &TerrainPoint,
        wind: &WindThermalState,
        roles: &[Role],
        ctx: &GenerationContext<'_>,
    ) -> Vec<Candidate> {
        let roles = resolve_roles(category, roles);
        if roles.is_empty() {
            return Vec::new();
        }

        let placements = match category {
            Category::Bedding => self.enforce_separation(category, self.bedding_placements(&roles, anchor, wind, ctx)),
            Category::Feeding => self.enforce_separation(category, self.feeding_placements(&roles, anchor, wind, ctx)),
            Category::Stand => self.enforce_separation(category, self.stand_placements(&roles, anchor, wind, ctx)),
            // Separated inside the distance band while ranking
            Category::Camera => self.camera_placements(&roles, anchor, ctx),
        };

        placements
            .into_iter()
            .map(|p| self.build_candidate(category, p, anchor, wind, ctx))
            .collect()
    }
}

fn feature_name(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Water => "water",
        FeatureKind::Food => "food",
        FeatureKind::Edge => "edge",
        FeatureKind::Trail => "trail",
    }
}

/// Sites downwind of the anchor keep scent off it.
fn wind_score(site_bearing: f64, wind: &WindThermalState) -> f64 {
    if !wind.has_wind() {
        return NEUTRAL_SCORE;
    }
    100.0 * (1.0 - angular_distance(site_bearing, wind.leeward_bearing()) / 180.0)
}

/// Sites along the thermal drift keep scent off the anchor, scaled by thermal
/// strength toward neutral.
fn thermal_score(site_bearing: f64, anchor: &TerrainPoint, wind: &WindThermalState) -> f64 {
    if anchor.degenerate {
        return NEUTRAL_SCORE;
    }
    match wind.thermal_drift_bearing(anchor.uphill_bearing, anchor.downhill_bearing) {
        Some(drift) => {
            let aligned = 100.0 * (1.0 - angular_distance(site_bearing, drift) / 180.0);
            NEUTRAL_SCORE + (aligned - NEUTRAL_SCORE) * wind.thermal_strength
        }
        None => NEUTRAL_SCORE,
    }
}

fn slope_fit(slope: f64, range: SlopeRange, falloff_per_deg: f64) -> f64 {
    let outside = if slope < range.min_deg {
        range.min_deg - slope
    } else if slope > range.max_deg {
        slope - range.max_deg
    } else {
        0.0
    };
    (100.0 - outside * falloff_per_deg).clamp(0.0, 100.0)
}

/// Linear falloff to the nearest feature of `kinds`. Neutral when none of
/// those kinds were mapped at all.
fn proximity_score(
    features: &[TerrainFeature],
    kinds: &[FeatureKind],
    latitude: f64,
    longitude: f64,
    radius_m: f64,
) -> f64 {
    if radius_m <= 0.0 || !features.iter().any(|f| kinds.contains(&f.kind)) {
        return NEUTRAL_SCORE;
    }
    match features::nearest(features, kinds, latitude, longitude, radius_m) {
        Some(fix) => 100.0 * (1.0 - fix.distance_m / radius_m),
        None => 0.0,
    }
}
