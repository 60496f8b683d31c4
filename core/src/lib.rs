#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the XP planner.
//!
//! This crate defines the records that flow between the adapters, the
//! authoritative session, and the pure calculation systems. Systems consume
//! immutable inputs such as a [`ProgressionConfig`] or a slice of [`Entity`]
//! values and return freshly computed [`Segment`] records or leveled entities.
//! Adapters hand those results to the session as [`Command`] values, and the
//! session acknowledges every mutation with [`Event`] values.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest strength any point on a strength curve may take.
pub const LOWEST_STRENGTH: f64 = 175.0;

/// Highest strength any point on a strength curve may take.
pub const HIGHEST_STRENGTH: f64 = 720.0;

/// Multiplier applied to the curve when deriving the lower strength bound of a segment.
pub const STRENGTH_MIN_FACTOR: f64 = 0.8;

/// Multiplier applied to the curve when deriving the upper strength bound of a segment.
pub const STRENGTH_MAX_FACTOR: f64 = 1.2;

/// Fraction of a milestone level a segment may reach before that milestone is fought.
pub const MAX_PRE_MILESTONE_RATIO: f64 = 0.87;

/// Fraction of the previous milestone level a segment starts from once it has been cleared.
pub const MIN_POST_MILESTONE_RATIO: f64 = 0.65;

/// Number of samples taken across the progress axis when charting a strength curve.
pub const CHART_RESOLUTION: u32 = 100;

/// Named experience growth curves mapping a level to cumulative experience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum GrowthRate {
    /// Piecewise curve that is cheap early and expensive in the mid game.
    Erratic,
    /// Four fifths of the medium fast curve.
    Fast,
    /// Cubic curve, the reference every other rate is compared against.
    #[default]
    MediumFast,
    /// Cubic curve with a quadratic correction that dips below medium fast early on.
    MediumSlow,
    /// Five quarters of the medium fast curve.
    Slow,
    /// Piecewise curve that is expensive early and cheap in the late game.
    Fluctuating,
}

impl GrowthRate {
    /// Every growth rate in declaration order.
    pub const ALL: [GrowthRate; 6] = [
        GrowthRate::Erratic,
        GrowthRate::Fast,
        GrowthRate::MediumFast,
        GrowthRate::MediumSlow,
        GrowthRate::Slow,
        GrowthRate::Fluctuating,
    ];

    /// Resolves a growth rate from its camelCase name, falling back to
    /// [`GrowthRate::MediumFast`] for names that are not recognised.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "erratic" => Self::Erratic,
            "fast" => Self::Fast,
            "mediumFast" => Self::MediumFast,
            "mediumSlow" => Self::MediumSlow,
            "slow" => Self::Slow,
            "fluctuating" => Self::Fluctuating,
            _ => Self::MediumFast,
        }
    }

    /// CamelCase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Erratic => "erratic",
            Self::Fast => "fast",
            Self::MediumFast => "mediumFast",
            Self::MediumSlow => "mediumSlow",
            Self::Slow => "slow",
            Self::Fluctuating => "fluctuating",
        }
    }

    /// Cumulative experience required to reach `level`.
    ///
    /// The level is not clamped; out-of-range and negative levels are evaluated
    /// with the same piecewise formula and may yield negative totals.
    #[must_use]
    pub fn cumulative_exp(self, level: f64) -> f64 {
        let cubed = level.powi(3);
        match self {
            Self::Erratic => {
                if level < 50.0 {
                    cubed * (100.0 - level) / 50.0
                } else if level < 68.0 {
                    cubed * (150.0 - level) / 50.0
                } else if level < 98.0 {
                    cubed * ((1911.0 - 10.0 * level) / 3.0).floor() / 500.0
                } else {
                    cubed * (160.0 - level) / 100.0
                }
            }
            Self::Fast => 4.0 * cubed / 5.0,
            Self::MediumFast => cubed,
            Self::MediumSlow => 6.0 * cubed / 5.0 - 15.0 * level.powi(2) + 100.0 * level - 140.0,
            Self::Slow => 5.0 * cubed / 4.0,
            Self::Fluctuating => {
                if level < 15.0 {
                    cubed * (((level + 1.0) / 3.0).floor() + 24.0) / 50.0
                } else if level < 36.0 {
                    cubed * (level + 14.0) / 50.0
                } else {
                    cubed * ((level / 2.0).floor() + 32.0) / 50.0
                }
            }
        }
    }
}

impl From<String> for GrowthRate {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<&str> for GrowthRate {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive interval every evaluated strength is clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrengthBounds {
    lowest: f64,
    highest: f64,
}

impl StrengthBounds {
    /// Creates bounds spanning `lowest..=highest`.
    #[must_use]
    pub const fn new(lowest: f64, highest: f64) -> Self {
        Self { lowest, highest }
    }

    /// Clamps `value` into the interval.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lowest).min(self.highest)
    }
}

impl Default for StrengthBounds {
    fn default() -> Self {
        Self::new(LOWEST_STRENGTH, HIGHEST_STRENGTH)
    }
}

/// Polynomial describing expected strength over normalized game progress.
///
/// Coefficient `i` multiplies `progress^i`, so `[c0, c1, c2]` evaluates to
/// `c0 + c1·p + c2·p²`.
#[derive(Clone, Debug, PartialEq)]
pub struct StrengthCurve {
    coefficients: Vec<f64>,
    bounds: StrengthBounds,
}

impl StrengthCurve {
    /// Creates a curve from ascending-power coefficients using the default bounds.
    #[must_use]
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self {
            coefficients,
            bounds: StrengthBounds::default(),
        }
    }

    /// Replaces the bounds results are clamped into.
    #[must_use]
    pub fn with_bounds(mut self, bounds: StrengthBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Evaluates the polynomial at `progress`, scales it by `factor` and clamps
    /// the product into the curve bounds.
    #[must_use]
    pub fn evaluate(&self, progress: f64, factor: f64) -> f64 {
        let raw: f64 = self
            .coefficients
            .iter()
            .zip(0i32..)
            .map(|(coefficient, power)| coefficient * progress.powi(power))
            .sum();
        self.bounds.clamp(raw * factor)
    }
}

/// XP-delivery interval between two consecutive milestones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Lowest level an entity fought in this segment should have.
    pub min_level: f64,
    /// Highest level an entity fought in this segment should have.
    pub max_level: f64,
    /// Rounded midpoint of the level band.
    pub average_level: f64,
    /// Exclusive lower strength bound for entities in this segment.
    pub min_strength: f64,
    /// Exclusive upper strength bound for entities in this segment.
    pub max_strength: f64,
    /// Midpoint of the strength band.
    pub average_strength: f64,
    /// Base value simulated for an entity of average strength.
    pub average_base_value: f64,
    /// Experience a single average entity yields at the average level.
    pub average_yield_per_unit: f64,
    /// Number of entities needed to deliver the segment's experience.
    pub unit_count: u32,
    /// Experience the party must gain during this segment.
    pub total_exp: f64,
    /// One-based position of the segment in the progression.
    pub position: usize,
}

/// Identifier of an entity in the reference roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable reference record describing a candidate entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    id: EntityId,
    name: String,
    strength: u32,
    base_value: f64,
}

impl Entity {
    /// Creates a new entity record.
    #[must_use]
    pub fn new(id: EntityId, name: impl Into<String>, strength: u32, base_value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            strength,
            base_value,
        }
    }

    /// Roster identifier of the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Display name of the entity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strength rating of the entity.
    #[must_use]
    pub const fn strength(&self) -> u32 {
        self.strength
    }

    /// Base value used to compute the experience this entity yields.
    #[must_use]
    pub const fn base_value(&self) -> f64 {
        self.base_value
    }
}

/// Entity selected for a segment together with its assigned level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeveledEntity {
    entity: Entity,
    level: u32,
}

impl LeveledEntity {
    /// Pairs an entity with the level it was assigned.
    #[must_use]
    pub const fn new(entity: Entity, level: u32) -> Self {
        Self { entity, level }
    }

    /// Entity that was selected.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Level assigned to the entity.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }
}

/// Category memberships used for exclusion filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Legendary and mythical entities.
    Legendary,
    /// Ultra beasts.
    Beast,
    /// Paradox entities.
    Paradox,
    /// Starter entities and their evolutions.
    Starter,
}

const LEGENDARY_IDS: &[u32] = &[
    144, 145, 146, 150, 151, 243, 244, 245, 249, 250, 251, 377, 378, 379, 380, 381, 382, 383, 384,
    385, 386, 480, 481, 482, 483, 484, 485, 486, 487, 488, 489, 490, 491, 492, 493, 494, 638, 639,
    640, 641, 642, 643, 644, 645, 646, 647, 648, 649, 716, 717, 718, 719, 720, 721, 785, 786, 787,
    788, 789, 790, 791, 792, 800, 801, 802, 808, 809, 888, 889, 890, 891, 892, 893, 894, 895, 896,
    897, 898, 905, 1001, 1002, 1003, 1004, 1007, 1008, 1014, 1015, 1016, 1017, 1024, 1025,
];

const BEAST_IDS: &[u32] = &[794, 795, 796, 797, 798, 799, 803, 804, 805, 806, 807];

const PARADOX_IDS: &[u32] = &[
    984, 985, 986, 987, 988, 989, 990, 991, 992, 993, 994, 995, 1005, 1006, 1009, 1010, 1020, 1021,
    1022, 1023,
];

/// First identifier of each generation's three starter lines.
const STARTER_LINE_STARTS: &[u32] = &[1, 152, 252, 387, 495, 650, 722, 810, 906];

/// Identifier sets describing which entities belong to each category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    legendary: Vec<EntityId>,
    beast: Vec<EntityId>,
    paradox: Vec<EntityId>,
    starter: Vec<EntityId>,
}

impl CategoryTable {
    /// Members of the provided category.
    #[must_use]
    pub fn members(&self, category: Category) -> &[EntityId] {
        match category {
            Category::Legendary => &self.legendary,
            Category::Beast => &self.beast,
            Category::Paradox => &self.paradox,
            Category::Starter => &self.starter,
        }
    }

    /// Reports whether `id` belongs to `category`.
    #[must_use]
    pub fn contains(&self, category: Category, id: EntityId) -> bool {
        self.members(category).contains(&id)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let ids = |values: &[u32]| -> Vec<EntityId> {
            values.iter().copied().map(EntityId::new).collect()
        };
        let starter = STARTER_LINE_STARTS
            .iter()
            .flat_map(|&first| first..first + 9)
            .map(EntityId::new)
            .collect();
        Self {
            legendary: ids(LEGENDARY_IDS),
            beast: ids(BEAST_IDS),
            paradox: ids(PARADOX_IDS),
            starter,
        }
    }
}

/// Ascending identifier boundaries separating release generations.
///
/// Generation `g` covers identifiers in `(boundaries[g - 1], boundaries[g]]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationBoundaries(Vec<u32>);

impl GenerationBoundaries {
    /// Creates generation boundaries from ascending identifiers starting at the
    /// exclusive lower edge of generation one.
    #[must_use]
    pub fn new(boundaries: Vec<u32>) -> Self {
        Self(boundaries)
    }

    /// Number of generations described by the boundaries.
    #[must_use]
    pub fn generation_count(&self) -> u8 {
        u8::try_from(self.0.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    /// Reports whether `id` belongs to `generation`. Unknown generations cover nothing.
    #[must_use]
    pub fn covers(&self, generation: u8, id: EntityId) -> bool {
        let index = usize::from(generation);
        if index == 0 || index >= self.0.len() {
            return false;
        }
        self.0[index - 1] < id.get() && id.get() <= self.0[index]
    }

    /// Generation `id` belongs to, if any.
    #[must_use]
    pub fn generation_of(&self, id: EntityId) -> Option<u8> {
        (1..=self.generation_count()).find(|&generation| self.covers(generation, id))
    }
}

impl Default for GenerationBoundaries {
    fn default() -> Self {
        Self::new(vec![0, 151, 251, 386, 493, 649, 721, 809, 905, 1025])
    }
}

/// Static reference data consumed by the filter and selection systems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceData {
    entities: Vec<Entity>,
    categories: CategoryTable,
    generations: GenerationBoundaries,
}

impl ReferenceData {
    /// Bundles a roster with its category and generation tables.
    #[must_use]
    pub fn new(
        entities: Vec<Entity>,
        categories: CategoryTable,
        generations: GenerationBoundaries,
    ) -> Self {
        Self {
            entities,
            categories,
            generations,
        }
    }

    /// Candidate entities in roster order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Category membership lists.
    #[must_use]
    pub const fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Generation boundaries.
    #[must_use]
    pub const fn generations(&self) -> &GenerationBoundaries {
        &self.generations
    }
}

/// Criteria restricting which entities are eligible for selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Excludes legendary entities.
    pub no_legends: bool,
    /// Excludes ultra beasts.
    pub no_beasts: bool,
    /// Excludes paradox entities.
    pub no_paradox: bool,
    /// Excludes starter entities.
    pub no_starters: bool,
    /// Generations to include; `None` includes every generation.
    pub generations: Option<Vec<u8>>,
    /// Explicit allow-list of identifiers; `None` allows every identifier.
    pub identifiers: Option<Vec<EntityId>>,
    /// Level after which selected entities should be fully matured.
    ///
    /// Accepted and forwarded but currently does not influence selection or leveling.
    pub mature_after_level: Option<u32>,
}

impl FilterCriteria {
    /// Categories excluded by the criteria flags.
    #[must_use]
    pub fn excluded_categories(&self) -> Vec<Category> {
        [
            (self.no_legends, Category::Legendary),
            (self.no_beasts, Category::Beast),
            (self.no_paradox, Category::Paradox),
            (self.no_starters, Category::Starter),
        ]
        .into_iter()
        .filter_map(|(excluded, category)| excluded.then_some(category))
        .collect()
    }
}

/// Single point on a median series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedianPoint {
    /// Position along the progress axis.
    pub x: f64,
    /// Median value at `x`.
    pub y: f64,
}

/// Single point on a range band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangePoint {
    /// Position along the progress axis.
    pub x: f64,
    /// Lower edge of the band at `x`.
    pub low: f64,
    /// Upper edge of the band at `x`.
    pub high: f64,
}

/// Median line plus surrounding range band, ready for charting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Median points in ascending `x` order.
    pub median: Vec<MedianPoint>,
    /// Range points in ascending `x` order.
    pub range: Vec<RangePoint>,
}

impl ChartSeries {
    /// Removes every point from both series.
    pub fn clear(&mut self) {
        self.median.clear();
        self.range.clear();
    }

    /// Number of samples held by the median series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.median.len()
    }

    /// Reports whether the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.median.is_empty()
    }
}

/// Player-facing progression inputs from which segments are planned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Ace levels of the regular milestones in the order they are fought.
    pub milestones: Vec<f64>,
    /// Ace levels of the final league battles.
    pub league_milestones: Vec<f64>,
    /// Uses the last league battle instead of the first as the final milestone.
    pub use_champion: bool,
    /// Ascending-power coefficients of the strength curve.
    pub strength_coefficients: Vec<f64>,
    /// Size of the party at full strength.
    pub unit_count: u32,
    /// Party level expressed as a percentage of each ace level.
    pub team_strength: f64,
    /// Level of the very first battle.
    pub first_level: f64,
    /// Percentage of available battles the player is expected to fight.
    pub battle_percent: f64,
    /// Growth rate shared by every party member.
    pub growth_rate: GrowthRate,
}

impl ProgressionConfig {
    /// Strength curve described by the configured coefficients.
    #[must_use]
    pub fn strength_curve(&self) -> StrengthCurve {
        StrengthCurve::new(self.strength_coefficients.clone())
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            milestones: vec![10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0],
            league_milestones: vec![50.0, 52.0, 54.0, 56.0, 60.0],
            use_champion: false,
            strength_coefficients: vec![245.0, 565.0, -1150.0, 900.0, 0.0],
            unit_count: 6,
            team_strength: 85.0,
            first_level: 5.0,
            battle_percent: 100.0,
            growth_rate: GrowthRate::MediumFast,
        }
    }
}

/// Result of planning a progression: the overall total plus one segment per milestone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPlan {
    /// Experience the whole party needs to reach the final level.
    pub total_exp: f64,
    /// Rounded party level expected at the final milestone.
    pub max_level: f64,
    /// Segments in progression order.
    pub segments: Vec<Segment>,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Stores a freshly computed progression plan, discarding any stale roster.
    RecordPlan {
        /// Plan computed by the segment planner.
        plan: ProgressionPlan,
    },
    /// Stores a freshly generated roster for the current plan.
    RecordRoster {
        /// One inner sequence of leveled entities per segment.
        roster: Vec<Vec<LeveledEntity>>,
    },
    /// Forgets every computed result.
    ClearResults,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a plan was stored.
    PlanRecorded {
        /// Number of segments in the plan.
        segments: usize,
        /// Total experience of the plan.
        total_exp: f64,
    },
    /// Confirms that a roster was stored.
    RosterRecorded {
        /// Number of segments the roster covers.
        segments: usize,
        /// Number of leveled entities across every segment.
        selected: usize,
    },
    /// Reports that a roster could not be stored.
    RosterRejected {
        /// Specific reason the roster was rejected.
        reason: PlannerError,
    },
    /// Confirms that every computed result was discarded.
    ResultsCleared,
}

/// Recoverable failures surfaced to the caller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum PlannerError {
    /// Filtering or selection found no eligible entities.
    #[error("filter resulted in no valid entities")]
    EmptyResult,
    /// A roster was submitted before any plan was recorded.
    #[error("no progression plan has been recorded")]
    MissingPlan,
    /// A progression was planned without any league milestone to end on.
    #[error("progression has no final milestone")]
    MissingFinalMilestone,
}
