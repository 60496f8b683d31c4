#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Selection and leveling system that fills every segment with randomly drawn
//! entities and scales their levels by relative strength.
//!
//! Randomness is supplied through the [`RandomSource`] capability so callers
//! choose between an unseeded generator, a seeded one for reproducible runs,
//! or a scripted double in tests.

mod export;

pub use export::{export_rows, individual_value, ExportRow, MAX_INDIVIDUAL_VALUE};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use xp_planner_core::{Entity, LeveledEntity, PlannerError, Segment};

/// Source of uniformly distributed indices used when drawing entities.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `min..=max`.
    ///
    /// Callers guarantee `min <= max`.
    fn uniform_inclusive(&mut self, min: usize, max: usize) -> usize;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Creates a generator seeded from operating-system entropy; every run differs.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Creates a generator whose draws are fully determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_inclusive(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }
}

/// Pure system drawing leveled entities for each planned segment.
#[derive(Debug, Default)]
pub struct Selection;

impl Selection {
    /// Draws `segment.unit_count` entities for every segment.
    ///
    /// The pool of a segment holds the entities whose strength lies strictly
    /// between the segment's strength bounds. Draws are uniform with
    /// replacement, so an entity may appear several times. Each drawn entity is
    /// leveled at `round(strength / max_strength * max_level)`. Segments with an
    /// empty pool produce an empty sequence. `mature_after_level` is accepted
    /// for forward compatibility and does not influence the result.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        filtered: &[&Entity],
        segments: &[Segment],
        mature_after_level: Option<u32>,
        rng: &mut R,
    ) -> Result<Vec<Vec<LeveledEntity>>, PlannerError> {
        if filtered.is_empty() {
            return Err(PlannerError::EmptyResult);
        }
        if let Some(level) = mature_after_level {
            debug!(level, "maturity threshold forwarded without effect");
        }

        let mut selected = Vec::with_capacity(segments.len());
        for segment in segments {
            let pool: Vec<&Entity> = filtered
                .iter()
                .copied()
                .filter(|entity| {
                    let strength = f64::from(entity.strength());
                    strength > segment.min_strength && strength < segment.max_strength
                })
                .collect();

            if pool.is_empty() {
                debug!(segment = segment.position, "no entity within strength range");
                selected.push(Vec::new());
                continue;
            }

            let mut drawn = Vec::with_capacity(segment.unit_count as usize);
            for _ in 0..segment.unit_count {
                let entity = pool[rng.uniform_inclusive(0, pool.len() - 1)];
                drawn.push(LeveledEntity::new(
                    entity.clone(),
                    level_for(entity, segment),
                ));
            }
            debug!(
                segment = segment.position,
                pool = pool.len(),
                drawn = drawn.len(),
                "filled segment"
            );
            selected.push(drawn);
        }

        Ok(selected)
    }
}

fn level_for(entity: &Entity, segment: &Segment) -> u32 {
    let ratio = f64::from(entity.strength()) / segment.max_strength;
    (ratio * segment.max_level).round().max(0.0) as u32
}
