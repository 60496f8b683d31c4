#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Segment allocation system converting milestone levels into per-segment
//! experience requirements.
//!
//! [`SegmentAllocator`] produces the raw requirement of every segment and
//! [`SegmentPlanner`] wraps those requirements into full [`Segment`] records
//! carrying level and strength bands for the selection system.
//!
//! [`Segment`]: xp_planner_core::Segment

mod planner;

pub use planner::SegmentPlanner;

use tracing::{debug, warn};
use xp_planner_core::GrowthRate;

/// Converts ordered milestone levels into per-segment experience requirements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentAllocator {
    team_strength: f64,
    battle_percent: f64,
    unit_count: u32,
    milestone_count: usize,
    growth_rate: GrowthRate,
}

impl SegmentAllocator {
    /// Creates an allocator.
    ///
    /// `team_strength` scales every milestone level as a percentage,
    /// `battle_percent` is the share of available battles the player fights,
    /// `unit_count` is the full party size and `milestone_count` is the number
    /// of milestones before the final one, after which the party is complete.
    #[must_use]
    pub const fn new(
        team_strength: f64,
        battle_percent: f64,
        unit_count: u32,
        milestone_count: usize,
        growth_rate: GrowthRate,
    ) -> Self {
        Self {
            team_strength,
            battle_percent,
            unit_count,
            milestone_count,
            growth_rate,
        }
    }

    /// Experience the party must gain between consecutive milestones.
    ///
    /// The requirement of a segment is the difference between the cumulative
    /// party experience at its milestone and at the previous one. Segments whose
    /// requirement is not positive take half of their predecessor's requirement,
    /// leaving the other half with the predecessor. Repairs run in ascending
    /// order against the predecessor's current value. The first segment has no
    /// predecessor and keeps its non-positive value.
    #[must_use]
    pub fn allocate(&self, milestones: &[f64]) -> Vec<f64> {
        let multiplier = battle_multiplier(self.battle_percent);
        let mut requirements = Vec::with_capacity(milestones.len());
        let mut flagged = Vec::new();
        let mut previous = 0.0;

        for (index, &level) in milestones.iter().enumerate() {
            let adjusted = level * (self.team_strength / 100.0);
            let units = active_unit_count(index + 1, self.milestone_count, self.unit_count);
            let cumulative =
                f64::from(units) * self.growth_rate.cumulative_exp(adjusted) * multiplier;
            let requirement = cumulative - previous;
            if requirement <= 0.0 {
                flagged.push(index);
            }
            requirements.push(requirement);
            previous = cumulative;
        }

        for index in flagged {
            if index == 0 {
                warn!(
                    requirement = requirements[0],
                    "first segment requirement is not positive and cannot be repaired"
                );
                continue;
            }
            let split = requirements[index - 1] / 2.0;
            requirements[index - 1] = split;
            requirements[index] = split;
            debug!(segment = index, split, "split predecessor requirement");
        }

        requirements
    }
}

/// Party size active at the one-based milestone `index`.
///
/// The party is complete from `milestone_count` onward. Before that it grows
/// proportionally, rounding up, and index zero always fields a single unit.
#[must_use]
pub fn active_unit_count(index: usize, milestone_count: usize, unit_count: u32) -> u32 {
    if index >= milestone_count {
        return unit_count;
    }
    if index == 0 {
        return 1;
    }
    let share = index as f64 / milestone_count as f64 * f64::from(unit_count);
    share.ceil() as u32
}

/// Milestone that ends the progression: the last league battle when fighting
/// the champion, otherwise the first one.
#[must_use]
pub fn final_milestone(use_champion: bool, league_milestones: &[f64]) -> Option<f64> {
    if use_champion {
        league_milestones.last().copied()
    } else {
        league_milestones.first().copied()
    }
}

/// Party level at `milestone` once scaled by `team_strength` percent.
#[must_use]
pub fn final_level(milestone: f64, team_strength: f64) -> f64 {
    milestone * (team_strength / 100.0)
}

/// Experience the whole party needs to reach `final_level`.
#[must_use]
pub fn total_exp(
    unit_count: u32,
    final_level: f64,
    battle_percent: f64,
    growth_rate: GrowthRate,
) -> f64 {
    f64::from(unit_count) * growth_rate.cumulative_exp(final_level) * battle_multiplier(battle_percent)
}

/// Experience a single entity with `base_value` yields when defeated at `level`.
#[must_use]
pub fn xp_yield(level: f64, base_value: f64) -> f64 {
    1.5 * (level * base_value) / 7.0
}

/// Base value estimated for an entity of the given strength.
#[must_use]
pub fn simulated_base_value(strength: f64) -> f64 {
    0.000514205 * strength.powf(2.07129)
}

/// Scales experience to account for battles the player skips.
fn battle_multiplier(battle_percent: f64) -> f64 {
    (100.0 - battle_percent) / battle_percent + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_is_complete_from_last_milestone() {
        assert_eq!(active_unit_count(5, 5, 6), 6);
        assert_eq!(active_unit_count(6, 5, 6), 6);
    }

    #[test]
    fn party_grows_proportionally_before_completion() {
        assert_eq!(active_unit_count(2, 5, 6), 3);
        assert_eq!(active_unit_count(1, 3, 6), 2);
        assert_eq!(active_unit_count(2, 3, 6), 4);
    }

    #[test]
    fn index_zero_fields_single_unit() {
        assert_eq!(active_unit_count(0, 5, 6), 1);
    }

    #[test]
    fn battle_multiplier_scales_inverse_share() {
        assert_eq!(battle_multiplier(100.0), 1.0);
        assert_eq!(battle_multiplier(50.0), 2.0);
        assert_eq!(battle_multiplier(25.0), 4.0);
    }

    #[test]
    fn xp_yield_matches_reference_values() {
        assert!((xp_yield(1.0, 100.0) - 21.428_571).abs() < 1e-3);
        assert!((xp_yield(50.0, 100.0) - 1_071.428_571).abs() < 1e-3);
        assert!((xp_yield(75.0, 400.0) - 6_428.571_428).abs() < 1e-3);
        assert!((xp_yield(100.0, 400.0) - 8_571.428_571).abs() < 1e-3);
        assert_eq!(xp_yield(0.0, 100.0), 0.0);
    }

    #[test]
    fn simulated_base_value_matches_reference_values() {
        assert!((simulated_base_value(175.0) - 22.757).abs() < 1e-2);
        assert!((simulated_base_value(500.0) - 200.21).abs() < 1e-2);
        assert!((simulated_base_value(720.0) - 426.089).abs() < 1e-2);
        assert_eq!(simulated_base_value(0.0), 0.0);
    }
}
