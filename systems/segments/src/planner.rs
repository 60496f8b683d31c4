use tracing::debug;
use xp_planner_core::{
    PlannerError, ProgressionConfig, ProgressionPlan, Segment, MAX_PRE_MILESTONE_RATIO,
    MIN_POST_MILESTONE_RATIO, STRENGTH_MAX_FACTOR, STRENGTH_MIN_FACTOR,
};

use crate::{
    final_level, final_milestone, simulated_base_value, total_exp, xp_yield, SegmentAllocator,
};

/// Builds complete [`Segment`] records from a progression configuration.
#[derive(Debug, Default)]
pub struct SegmentPlanner;

impl SegmentPlanner {
    /// Plans one segment per regular milestone plus one for the final league milestone.
    ///
    /// Each segment spans the level band between the previous milestone (scaled
    /// down) and its own milestone (scaled down), and the strength band of the
    /// curve between the segment's start and end progress. The number of
    /// entities per segment is the segment requirement divided by the yield of
    /// an average entity, rounded and floored at zero.
    pub fn plan(&self, config: &ProgressionConfig) -> Result<ProgressionPlan, PlannerError> {
        let last = final_milestone(config.use_champion, &config.league_milestones)
            .ok_or(PlannerError::MissingFinalMilestone)?;
        let adjusted_final = final_level(last, config.team_strength);

        let mut milestones = config.milestones.clone();
        milestones.push(last);

        let allocator = SegmentAllocator::new(
            config.team_strength,
            config.battle_percent,
            config.unit_count,
            config.milestones.len(),
            config.growth_rate,
        );
        let requirements = allocator.allocate(&milestones);

        let curve = config.strength_curve();
        let count = milestones.len() as f64;
        let segments = requirements
            .into_iter()
            .enumerate()
            .map(|(index, requirement)| {
                let min_level = if index == 0 {
                    config.first_level
                } else {
                    (milestones[index - 1] * MIN_POST_MILESTONE_RATIO).round()
                };
                let max_level = (milestones[index] * MAX_PRE_MILESTONE_RATIO).round();
                let average_level = ((min_level + max_level) / 2.0).round();
                let min_strength = curve.evaluate(index as f64 / count, STRENGTH_MIN_FACTOR);
                let max_strength =
                    curve.evaluate((index + 1) as f64 / count, STRENGTH_MAX_FACTOR);
                let average_strength = (min_strength + max_strength) / 2.0;
                let average_base_value = simulated_base_value(average_strength);
                let average_yield_per_unit = xp_yield(average_level, average_base_value);
                let unit_count = (requirement / average_yield_per_unit).round().max(0.0) as u32;

                Segment {
                    min_level,
                    max_level,
                    average_level,
                    min_strength,
                    max_strength,
                    average_strength,
                    average_base_value,
                    average_yield_per_unit,
                    unit_count,
                    total_exp: requirement,
                    position: index + 1,
                }
            })
            .collect::<Vec<_>>();

        let plan = ProgressionPlan {
            total_exp: total_exp(
                config.unit_count,
                adjusted_final,
                config.battle_percent,
                config.growth_rate,
            ),
            max_level: adjusted_final.round(),
            segments,
        };
        debug!(
            segments = plan.segments.len(),
            total_exp = plan.total_exp,
            "planned progression"
        );
        Ok(plan)
    }
}
