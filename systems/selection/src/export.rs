use serde::Serialize;
use xp_planner_core::LeveledEntity;

/// Highest individual value an entity can be assigned.
pub const MAX_INDIVIDUAL_VALUE: u8 = 31;

/// Flat row describing one selected entity, ready for tabular export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRow {
    /// One-based segment the entity is fought in.
    pub segment: usize,
    /// Display name of the entity.
    pub name: String,
    /// Level assigned to the entity.
    pub level: u32,
    /// Strength rating of the entity.
    pub strength: u32,
    /// Base value of the entity.
    pub base_value: f64,
    /// Roster identifier of the entity.
    pub id: u32,
}

/// Flattens a generated roster into rows, segment by segment.
#[must_use]
pub fn export_rows(roster: &[Vec<LeveledEntity>]) -> Vec<ExportRow> {
    roster
        .iter()
        .enumerate()
        .flat_map(|(index, segment)| {
            segment.iter().map(move |leveled| {
                let entity = leveled.entity();
                ExportRow {
                    segment: index + 1,
                    name: entity.name().to_owned(),
                    level: leveled.level(),
                    strength: entity.strength(),
                    base_value: entity.base_value(),
                    id: entity.id().get(),
                }
            })
        })
        .collect()
}

/// Individual value for an entity at `level`, scaled linearly across the run's
/// level band and clamped to `0..=31`. An empty or inverted band scores 0.
#[must_use]
pub fn individual_value(level: f64, min_level: f64, max_level: f64) -> u8 {
    if max_level <= min_level {
        return 0;
    }
    let ceiling = f64::from(MAX_INDIVIDUAL_VALUE);
    let scaled = (ceiling * (level - min_level) / (max_level - min_level)).round();
    scaled.clamp(0.0, ceiling) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_value_scales_within_band() {
        assert_eq!(individual_value(50.0, 1.0, 100.0), 15);
        assert_eq!(individual_value(100.0, 1.0, 100.0), 31);
    }

    #[test]
    fn individual_value_clamps_outside_band() {
        assert_eq!(individual_value(0.0, 1.0, 100.0), 0);
        assert_eq!(individual_value(101.0, 1.0, 100.0), 31);
    }

    #[test]
    fn degenerate_band_scores_zero() {
        assert_eq!(individual_value(10.0, 5.0, 5.0), 0);
        assert_eq!(individual_value(5.0, 5.0, 5.0), 0);
        assert_eq!(individual_value(4.0, 5.0, 5.0), 0);
        assert_eq!(individual_value(10.0, 8.0, 5.0), 0);
    }
}
