use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use xp_planner_core::{
    CategoryTable, Entity, EntityId, FilterCriteria, GenerationBoundaries, ProgressionConfig,
    ReferenceData,
};

/// Highest level a milestone may be set to.
const MAX_MILESTONE_LEVEL: f64 = 100.0;

/// Contents of a plan file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct PlanFile {
    /// Progression inputs driving segment planning.
    pub(crate) progression: ProgressionConfig,
    /// Criteria applied before drawing entities.
    pub(crate) filter: FilterCriteria,
}

impl PlanFile {
    /// Loads the plan at `path`, or the built-in defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read plan file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse plan file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("plan file is not valid toml")
    }
}

/// Contents of a roster file.
#[derive(Clone, Debug, Deserialize)]
struct RosterFile {
    entities: Vec<Entity>,
    #[serde(default)]
    categories: Option<CategoryTable>,
    #[serde(default)]
    generations: Option<GenerationBoundaries>,
}

/// Loads the reference roster at `path`, filling missing tables with the built-in defaults.
pub(crate) fn load_reference(path: &Path) -> Result<ReferenceData> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster at {}", path.display()))?;
    parse_reference(&contents)
        .with_context(|| format!("failed to parse roster at {}", path.display()))
}

fn parse_reference(contents: &str) -> Result<ReferenceData> {
    let roster: RosterFile =
        serde_json::from_str(contents).context("roster file is not valid json")?;
    if roster.entities.is_empty() {
        bail!("roster contains no entities");
    }
    Ok(ReferenceData::new(
        roster.entities,
        roster.categories.unwrap_or_default(),
        roster.generations.unwrap_or_default(),
    ))
}

/// Loads an allow-list of comma-separated entity numbers from `path`.
pub(crate) fn load_allow_list(path: &Path) -> Result<Vec<EntityId>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read allow-list at {}", path.display()))?;
    parse_allow_list(&contents)
        .with_context(|| format!("failed to parse allow-list at {}", path.display()))
}

/// Entries are trimmed; empty entries such as a trailing comma are skipped.
fn parse_allow_list(contents: &str) -> Result<Vec<EntityId>> {
    let identifiers = contents
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u32>()
                .map(EntityId::new)
                .with_context(|| format!("`{token}` is not an entity number"))
        })
        .collect::<Result<Vec<_>>>()?;
    if identifiers.is_empty() {
        bail!("allow-list names no entities");
    }
    Ok(identifiers)
}

/// Rejects filter criteria that can never select anything.
pub(crate) fn validate_filter(criteria: &FilterCriteria) -> Result<()> {
    if criteria
        .generations
        .as_ref()
        .is_some_and(|generations| generations.is_empty())
    {
        bail!("invalid filter: select at least one generation");
    }
    Ok(())
}

/// Rejects progression inputs the planner cannot interpret, listing every problem found.
pub(crate) fn validate(config: &ProgressionConfig) -> Result<()> {
    let mut issues = Vec::new();

    for (index, level) in config.milestones.iter().enumerate() {
        if !is_valid_level(*level) {
            issues.push(format!("milestone #{} invalid", index + 1));
        }
    }
    if config.league_milestones.is_empty() {
        issues.push("at least one league milestone is required".to_owned());
    }
    for (index, level) in config.league_milestones.iter().enumerate() {
        if !is_valid_level(*level) {
            issues.push(format!("league milestone #{} invalid", index + 1));
        }
    }
    for (index, coefficient) in config.strength_coefficients.iter().enumerate() {
        if !coefficient.is_finite() {
            issues.push(format!("strength coefficient of x^{index} invalid"));
        }
    }
    if config.unit_count < 1 {
        issues.push("invalid unit count".to_owned());
    }
    if !(config.team_strength > 0.0 && config.team_strength.is_finite()) {
        issues.push("invalid team strength".to_owned());
    }
    if !(config.first_level >= 1.0 && config.first_level.is_finite()) {
        issues.push("invalid first battle level".to_owned());
    }
    if !(config.battle_percent > 0.0 && config.battle_percent.is_finite()) {
        issues.push("invalid battle percentage".to_owned());
    }

    if issues.is_empty() {
        return Ok(());
    }
    bail!("invalid progression input: {}", issues.join("; "))
}

fn is_valid_level(level: f64) -> bool {
    (1.0..=MAX_MILESTONE_LEVEL).contains(&level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xp_planner_core::GrowthRate;

    #[test]
    fn parses_partial_plan_with_defaults() {
        let plan = PlanFile::parse(
            r#"
            [progression]
            milestones = [12.0, 18.0]
            league_milestones = [40.0]
            growth_rate = "slow"

            [filter]
            no_legends = true
            generations = [1, 2]
        "#,
        )
        .expect("plan parses");

        assert_eq!(plan.progression.milestones, vec![12.0, 18.0]);
        assert_eq!(plan.progression.growth_rate, GrowthRate::Slow);
        assert_eq!(plan.progression.unit_count, 6);
        assert!(plan.filter.no_legends);
        assert_eq!(plan.filter.generations, Some(vec![1, 2]));
        assert_eq!(plan.filter.identifiers, None);
    }

    #[test]
    fn unknown_growth_rate_parses_as_medium_fast() {
        let plan = PlanFile::parse(
            r#"
            [progression]
            growth_rate = "glacial"
        "#,
        )
        .expect("plan parses");
        assert_eq!(plan.progression.growth_rate, GrowthRate::MediumFast);
    }

    #[test]
    fn default_plan_is_valid() {
        assert!(validate(&PlanFile::default().progression).is_ok());
    }

    #[test]
    fn validation_reports_every_issue() {
        let config = ProgressionConfig {
            milestones: vec![10.0, 0.0, 101.0],
            league_milestones: Vec::new(),
            strength_coefficients: vec![1.0, f64::NAN],
            unit_count: 0,
            team_strength: 0.0,
            first_level: 0.5,
            battle_percent: -1.0,
            ..ProgressionConfig::default()
        };
        let message = validate(&config).expect_err("invalid").to_string();
        for expected in [
            "milestone #2 invalid",
            "milestone #3 invalid",
            "at least one league milestone is required",
            "strength coefficient of x^1 invalid",
            "invalid unit count",
            "invalid team strength",
            "invalid first battle level",
            "invalid battle percentage",
        ] {
            assert!(message.contains(expected), "missing `{expected}` in {message}");
        }
        assert!(!message.contains("milestone #1 invalid"));
    }

    #[test]
    fn roster_defaults_reference_tables() {
        let reference = parse_reference(
            r#"{ "entities": [ { "id": 1, "name": "Bulbasaur", "strength": 318, "baseValue": 64.0 } ] }"#,
        )
        .expect("roster parses");
        assert_eq!(reference.entities().len(), 1);
        assert_eq!(reference.entities()[0].id(), EntityId::new(1));
        assert_eq!(reference.generations(), &GenerationBoundaries::default());
    }

    #[test]
    fn allow_list_entries_are_trimmed() {
        assert_eq!(
            parse_allow_list(" 1, 4 ,7,\n25 ,\n").expect("parses"),
            vec![
                EntityId::new(1),
                EntityId::new(4),
                EntityId::new(7),
                EntityId::new(25)
            ]
        );
    }

    #[test]
    fn allow_list_rejects_bad_tokens() {
        let message = format!("{:#}", parse_allow_list("1, pikachu, 7").expect_err("invalid"));
        assert!(message.contains("`pikachu` is not an entity number"), "{message}");
        assert!(parse_allow_list(" , ").is_err());
    }

    #[test]
    fn empty_generation_selection_is_rejected() {
        let plan = PlanFile::parse(
            r#"
            [filter]
            generations = []
        "#,
        )
        .expect("plan parses");
        let message = validate_filter(&plan.filter).expect_err("invalid").to_string();
        assert!(message.contains("select at least one generation"));

        assert!(validate_filter(&FilterCriteria::default()).is_ok());
        assert!(validate_filter(&FilterCriteria {
            generations: Some(vec![3]),
            ..FilterCriteria::default()
        })
        .is_ok());
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert!(parse_reference(r#"{ "entities": [] }"#).is_err());
    }
}
