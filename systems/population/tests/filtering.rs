use xp_planner_core::{
    CategoryTable, Entity, EntityId, FilterCriteria, GenerationBoundaries, PlannerError,
};
use xp_planner_system_population::PopulationFilter;

fn roster() -> Vec<Entity> {
    vec![
        Entity::new(EntityId::new(1), "Bulbasaur", 318, 64.0),
        Entity::new(EntityId::new(144), "Articuno", 580, 261.0),
        Entity::new(EntityId::new(794), "Buzzwole", 600, 270.0),
        Entity::new(EntityId::new(1020), "Gouging Fire", 590, 295.0),
    ]
}

fn run(criteria: &FilterCriteria) -> Result<Vec<u32>, PlannerError> {
    let categories = CategoryTable::default();
    let generations = GenerationBoundaries::default();
    let entities = roster();
    let filter = PopulationFilter::new(&categories, &generations);
    filter
        .filter(&entities, criteria)
        .map(|selected| selected.iter().map(|entity| entity.id().get()).collect())
}

#[test]
fn default_criteria_keep_everything() {
    assert_eq!(run(&FilterCriteria::default()), Ok(vec![1, 144, 794, 1020]));
}

#[test]
fn excludes_legendary_entities() {
    let criteria = FilterCriteria {
        no_legends: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1, 794, 1020]));
}

#[test]
fn excludes_beasts() {
    let criteria = FilterCriteria {
        no_beasts: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1, 144, 1020]));
}

#[test]
fn excludes_paradox_entities() {
    let criteria = FilterCriteria {
        no_paradox: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1, 144, 794]));
}

#[test]
fn excludes_starters() {
    let criteria = FilterCriteria {
        no_starters: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![144, 794, 1020]));
}

#[test]
fn combined_flags_remove_the_union() {
    let criteria = FilterCriteria {
        no_legends: true,
        no_beasts: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1, 1020]));

    let criteria = FilterCriteria {
        no_legends: true,
        no_beasts: true,
        no_paradox: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1]));
}

#[test]
fn generations_restrict_identifier_ranges() {
    let criteria = FilterCriteria {
        generations: Some(vec![1]),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![1, 144]));

    let criteria = FilterCriteria {
        generations: Some(vec![7, 9]),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![794, 1020]));
}

#[test]
fn allow_list_intersects_generations_and_exclusions() {
    let criteria = FilterCriteria {
        identifiers: Some(vec![EntityId::new(144), EntityId::new(794)]),
        no_beasts: true,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Ok(vec![144]));

    let criteria = FilterCriteria {
        identifiers: Some(vec![EntityId::new(144)]),
        generations: Some(vec![2]),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Err(PlannerError::EmptyResult));
}

#[test]
fn allow_list_of_unknown_identifier_is_empty_result() {
    let criteria = FilterCriteria {
        identifiers: Some(vec![EntityId::new(999)]),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Err(PlannerError::EmptyResult));
}

#[test]
fn unknown_generation_matches_nothing() {
    let criteria = FilterCriteria {
        generations: Some(vec![12]),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&criteria), Err(PlannerError::EmptyResult));
}

#[test]
fn identifiers_outside_every_generation_are_dropped() {
    let categories = CategoryTable::default();
    let generations = GenerationBoundaries::default();
    let entities = vec![
        Entity::new(EntityId::new(0), "Missingno", 200, 10.0),
        Entity::new(EntityId::new(25), "Pikachu", 320, 112.0),
        Entity::new(EntityId::new(2000), "Fakemon", 400, 140.0),
    ];

    let selected = PopulationFilter::new(&categories, &generations)
        .filter(&entities, &FilterCriteria::default())
        .expect("filtered");

    let ids: Vec<u32> = selected.iter().map(|entity| entity.id().get()).collect();
    assert_eq!(ids, vec![25]);
}
