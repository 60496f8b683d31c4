use xp_planner_core::{
    CategoryTable, Command, Entity, EntityId, Event, GenerationBoundaries, LeveledEntity,
    PlannerError, ProgressionPlan, ReferenceData,
};
use xp_planner_session::{apply, query, Session};

fn session() -> Session {
    Session::new(ReferenceData::new(
        vec![Entity::new(EntityId::new(1), "Bulbasaur", 318, 64.0)],
        CategoryTable::default(),
        GenerationBoundaries::default(),
    ))
}

fn plan(total_exp: f64) -> ProgressionPlan {
    ProgressionPlan {
        total_exp,
        max_level: 40.0,
        segments: Vec::new(),
    }
}

fn roster() -> Vec<Vec<LeveledEntity>> {
    let entity = Entity::new(EntityId::new(1), "Bulbasaur", 318, 64.0);
    vec![
        vec![LeveledEntity::new(entity.clone(), 8)],
        Vec::new(),
        vec![
            LeveledEntity::new(entity.clone(), 12),
            LeveledEntity::new(entity, 13),
        ],
    ]
}

#[test]
fn exposes_reference_roster() {
    let session = session();
    assert_eq!(query::entities(&session).len(), 1);
    assert_eq!(query::reference(&session).generations().generation_count(), 9);
}

#[test]
fn roster_requires_a_plan() {
    let mut session = session();
    let mut events = Vec::new();

    apply(&mut session, Command::RecordRoster { roster: roster() }, &mut events);

    assert_eq!(
        events,
        vec![Event::RosterRejected {
            reason: PlannerError::MissingPlan
        }]
    );
    assert!(query::roster(&session).is_none());
}

#[test]
fn records_plan_then_roster() {
    let mut session = session();
    let mut events = Vec::new();

    apply(&mut session, Command::RecordPlan { plan: plan(1_000.0) }, &mut events);
    apply(&mut session, Command::RecordRoster { roster: roster() }, &mut events);

    assert_eq!(
        events,
        vec![
            Event::PlanRecorded {
                segments: 0,
                total_exp: 1_000.0
            },
            Event::RosterRecorded {
                segments: 3,
                selected: 3
            },
        ]
    );
    assert_eq!(query::plan(&session).map(|plan| plan.total_exp), Some(1_000.0));
    assert_eq!(query::roster(&session).map(<[_]>::len), Some(3));
}

#[test]
fn new_plan_discards_stale_roster() {
    let mut session = session();
    let mut events = Vec::new();

    apply(&mut session, Command::RecordPlan { plan: plan(1_000.0) }, &mut events);
    apply(&mut session, Command::RecordRoster { roster: roster() }, &mut events);
    apply(&mut session, Command::RecordPlan { plan: plan(2_000.0) }, &mut events);

    assert!(query::roster(&session).is_none());
    assert_eq!(query::plan(&session).map(|plan| plan.total_exp), Some(2_000.0));
}

#[test]
fn clearing_forgets_every_result() {
    let mut session = session();
    let mut events = Vec::new();

    apply(&mut session, Command::RecordPlan { plan: plan(1_000.0) }, &mut events);
    apply(&mut session, Command::RecordRoster { roster: roster() }, &mut events);
    events.clear();
    apply(&mut session, Command::ClearResults, &mut events);

    assert_eq!(events, vec![Event::ResultsCleared]);
    assert!(query::plan(&session).is_none());
    assert!(query::roster(&session).is_none());
    assert_eq!(query::entities(&session).len(), 1);
}
