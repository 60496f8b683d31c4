#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the XP planner.
//!
//! The session owns the reference roster and the last computed results. It is
//! mutated exclusively through [`apply`] and inspected through [`query`].

use tracing::debug;
use xp_planner_core::{
    Command, Event, LeveledEntity, PlannerError, ProgressionPlan, ReferenceData,
};

/// In-memory state held between calculations.
#[derive(Debug)]
pub struct Session {
    reference: ReferenceData,
    plan: Option<ProgressionPlan>,
    roster: Option<Vec<Vec<LeveledEntity>>>,
}

impl Session {
    /// Creates a session backed by the provided reference data and no results.
    #[must_use]
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            plan: None,
            roster: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ReferenceData::default())
    }
}

/// Applies the provided command to the session, recording results deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RecordPlan { plan } => {
            out_events.push(Event::PlanRecorded {
                segments: plan.segments.len(),
                total_exp: plan.total_exp,
            });
            session.plan = Some(plan);
            session.roster = None;
        }
        Command::RecordRoster { roster } => {
            if session.plan.is_none() {
                debug!("roster submitted without a plan");
                out_events.push(Event::RosterRejected {
                    reason: PlannerError::MissingPlan,
                });
                return;
            }
            out_events.push(Event::RosterRecorded {
                segments: roster.len(),
                selected: roster.iter().map(Vec::len).sum(),
            });
            session.roster = Some(roster);
        }
        Command::ClearResults => {
            session.plan = None;
            session.roster = None;
            out_events.push(Event::ResultsCleared);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::Session;
    use xp_planner_core::{Entity, LeveledEntity, ProgressionPlan, ReferenceData};

    /// Provides read-only access to the reference data backing the session.
    #[must_use]
    pub fn reference(session: &Session) -> &ReferenceData {
        &session.reference
    }

    /// Candidate entities in roster order.
    #[must_use]
    pub fn entities(session: &Session) -> &[Entity] {
        session.reference.entities()
    }

    /// Last recorded progression plan, if any.
    #[must_use]
    pub fn plan(session: &Session) -> Option<&ProgressionPlan> {
        session.plan.as_ref()
    }

    /// Last recorded roster for the current plan, if any.
    #[must_use]
    pub fn roster(session: &Session) -> Option<&[Vec<LeveledEntity>]> {
        session.roster.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_holds_no_results() {
        let session = Session::default();
        assert!(query::plan(&session).is_none());
        assert!(query::roster(&session).is_none());
        assert!(query::entities(&session).is_empty());
    }

    #[test]
    fn clearing_results_emits_event() {
        let mut session = Session::default();
        let mut events = Vec::new();
        apply(&mut session, Command::ClearResults, &mut events);
        assert_eq!(events, vec![Event::ResultsCleared]);
    }
}
