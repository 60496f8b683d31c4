#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population filter restricting the candidate roster before selection.

use std::collections::HashSet;

use tracing::debug;
use xp_planner_core::{
    CategoryTable, Entity, EntityId, FilterCriteria, GenerationBoundaries, PlannerError,
};

/// Pure system that narrows a roster by categories, generations and identifiers.
#[derive(Debug)]
pub struct PopulationFilter<'a> {
    categories: &'a CategoryTable,
    generations: &'a GenerationBoundaries,
}

impl<'a> PopulationFilter<'a> {
    /// Creates a filter backed by the provided reference tables.
    #[must_use]
    pub const fn new(categories: &'a CategoryTable, generations: &'a GenerationBoundaries) -> Self {
        Self {
            categories,
            generations,
        }
    }

    /// Returns the entities that satisfy `criteria`, preserving roster order.
    ///
    /// An entity survives when it belongs to one of the requested generations
    /// (every generation when none are requested), is not a member of any
    /// excluded category, and appears in the identifier allow-list when one is
    /// given. An empty result is reported as [`PlannerError::EmptyResult`].
    pub fn filter<'e>(
        &self,
        entities: &'e [Entity],
        criteria: &FilterCriteria,
    ) -> Result<Vec<&'e Entity>, PlannerError> {
        let excluded = self.excluded_ids(criteria);
        let generations = self.requested_generations(criteria);
        let allowed: Option<HashSet<EntityId>> = criteria
            .identifiers
            .as_ref()
            .map(|identifiers| identifiers.iter().copied().collect());

        let filtered: Vec<&Entity> = entities
            .iter()
            .filter(|entity| {
                allowed
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&entity.id()))
            })
            .filter(|entity| {
                self.generations
                    .generation_of(entity.id())
                    .map_or(false, |generation| generations.contains(&generation))
            })
            .filter(|entity| !excluded.contains(&entity.id()))
            .collect();

        debug!(
            candidates = entities.len(),
            excluded = excluded.len(),
            remaining = filtered.len(),
            "filtered population"
        );

        if filtered.is_empty() {
            return Err(PlannerError::EmptyResult);
        }
        Ok(filtered)
    }

    fn excluded_ids(&self, criteria: &FilterCriteria) -> HashSet<EntityId> {
        criteria
            .excluded_categories()
            .into_iter()
            .flat_map(|category| self.categories.members(category).iter().copied())
            .collect()
    }

    fn requested_generations(&self, criteria: &FilterCriteria) -> Vec<u8> {
        match &criteria.generations {
            Some(generations) => generations.clone(),
            None => (1..=self.generations.generation_count()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generations_cover_every_boundary() {
        let categories = CategoryTable::default();
        let generations = GenerationBoundaries::default();
        let filter = PopulationFilter::new(&categories, &generations);
        assert_eq!(
            filter.requested_generations(&FilterCriteria::default()),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn exclusion_set_is_union_of_selected_categories() {
        let categories = CategoryTable::default();
        let generations = GenerationBoundaries::default();
        let filter = PopulationFilter::new(&categories, &generations);
        let criteria = FilterCriteria {
            no_beasts: true,
            no_paradox: true,
            ..FilterCriteria::default()
        };
        let excluded = filter.excluded_ids(&criteria);
        assert!(excluded.contains(&EntityId::new(794)));
        assert!(excluded.contains(&EntityId::new(1020)));
        assert!(!excluded.contains(&EntityId::new(144)));
    }
}
