//! Previously shown movies to keep out of the next batch.
//!
//! The set is owned by the caller and passed into every ranking call; the
//! ranker never remembers what it returned.

use crate::scoring::ScoredCandidate;
use data_loader::{Movie, MovieId};
use std::collections::HashSet;

/// Movie ids to de-prioritize on a refresh. Movies match by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: HashSet<MovieId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusion set built from a batch the user has just seen
    pub fn from_movies<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> Self {
        movies.into_iter().map(|m| m.id).collect()
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Candidates not in the set, keeping their order
    pub fn retain_fresh<'a>(&self, candidates: &[ScoredCandidate<'a>]) -> Vec<ScoredCandidate<'a>> {
        candidates
            .iter()
            .filter(|candidate| !self.ids.contains(&candidate.movie.id))
            .copied()
            .collect()
    }
}

impl FromIterator<MovieId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
