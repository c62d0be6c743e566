//! The Recommendation Ranker.
//!
//! ## Algorithm
//! 1. Score every candidate (see [`crate::scoring`])
//! 2. Stable sort by score, highest first; ties keep pool order
//! 3. Keep the top `top_pool_size` (15) as the top pool
//! 4. Drop candidates in the exclusion set
//! 5. If at least `batch_size` (5) remain, shuffle those and take 5;
//!    otherwise shuffle the whole top pool, excluded movies included, and
//!    take 5
//!
//! Step 5 favours always filling the batch over never repeating a movie.

use crate::config::RankerConfig;
use crate::exclusion::ExclusionSet;
use crate::scoring::{ScoredCandidate, score_pool};
use anyhow::Result;
use data_loader::{GenreSelection, Movie};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Stateless ranking routine; cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankerConfig,
}

impl Ranker {
    /// Wrap `config` as is. Builder-made configs are trusted; anything
    /// read from user input should go through [`Ranker::try_new`].
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    /// Validate `config` before wrapping it
    pub fn try_new(config: RankerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Steps 1-3: the best-scored candidates, highest first
    pub fn top_pool<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a [Movie],
        selected: &GenreSelection,
        rng: &mut R,
    ) -> Vec<ScoredCandidate<'a>> {
        let mut scored = score_pool(pool, selected, &self.config, rng);
        // sort_by is stable, so equal scores keep pool order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.config.top_pool_size);
        scored
    }

    /// Rank and return the batch together with each movie's score
    #[instrument(
        skip_all,
        fields(pool = pool.len(), genres = selected.len(), excluded = exclude.len())
    )]
    pub fn rank_scored<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a [Movie],
        selected: &GenreSelection,
        exclude: &ExclusionSet,
        rng: &mut R,
    ) -> Vec<ScoredCandidate<'a>> {
        if pool.is_empty() {
            debug!("Empty candidate pool, nothing to rank");
            return Vec::new();
        }

        let top = self.top_pool(pool, selected, rng);
        let fresh = exclude.retain_fresh(&top);

        let mut batch = if fresh.len() >= self.config.batch_size {
            debug!("{} of {} top candidates are fresh", fresh.len(), top.len());
            fresh
        } else {
            debug!(
                "Only {} fresh candidates, falling back to the full top pool of {}",
                fresh.len(),
                top.len()
            );
            top
        };

        batch.shuffle(rng);
        batch.truncate(self.config.batch_size);

        debug!("Selected {} recommendations", batch.len());
        batch
    }

    /// Rank `pool` for the selected genres, skipping `exclude` when possible
    ///
    /// Returns at most `batch_size` distinct movies from the pool. The pool
    /// and exclusion set are only read.
    pub fn rank<R: Rng + ?Sized>(
        &self,
        pool: &[Movie],
        selected: &GenreSelection,
        exclude: &ExclusionSet,
        rng: &mut R,
    ) -> Vec<Movie> {
        self.rank_scored(pool, selected, exclude, rng)
            .into_iter()
            .map(|candidate| candidate.movie.clone())
            .collect()
    }
}

/// Rank with the default configuration and the thread-local generator.
///
/// Every call draws fresh randomness, so repeated calls give visibly
/// different batches.
pub fn rank(pool: &[Movie], selected: &GenreSelection, exclude: &ExclusionSet) -> Vec<Movie> {
    Ranker::default().rank(pool, selected, exclude, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn movies(n: u32) -> Vec<Movie> {
        (1..=n)
            .map(|id| Movie::new(id, format!("Movie {}", id), vec![28], 50.0, 7.0))
            .collect()
    }

    #[test]
    fn test_empty_pool() {
        let ranker = Ranker::default();
        let result = ranker.rank(
            &[],
            &GenreSelection::new(),
            &ExclusionSet::new(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_small_pool_returns_everything() {
        let pool = movies(3);
        let exclude: ExclusionSet = [1, 2, 3].into_iter().collect();
        let result = rank(&pool, &GenreSelection::new(), &exclude);

        let ids: HashSet<u32> = result.iter().map(|m| m.id).collect();
        assert_eq!(result.len(), 3);
        assert_eq!(ids, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_ties_keep_pool_order_in_top_pool() {
        let ranker = Ranker::new(RankerConfig::default().without_jitter());
        let pool = movies(20);
        let top = ranker.top_pool(&pool, &GenreSelection::new(), &mut StdRng::seed_from_u64(3));

        let ids: Vec<u32> = top.iter().map(|c| c.movie.id).collect();
        assert_eq!(ids, (1..=15).collect::<Vec<u32>>());
    }

    #[test]
    fn test_top_pool_sorted_descending() {
        let ranker = Ranker::default();
        let selected: GenreSelection = [28].into_iter().collect();
        let pool: Vec<Movie> = (1..=40)
            .map(|id| Movie::new(id, "x", vec![28], id as f64 * 3.0, 6.0))
            .collect();
        let top = ranker.top_pool(&pool, &selected, &mut StdRng::seed_from_u64(9));

        assert_eq!(top.len(), 15);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_seeded_rank_is_reproducible() {
        let ranker = Ranker::default();
        let pool = movies(30);
        let selected: GenreSelection = [28].into_iter().collect();

        let a = ranker.rank(&pool, &selected, &ExclusionSet::new(), &mut StdRng::seed_from_u64(11));
        let b = ranker.rank(&pool, &selected, &ExclusionSet::new(), &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_batch_size() {
        let ranker = Ranker::new(RankerConfig::default().with_batch_size(8));
        let pool = movies(30);
        let result = ranker.rank(
            &pool,
            &GenreSelection::new(),
            &ExclusionSet::new(),
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(result.len(), 8);
    }

    #[test]
    fn test_try_new_rejects_nan_jitter() {
        let config = RankerConfig::default().with_jitter(f64::NAN, f64::NAN);
        assert!(!config.has_jitter());
        assert!(Ranker::try_new(config).is_err());

        let ranker = Ranker::try_new(RankerConfig::default().with_batch_size(3)).unwrap();
        assert_eq!(ranker.config().batch_size, 3);
    }

    #[test]
    fn test_pool_is_not_mutated() {
        let pool = movies(20);
        let before = pool.clone();
        let selected: GenreSelection = [28].into_iter().collect();
        let exclude: ExclusionSet = [1, 2].into_iter().collect();
        let _ = rank(&pool, &selected, &exclude);

        assert_eq!(pool, before);
        assert_eq!(exclude.len(), 2);
    }
}
