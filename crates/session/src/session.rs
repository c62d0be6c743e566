//! # Recommendation Session
//!
//! Caller-side state for the recommendation screen:
//! 1. Hold the candidate pool and the user's genre selection
//! 2. Ask the ranker for a batch
//! 3. Remember that batch as the exclusion set for "show more"
//! 4. Turn ranked movies into display rows
//!
//! The ranker stays stateless; all continuity between batches lives here.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

use data_loader::{CandidatePool, GenreCatalog, GenreSelection, Movie, MovieId};
use ranker::{ExclusionSet, Ranker, ScoreBreakdown};

/// One row of the recommendation list
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub year: Option<u16>,
    pub poster_url: Option<String>,
    pub score: f64,
    pub explanation: String,
}

/// Recommendation flow for one genre selection
pub struct RecommendationSession {
    pool: Arc<CandidatePool>,
    catalog: Arc<GenreCatalog>,
    selection: GenreSelection,
    ranker: Ranker,
    /// The batch shown last; excluded from the next one
    previous: ExclusionSet,
    batches_served: usize,
}

impl RecommendationSession {
    pub fn new(
        pool: Arc<CandidatePool>,
        catalog: Arc<GenreCatalog>,
        selection: GenreSelection,
        ranker: Ranker,
    ) -> Self {
        Self {
            pool,
            catalog,
            selection,
            ranker,
            previous: ExclusionSet::new(),
            batches_served: 0,
        }
    }

    /// Build a session from the genre list handed over by the selection
    /// step, e.g. "28,12" or "Action, Science Fiction"
    pub fn from_query(
        pool: Arc<CandidatePool>,
        catalog: Arc<GenreCatalog>,
        genres: &str,
        ranker: Ranker,
    ) -> Self {
        let selection = data_loader::resolve_genre_selection(genres, &catalog);
        Self::new(pool, catalog, selection, ranker)
    }

    pub fn selection(&self) -> &GenreSelection {
        &self.selection
    }

    pub fn previous(&self) -> &ExclusionSet {
        &self.previous
    }

    pub fn batches_served(&self) -> usize {
        self.batches_served
    }

    /// Rank the next batch, excluding the previous one where possible
    pub fn next_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<MovieRecommendation> {
        let start = Instant::now();

        let ranked: Vec<(MovieId, f64)> = self
            .ranker
            .rank_scored(self.pool.movies(), &self.selection, &self.previous, rng)
            .into_iter()
            .map(|candidate| (candidate.movie.id, candidate.score))
            .collect();

        let recommendations = self.finish_batch(ranked);
        info!(
            "Batch {} ready: {} recommendations in {:.2?}",
            self.batches_served,
            recommendations.len(),
            start.elapsed()
        );
        recommendations
    }

    /// Same as [`Self::next_batch`], but ranks on the blocking thread pool
    /// so an interactive caller isn't held up by a large pool
    pub async fn next_batch_async(&mut self) -> Result<Vec<MovieRecommendation>> {
        let start = Instant::now();

        let ranked = tokio::task::spawn_blocking({
            let pool = Arc::clone(&self.pool);
            let selection = self.selection.clone();
            let previous = self.previous.clone();
            let ranker = self.ranker.clone();
            move || {
                ranker
                    .rank_scored(pool.movies(), &selection, &previous, &mut rand::rng())
                    .into_iter()
                    .map(|candidate| (candidate.movie.id, candidate.score))
                    .collect::<Vec<_>>()
            }
        })
        .await
        .context("Ranking task panicked")?;

        let recommendations = self.finish_batch(ranked);
        info!(
            "Batch {} ready: {} recommendations in {:.2?}",
            self.batches_served,
            recommendations.len(),
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Forget what was shown; the next batch starts from scratch
    pub fn reset(&mut self) {
        self.previous.clear();
        self.batches_served = 0;
    }

    fn finish_batch(&mut self, ranked: Vec<(MovieId, f64)>) -> Vec<MovieRecommendation> {
        self.previous = ranked.iter().map(|&(id, _)| id).collect();
        self.batches_served += 1;

        ranked
            .into_iter()
            .filter_map(|(id, score)| {
                let movie = self.pool.get_movie(id)?;
                Some(self.to_recommendation(movie, score))
            })
            .collect()
    }

    fn to_recommendation(&self, movie: &Movie, score: f64) -> MovieRecommendation {
        let breakdown = ScoreBreakdown::compute(movie, &self.selection, self.ranker.config());
        let matched_ids: Vec<_> = movie
            .genre_ids
            .iter()
            .copied()
            .filter(|&id| self.selection.contains(id))
            .collect();
        let matched = self.catalog.names_for(&matched_ids);

        let genre_part = if matched.is_empty() {
            "no matching genres".to_string()
        } else {
            format!(
                "{} matching genre{} ({})",
                breakdown.genre_overlap,
                if breakdown.genre_overlap == 1 { "" } else { "s" },
                matched.join(", ")
            )
        };

        MovieRecommendation {
            movie_id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            genres: self.catalog.names_for(&movie.genre_ids),
            year: movie.year(),
            poster_url: movie.poster_url(),
            score,
            explanation: format!(
                "Score {:.2}: {}, popularity {:.1}, rating {:.1}/10",
                score, genre_part, movie.popularity, movie.rating
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ranker::RankerConfig;
    use std::collections::HashSet;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// 15 Action/Sci-Fi movies that always make the top pool, plus 10
    /// untagged filler movies that never do
    fn build_test_pool() -> Arc<CandidatePool> {
        let mut pool = CandidatePool::new();
        for id in 1..=15 {
            let mut movie = Movie::new(id, format!("Feature {}", id), vec![28, 878], 70.0, 7.5);
            movie.release_date = Some("1999-03-31".to_string());
            movie.poster_path = Some(format!("/p{}.jpg", id));
            pool.insert_movie(movie);
        }
        for id in 100..110 {
            pool.insert_movie(Movie::new(id, format!("Filler {}", id), vec![], 5.0, 4.0));
        }
        Arc::new(pool)
    }

    fn build_test_session() -> RecommendationSession {
        RecommendationSession::from_query(
            build_test_pool(),
            Arc::new(GenreCatalog::standard()),
            "28,878",
            Ranker::default(),
        )
    }

    fn ids(batch: &[MovieRecommendation]) -> HashSet<MovieId> {
        batch.iter().map(|r| r.movie_id).collect()
    }

    // ============================================================================
    // Unit Tests
    // ============================================================================

    #[test]
    fn test_from_query_parses_selection() {
        let session = RecommendationSession::from_query(
            build_test_pool(),
            Arc::new(GenreCatalog::standard()),
            "Action, 878, bogus",
            Ranker::default(),
        );
        assert_eq!(session.selection().len(), 2);
        assert!(session.selection().contains(28));
        assert!(session.selection().contains(878));
    }

    #[test]
    fn test_first_batch_is_full() {
        let mut session = build_test_session();
        let batch = session.next_batch(&mut StdRng::seed_from_u64(1));

        assert_eq!(batch.len(), 5);
        assert_eq!(ids(&batch).len(), 5);
        assert_eq!(session.batches_served(), 1);
        assert_eq!(session.previous().len(), 5);
    }

    #[test]
    fn test_show_more_excludes_previous_batch() {
        let mut session = build_test_session();
        let mut rng = StdRng::seed_from_u64(99);

        let first = session.next_batch(&mut rng);
        let second = session.next_batch(&mut rng);
        let third = session.next_batch(&mut rng);

        assert!(ids(&first).is_disjoint(&ids(&second)));
        assert!(ids(&second).is_disjoint(&ids(&third)));
        // Only the latest batch is carried forward, not the whole history
        assert_eq!(session.previous().len(), 5);
        assert!(ids(&third).iter().all(|&id| session.previous().contains(id)));
        assert_eq!(session.batches_served(), 3);
    }

    #[test]
    fn test_recommendation_rows() {
        let mut session = RecommendationSession::new(
            build_test_pool(),
            Arc::new(GenreCatalog::standard()),
            [28].into_iter().collect(),
            Ranker::new(RankerConfig::default().without_jitter()),
        );
        let batch = session.next_batch(&mut StdRng::seed_from_u64(5));
        let row = &batch[0];

        assert!(row.movie_id <= 15);
        assert_eq!(row.genres, vec!["Action".to_string(), "Science Fiction".to_string()]);
        assert_eq!(row.year, Some(1999));
        assert!(row.poster_url.as_deref().unwrap().starts_with("https://image.tmdb.org/t/p/w500/p"));
        // 0.7 + 0.14 + 0.075
        assert!((row.score - 0.915).abs() < 1e-9);
        assert!(row.explanation.contains("1 matching genre (Action)"));
    }

    #[test]
    fn test_reset_forgets_previous_batch() {
        let mut session = build_test_session();
        session.next_batch(&mut StdRng::seed_from_u64(3));
        session.reset();

        assert!(session.previous().is_empty());
        assert_eq!(session.batches_served(), 0);
    }

    #[test]
    fn test_empty_pool_session() {
        let mut session = RecommendationSession::new(
            Arc::new(CandidatePool::new()),
            Arc::new(GenreCatalog::standard()),
            GenreSelection::new(),
            Ranker::default(),
        );
        assert!(session.next_batch(&mut StdRng::seed_from_u64(0)).is_empty());
        assert!(session.previous().is_empty());
    }

    #[tokio::test]
    async fn test_next_batch_async() {
        let mut session = build_test_session();

        let first = session.next_batch_async().await.expect("ranking failed");
        let second = session.next_batch_async().await.expect("ranking failed");

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        assert!(ids(&first).iter().all(|id| *id <= 15));
        assert!(ids(&first).is_disjoint(&ids(&second)));
    }
}
