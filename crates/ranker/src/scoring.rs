//! Per-candidate scoring.
//!
//! ```text
//! score = (genre_overlap * 0.7 + popularity / 100 * 0.2 + rating / 10 * 0.1) * jitter
//! ```
//!
//! Weights and scales come from [`RankerConfig`]; jitter is a fresh uniform
//! draw per candidate per call.

use crate::config::RankerConfig;
use data_loader::{GenreSelection, Movie};
use rand::Rng;
use rayon::prelude::*;

/// A movie paired with the score it got in one ranking call
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub movie: &'a Movie,
    pub score: f64,
}

/// The unjittered terms of a score, kept apart for explanations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub genre_overlap: usize,
    pub popularity_term: f64,
    pub rating_term: f64,
}

impl ScoreBreakdown {
    pub fn compute(movie: &Movie, selected: &GenreSelection, config: &RankerConfig) -> Self {
        Self {
            genre_overlap: selected.overlap(&movie.genre_ids),
            popularity_term: finite_or_zero(movie.popularity) / config.popularity_scale,
            rating_term: finite_or_zero(movie.rating) / config.rating_scale,
        }
    }

    /// Weighted sum before jitter
    pub fn weighted(&self, config: &RankerConfig) -> f64 {
        self.genre_overlap as f64 * config.genre_weight
            + self.popularity_term * config.popularity_weight
            + self.rating_term * config.rating_weight
    }
}

// NaN or infinite signals would poison the sort
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Score of one movie for a given jitter factor
pub fn score_candidate(
    movie: &Movie,
    selected: &GenreSelection,
    config: &RankerConfig,
    jitter: f64,
) -> f64 {
    ScoreBreakdown::compute(movie, selected, config).weighted(config) * jitter
}

/// Draw one jitter factor from the configured range
pub fn draw_jitter<R: Rng + ?Sized>(rng: &mut R, config: &RankerConfig) -> f64 {
    if config.has_jitter() {
        rng.random_range(config.jitter_min..config.jitter_max)
    } else {
        config.jitter_min
    }
}

/// Score every movie in the pool, preserving pool order.
///
/// Jitter values are drawn sequentially so a seeded source reproduces the
/// same scores; the weighted sums are computed in parallel.
pub fn score_pool<'a, R: Rng + ?Sized>(
    pool: &'a [Movie],
    selected: &GenreSelection,
    config: &RankerConfig,
    rng: &mut R,
) -> Vec<ScoredCandidate<'a>> {
    let jitters: Vec<f64> = (0..pool.len()).map(|_| draw_jitter(rng, config)).collect();

    pool.par_iter()
        .zip(jitters.par_iter())
        .map(|(movie, &jitter)| ScoredCandidate {
            movie,
            score: score_candidate(movie, selected, config, jitter),
        })
        .collect()
}
