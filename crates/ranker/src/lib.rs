//! Recommendation ranking for genre-driven movie picks.
//!
//! This crate provides:
//! - Scoring of candidates against a genre selection, with random jitter
//! - The Ranker, which turns a candidate pool into a short varied batch
//! - ExclusionSet for keeping the previous batch out of the next one
//! - RankerConfig holding every weight and size
//!
//! ## Example Usage
//! ```ignore
//! use ranker::{ExclusionSet, Ranker, RankerConfig};
//! use data_loader::parse_genre_selection;
//!
//! let ranker = Ranker::new(RankerConfig::default());
//! let selected = parse_genre_selection("28,12");
//! let mut rng = rand::rng();
//!
//! let first = ranker.rank(pool.movies(), &selected, &ExclusionSet::new(), &mut rng);
//! // "Show more": feed the previous batch back as the exclusion set
//! let more = ranker.rank(pool.movies(), &selected, &ExclusionSet::from_movies(&first), &mut rng);
//! ```

pub mod config;
pub mod exclusion;
pub mod ranker;
pub mod scoring;

// Re-export main types
pub use config::RankerConfig;
pub use exclusion::ExclusionSet;
pub use ranker::{Ranker, rank};
pub use scoring::{ScoreBreakdown, ScoredCandidate, score_candidate};
