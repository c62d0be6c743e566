//! Building a CandidatePool from saved response pages.
//!
//! Pages are parsed in parallel and merged in the order they were given,
//! so the pool order matches the order the pages were fetched in.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

impl CandidatePool {
    /// Load and merge one or more listing pages
    ///
    /// Steps:
    /// 1. Parse every page in parallel
    /// 2. Insert movies page by page, dropping ids already seen
    /// 3. Validate popularity and rating values
    pub fn load_from_files(paths: &[PathBuf]) -> Result<Self> {
        info!("Loading candidate pool from {} page(s)", paths.len());

        // par_iter + collect keeps page order
        let pages: Vec<Result<Vec<Movie>>> = paths
            .par_iter()
            .map(|path| parser::parse_movie_page(path))
            .collect();

        let mut pool = CandidatePool::new();
        let mut duplicates = 0usize;
        for page in pages {
            for movie in page? {
                if !pool.insert_movie(movie) {
                    duplicates += 1;
                }
            }
        }
        if duplicates > 0 {
            debug!("Dropped {} duplicate movies across pages", duplicates);
        }

        pool.validate()?;

        info!("Candidate pool ready: {} movies", pool.len());
        Ok(pool)
    }

    /// Check every movie carries usable ranking signals
    ///
    /// - popularity must be finite and non-negative
    /// - rating must lie in [0, 10]
    pub fn validate(&self) -> Result<()> {
        for movie in &self.movies {
            if !movie.popularity.is_finite() || movie.popularity < 0.0 {
                return Err(DataLoadError::InvalidValue {
                    movie_id: movie.id,
                    field: "popularity".to_string(),
                    value: movie.popularity.to_string(),
                });
            }
            if !(0.0..=10.0).contains(&movie.rating) {
                return Err(DataLoadError::InvalidValue {
                    movie_id: movie.id,
                    field: "vote_average".to_string(),
                    value: movie.rating.to_string(),
                });
            }
        }
        if self.id_index.len() != self.movies.len() {
            return Err(DataLoadError::ValidationError(format!(
                "id index holds {} entries for {} movies",
                self.id_index.len(),
                self.movies.len()
            )));
        }
        Ok(())
    }

    /// Case-insensitive title search
    ///
    /// Exact matches come first, then substring matches; within each group
    /// more popular movies come first.
    pub fn search_by_title(&self, query: &str) -> Vec<&Movie> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &Movie)> = self
            .movies
            .iter()
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((0, movie))
                } else if title.contains(&query) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.popularity.total_cmp(&a.1.popularity))
        });
        matches.into_iter().map(|(_, movie)| movie).collect()
    }
}
