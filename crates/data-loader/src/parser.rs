//! Parsers for saved TMDB responses and for genre selections.
//!
//! Handles:
//! - movie listing pages (`movie/popular`, `discover/movie`), or a bare array
//! - the genre list (`genre/movie/list`)
//! - movie details with credits appended
//! - comma-separated genre selections handed over by the selection step

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::warn;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| DataLoadError::ParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// A listing file is either a full response page or just its results
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingFile {
    Page(MovieResponse),
    Bare(Vec<Movie>),
}

/// Parse one saved movie listing into its movies, in page order
pub fn parse_movie_page(path: &Path) -> Result<Vec<Movie>> {
    let movies = match read_json::<ListingFile>(path)? {
        ListingFile::Page(page) => page.results,
        ListingFile::Bare(movies) => movies,
    };
    Ok(movies)
}

/// Parse a saved genre list response
pub fn parse_genre_catalog(path: &Path) -> Result<GenreCatalog> {
    let response: GenreResponse = read_json(path)?;
    Ok(GenreCatalog::from_genres(response.genres))
}

/// Parse a saved movie details response
pub fn parse_movie_details(path: &Path) -> Result<MovieDetails> {
    read_json(path)
}

/// Parse a delimited list of genre ids, e.g. "28,12,878"
///
/// Commas, whitespace and pipes all separate entries. Entries that aren't
/// valid ids are skipped with a warning rather than failing the whole
/// selection.
pub fn parse_genre_selection(input: &str) -> GenreSelection {
    let mut selection = GenreSelection::new();
    for token in split_selection(input) {
        match token.parse::<GenreId>() {
            Ok(id) => {
                selection.insert(id);
            }
            Err(_) => warn!("Skipping invalid genre id '{}'", token),
        }
    }
    selection
}

/// Like [`parse_genre_selection`], but also accepts genre names from the
/// catalog ("Action", "science fiction"). Names containing spaces must be
/// separated by commas.
pub fn resolve_genre_selection(input: &str, catalog: &GenreCatalog) -> GenreSelection {
    let mut selection = GenreSelection::new();
    for token in input.split([',', '|']).map(str::trim).filter(|t| !t.is_empty()) {
        if let Ok(id) = token.parse::<GenreId>() {
            selection.insert(id);
        } else if let Some(genre) = catalog.find_by_name(token) {
            selection.insert(genre.id);
        } else {
            warn!("Skipping unknown genre '{}'", token);
        }
    }
    selection
}

fn split_selection(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == ',' || c == '|' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}
