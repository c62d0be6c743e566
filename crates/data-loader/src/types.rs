//! Core domain types for TMDB candidate pools.
//!
//! Field names follow the TMDB JSON responses so the types deserialize
//! straight from saved response pages.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDB movie identifier
pub type MovieId = u32;

/// TMDB genre identifier (e.g. 28 = Action, 878 = Science Fiction)
pub type GenreId = u32;

/// Base URL for w500 poster renditions
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// =============================================================================
// Movie-related Types
// =============================================================================

/// A movie candidate as returned by the "popular" and "discover" endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Genre tags in API order. Missing or `null` in the payload means none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<GenreId>,
    /// Unbounded, API-defined popularity scale
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    /// Average vote in [0, 10]
    #[serde(rename = "vote_average", default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Movie {
    /// Create a movie with the fields the ranker reads; the rest stay empty.
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        genre_ids: Vec<GenreId>,
        popularity: f64,
        rating: f64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            genre_ids,
            popularity,
            rating,
            release_date: None,
        }
    }

    /// Release year parsed from `release_date`
    ///
    /// Example: "1999-03-31" -> Some(1999), "" -> None
    pub fn year(&self) -> Option<u16> {
        extract_year(self.release_date.as_deref()?)
    }

    /// Full poster URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
    }
}

pub(crate) fn extract_year(date: &str) -> Option<u16> {
    let year = date.split('-').next()?;
    if year.len() != 4 {
        return None;
    }
    year.parse().ok()
}

/// One page of a paginated movie listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Full record from the movie details endpoint with credits appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    pub fn year(&self) -> Option<u16> {
        extract_year(&self.release_date)
    }

    /// Cast in billing order; empty when credits weren't appended
    pub fn cast(&self) -> &[CastMember] {
        self.credits
            .as_ref()
            .map(|c| c.cast.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
}

// =============================================================================
// Genre Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Response of the genre list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreResponse {
    pub genres: Vec<Genre>,
}

/// The 19 movie genres TMDB ships with
const STANDARD_GENRES: [(GenreId, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Ordered genre list with id lookup
#[derive(Debug, Clone, Default)]
pub struct GenreCatalog {
    genres: Vec<Genre>,
    by_id: HashMap<GenreId, usize>,
}

impl GenreCatalog {
    /// Build a catalog, keeping the first entry for a repeated id
    pub fn from_genres(genres: Vec<Genre>) -> Self {
        let mut catalog = Self::default();
        for genre in genres {
            if catalog.by_id.contains_key(&genre.id) {
                continue;
            }
            catalog.by_id.insert(genre.id, catalog.genres.len());
            catalog.genres.push(genre);
        }
        catalog
    }

    /// Catalog of the standard TMDB movie genres
    pub fn standard() -> Self {
        Self::from_genres(
            STANDARD_GENRES
                .iter()
                .map(|&(id, name)| Genre {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        )
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn get(&self, id: GenreId) -> Option<&Genre> {
        self.by_id.get(&id).map(|&idx| &self.genres[idx])
    }

    pub fn name_of(&self, id: GenreId) -> Option<&str> {
        self.get(id).map(|g| g.name.as_str())
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&Genre> {
        let wanted = name.trim();
        self.genres
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(wanted))
    }

    /// Display names for a list of tags; unknown ids render as `#<id>`
    pub fn names_for(&self, ids: &[GenreId]) -> Vec<String> {
        ids.iter()
            .map(|&id| match self.name_of(id) {
                Some(name) => name.to_string(),
                None => format!("#{}", id),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

// =============================================================================
// Genre Selection
// =============================================================================

/// The set of genres a user picked. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreSelection {
    ids: HashSet<GenreId>,
}

impl GenreSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: GenreId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: GenreId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GenreId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of `tags` that are in the selection
    pub fn overlap(&self, tags: &[GenreId]) -> usize {
        tags.iter().filter(|tag| self.ids.contains(tag)).count()
    }

    /// Ids sorted ascending and comma-joined, the form the selection
    /// screen hands to the recommendation screen
    pub fn to_query_string(&self) -> String {
        let mut ids: Vec<GenreId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<GenreId> for GenreSelection {
    fn from_iter<I: IntoIterator<Item = GenreId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// CandidatePool - the in-memory set of movies available for ranking
// =============================================================================

/// Movies aggregated from one or more response pages.
///
/// Keeps the insertion order, which is the input order the ranker uses to
/// break score ties.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub(crate) movies: Vec<Movie>,
    /// Position of each movie in `movies`
    pub(crate) id_index: HashMap<MovieId, usize>,
    /// Movies grouped by genre tag
    pub(crate) genre_index: HashMap<GenreId, Vec<MovieId>>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// All movies in pool order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.id_index.get(&id).map(|&idx| &self.movies[idx])
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Movies tagged with `genre`, in pool order
    pub fn get_movies_by_genre(&self, genre: GenreId) -> &[MovieId] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Insert a movie; returns false (and leaves the pool alone) when the
    /// id is already present
    pub fn insert_movie(&mut self, movie: Movie) -> bool {
        if self.id_index.contains_key(&movie.id) {
            return false;
        }
        for &genre in &movie.genre_ids {
            self.genre_index.entry(genre).or_default().push(movie.id);
        }
        self.id_index.insert(movie.id, self.movies.len());
        self.movies.push(movie);
        true
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl FromIterator<Movie> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut pool = CandidatePool::new();
        for movie in iter {
            pool.insert_movie(movie);
        }
        pool
    }
}
