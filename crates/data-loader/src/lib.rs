//! # Data Loader Crate
//!
//! Loads TMDB movie listings into an in-memory candidate pool and parses
//! the genre inputs the recommendation flow needs.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Movie, Genre, GenreCatalog, GenreSelection, CandidatePool)
//! - **parser**: Decode saved JSON responses and delimited genre selections
//! - **index**: Merge listing pages into a validated CandidatePool
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{CandidatePool, parser};
//! use std::path::PathBuf;
//!
//! let pool = CandidatePool::load_from_files(&[
//!     PathBuf::from("data/popular-1.json"),
//!     PathBuf::from("data/popular-2.json"),
//! ])?;
//! let selection = parser::parse_genre_selection("28,12");
//!
//! println!("{} candidates, {} genres selected", pool.len(), selection.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use parser::{parse_genre_selection, resolve_genre_selection};
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    // Core types
    CandidatePool,
    CastMember,
    Credits,
    Genre,
    GenreCatalog,
    GenreResponse,
    GenreSelection,
    Movie,
    MovieDetails,
    MovieResponse,
    POSTER_BASE_URL,
};
