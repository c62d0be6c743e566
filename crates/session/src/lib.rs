//! Session crate for the ReelPicks recommendation flow.
//!
//! Holds the state the recommendation screen keeps between "show more"
//! requests and turns ranked movies into display rows.

pub mod session;

pub use session::{MovieRecommendation, RecommendationSession};
