mod index;
mod matrix;
mod scoring;

pub use index::TransactionIndex;
pub use matrix::CoOccurrenceMatrix;
pub use scoring::{RecommendationEngine, ScoredProduct, ScoringStrategy};
