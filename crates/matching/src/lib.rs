pub mod constraints;
pub mod coverage;
mod engine;
mod error;
pub mod hungarian;
pub mod normalize;
pub mod rank;
pub mod similarity;

pub use constraints::{ConstraintEvaluator, PreparedQuery, Rejection};
pub use coverage::CoverageAssigner;
pub use engine::*;
pub use error::*;
pub use normalize::normalize;
pub use rank::RankOptions;
pub use similarity::{
    Embedder, EmbeddingError, EmbeddingSimilarity, EmbeddingTable, Scorer, Similarity,
    StringSimilarity,
};
