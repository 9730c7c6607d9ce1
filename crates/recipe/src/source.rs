use pantry_types::Recipe;

use crate::{CandidateQuery, StoreError};

/// Read-only access to the recipe corpus.
///
/// Implementations may return more candidates than the query strictly
/// allows; the matching engine re-applies every predicate. They must never
/// drop a recipe the engine would accept, other than through `limit`.
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Recipe>, StoreError>;

    /// Distinct, sorted, non-empty source domains.
    async fn sources(&self) -> Result<Vec<String>, StoreError>;
}
