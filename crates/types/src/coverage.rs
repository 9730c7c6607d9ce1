use serde::{Deserialize, Serialize};

use crate::Recipe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub user_ingredient: String,
    pub recipe_ingredient: String,
    pub similarity: f64,
}

/// Outcome of matching one user ingredient list against one recipe.
///
/// Both ratios lie in `[0, 1]`. `matched_pairs` is ordered by descending
/// similarity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub user_coverage: f64,
    pub recipe_coverage: f64,
    pub matched_pairs: Vec<MatchedPair>,
}

impl CoverageResult {
    pub fn matched_count(&self) -> usize {
        self.matched_pairs.len()
    }
}

/// One accepted recipe in a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecipe {
    pub recipe: Recipe,
    pub user_coverage: f64,
    pub recipe_coverage: f64,
    #[serde(default)]
    pub matched_pairs: Vec<MatchedPair>,
}

impl RankedRecipe {
    pub fn new(recipe: Recipe, coverage: CoverageResult) -> Self {
        Self {
            recipe,
            user_coverage: coverage.user_coverage,
            recipe_coverage: coverage.recipe_coverage,
            matched_pairs: coverage.matched_pairs,
        }
    }
}
