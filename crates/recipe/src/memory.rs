use std::collections::BTreeSet;

use pantry_types::Recipe;

use crate::{CandidateQuery, RecipeSource, StoreError};

/// A [`RecipeSource`] over recipes held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecipeSource {
    recipes: Vec<Recipe>,
}

impl MemoryRecipeSource {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl From<Vec<Recipe>> for MemoryRecipeSource {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self::new(recipes)
    }
}

#[async_trait::async_trait]
impl RecipeSource for MemoryRecipeSource {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Recipe>, StoreError> {
        let matching = self.recipes.iter().filter(|recipe| query.matches(recipe));

        Ok(match query.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn sources(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .recipes
            .iter()
            .map(|recipe| recipe.source_domain.as_str())
            .filter(|source| !source.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect())
    }
}
