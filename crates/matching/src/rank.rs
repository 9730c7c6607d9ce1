use std::cmp::Ordering;
use std::collections::HashSet;

use pantry_types::RankedRecipe;

use crate::normalize::normalize;
use crate::similarity::token_set_ratio;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankOptions {
    /// `None` keeps every accepted recipe.
    pub top_k: Option<usize>,
    /// Drop recipes whose normalized title is at least this similar to a
    /// better-ranked kept title.
    pub title_dedup_threshold: Option<f64>,
}

/// Total order used for results: recipe coverage desc, user coverage desc,
/// title asc (case-insensitive first), id asc.
pub fn compare(a: &RankedRecipe, b: &RankedRecipe) -> Ordering {
    b.recipe_coverage
        .total_cmp(&a.recipe_coverage)
        .then_with(|| b.user_coverage.total_cmp(&a.user_coverage))
        .then_with(|| {
            a.recipe
                .title
                .to_lowercase()
                .cmp(&b.recipe.title.to_lowercase())
        })
        .then_with(|| a.recipe.title.cmp(&b.recipe.title))
        .then_with(|| a.recipe.id.cmp(&b.recipe.id))
}

/// Sorts, removes duplicates and truncates accepted recipes.
///
/// Duplicates by id are removed before truncation, keeping the best-ranked
/// occurrence.
pub fn rank(mut accepted: Vec<RankedRecipe>, options: &RankOptions) -> Vec<RankedRecipe> {
    accepted.sort_by(compare);

    let mut seen = HashSet::new();
    accepted.retain(|ranked| seen.insert(ranked.recipe.id.clone()));

    if let Some(threshold) = options.title_dedup_threshold {
        accepted = collapse_titles(accepted, threshold);
    }

    if let Some(k) = options.top_k {
        accepted.truncate(k);
    }

    accepted
}

fn collapse_titles(ranked: Vec<RankedRecipe>, threshold: f64) -> Vec<RankedRecipe> {
    let mut kept_titles: Vec<String> = Vec::new();
    let mut kept = Vec::with_capacity(ranked.len());

    for candidate in ranked {
        let title = normalize(&candidate.recipe.title);
        let duplicate = !title.is_empty()
            && kept_titles
                .iter()
                .any(|kept| token_set_ratio(kept, &title) >= threshold);

        if duplicate {
            tracing::debug!(
                id = %candidate.recipe.id,
                title = %candidate.recipe.title,
                "dropping near-duplicate title"
            );
            continue;
        }

        kept_titles.push(title);
        kept.push(candidate);
    }

    kept
}
