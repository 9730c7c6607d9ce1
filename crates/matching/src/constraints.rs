//! Hard accept/reject gates applied to every candidate.
//!
//! Gates run in a fixed order and stop at the first failure:
//! source, tag inclusion, tag exclusion, keywords, must-use, forbidden,
//! step count, then (after assignment) match count and the two coverage
//! requirements.

use std::collections::BTreeSet;

use pantry_types::{CoverageResult, QueryRequest, Recipe, TagFilterMode, TagSelection};
use thiserror::Error;

use crate::coverage::coverage_ratio;
use crate::normalize::Term;
use crate::similarity::Scorer;

/// Why a candidate was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("source '{0}' is not in the allow-list")]
    Source(String),

    #[error("no tag matches the tag filters")]
    TagFilter,

    #[error("carries excluded tag {category}:{title}")]
    ExcludedTag { category: String, title: String },

    #[error("missing keyword '{0}'")]
    MissingKeyword(String),

    #[error("contains excluded keyword '{0}'")]
    ExcludedKeyword(String),

    #[error("no ingredient matches must-use '{0}'")]
    MissingMustUse(String),

    #[error("ingredient '{matched}' matches forbidden '{ingredient}'")]
    Forbidden { ingredient: String, matched: String },

    #[error("{steps} steps exceed the maximum of {max}")]
    TooManySteps { steps: usize, max: usize },

    #[error("{matched} matched ingredients, {required} required")]
    TooFewMatches { matched: usize, required: usize },

    #[error("user coverage {coverage:.3} below {required:.3}")]
    UserCoverage { coverage: f64, required: f64 },

    #[error("recipe coverage {coverage:.3} below {required:.3}")]
    RecipeCoverage { coverage: f64, required: f64 },
}

/// A [`QueryRequest`] with every string field canonicalized once, up front.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub user: Vec<Term>,
    pub must_use: Vec<Term>,
    pub forbidden: Vec<Term>,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub tag_filters: TagSelection,
    pub excluded_tags: TagSelection,
    pub tag_filter_mode: TagFilterMode,
    pub sources: BTreeSet<String>,
    pub min_ing_matches: usize,
    pub max_steps: usize,
    pub user_coverage_req: f64,
    pub recipe_coverage_req: f64,
}

impl PreparedQuery {
    pub fn new(request: &QueryRequest) -> Self {
        Self {
            user: Term::collect_unique(request.user_ingredients.iter().map(String::as_str)),
            must_use: Term::collect_unique(request.must_use.iter().map(String::as_str)),
            forbidden: Term::collect_unique(
                request.forbidden_ingredients.iter().map(String::as_str),
            ),
            include_keywords: keywords(&request.keywords_to_include),
            exclude_keywords: keywords(&request.keywords_to_exclude),
            tag_filters: request
                .active_tag_filters()
                .map(|(category, titles)| (category.clone(), titles.clone()))
                .collect(),
            excluded_tags: request.excluded_tags.clone(),
            tag_filter_mode: request.tag_filter_mode,
            sources: request.sources.clone(),
            min_ing_matches: request.min_ing_matches,
            max_steps: request.max_steps,
            user_coverage_req: request.user_coverage_req,
            recipe_coverage_req: request.recipe_coverage_req,
        }
    }
}

fn keywords(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

pub struct ConstraintEvaluator<'a> {
    query: &'a PreparedQuery,
    scorer: &'a Scorer,
    threshold: f64,
}

impl<'a> ConstraintEvaluator<'a> {
    pub fn new(query: &'a PreparedQuery, scorer: &'a Scorer, threshold: f64) -> Self {
        Self {
            query,
            scorer,
            threshold,
        }
    }

    /// Runs every gate against an already computed coverage result.
    pub fn evaluate(&self, recipe: &Recipe, coverage: &CoverageResult) -> Result<(), Rejection> {
        let terms = Term::collect(recipe.ingredient_names());
        self.check_candidate(recipe, &terms)?;
        self.check_coverage(coverage)
    }

    /// Gates that do not depend on the assignment.
    pub fn check_candidate(&self, recipe: &Recipe, terms: &[Term]) -> Result<(), Rejection> {
        self.check_source(recipe)?;
        self.check_tag_filters(recipe)?;
        self.check_excluded_tags(recipe)?;
        self.check_keywords(recipe)?;
        self.check_must_use(terms)?;
        self.check_forbidden(terms)?;
        self.check_steps(recipe)
    }

    pub fn check_coverage(&self, coverage: &CoverageResult) -> Result<(), Rejection> {
        self.check_counts(
            coverage.matched_count(),
            coverage.user_coverage,
            coverage.recipe_coverage,
        )
    }

    /// Rejects a candidate whose best possible matched count already fails
    /// the match-count or coverage gates. Reported values are upper bounds.
    pub fn check_upper_bound(
        &self,
        bound: usize,
        user_len: usize,
        recipe_len: usize,
    ) -> Result<(), Rejection> {
        self.check_counts(
            bound,
            coverage_ratio(bound, user_len, recipe_len),
            coverage_ratio(bound, recipe_len, user_len),
        )
    }

    fn check_counts(
        &self,
        matched: usize,
        user_coverage: f64,
        recipe_coverage: f64,
    ) -> Result<(), Rejection> {
        let q = self.query;

        if matched < q.min_ing_matches {
            return Err(Rejection::TooFewMatches {
                matched,
                required: q.min_ing_matches,
            });
        }
        if user_coverage < q.user_coverage_req {
            return Err(Rejection::UserCoverage {
                coverage: user_coverage,
                required: q.user_coverage_req,
            });
        }
        if recipe_coverage < q.recipe_coverage_req {
            return Err(Rejection::RecipeCoverage {
                coverage: recipe_coverage,
                required: q.recipe_coverage_req,
            });
        }

        Ok(())
    }

    fn check_source(&self, recipe: &Recipe) -> Result<(), Rejection> {
        if self.query.sources.is_empty() || self.query.sources.contains(&recipe.source_domain) {
            Ok(())
        } else {
            Err(Rejection::Source(recipe.source_domain.clone()))
        }
    }

    fn check_tag_filters(&self, recipe: &Recipe) -> Result<(), Rejection> {
        let filters = &self.query.tag_filters;
        if filters.is_empty() {
            return Ok(());
        }

        let category_hit = |(category, titles): (&String, &BTreeSet<String>)| {
            titles.iter().any(|title| recipe.has_tag(category, title))
        };
        let passed = match self.query.tag_filter_mode {
            TagFilterMode::Or => filters.iter().any(category_hit),
            TagFilterMode::And => filters.iter().all(category_hit),
        };

        if passed {
            Ok(())
        } else {
            Err(Rejection::TagFilter)
        }
    }

    fn check_excluded_tags(&self, recipe: &Recipe) -> Result<(), Rejection> {
        for (category, titles) in &self.query.excluded_tags {
            if let Some(title) = titles.iter().find(|title| recipe.has_tag(category, title)) {
                return Err(Rejection::ExcludedTag {
                    category: category.clone(),
                    title: title.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_keywords(&self, recipe: &Recipe) -> Result<(), Rejection> {
        let q = self.query;
        if q.include_keywords.is_empty() && q.exclude_keywords.is_empty() {
            return Ok(());
        }

        let text = format!("{}\n{}", recipe.title, recipe.description).to_lowercase();

        if let Some(missing) = q.include_keywords.iter().find(|k| !text.contains(k.as_str())) {
            return Err(Rejection::MissingKeyword(missing.clone()));
        }
        if let Some(found) = q.exclude_keywords.iter().find(|k| text.contains(k.as_str())) {
            return Err(Rejection::ExcludedKeyword(found.clone()));
        }
        Ok(())
    }

    // Any sufficiently similar recipe ingredient satisfies a must-use entry,
    // whichever partner the optimal assignment later picks.
    fn check_must_use(&self, terms: &[Term]) -> Result<(), Rejection> {
        for required in &self.query.must_use {
            if self.best_match(required, terms).is_none() {
                return Err(Rejection::MissingMustUse(required.raw.clone()));
            }
        }
        Ok(())
    }

    fn check_forbidden(&self, terms: &[Term]) -> Result<(), Rejection> {
        for forbidden in &self.query.forbidden {
            if let Some(matched) = self.best_match(forbidden, terms) {
                return Err(Rejection::Forbidden {
                    ingredient: forbidden.raw.clone(),
                    matched: matched.raw.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_steps(&self, recipe: &Recipe) -> Result<(), Rejection> {
        let max = self.query.max_steps;
        let steps = recipe.step_count();
        if max > 0 && steps > max {
            Err(Rejection::TooManySteps { steps, max })
        } else {
            Ok(())
        }
    }

    fn best_match<'t>(&self, term: &Term, terms: &'t [Term]) -> Option<&'t Term> {
        terms
            .iter()
            .find(|candidate| self.scorer.score(&term.normalized, &candidate.normalized) >= self.threshold)
    }
}
