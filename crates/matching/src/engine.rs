use std::sync::Arc;

use pantry_types::{CoverageResult, QueryRequest, RankedRecipe, Recipe};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constraints::{ConstraintEvaluator, PreparedQuery, Rejection};
use crate::coverage::{CoverageAssigner, coverage_result};
use crate::error::MatchingError;
use crate::normalize::Term;
use crate::rank::{RankOptions, rank};
use crate::similarity::{Scorer, Similarity, StringSimilarity};

/// Similarity at or above which two ingredients count as the same.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub threshold: f64,
    /// Scoring threads; 0 uses one per core.
    pub parallelism: usize,
    pub cache_shards: usize,
    pub title_dedup_threshold: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            parallelism: 0,
            cache_shards: 16,
            title_dedup_threshold: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), MatchingError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(MatchingError::InvalidConfig(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.cache_shards == 0 {
            return Err(MatchingError::InvalidConfig(
                "cache_shards must be greater than 0".to_owned(),
            ));
        }
        match self.title_dedup_threshold {
            Some(t) if !(0.0..=1.0).contains(&t) => Err(MatchingError::InvalidConfig(format!(
                "title_dedup_threshold must be in [0, 1], got {t}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Outcome of scoring one candidate.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub recipe: Recipe,
    pub outcome: Result<CoverageResult, Rejection>,
}

/// The matching pipeline: normalize, score, assign, gate, rank.
///
/// An engine is cheap to share behind an `Arc`; its only mutable state is
/// the scorer's memo cache.
pub struct Engine {
    config: EngineConfig,
    scorer: Scorer,
    pool: rayon::ThreadPool,
}

impl Engine {
    pub fn new(config: EngineConfig, backend: Arc<dyn Similarity>) -> Result<Self, MatchingError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|i| format!("pantry-score-{i}"))
            .build()?;

        tracing::debug!(
            threshold = config.threshold,
            threads = pool.current_num_threads(),
            shards = config.cache_shards,
            "matching engine ready"
        );

        Ok(Self {
            scorer: Scorer::new(backend, config.cache_shards),
            config,
            pool,
        })
    }

    /// An engine backed only by the string metric.
    pub fn with_string_similarity(config: EngineConfig) -> Result<Self, MatchingError> {
        Self::new(config, Arc::new(StringSimilarity))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn assigner(&self) -> CoverageAssigner<'_> {
        CoverageAssigner::new(&self.scorer, self.config.threshold)
    }

    pub fn prepare(&self, request: &QueryRequest) -> Result<PreparedQuery, MatchingError> {
        request.validate()?;
        Ok(PreparedQuery::new(request))
    }

    /// Scores one candidate against a prepared query.
    pub fn score(&self, query: &PreparedQuery, recipe: &Recipe) -> Result<CoverageResult, Rejection> {
        let evaluator = ConstraintEvaluator::new(query, &self.scorer, self.config.threshold);
        let terms = Term::collect(recipe.ingredient_names());
        evaluator.check_candidate(recipe, &terms)?;

        let assigner = self.assigner();
        let matrix = assigner.similarity_matrix(&query.user, &terms);
        let bound = assigner.match_upper_bound(&matrix);
        evaluator.check_upper_bound(bound, query.user.len(), terms.len())?;

        let coverage = if bound == 0 {
            coverage_result(Vec::new(), query.user.len(), terms.len())
        } else {
            assigner.assign_matrix(&query.user, &terms, &matrix)
        };

        evaluator.check_coverage(&coverage)?;
        Ok(coverage)
    }

    /// Scores every candidate in parallel, preserving input order.
    pub fn evaluate(
        &self,
        request: &QueryRequest,
        candidates: Vec<Recipe>,
    ) -> Result<Vec<ScoredCandidate>, MatchingError> {
        let query = self.prepare(request)?;

        Ok(self.pool.install(|| {
            candidates
                .into_par_iter()
                .map(|recipe| {
                    let outcome = self.score(&query, &recipe);
                    ScoredCandidate { recipe, outcome }
                })
                .collect()
        }))
    }

    /// Ranked, deduplicated recipes accepted by every gate.
    #[tracing::instrument(skip_all, fields(candidates = candidates.len(), top_k = ?top_k))]
    pub fn rank(
        &self,
        request: &QueryRequest,
        candidates: Vec<Recipe>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedRecipe>, MatchingError> {
        let scored = self.evaluate(request, candidates)?;
        let total = scored.len();

        let accepted: Vec<RankedRecipe> = scored
            .into_iter()
            .filter_map(|ScoredCandidate { recipe, outcome }| match outcome {
                Ok(coverage) => Some(RankedRecipe::new(recipe, coverage)),
                Err(rejection) => {
                    tracing::debug!(id = %recipe.id, %rejection, "candidate rejected");
                    None
                }
            })
            .collect();

        tracing::info!(
            accepted = accepted.len(),
            rejected = total - accepted.len(),
            "scored candidates"
        );

        Ok(rank(
            accepted,
            &RankOptions {
                top_k,
                title_dedup_threshold: self.config.title_dedup_threshold,
            },
        ))
    }
}
