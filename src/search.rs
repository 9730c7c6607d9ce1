use std::sync::Arc;

use pantry_matching::{
    EmbeddingSimilarity, EmbeddingTable, Engine, MatchingError, Similarity, StringSimilarity,
};
use pantry_recipe::{CandidateQuery, RecipeSource, StoreError};
use pantry_types::{QueryRequest, RankedRecipe};
use thiserror::Error;

use crate::config::MatchingConfig;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Matching(#[from] MatchingError),

    #[error(transparent)]
    Retrieval(#[from] StoreError),

    #[error("Scoring task failed: {0}")]
    Scoring(#[from] tokio::task::JoinError),
}

/// Builds the engine, loading the embedding table when one is configured.
pub fn build_engine(config: &MatchingConfig) -> anyhow::Result<Engine> {
    let backend: Arc<dyn Similarity> = match &config.embeddings_path {
        Some(path) => Arc::new(EmbeddingSimilarity::new(EmbeddingTable::from_path(path)?)),
        None => Arc::new(StringSimilarity),
    };

    Ok(Engine::new(config.engine(), backend)?)
}

/// Runs one query end to end.
///
/// The request is validated before anything is fetched. Candidates are
/// fetched once, then scored off the async runtime. Only an invalid request
/// or a retrieval failure is an error; an empty result is not.
#[tracing::instrument(skip_all, fields(candidate_limit = ?candidate_limit, top_k = ?top_k))]
pub async fn search<S>(
    engine: Arc<Engine>,
    source: &S,
    request: QueryRequest,
    candidate_limit: Option<usize>,
    top_k: Option<usize>,
) -> Result<Vec<RankedRecipe>, SearchError>
where
    S: RecipeSource + ?Sized,
{
    engine.prepare(&request)?;

    let query = CandidateQuery::from_request(&request, candidate_limit);
    let candidates = source.fetch_candidates(&query).await?;
    tracing::info!(candidates = candidates.len(), "Candidates fetched");

    let ranked =
        tokio::task::spawn_blocking(move || engine.rank(&request, candidates, top_k)).await??;

    Ok(ranked)
}
