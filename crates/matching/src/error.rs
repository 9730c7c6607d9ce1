use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchingError {
    #[error("Invalid query request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build scoring pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
