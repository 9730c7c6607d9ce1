use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe store unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recipe {index} is invalid: {reason}")]
    InvalidRecipe { index: usize, reason: String },
}
