pub mod migrate;
pub mod query;
pub mod recipe;
