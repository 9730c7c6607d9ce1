pub mod config;
pub mod db;
pub mod observability;
pub mod search;

pub use db::{create_pool, create_read_pool, run_migrations};
pub use search::{SearchError, build_engine, search};
