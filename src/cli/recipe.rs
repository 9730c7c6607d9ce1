use std::path::PathBuf;

use pantry::config::Config;
use pantry_recipe::{RecipeSource, SqliteRecipeStore, import_recipes, parse_recipes};

#[tracing::instrument(skip(config))]
pub async fn import(config: Config, file: PathBuf) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;
    let recipes = parse_recipes(&content)?;

    let pool = pantry::create_pool(&config.database.url, 1).await?;
    let ids = import_recipes(&pool, recipes).await?;

    tracing::info!("{} recipes imported from {}", ids.len(), file.display());

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn sources(config: Config) -> anyhow::Result<()> {
    let pool =
        pantry::create_read_pool(&config.database.url, config.database.max_connections).await?;
    let store = SqliteRecipeStore::new(pool);

    for source in store.sources().await? {
        println!("{source}");
    }

    Ok(())
}
