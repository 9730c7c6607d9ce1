use std::sync::Arc;

use pantry::config::Config;
use pantry_recipe::SqliteRecipeStore;
use pantry_types::QueryRequest;
use tokio::io::AsyncReadExt;

#[tracing::instrument(skip(config))]
pub async fn query(config: Config, request: String, top_k: Option<usize>) -> anyhow::Result<()> {
    let content = if request == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(&request).await?
    };

    let request: QueryRequest = serde_json::from_str(&content)?;

    let engine = Arc::new(pantry::build_engine(&config.matching)?);
    let pool =
        pantry::create_read_pool(&config.database.url, config.database.max_connections).await?;
    let store = SqliteRecipeStore::new(pool);

    let ranked = pantry::search(
        engine,
        &store,
        request,
        config.matching.candidate_limit(),
        top_k,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&ranked)?);

    Ok(())
}
