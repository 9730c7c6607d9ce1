use pantry::config::Config;
use sqlx::migrate::MigrateDatabase;

#[tracing::instrument(skip(config))]
pub async fn migrate(config: Config) -> anyhow::Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = pantry::create_pool(&config.database.url, 1).await?;
    pantry::run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}
