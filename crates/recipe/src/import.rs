use std::time::{SystemTime, UNIX_EPOCH};

use pantry_db::table;
use pantry_types::Recipe;
use sea_query::{OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::StoreError;

/// Parses a JSON array of recipes.
pub fn parse_recipes(json: &str) -> Result<Vec<Recipe>, StoreError> {
    let recipes: Vec<Recipe> = serde_json::from_str(json)?;

    for (index, recipe) in recipes.iter().enumerate() {
        if recipe.title.trim().is_empty() {
            return Err(StoreError::InvalidRecipe {
                index,
                reason: "title is empty".to_owned(),
            });
        }
    }

    Ok(recipes)
}

/// Inserts or replaces recipes in one transaction and returns their ids.
///
/// Recipes without an id are assigned a fresh ULID.
#[tracing::instrument(skip_all, fields(recipes = recipes.len()))]
pub async fn import_recipes(
    pool: &SqlitePool,
    recipes: Vec<Recipe>,
) -> Result<Vec<String>, StoreError> {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(recipes.len());

    for mut recipe in recipes {
        if recipe.id.trim().is_empty() {
            recipe.id = ulid::Ulid::new().to_string();
        }

        let statement = Query::insert()
            .into_table(table::Recipe::Table)
            .columns([
                table::Recipe::Id,
                table::Recipe::Title,
                table::Recipe::Description,
                table::Recipe::SourceDomain,
                table::Recipe::Url,
                table::Recipe::Ingredients,
                table::Recipe::Instructions,
                table::Recipe::Tags,
                table::Recipe::StepCount,
                table::Recipe::CreatedAt,
            ])
            .values_panic([
                recipe.id.to_owned().into(),
                recipe.title.to_owned().into(),
                recipe.description.to_owned().into(),
                recipe.source_domain.to_owned().into(),
                recipe.url.to_owned().into(),
                serde_json::to_string(&recipe.ingredients)?.into(),
                serde_json::to_string(&recipe.instructions)?.into(),
                serde_json::to_string(&recipe.tags)?.into(),
                (recipe.step_count() as i64).into(),
                created_at.into(),
            ])
            .on_conflict(
                OnConflict::column(table::Recipe::Id)
                    .update_columns([
                        table::Recipe::Title,
                        table::Recipe::Description,
                        table::Recipe::SourceDomain,
                        table::Recipe::Url,
                        table::Recipe::Ingredients,
                        table::Recipe::Instructions,
                        table::Recipe::Tags,
                        table::Recipe::StepCount,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        ids.push(recipe.id);
    }

    tx.commit().await?;
    tracing::info!(imported = ids.len(), "Recipes imported");

    Ok(ids)
}
