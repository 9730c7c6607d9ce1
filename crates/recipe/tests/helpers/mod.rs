#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr};

use pantry_recipe::SqliteRecipeStore;
use pantry_types::{Ingredient, Recipe, Tag};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_store(path: PathBuf) -> anyhow::Result<SqliteRecipeStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    pantry_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(SqliteRecipeStore::new(pool))
}

pub fn recipe(id: &str, title: &str, source: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        title: title.to_owned(),
        description: String::new(),
        ingredients: ingredients.iter().map(|i| Ingredient::new(*i)).collect(),
        instructions: vec!["Mix.".to_owned(), "Serve.".to_owned()],
        tags: vec![Tag::new("course", "Main")],
        source_domain: source.to_owned(),
        url: format!("https://{source}/{id}"),
    }
}
