#![allow(dead_code)]

use pantry_types::{Ingredient, Recipe, Tag};
use sqlx::{SqlitePool, migrate::MigrateDatabase};
use temp_dir::TempDir;

/// Creates a migrated SQLite database inside `dir`, the way `pantry migrate` does.
pub async fn setup_test_db(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let url = format!("sqlite:{}", dir.child("pantry.db").display());
    sqlx::Sqlite::create_database(&url).await?;

    let pool = pantry::create_pool(&url, 1).await?;
    pantry::run_migrations(&pool).await?;

    Ok(pool)
}

pub fn recipe(id: &str, title: &str, source: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        title: title.to_owned(),
        description: String::new(),
        ingredients: ingredients.iter().map(|i| Ingredient::new(*i)).collect(),
        instructions: vec!["Prep.".to_owned(), "Cook.".to_owned()],
        tags: vec![Tag::new("course", "Main")],
        source_domain: source.to_owned(),
        url: format!("https://{source}/{id}"),
    }
}

pub fn corpus() -> Vec<Recipe> {
    vec![
        recipe(
            "garlic-rice",
            "Garlic Chicken Rice",
            "a.example",
            &["chicken breast", "white rice", "garlic"],
        ),
        recipe(
            "soup",
            "Chicken Soup",
            "b.example",
            &["chicken", "carrot", "celery"],
        ),
        recipe("stew", "Beef Stew", "a.example", &["beef", "potato", "onion"]),
    ]
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}
