#![allow(dead_code)]

use std::sync::Arc;

use pantry_matching::{Engine, EngineConfig, Similarity};
use pantry_types::{Ingredient, Recipe, Tag};

pub fn engine() -> Engine {
    engine_with_threshold(0.8)
}

pub fn engine_with_threshold(threshold: f64) -> Engine {
    Engine::with_string_similarity(EngineConfig {
        threshold,
        parallelism: 2,
        ..Default::default()
    })
    .unwrap()
}

pub fn recipe(id: &str, title: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        title: title.to_owned(),
        description: format!("A recipe for {}", title.to_lowercase()),
        ingredients: ingredients.iter().map(|i| Ingredient::new(*i)).collect(),
        instructions: vec!["Prepare.".to_owned(), "Cook.".to_owned()],
        tags: Vec::new(),
        source_domain: "example.com".to_owned(),
        url: format!("https://example.com/{id}"),
    }
}

pub fn tagged(mut recipe: Recipe, category: &str, title: &str) -> Recipe {
    recipe.tags.push(Tag::new(category, title));
    recipe
}

pub fn with_steps(mut recipe: Recipe, steps: usize) -> Recipe {
    recipe.instructions = (1..=steps).map(|i| format!("Step {i}")).collect();
    recipe
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// Similarity read from a fixed table; unlisted pairs score 0.
pub struct FixedSimilarity(pub Vec<(&'static str, &'static str, f64)>);

impl Similarity for FixedSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.0
            .iter()
            .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
            .map_or(0.0, |(_, _, s)| *s)
    }
}

pub fn fixed_engine(pairs: Vec<(&'static str, &'static str, f64)>) -> Engine {
    Engine::new(
        EngineConfig {
            threshold: 0.8,
            parallelism: 2,
            ..Default::default()
        },
        Arc::new(FixedSimilarity(pairs)),
    )
    .unwrap()
}
