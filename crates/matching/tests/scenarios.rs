mod helpers;

use helpers::{engine, engine_with_threshold, fixed_engine, recipe, strings, tagged, with_steps};
use pantry_matching::{CoverageAssigner, Rejection, Scorer};
use pantry_types::{QueryRequest, TagFilterMode};

#[test]
fn chicken_rice_garlic_scenario() {
    let scorer = Scorer::default();
    let result = CoverageAssigner::new(&scorer, 0.6).assign(
        &["chicken", "rice", "garlic"],
        &["chicken breast", "white rice", "onion"],
    );

    let pairs: Vec<_> = result
        .matched_pairs
        .iter()
        .map(|p| (p.user_ingredient.as_str(), p.recipe_ingredient.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("chicken", "chicken breast"), ("rice", "white rice")]
    );
    assert!((result.user_coverage - 2.0 / 3.0).abs() < 1e-12);
    assert!((result.recipe_coverage - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn and_tag_filter_rejects_other_cuisine() {
    let engine = engine();
    let request = QueryRequest {
        tag_filters: [("cuisine".to_owned(), ["Italian".to_owned()].into())].into(),
        tag_filter_mode: TagFilterMode::And,
        ..Default::default()
    };
    let candidates = vec![
        tagged(recipe("mx", "Tacos", &["tortilla"]), "cuisine", "Mexican"),
        tagged(recipe("it", "Risotto", &["rice"]), "cuisine", "Italian"),
    ];

    let result = engine.rank(&request, candidates, None).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recipe.id, "it");
}

#[test]
fn max_steps_rejects_regardless_of_coverage() {
    let engine = engine();
    let request = QueryRequest {
        user_ingredients: strings(&["rice", "egg"]),
        max_steps: 5,
        ..Default::default()
    };
    let long = with_steps(recipe("long", "Fried Rice", &["rice", "egg"]), 8);
    let short = with_steps(recipe("short", "Egg Rice", &["rice", "egg"]), 5);

    let query = engine.prepare(&request).unwrap();
    assert_eq!(
        engine.score(&query, &long),
        Err(Rejection::TooManySteps { steps: 8, max: 5 })
    );

    let result = engine.rank(&request, vec![long, short], None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recipe.id, "short");
    assert_eq!(result[0].recipe_coverage, 1.0);
}

#[test]
fn coverage_ties_rank_alphabetically() {
    let engine = engine();
    let request = QueryRequest {
        user_ingredients: strings(&["rice"]),
        ..Default::default()
    };
    let candidates = vec![
        recipe("2", "Bravo Rice", &["rice"]),
        recipe("1", "Alpha Rice", &["rice"]),
        recipe("3", "Charlie Rice", &["rice", "salt"]),
    ];

    let result = engine.rank(&request, candidates, None).unwrap();
    let titles: Vec<_> = result.iter().map(|r| r.recipe.title.as_str()).collect();

    assert_eq!(titles, vec!["Alpha Rice", "Bravo Rice", "Charlie Rice"]);
}

#[test]
fn must_use_and_forbidden_are_enforced() {
    let engine = engine();
    let onion_recipe = recipe("a", "Onion Soup", &["chopped onion", "butter"]);
    let plain_recipe = recipe("b", "Buttered Toast", &["bread", "butter"]);

    let must_use = QueryRequest {
        must_use: strings(&["onion"]),
        ..Default::default()
    };
    let result = engine
        .rank(&must_use, vec![onion_recipe.clone(), plain_recipe.clone()], None)
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recipe.id, "a");

    let forbidden = QueryRequest {
        forbidden_ingredients: strings(&["onions"]),
        ..Default::default()
    };
    let result = engine
        .rank(&forbidden, vec![onion_recipe, plain_recipe], None)
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recipe.id, "b");
}

#[test]
fn coverage_requirement_is_inclusive() {
    let engine = engine();
    let request = QueryRequest {
        user_ingredients: strings(&["rice"]),
        recipe_coverage_req: 0.5,
        ..Default::default()
    };
    let candidates = vec![
        recipe("half", "Rice and Egg", &["rice", "egg"]),
        recipe("third", "Rice Bowl", &["rice", "egg", "scallion"]),
    ];

    let result = engine.rank(&request, candidates, None).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recipe.id, "half");
    assert_eq!(result[0].recipe_coverage, 0.5);
}

#[test]
fn empty_lists_follow_coverage_conventions() {
    let scorer = Scorer::default();
    let assigner = CoverageAssigner::new(&scorer, 0.8);

    let both_empty = assigner.assign::<&str, &str>(&[], &[]);
    assert_eq!(both_empty.user_coverage, 1.0);
    assert_eq!(both_empty.recipe_coverage, 1.0);

    let no_user = assigner.assign::<&str, _>(&[], &["rice"]);
    assert_eq!(no_user.user_coverage, 0.0);
    assert_eq!(no_user.recipe_coverage, 0.0);

    let blank_user = assigner.assign(&["  ", "!!"], &["rice"]);
    assert_eq!(blank_user.user_coverage, 0.0);
}

#[test]
fn match_count_requirement_prunes_before_assignment() {
    let engine = engine();
    let request = QueryRequest {
        user_ingredients: strings(&["rice", "egg", "scallion"]),
        min_ing_matches: 2,
        ..Default::default()
    };
    let query = engine.prepare(&request).unwrap();

    assert_eq!(
        engine.score(&query, &recipe("a", "Rice", &["rice", "water"])),
        Err(Rejection::TooFewMatches {
            matched: 1,
            required: 2
        })
    );
    assert!(
        engine
            .score(&query, &recipe("b", "Fried Rice", &["rice", "egg"]))
            .is_ok()
    );
}

#[test]
fn duplicate_ids_are_returned_once() {
    let engine = engine();
    let request = QueryRequest {
        user_ingredients: strings(&["rice"]),
        ..Default::default()
    };
    let candidates = vec![
        recipe("same", "Rice", &["rice"]),
        recipe("same", "Rice", &["rice"]),
        recipe("other", "Rice Pudding", &["rice", "milk"]),
    ];

    let result = engine.rank(&request, candidates, Some(5)).unwrap();
    let ids: Vec<_> = result.iter().map(|r| r.recipe.id.as_str()).collect();

    assert_eq!(ids, vec!["same", "other"]);
}

#[test]
fn same_query_gives_same_order() {
    let engine = engine_with_threshold(0.7);
    let request = QueryRequest {
        user_ingredients: strings(&["chicken", "rice", "garlic", "onion"]),
        ..Default::default()
    };
    let candidates = vec![
        recipe("1", "Chicken Rice", &["chicken thigh", "jasmine rice", "ginger"]),
        recipe("2", "Garlic Chicken", &["chicken breast", "garlic cloves", "butter"]),
        recipe("3", "Onion Tart", &["onions", "puff pastry", "thyme", "egg"]),
        recipe("4", "Plain Rice", &["rice"]),
    ];

    let first = engine.rank(&request, candidates.clone(), None).unwrap();
    let second = engine.rank(&request, candidates, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].recipe.id, "4");
}

#[test]
fn must_use_is_satisfied_by_an_ingredient_assigned_elsewhere() {
    let engine = fixed_engine(vec![
        ("thigh", "chicken", 0.85),
        ("drumstick", "chicken", 0.95),
    ]);
    let request = QueryRequest {
        user_ingredients: strings(&["thigh", "drumstick"]),
        must_use: strings(&["thigh"]),
        ..Default::default()
    };
    let candidate = recipe("roast", "Roast Chicken", &["chicken"]);

    let query = engine.prepare(&request).unwrap();
    let coverage = engine.score(&query, &candidate).unwrap();

    assert_eq!(coverage.matched_count(), 1);
    assert_eq!(coverage.matched_pairs[0].user_ingredient, "drumstick");
    assert_eq!(coverage.matched_pairs[0].recipe_ingredient, "chicken");

    let ranked = engine.rank(&request, vec![candidate], None).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].recipe.id, "roast");
}

