mod embedding;
mod scorer;

pub use embedding::*;
pub use scorer::*;

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// A swappable similarity backend over normalized ingredient strings.
///
/// Implementations return a value in `[0, 1]`; [`Scorer`] clamps whatever
/// comes back, so a backend only has to be close.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Deterministic string metric used when no embedding backend is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSimilarity;

impl Similarity for StringSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        token_set_ratio(a, b)
    }
}

/// Token-set ratio in `[0, 1]`.
///
/// With `I` the sorted shared tokens and `Da`/`Db` the sorted tokens only in
/// `a`/`b`, the score is the best normalized Levenshtein similarity among
/// `(I, I+Da)`, `(I, I+Db)` and `(I+Da, I+Db)`. When `I` is non-empty and
/// one side has no extra tokens the score is 1.0, so "rice" fully matches
/// "white rice".
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 1.0;
    }

    let shared = intersection.join(" ");
    let combined_a = join_tokens(&shared, &only_a);
    let combined_b = join_tokens(&shared, &only_b);

    let mut best = normalized_levenshtein(&combined_a, &combined_b);
    if !shared.is_empty() {
        best = best
            .max(normalized_levenshtein(&shared, &combined_a))
            .max(normalized_levenshtein(&shared, &combined_b));
    }
    best
}

fn join_tokens(shared: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    match (shared.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (_, true) => shared.to_owned(),
        _ => format!("{shared} {rest}"),
    }
}
