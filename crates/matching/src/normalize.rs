//! Ingredient string canonicalization.
//!
//! The policy is deliberately small and stable because every similarity
//! score downstream depends on it:
//!
//! 1. lower-case and trim
//! 2. remove every character that is not alphanumeric, `_` or whitespace
//!    ("half-and-half" becomes "halfandhalf")
//! 3. collapse runs of whitespace
//! 4. drop the structural stopwords in [`STRUCTURAL_STOPWORDS`]; descriptors
//!    such as "fresh" or "chopped" and articles are kept
//! 5. singularise each remaining token with [`singularize`]
//!
//! An input that ends up empty normalizes to `""`, which never matches
//! anything.

/// Connective words that carry no ingredient identity.
pub const STRUCTURAL_STOPWORDS: &[&str] = &["of", "and", "or", "for", "to", "with", "in"];

pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !STRUCTURAL_STOPWORDS.contains(token))
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// An ingredient string paired with its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub raw: String,
    pub normalized: String,
}

impl Term {
    /// Normalizes every entry, dropping those that become empty.
    pub fn collect<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<Term> {
        raw.into_iter()
            .filter_map(|value| {
                let normalized = normalize(value);
                (!normalized.is_empty()).then(|| Term {
                    raw: value.to_owned(),
                    normalized,
                })
            })
            .collect()
    }

    /// Like [`Term::collect`] but with set semantics: later entries whose
    /// normalized form was already seen are dropped.
    pub fn collect_unique<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        for term in Term::collect(raw) {
            if !out.iter().any(|t| t.normalized == term.normalized) {
                out.push(term);
            }
        }
        out
    }
}

/// Rule-based English singular form of a single lower-case token.
pub fn singularize(token: &str) -> String {
    let len = token.chars().count();
    if len <= 3 {
        return token.to_owned();
    }

    if len > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = token.strip_suffix("oes") {
            return format!("{stem}o");
        }
    }

    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_owned();
        }
    }

    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_owned();
    }

    match token.strip_suffix('s') {
        Some(stem) => stem.to_owned(),
        None => token.to_owned(),
    }
}
