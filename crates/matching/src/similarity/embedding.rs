use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

use thiserror::Error;

use super::{Similarity, StringSimilarity};
use crate::normalize::normalize;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("No embedding for '{0}'")]
    Missing(String),

    #[error("Embedding table io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedding table parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Produces a vector for a normalized ingredient string.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Cosine similarity over embeddings, degrading to [`StringSimilarity`].
///
/// A failing embedder never surfaces as an error: the pair is scored with
/// the string metric instead and the degradation is logged once.
pub struct EmbeddingSimilarity<E> {
    embedder: E,
    fallback: StringSimilarity,
    degraded: Once,
}

impl<E: Embedder> EmbeddingSimilarity<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            fallback: StringSimilarity,
            degraded: Once::new(),
        }
    }

    fn degrade(&self, a: &str, b: &str, reason: &str) -> f64 {
        self.degraded.call_once(|| {
            tracing::warn!(
                reason,
                "Embedding similarity unavailable, falling back to string similarity"
            );
        });
        tracing::debug!(a, b, reason, "string similarity fallback");
        self.fallback.similarity(a, b)
    }
}

impl<E: Embedder> Similarity for EmbeddingSimilarity<E> {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let vectors = self
            .embedder
            .embed(a)
            .and_then(|va| self.embedder.embed(b).map(|vb| (va, vb)));

        match vectors {
            Ok((va, vb)) => match cosine(&va, &vb) {
                Some(value) => value.clamp(0.0, 1.0),
                None => self.degrade(a, b, "degenerate or mismatched vectors"),
            },
            Err(e) => self.degrade(a, b, &e.to_string()),
        }
    }
}

/// Cosine of two equally sized, non-zero vectors.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let value = dot / (norm_a.sqrt() * norm_b.sqrt());
    value.is_finite().then_some(value)
}

/// Precomputed embeddings loaded once from a JSON object of
/// `{"ingredient text": [f32, ...]}`.
///
/// Keys are normalized on load so lookups use the same canonical form the
/// scorer sees.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EmbeddingError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json(&content)?;

        tracing::info!(
            path = %path.as_ref().display(),
            entries = table.len(),
            "Loaded embedding table"
        );

        Ok(table)
    }

    pub fn from_json(content: &str) -> Result<Self, EmbeddingError> {
        let raw: HashMap<String, Vec<f32>> = serde_json::from_str(content)?;
        Ok(raw.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl FromIterator<(String, Vec<f32>)> for EmbeddingTable {
    fn from_iter<T: IntoIterator<Item = (String, Vec<f32>)>>(iter: T) -> Self {
        let vectors = iter
            .into_iter()
            .map(|(text, vector)| (normalize(&text), vector))
            .filter(|(text, _)| !text.is_empty())
            .collect();

        Self { vectors }
    }
}

impl Embedder for EmbeddingTable {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::Missing(text.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl Embedder for Offline {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Unavailable("model not loaded".to_owned()))
        }
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let value = cosine(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_rejects_mismatched_or_zero_vectors() {
        assert!(cosine(&[1.0, 0.0], &[1.0]).is_none());
        assert!(cosine(&[0.0, 0.0], &[1.0, 1.0]).is_none());
        assert!(cosine(&[], &[]).is_none());
    }

    #[test]
    fn opposite_vectors_clamp_to_zero() {
        let table: EmbeddingTable = [
            ("basil".to_owned(), vec![1.0, 0.0]),
            ("cumin".to_owned(), vec![-1.0, 0.0]),
        ]
        .into_iter()
        .collect();
        let similarity = EmbeddingSimilarity::new(table);

        assert_eq!(similarity.similarity("basil", "cumin"), 0.0);
    }

    #[test]
    fn unavailable_backend_degrades_to_string_metric() {
        let similarity = EmbeddingSimilarity::new(Offline);

        assert_eq!(similarity.similarity("rice", "white rice"), 1.0);
        assert_eq!(
            similarity.similarity("garlic", "onion"),
            StringSimilarity.similarity("garlic", "onion")
        );
    }

    #[test]
    fn table_keys_are_normalized() {
        let table = EmbeddingTable::from_json(r#"{"Tomatoes": [0.5, 0.5]}"#).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.embed("tomato").unwrap(), vec![0.5, 0.5]);
        assert!(matches!(
            table.embed("potato"),
            Err(EmbeddingError::Missing(_))
        ));
    }

    #[test]
    fn table_loads_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("embeddings.json");
        std::fs::write(&path, r#"{"white rice": [0.1, 0.9], "rice": [0.2, 0.8]}"#).unwrap();

        let table = EmbeddingTable::from_path(&path).unwrap();
        let similarity = EmbeddingSimilarity::new(table);
        let value = similarity.similarity("rice", "white rice");

        assert!(value > 0.9 && value <= 1.0);
    }
}
