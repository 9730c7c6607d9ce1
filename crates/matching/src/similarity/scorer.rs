use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Similarity, StringSimilarity};

/// Memoising front for a [`Similarity`] backend.
///
/// The cache is split into independently locked shards so parallel workers
/// scoring different candidates rarely contend. Two workers racing on the
/// same pair both compute the same value; whichever insert lands last wins
/// and nothing partial is ever observable.
pub struct Scorer {
    backend: Arc<dyn Similarity>,
    shards: Box<[RwLock<HashMap<String, f64>>]>,
    hasher: RandomState,
}

impl Scorer {
    pub fn new(backend: Arc<dyn Similarity>, shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();

        Self {
            backend,
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Similarity of two normalized strings in `[0, 1]`.
    ///
    /// Empty strings score 0.0 against everything, equal strings score 1.0
    /// without touching the backend.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let key = format!("{lo}\u{0}{hi}");
        let shard = &self.shards[self.hasher.hash_one(&key) as usize % self.shards.len()];

        if let Some(value) = shard.read().get(&key) {
            return *value;
        }

        let value = self.backend.similarity(lo, hi);
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };

        shard.write().insert(key, value);
        value
    }

    /// Number of memoised pairs.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().clear();
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(Arc::new(StringSimilarity), 16)
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("shards", &self.shards.len())
            .field("cached", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counting {
        calls: AtomicUsize,
        value: f64,
    }

    impl Similarity for Counting {
        fn similarity(&self, _a: &str, _b: &str) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
        }
    }

    fn counting(value: f64) -> Arc<Counting> {
        Arc::new(Counting {
            calls: AtomicUsize::new(0),
            value,
        })
    }

    #[test]
    fn identical_strings_short_circuit() {
        let backend = counting(0.3);
        let scorer = Scorer::new(backend.clone(), 4);

        assert_eq!(scorer.score("basil", "basil"), 1.0);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_never_matches() {
        let scorer = Scorer::default();

        assert_eq!(scorer.score("", ""), 0.0);
        assert_eq!(scorer.score("", "rice"), 0.0);
    }

    #[test]
    fn memoises_unordered_pairs() {
        let backend = counting(0.42);
        let scorer = Scorer::new(backend.clone(), 4);

        assert_eq!(scorer.score("leek", "onion"), 0.42);
        assert_eq!(scorer.score("onion", "leek"), 0.42);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(scorer.len(), 1);

        scorer.clear();
        assert!(scorer.is_empty());
    }

    #[test]
    fn out_of_range_backend_values_are_clamped() {
        assert_eq!(Scorer::new(counting(1.7), 1).score("a b", "c d"), 1.0);
        assert_eq!(Scorer::new(counting(-0.2), 1).score("a b", "c d"), 0.0);
        assert_eq!(Scorer::new(counting(f64::NAN), 1).score("a b", "c d"), 0.0);
    }

    #[test]
    fn concurrent_scoring_is_consistent() {
        let scorer = Scorer::default();
        let pairs = [
            ("chicken", "chicken breast"),
            ("garlic", "onion"),
            ("rice", "white rice"),
            ("red pepper", "green pepper"),
        ];

        let results: Vec<Vec<f64>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        pairs
                            .iter()
                            .map(|(a, b)| scorer.score(a, b))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for row in &results[1..] {
            assert_eq!(row, &results[0]);
        }
        assert_eq!(scorer.len(), pairs.len());
    }
}
