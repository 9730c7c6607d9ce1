use std::cmp::Ordering;

use pantry_types::{CoverageResult, MatchedPair};

use crate::hungarian::{self, Matrix};
use crate::normalize::Term;
use crate::similarity::Scorer;

/// Pairs a user ingredient list with a recipe ingredient list.
///
/// Rows of every matrix built here are user terms and columns are recipe
/// terms. A pair counts toward coverage only when its similarity is at
/// least `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct CoverageAssigner<'a> {
    scorer: &'a Scorer,
    threshold: f64,
}

impl<'a> CoverageAssigner<'a> {
    pub fn new(scorer: &'a Scorer, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Normalizes both lists and solves the assignment.
    ///
    /// User entries are deduplicated after normalization; recipe entries
    /// are not. Entries that normalize to nothing are dropped from both.
    pub fn assign<U, R>(&self, user: &[U], recipe: &[R]) -> CoverageResult
    where
        U: AsRef<str>,
        R: AsRef<str>,
    {
        let user = Term::collect_unique(user.iter().map(AsRef::as_ref));
        let recipe = Term::collect(recipe.iter().map(AsRef::as_ref));
        self.assign_terms(&user, &recipe)
    }

    pub fn assign_terms(&self, user: &[Term], recipe: &[Term]) -> CoverageResult {
        let matrix = self.similarity_matrix(user, recipe);
        self.assign_matrix(user, recipe, &matrix)
    }

    pub fn similarity_matrix(&self, user: &[Term], recipe: &[Term]) -> Matrix {
        Matrix::from_fn(user.len(), recipe.len(), |row, col| {
            self.scorer
                .score(&user[row].normalized, &recipe[col].normalized)
        })
    }

    /// Upper bound on the matched count: the smaller of the number of rows
    /// and the number of columns holding at least one cell at or above the
    /// threshold.
    pub fn match_upper_bound(&self, matrix: &Matrix) -> usize {
        let rows = (0..matrix.rows())
            .filter(|&row| matrix.row(row).iter().any(|&s| s >= self.threshold))
            .count();
        let cols = (0..matrix.cols())
            .filter(|&col| (0..matrix.rows()).any(|row| matrix.get(row, col) >= self.threshold))
            .count();
        rows.min(cols)
    }

    /// Solves the maximum-similarity assignment over a prebuilt matrix and
    /// keeps the pairs that clear the threshold.
    ///
    /// Cells below the threshold weigh nothing in the solve, so a strong
    /// pair can never crowd out two pairs that both pass.
    pub fn assign_matrix(&self, user: &[Term], recipe: &[Term], matrix: &Matrix) -> CoverageResult {
        let weights = self.passing_weights(matrix);
        let mut matched_pairs: Vec<MatchedPair> = hungarian::maximize(&weights)
            .into_iter()
            .filter_map(|(row, col)| {
                let similarity = matrix.get(row, col);
                (similarity >= self.threshold).then(|| MatchedPair {
                    user_ingredient: user[row].raw.clone(),
                    recipe_ingredient: recipe[col].raw.clone(),
                    similarity,
                })
            })
            .collect();

        matched_pairs.sort_by(by_similarity_desc);
        coverage_result(matched_pairs, user.len(), recipe.len())
    }

    fn passing_weights(&self, matrix: &Matrix) -> Matrix {
        Matrix::from_fn(matrix.rows(), matrix.cols(), |row, col| {
            let similarity = matrix.get(row, col);
            if similarity >= self.threshold {
                similarity
            } else {
                0.0
            }
        })
    }
}

/// Builds a result with both ratios derived from `matched_pairs`.
pub fn coverage_result(
    matched_pairs: Vec<MatchedPair>,
    user_len: usize,
    recipe_len: usize,
) -> CoverageResult {
    let matched = matched_pairs.len();
    CoverageResult {
        user_coverage: coverage_ratio(matched, user_len, recipe_len),
        recipe_coverage: coverage_ratio(matched, recipe_len, user_len),
        matched_pairs,
    }
}

/// `matched / len`, with the empty-list conventions: when both lists are
/// empty the ratio is 1.0, when only `len` is empty it is 0.0.
pub fn coverage_ratio(matched: usize, len: usize, other_len: usize) -> f64 {
    match (len, other_len) {
        (0, 0) => 1.0,
        (0, _) => 0.0,
        _ => (matched as f64 / len as f64).clamp(0.0, 1.0),
    }
}

fn by_similarity_desc(a: &MatchedPair, b: &MatchedPair) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.user_ingredient.cmp(&b.user_ingredient))
        .then_with(|| a.recipe_ingredient.cmp(&b.recipe_ingredient))
}
