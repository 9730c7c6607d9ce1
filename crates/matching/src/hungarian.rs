//! Rectangular linear assignment on a plain dense matrix.
//!
//! [`minimize`] is the shortest augmenting path formulation with row and
//! column potentials. Each of the `r` rows is inserted with one Dijkstra-like
//! sweep over the `c` columns, giving `O(r² · c)` with `r ≤ c`; taller
//! matrices are transposed first. Nothing here knows about ingredients.

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Builds a matrix from row vectors. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |row, col| self.get(col, row))
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sum of the cells selected by `pairs`.
    pub fn total(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(row, col)| self.get(row, col)).sum()
    }
}

/// Minimum-cost assignment of `min(rows, cols)` pairs.
///
/// Returns `(row, col)` pairs sorted by row. Every row and every column
/// appears at most once. Cells must be finite.
pub fn minimize(costs: &Matrix) -> Vec<(usize, usize)> {
    debug_assert!(costs.data.iter().all(|c| c.is_finite()));

    if costs.is_empty() {
        return Vec::new();
    }

    if costs.rows > costs.cols {
        let mut pairs: Vec<_> = solve(&costs.transpose())
            .into_iter()
            .map(|(row, col)| (col, row))
            .collect();
        pairs.sort_unstable();
        return pairs;
    }

    solve(costs)
}

/// Maximum-weight assignment, solved as [`minimize`] over `max - w`.
pub fn maximize(weights: &Matrix) -> Vec<(usize, usize)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let ceiling = weights.max();
    let costs = Matrix::from_fn(weights.rows, weights.cols, |row, col| {
        ceiling - weights.get(row, col)
    });
    minimize(&costs)
}

// Requires rows <= cols. Index 0 of the potentials and of `owner` is the
// virtual source used while a new row is being inserted.
fn solve(costs: &Matrix) -> Vec<(usize, usize)> {
    let (n, m) = (costs.rows, costs.cols);
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut owner = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut col0 = 0;
        let mut min_reduced = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[col0] = true;
            let row0 = owner[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0;

            for col in 1..=m {
                if used[col] {
                    continue;
                }
                let reduced = costs.get(row0 - 1, col - 1) - u[row0] - v[col];
                if reduced < min_reduced[col] {
                    min_reduced[col] = reduced;
                    way[col] = col0;
                }
                if min_reduced[col] < delta {
                    delta = min_reduced[col];
                    col1 = col;
                }
            }

            for col in 0..=m {
                if used[col] {
                    u[owner[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_reduced[col] -= delta;
                }
            }

            col0 = col1;
            if owner[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the source.
        while col0 != 0 {
            let prev = way[col0];
            owner[col0] = owner[prev];
            col0 = prev;
        }
    }

    let mut pairs: Vec<_> = (1..=m)
        .filter(|&col| owner[col] != 0)
        .map(|col| (owner[col] - 1, col - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}
