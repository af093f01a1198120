//! Sparse vectors and a compressed-sparse-row matrix with cosine scoring.

use serde::{Deserialize, Serialize};

/// Sparse vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    /// Column indices of non-zero entries.
    pub indices: Vec<usize>,
    /// Values aligned with `indices`.
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Builds a vector from `(index, value)` pairs; pairs must be sorted by index.
    pub fn from_sorted(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let (indices, values) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether the vector has no non-zero entries.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        norm(&self.values)
    }

    /// Scales the vector to unit length; zero vectors are left untouched.
    pub fn l2_normalize(&mut self) {
        let n = self.norm();
        if n > 0.0 {
            for value in &mut self.values {
                *value /= n;
            }
        }
    }

    fn view(&self) -> RowView<'_> {
        RowView {
            indices: &self.indices,
            values: &self.values,
        }
    }
}

/// Borrowed view over one matrix row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    /// Column indices.
    pub indices: &'a [usize],
    /// Values aligned with `indices`.
    pub values: &'a [f64],
}

impl RowView<'_> {
    fn dot(&self, other: &RowView<'_>) -> f64 {
        let (mut i, mut j) = (0usize, 0usize);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Row-major sparse matrix (CSR layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Creates an empty matrix with `n_cols` columns and no rows.
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Stacks `rows` into a matrix with `n_cols` columns.
    pub fn from_rows(n_cols: usize, rows: impl IntoIterator<Item = SparseVector>) -> Self {
        let mut matrix = Self::new(n_cols);
        for row in rows {
            matrix.push_row(row);
        }
        matrix
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: SparseVector) {
        self.indices.extend(row.indices);
        self.data.extend(row.values);
        self.indptr.push(self.indices.len());
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.n_cols
    }

    /// Borrowed view over row `idx`, if it exists.
    pub fn row(&self, idx: usize) -> Option<RowView<'_>> {
        let start = *self.indptr.get(idx)?;
        let end = *self.indptr.get(idx + 1)?;
        Some(RowView {
            indices: self.indices.get(start..end)?,
            values: self.data.get(start..end)?,
        })
    }

    /// Checks the CSR invariants: monotone row pointers, in-range and sorted columns.
    pub fn is_well_formed(&self) -> bool {
        if self.indptr.first() != Some(&0)
            || self.indptr.last() != Some(&self.indices.len())
            || self.indices.len() != self.data.len()
            || self.indptr.windows(2).any(|w| w[0] > w[1])
        {
            return false;
        }
        (0..self.rows()).all(|idx| match self.row(idx) {
            Some(row) => {
                row.indices.windows(2).all(|w| w[0] < w[1])
                    && row.indices.iter().all(|col| *col < self.n_cols)
            }
            None => false,
        })
    }

    /// Cosine similarity between `query` and every row, in row order.
    ///
    /// Pairs involving a zero vector score 0.0.
    pub fn cosine_similarities(&self, query: &SparseVector) -> Vec<f64> {
        let query_norm = query.norm();
        let query_view = query.view();
        (0..self.rows())
            .filter_map(|idx| self.row(idx))
            .map(|row| {
                let row_norm = norm(row.values);
                if query_norm == 0.0 || row_norm == 0.0 {
                    0.0
                } else {
                    row.dot(&query_view) / (query_norm * row_norm)
                }
            })
            .collect()
    }
}

fn norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}
