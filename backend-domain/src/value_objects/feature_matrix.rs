// Feature matrix value object
// Dense row-major output of the fitted transformer

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_rows: usize,
    n_cols: usize,
    values: Vec<f64>,
}

impl FeatureMatrix {
    pub fn with_capacity(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows: 0,
            n_cols,
            values: Vec::with_capacity(n_rows * n_cols),
        }
    }

    /// Builds a matrix from row-major values. Returns `None` when the value
    /// count is not `n_rows * n_cols`.
    pub fn from_row_major(n_rows: usize, n_cols: usize, values: Vec<f64>) -> Option<Self> {
        if n_rows.checked_mul(n_cols)? != values.len() {
            return None;
        }
        Some(Self {
            n_rows,
            n_cols,
            values,
        })
    }

    /// Appends one row. Rows of the wrong width are rejected.
    pub fn push_row(&mut self, row: &[f64]) -> bool {
        if row.len() != self.n_cols {
            return false;
        }
        self.values.extend_from_slice(row);
        self.n_rows += 1;
        true
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.n_cols;
        &self.values[start..start + self.n_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |index| self.row(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_enforces_width() {
        let mut matrix = FeatureMatrix::with_capacity(2, 3);
        assert!(matrix.push_row(&[1.0, 2.0, 3.0]));
        assert!(!matrix.push_row(&[1.0, 2.0]));
        assert!(matrix.push_row(&[4.0, 5.0, 6.0]));
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn from_row_major_checks_shape() {
        assert!(FeatureMatrix::from_row_major(2, 2, vec![0.0; 3]).is_none());
        let matrix = FeatureMatrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("shape");
        let rows: Vec<&[f64]> = matrix.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
    }

    #[test]
    fn zero_width_rows_are_empty_slices() {
        let matrix = FeatureMatrix::from_row_major(3, 0, Vec::new()).expect("shape");
        assert_eq!(matrix.rows().count(), 3);
        assert!(matrix.row(2).is_empty());
    }
}
