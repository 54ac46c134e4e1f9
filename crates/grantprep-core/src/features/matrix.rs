//! The positional feature matrix handed to the estimator.

use std::ops::Range;

use ndarray::{Array2, ArrayView1, ArrayView2, s};

/// Named columns over a dense `rows x columns` matrix, in input row order.
///
/// Columns are laid out as three contiguous blocks: numeric fields,
/// ratios, then TF-IDF terms.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
    numeric: Range<usize>,
    ratios: Range<usize>,
    text: Range<usize>,
}

impl FeatureMatrix {
    /// Concatenate the three blocks column-wise. All blocks must have the
    /// same number of rows and one name per column.
    pub(crate) fn from_blocks(
        numeric: (Vec<String>, Array2<f64>),
        ratios: (Vec<String>, Array2<f64>),
        text: (Vec<String>, Array2<f64>),
    ) -> Self {
        let n_rows = numeric.1.nrows();
        let numeric_range = 0..numeric.1.ncols();
        let ratio_range = numeric_range.end..numeric_range.end + ratios.1.ncols();
        let text_range = ratio_range.end..ratio_range.end + text.1.ncols();

        let mut values = Array2::<f64>::zeros((n_rows, text_range.end));
        values
            .slice_mut(s![.., numeric_range.clone()])
            .assign(&numeric.1);
        values.slice_mut(s![.., ratio_range.clone()]).assign(&ratios.1);
        values.slice_mut(s![.., text_range.clone()]).assign(&text.1);

        let mut columns = numeric.0;
        columns.extend(ratios.0);
        columns.extend(text.0);

        Self {
            columns,
            values,
            numeric: numeric_range,
            ratios: ratio_range,
            text: text_range,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Features of one record.
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// Column range of the numeric block.
    pub fn numeric_range(&self) -> Range<usize> {
        self.numeric.clone()
    }

    pub fn ratio_range(&self) -> Range<usize> {
        self.ratios.clone()
    }

    pub fn text_range(&self) -> Range<usize> {
        self.text.clone()
    }

    pub fn numeric_block(&self) -> ArrayView2<'_, f64> {
        self.values.slice(s![.., self.numeric.clone()])
    }

    pub fn ratio_block(&self) -> ArrayView2<'_, f64> {
        self.values.slice(s![.., self.ratios.clone()])
    }

    pub fn text_block(&self) -> ArrayView2<'_, f64> {
        self.values.slice(s![.., self.text.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blocks_concatenated_in_order() {
        let m = FeatureMatrix::from_blocks(
            (names(&["a"]), array![[1.0], [2.0]]),
            (names(&["r1", "r2"]), array![[3.0, 4.0], [5.0, 6.0]]),
            (names(&["tfidf__x"]), array![[7.0], [8.0]]),
        );

        assert_eq!(m.columns(), &["a", "r1", "r2", "tfidf__x"]);
        assert_eq!(m.values(), &array![[1.0, 3.0, 4.0, 7.0], [2.0, 5.0, 6.0, 8.0]]);
        assert_eq!(m.ratio_range(), 1..3);
        assert_eq!(m.text_block(), array![[7.0], [8.0]]);
    }

    #[test]
    fn test_empty_text_block() {
        let m = FeatureMatrix::from_blocks(
            (names(&["a"]), array![[1.0]]),
            (Vec::new(), Array2::zeros((1, 0))),
            (Vec::new(), Array2::zeros((1, 0))),
        );
        assert_eq!(m.n_columns(), 1);
        assert!(m.text_range().is_empty());
    }
}
