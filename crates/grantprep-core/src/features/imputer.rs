//! Per-column median imputation.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Replaces NaN cells with the column median learned at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Vec<f64>,
}

impl MedianImputer {
    /// Learn one median per column, ignoring NaN. A column with no observed
    /// value gets a median of `0.0`.
    pub fn fit(data: &Array2<f64>) -> Self {
        let medians = data
            .axis_iter(Axis(1))
            .map(|column| {
                let observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
                median(observed).unwrap_or(0.0)
            })
            .collect();
        Self { medians }
    }

    pub fn medians(&self) -> &[f64] {
        &self.medians
    }

    /// Fill NaN cells with the fitted medians.
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, FeatureError> {
        if data.ncols() != self.medians.len() {
            return Err(FeatureError::WidthMismatch {
                stage: "imputer",
                expected: self.medians.len(),
                actual: data.ncols(),
            });
        }

        let mut out = data.clone();
        for (mut column, &fill) in out.axis_iter_mut(Axis(1)).zip(&self.medians) {
            column.mapv_inplace(|v| if v.is_nan() { fill } else { v });
        }
        Ok(out)
    }
}

/// Median of `values`; the mean of the two middle values for even counts.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn test_fit_ignores_nan() {
        let data = array![[1.0, f64::NAN], [f64::NAN, f64::NAN], [5.0, 2.0]];
        let imputer = MedianImputer::fit(&data);
        assert_eq!(imputer.medians(), &[3.0, 2.0]);
    }

    #[test]
    fn test_single_observed_value_is_the_median() {
        let data = array![[7.0], [f64::NAN]];
        let out = MedianImputer::fit(&data).transform(&data).unwrap();
        assert_eq!(out, array![[7.0], [7.0]]);
    }

    #[test]
    fn test_all_missing_column_fills_zero() {
        let data = array![[f64::NAN], [f64::NAN]];
        let out = MedianImputer::fit(&data).transform(&data).unwrap();
        assert_eq!(out, array![[0.0], [0.0]]);
    }

    #[test]
    fn test_width_mismatch() {
        let imputer = MedianImputer::fit(&array![[1.0, 2.0]]);
        let err = imputer.transform(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, FeatureError::WidthMismatch { expected: 2, actual: 1, .. }));
    }
}
