//! Zero-mean, unit-variance scaling.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Standardizes columns with the mean and population standard deviation
/// learned at fit time. Constant columns keep a scale of `1.0`, including
/// columns whose variance is only rounding noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: &Array2<f64>) -> Self {
        let n = data.nrows().max(1) as f64;
        let mut means = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());

        for column in data.axis_iter(Axis(1)) {
            let mean = column.sum() / n;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            means.push(mean);
            scales.push(if is_constant(std, mean) { 1.0 } else { std });
        }

        Self { means, scales }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, FeatureError> {
        if data.ncols() != self.means.len() {
            return Err(FeatureError::WidthMismatch {
                stage: "scaler",
                expected: self.means.len(),
                actual: data.ncols(),
            });
        }

        let mut out = data.clone();
        for ((mut column, &mean), &scale) in out
            .axis_iter_mut(Axis(1))
            .zip(&self.means)
            .zip(&self.scales)
        {
            column.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }
}

/// A spread within a few ulps of the mean is treated as zero.
fn is_constant(std: f64, mean: f64) -> bool {
    !std.is_finite() || std <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_population_std() {
        let scaler = StandardScaler::fit(&array![[1.0], [3.0]]);
        assert_eq!(scaler.means(), &[2.0]);
        assert_eq!(scaler.scales(), &[1.0]);

        let scaler = StandardScaler::fit(&array![[0.0], [4.0]]);
        assert_eq!(scaler.scales(), &[2.0]);
    }

    #[test]
    fn test_transform_standardizes() {
        let data = array![[0.0, 5.0], [4.0, 5.0]];
        let scaler = StandardScaler::fit(&data);
        let out = scaler.transform(&data).unwrap();
        assert_eq!(out, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_reuses_fitted_statistics() {
        let scaler = StandardScaler::fit(&array![[0.0], [4.0]]);
        let out = scaler.transform(&array![[6.0]]).unwrap();
        assert_eq!(out, array![[2.0]]);
    }

    #[test]
    fn test_constant_column_with_rounded_mean() {
        let data = array![[0.1], [0.1], [0.1]];
        let scaler = StandardScaler::fit(&data);
        assert_eq!(scaler.scales(), &[1.0]);

        let out = scaler.transform(&data).unwrap();
        assert!(out.iter().all(|v| v.abs() < 1e-12), "{:?}", out);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::fit(&array![[0.0]]);
        assert!(scaler.transform(&array![[0.0, 1.0]]).is_err());
    }
}
