//! Financial ratios derived from the seven numeric proposal fields.
//!
//! Every denominator carries a `+ 1` guard against division by zero. The
//! guard does not cover negative inputs (an `annual_budget` of `-1` still
//! divides by zero), so every ratio is also swept: infinities and NaN
//! become `0.0`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::FeatureError;
use crate::models::frame::{Frame, FrameTransform, Value};
use crate::models::record::ProposalRecord;

/// Ratio columns, in output order.
pub const RATIO_FIELDS: [&str; 5] = [
    "ratio_absorption",
    "ratio_dependency",
    "ratio_budget_stability",
    "ratio_liquidity",
    "ratio_growth_adjusted",
];

/// The inputs of the ratio computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericFields {
    pub past_grants_total: f64,
    pub annual_budget: f64,
    pub total_revenue: f64,
    pub annual_budget_last_year: f64,
    pub cash_reserves: f64,
    pub monthly_operating_expenses: f64,
    pub years_active: f64,
}

impl NumericFields {
    /// Read the fields of `row`. Absent columns and non-numeric cells read as `0.0`.
    pub fn from_row(frame: &Frame, row: usize) -> Self {
        let get = |name: &str| match frame.get(row, name) {
            Some(Value::Number(n)) => *n,
            _ => 0.0,
        };
        Self {
            past_grants_total: get("past_grants_total"),
            annual_budget: get("annual_budget"),
            total_revenue: get("total_revenue"),
            annual_budget_last_year: get("annual_budget_last_year"),
            cash_reserves: get("cash_reserves"),
            monthly_operating_expenses: get("monthly_operating_expenses"),
            years_active: get("years_active"),
        }
    }
}

impl From<&ProposalRecord> for NumericFields {
    fn from(record: &ProposalRecord) -> Self {
        Self {
            past_grants_total: record.past_grants_total,
            annual_budget: record.annual_budget,
            total_revenue: record.total_revenue,
            annual_budget_last_year: record.annual_budget_last_year,
            cash_reserves: record.cash_reserves,
            monthly_operating_expenses: record.monthly_operating_expenses,
            years_active: record.years_active,
        }
    }
}

/// The five ratios of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    /// Grant absorption capacity.
    pub absorption: f64,
    /// Grant dependency (financial resilience).
    pub dependency: f64,
    /// Budget stability year over year.
    pub budget_stability: f64,
    /// Months of operating expenses covered by cash.
    pub liquidity: f64,
    /// Grant absorption adjusted for organization age.
    pub growth_adjusted: f64,
}

impl RatioSet {
    /// Compute all five ratios, with non-finite results replaced by `0.0`.
    pub fn compute(f: &NumericFields) -> Self {
        Self {
            absorption: f.past_grants_total / (f.annual_budget + 1.0),
            dependency: f.past_grants_total / (f.total_revenue + 1.0),
            budget_stability: f.annual_budget / (f.annual_budget_last_year + 1.0),
            liquidity: f.cash_reserves / (f.monthly_operating_expenses + 1.0),
            growth_adjusted: f.past_grants_total
                / ((f.years_active + 1.0) * (f.annual_budget + 1.0)),
        }
        .swept()
    }

    /// Values in [`RATIO_FIELDS`] order.
    pub fn values(&self) -> [f64; 5] {
        [
            self.absorption,
            self.dependency,
            self.budget_stability,
            self.liquidity,
            self.growth_adjusted,
        ]
    }

    fn swept(self) -> Self {
        let sweep = |name: &str, v: f64| {
            if v.is_finite() {
                v
            } else {
                trace!("Non-finite {} ({}), using 0", name, v);
                0.0
            }
        };
        Self {
            absorption: sweep(RATIO_FIELDS[0], self.absorption),
            dependency: sweep(RATIO_FIELDS[1], self.dependency),
            budget_stability: sweep(RATIO_FIELDS[2], self.budget_stability),
            liquidity: sweep(RATIO_FIELDS[3], self.liquidity),
            growth_adjusted: sweep(RATIO_FIELDS[4], self.growth_adjusted),
        }
    }
}

/// Appends the five ratio columns to a frame of cleaned numeric fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioEngine;

impl RatioEngine {
    pub fn new() -> Self {
        Self
    }
}

impl FrameTransform for RatioEngine {
    fn transform(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        let ratios: Vec<[f64; 5]> = (0..frame.n_rows())
            .map(|row| RatioSet::compute(&NumericFields::from_row(frame, row)).values())
            .collect();

        let mut out = frame.clone();
        for (i, name) in RATIO_FIELDS.iter().enumerate() {
            let column = ratios.iter().map(|r| Value::Number(r[i])).collect();
            out.set_column(name, column)?;
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "ratio-engine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields() -> NumericFields {
        NumericFields {
            past_grants_total: 500.0,
            annual_budget: 999.0,
            total_revenue: 1999.0,
            annual_budget_last_year: 799.0,
            cash_reserves: 3000.0,
            monthly_operating_expenses: 99.0,
            years_active: 4.0,
        }
    }

    #[test]
    fn test_formulas() {
        let r = RatioSet::compute(&fields());
        assert_eq!(r.absorption, 0.5);
        assert_eq!(r.dependency, 0.25);
        assert_eq!(r.budget_stability, 999.0 / 800.0);
        assert_eq!(r.liquidity, 30.0);
        assert_eq!(r.growth_adjusted, 500.0 / (5.0 * 1000.0));
    }

    #[test]
    fn test_zero_budget_uses_unit_denominator() {
        let f = NumericFields {
            past_grants_total: 7.0,
            ..NumericFields::default()
        };
        let r = RatioSet::compute(&f);
        assert_eq!(r.absorption, 7.0);
        assert_eq!(r.growth_adjusted, 7.0);
    }

    #[test]
    fn test_all_zero_record() {
        let r = RatioSet::compute(&NumericFields::default());
        assert_eq!(r.values(), [0.0; 5]);
    }

    #[test]
    fn test_sweep_touches_only_non_finite_ratios() {
        let f = NumericFields {
            annual_budget: -1.0,
            ..fields()
        };
        let r = RatioSet::compute(&f);
        assert_eq!(r.absorption, 0.0);
        assert_eq!(r.growth_adjusted, 0.0);
        assert_eq!(r.dependency, 0.25);
        assert_eq!(r.budget_stability, -1.0 / 800.0);
        assert_eq!(r.liquidity, 30.0);
    }

    #[test]
    fn test_nan_inputs_sweep_to_zero() {
        let f = NumericFields {
            past_grants_total: f64::NAN,
            ..fields()
        };
        let r = RatioSet::compute(&f);
        assert_eq!(r.absorption, 0.0);
        assert_eq!(r.dependency, 0.0);
        assert_eq!(r.growth_adjusted, 0.0);
        assert_eq!(r.liquidity, 30.0);
    }

    #[test]
    fn test_transform_appends_columns() {
        let record = ProposalRecord {
            past_grants_total: 500.0,
            annual_budget: 999.0,
            ..ProposalRecord::default()
        };
        let frame = Frame::from_records(&[record.clone()]);
        let out = RatioEngine::new().transform(&frame).unwrap();

        assert_eq!(out.n_columns(), 11 + 5);
        assert_eq!(out.get(0, "ratio_absorption"), Some(&Value::Number(0.5)));
        assert_eq!(
            RatioSet::compute(&NumericFields::from(&record)).absorption,
            0.5
        );
    }

    #[test]
    fn test_absent_and_missing_inputs_read_as_zero() {
        let mut frame = Frame::new(["cash_reserves", "past_grants_total"]);
        frame
            .push_row(vec![Value::Number(10.0), Value::Missing])
            .unwrap();
        let f = NumericFields::from_row(&frame, 0);
        assert_eq!(f.cash_reserves, 10.0);
        assert_eq!(f.monthly_operating_expenses, 0.0);
        assert_eq!(f.past_grants_total, 0.0);

        let out = RatioEngine::new().transform(&frame).unwrap();
        assert_eq!(out.get(0, "ratio_liquidity"), Some(&Value::Number(10.0)));
        assert_eq!(out.get(0, "ratio_absorption"), Some(&Value::Number(0.0)));
    }
}
