//! Named-column frame threaded through every pipeline stage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null.
    Missing,
    /// A number.
    Number(f64),
    /// Free text, including unparsed monetary values.
    Text(String),
}

impl Value {
    /// Cell read from a text source: empty cells are missing.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Value::Missing
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell; `NaN` for anything that is not a number.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            _ => f64::NAN,
        }
    }

    /// Text view of the cell, as written to CSV.
    pub fn to_text(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// A stateless pipeline stage over named columns.
pub trait FrameTransform {
    /// Produce a new frame from `frame`.
    fn transform(&self, frame: &Frame) -> Result<Frame, FeatureError>;

    /// Stage name (for diagnostics).
    fn name(&self) -> &str;
}

/// Row-major table with ordered, named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Create an empty frame with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self::from_parts(columns.into_iter().map(Into::into).collect(), Vec::new())
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows,
        }
    }

    /// Append a row. Its length must match the number of columns.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), FeatureError> {
        if row.len() != self.columns.len() {
            return Err(FeatureError::RowLength {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Values of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, FeatureError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Replace column `name` with `values`, appending it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), FeatureError> {
        if values.len() != self.rows.len() {
            return Err(FeatureError::RowLength {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Apply `f` to every cell of column `name`.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<(), FeatureError>
    where
        F: FnMut(&Value) -> Value,
    {
        let col = self
            .column_index(name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))?;
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
        Ok(())
    }

    /// New frame holding only `names`, in that order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame, FeatureError> {
        let positions = names
            .iter()
            .map(|n| {
                self.column_index(n.as_ref())
                    .ok_or_else(|| FeatureError::MissingColumn(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|r| positions.iter().map(|&p| r[p].clone()).collect())
            .collect();
        let columns = names.iter().map(|n| n.as_ref().to_string()).collect();
        Ok(Frame::from_parts(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Frame {
        let mut frame = Frame::new(["a", "b"]);
        frame
            .push_row(vec![Value::Number(1.0), Value::from_raw("x")])
            .unwrap();
        frame
            .push_row(vec![Value::Missing, Value::from_raw("")])
            .unwrap();
        frame
    }

    #[test]
    fn test_push_row_checks_length() {
        let mut frame = Frame::new(["a", "b"]);
        let err = frame.push_row(vec![Value::Missing]).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::RowLength {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_from_raw_empty_is_missing() {
        assert_eq!(Value::from_raw(""), Value::Missing);
        assert_eq!(Value::from_raw(" "), Value::Text(" ".to_string()));
    }

    #[test]
    fn test_set_column_appends_and_replaces() {
        let mut frame = sample();
        frame
            .set_column("c", vec![Value::Number(3.0), Value::Number(4.0)])
            .unwrap();
        assert_eq!(frame.columns(), &["a", "b", "c"]);
        assert_eq!(frame.get(1, "c"), Some(&Value::Number(4.0)));

        frame
            .set_column("a", vec![Value::Number(9.0), Value::Number(8.0)])
            .unwrap();
        assert_eq!(frame.n_columns(), 3);
        assert_eq!(frame.get(0, "a"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let frame = sample();
        let selected = frame.select(&["b", "a"]).unwrap();
        assert_eq!(selected.columns(), &["b", "a"]);
        assert_eq!(selected.get(0, "b"), Some(&Value::Text("x".to_string())));
    }

    #[test]
    fn test_select_missing_column() {
        let frame = sample();
        let err = frame.select(&["a", "zzz"]).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "zzz"));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Number(2.5).as_f64(), 2.5);
        assert!(Value::Missing.as_f64().is_nan());
        assert!(Value::Text("1".to_string()).as_f64().is_nan());
    }
}
