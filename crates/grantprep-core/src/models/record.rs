//! Proposal record: the extracted sections and financial fields of one document.

use serde::{Deserialize, Serialize};

use super::frame::{Frame, Value};
use crate::sections::ParsedSections;

/// Narrative section columns, in CSV order.
pub const SECTION_FIELDS: [&str; 4] = [
    "org_background",
    "project_description",
    "track_record",
    "mission_statement",
];

/// Numeric columns, in CSV order.
pub const NUMERIC_FIELDS: [&str; 7] = [
    "past_grants_total",
    "annual_budget",
    "total_revenue",
    "annual_budget_last_year",
    "cash_reserves",
    "monthly_operating_expenses",
    "years_active",
];

/// One proposal: four narrative sections plus seven numeric fields.
///
/// Field order matches [`ProposalRecord::headers`], which CSV output relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub org_background: String,
    pub project_description: String,
    pub track_record: String,
    pub mission_statement: String,

    pub past_grants_total: f64,
    pub annual_budget: f64,
    pub total_revenue: f64,
    pub annual_budget_last_year: f64,
    pub cash_reserves: f64,
    pub monthly_operating_expenses: f64,
    pub years_active: f64,
}

impl ProposalRecord {
    /// Build a record from parsed sections. Numeric fields stay at zero
    /// until they are extracted from the document.
    pub fn from_sections(sections: &ParsedSections) -> Self {
        let text = |name: &str| sections.get(name).unwrap_or_default().to_string();
        Self {
            org_background: text(SECTION_FIELDS[0]),
            project_description: text(SECTION_FIELDS[1]),
            track_record: text(SECTION_FIELDS[2]),
            mission_statement: text(SECTION_FIELDS[3]),
            ..Self::default()
        }
    }

    /// Column names in output order.
    pub fn headers() -> Vec<&'static str> {
        SECTION_FIELDS.iter().chain(NUMERIC_FIELDS.iter()).copied().collect()
    }

    /// Narrative section values, in [`SECTION_FIELDS`] order.
    pub fn sections(&self) -> [&str; 4] {
        [
            &self.org_background,
            &self.project_description,
            &self.track_record,
            &self.mission_statement,
        ]
    }

    /// Numeric values, in [`NUMERIC_FIELDS`] order.
    pub fn numbers(&self) -> [f64; 7] {
        [
            self.past_grants_total,
            self.annual_budget,
            self.total_revenue,
            self.annual_budget_last_year,
            self.cash_reserves,
            self.monthly_operating_expenses,
            self.years_active,
        ]
    }

    /// Row values in [`ProposalRecord::headers`] order.
    pub fn to_row(&self) -> Vec<Value> {
        self.sections()
            .iter()
            .map(|s| Value::Text(s.to_string()))
            .chain(self.numbers().iter().map(|n| Value::Number(*n)))
            .collect()
    }
}

impl Frame {
    /// Frame with one row per record, in input order.
    pub fn from_records(records: &[ProposalRecord]) -> Self {
        let columns = ProposalRecord::headers()
            .into_iter()
            .map(String::from)
            .collect();
        let rows = records.iter().map(ProposalRecord::to_row).collect();
        Frame::from_parts(columns, rows)
    }
}
