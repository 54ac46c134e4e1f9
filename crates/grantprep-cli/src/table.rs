//! CSV reading and writing at the edge of the pipeline.

use std::io::Write;
use std::path::Path;

use grantprep_core::{FeatureMatrix, Frame, ProposalRecord, Value};

/// Read a CSV with a header row into a frame. Empty cells are missing.
pub fn read_frame(path: &Path) -> anyhow::Result<Frame> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut frame = Frame::new(headers);
    for record in reader.records() {
        let record = record?;
        frame.push_row(record.iter().map(Value::from_raw).collect())?;
    }
    Ok(frame)
}

/// Write records, header first, in input order.
pub fn write_records<W: Write>(writer: W, records: &[ProposalRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ProposalRecord::headers())?;
    for record in records {
        wtr.write_record(record.to_row().iter().map(Value::to_text))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a feature matrix with its column names as the header.
pub fn write_matrix<W: Write>(writer: W, matrix: &FeatureMatrix) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(matrix.columns())?;
    for row in matrix.values().rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Open `path` for writing, or stdout.
pub fn output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    })
}
