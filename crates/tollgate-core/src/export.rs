//! Flat CSV export of a single process.
//!
//! Layout, one record per line:
//!
//! ```text
//! ID,REQ-250104-001
//! Created,2025-01-04 14:13
//! Closed,No
//! ""
//! Data
//! itemNacional,false
//! nomeSolicitante,Ana
//! ...
//! ""
//! History
//! Date,Step,Responsible,Action
//! 2025-01-04 15:13,Solicitante Primário,Solicitante Primário,saved
//! ...
//! ```
//!
//! Separator records hold one empty field, which the writer quotes as `""`.
//! Data rows have no header and are sorted by field name. Dates are written
//! in UTC. History is written oldest first.

use jiff::{tz::TimeZone, Timestamp};
use serde_json::Value;

use crate::{
    catalog,
    error::{Result, WorkflowError},
    models::Process,
};

fn utc(timestamp: &Timestamp) -> String {
    timestamp
        .to_zoned(TimeZone::UTC)
        .strftime("%Y-%m-%d %H:%M")
        .to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render `process` as CSV bytes.
///
/// # Errors
///
/// Returns `WorkflowError::Export` if the writer fails.
pub fn to_csv(process: &Process) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["ID", process.id.as_str()])?;
    writer.write_record(["Created", utc(&process.created_at).as_str()])?;
    writer.write_record(["Closed", if process.closed { "Yes" } else { "No" }])?;
    writer.write_record([""])?;

    writer.write_record(["Data"])?;
    for (field, value) in &process.data {
        writer.write_record([field.as_str(), cell(value).as_str()])?;
    }
    writer.write_record([""])?;

    writer.write_record(["History"])?;
    writer.write_record(["Date", "Step", "Responsible", "Action"])?;
    for entry in process.chronological_history() {
        writer.write_record([
            utc(&entry.timestamp).as_str(),
            catalog::definition(entry.step_id).title,
            entry.responsible.title(),
            entry.action.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| WorkflowError::from(csv::Error::from(e.into_error())))
}
