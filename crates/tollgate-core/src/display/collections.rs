//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::fmt;

use crate::{
    catalog::{self, StepDefinition},
    models::{HistoryEntry, Process, ProcessData, ProcessSummary},
};

/// Newtype wrapper for displaying collections of process summaries.
///
/// Titles are left to the caller. Empty collections render a short notice.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use tollgate_core::{
///     display::ProcessSummaries,
///     models::{Process, ProcessSummary},
/// };
///
/// let process = Process::open("REQ-250101-001".to_string(), Timestamp::now());
/// let summaries = ProcessSummaries(vec![ProcessSummary::at(&process, Timestamp::now())]);
///
/// let output = format!("{}", summaries);
/// assert!(output.contains("REQ-250101-001"));
/// ```
pub struct ProcessSummaries(pub Vec<ProcessSummary>);

impl ProcessSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ProcessSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No processes found.")
        } else {
            for summary in &self.0 {
                write!(f, "{summary}")?;
            }
            Ok(())
        }
    }
}

/// History entries of one process, in the order given.
pub struct History(pub Vec<HistoryEntry>);

impl History {
    /// Entries of `process`, oldest first.
    pub fn oldest_first(process: &Process) -> Self {
        Self(process.chronological_history().cloned().collect())
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No history yet.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Catalog steps with whether each applies to a set of answers.
pub struct StepPreview(pub Vec<(&'static StepDefinition, bool)>);

impl StepPreview {
    /// Evaluate every catalog step against `data`.
    pub fn for_data(data: &ProcessData) -> Self {
        Self(
            catalog::steps()
                .iter()
                .map(|definition| (definition, definition.activation.evaluate(data)))
                .collect(),
        )
    }

    /// Steps that apply, in sequencing order.
    pub fn active(&self) -> impl Iterator<Item = &'static StepDefinition> + '_ {
        self.0
            .iter()
            .filter(|(_, active)| *active)
            .map(|(definition, _)| *definition)
    }
}

impl fmt::Display for StepPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (definition, active) in &self.0 {
            if *active {
                write!(f, "{definition}")?;
            } else {
                writeln!(f, "### ~~{}~~ (`{}`, skipped)", definition.title, definition.id)?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
