//! Process model definition.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{HistoryEntry, SlaDuration, StepId};

/// Open-ended answers accumulated across all steps, keyed by field name.
pub type ProcessData = BTreeMap<String, serde_json::Value>;

/// Moment a step became current, with the SLA it was granted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepTiming {
    pub started_at: Timestamp,
    pub sla: SlaDuration,
}

/// A record moving through the approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Process {
    /// Human-readable code, e.g. `REQ-250114-003`
    pub id: String,

    /// Timestamp when the process was opened (UTC)
    pub created_at: Timestamp,

    /// Answers keyed by field name; keys are only added or overwritten
    #[serde(default)]
    pub data: ProcessData,

    /// Step currently waiting on its responsible role
    pub current_step_id: StepId,

    /// Audit ledger, newest entry first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// Timing of every step reached so far
    #[serde(default)]
    pub steps_start: BTreeMap<StepId, StepTiming>,

    /// Set once the closure step has been sent
    #[serde(default)]
    pub closed: bool,
}

impl Process {
    /// Timing of the current step, if one was recorded.
    pub fn current_timing(&self) -> Option<&StepTiming> {
        self.steps_start.get(&self.current_step_id)
    }

    /// Most recent history entry.
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.history.first()
    }

    /// History in creation order, oldest first.
    pub fn chronological_history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev()
    }

    /// Text value of a data field, if it is a string.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|value| value.as_str())
    }
}
