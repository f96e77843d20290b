//! Audit history entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ProcessData, Role, StepId};

/// What the responsible role did when the entry was recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    /// Draft saved, step unchanged
    Saved,
    /// Step submitted to the next one
    Sent,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Saved => "saved",
            HistoryAction::Sent => "sent",
        }
    }
}

/// Immutable record of a save or send action.
///
/// Entries are only ever prepended to a process history; nothing edits or
/// removes them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Step that was current when the action happened
    pub step_id: StepId,

    /// Role owning that step
    pub responsible: Role,

    /// When the action happened (UTC)
    pub timestamp: Timestamp,

    pub action: HistoryAction,

    /// Full copy of the process data at that moment
    pub data_snapshot: ProcessData,

    /// Free-form remarks passed along with a send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
