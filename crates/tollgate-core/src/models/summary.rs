//! Process summary and dashboard statistics.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Process, Role, StepId};
use crate::{catalog, sla::SlaStatus};

/// Compact view of a process for lists and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessSummary {
    pub id: String,
    pub created_at: Timestamp,
    pub current_step_id: StepId,
    /// Catalog title of the current step
    pub step_title: String,
    /// Role expected to act next
    pub responsible: Role,
    pub closed: bool,
    /// Number of history entries recorded
    pub history_len: usize,
    /// SLA of the current step, evaluated when the summary was built
    pub sla: SlaStatus,
    /// Requester name, when filled in
    pub requester: Option<String>,
}

impl ProcessSummary {
    /// Create a summary with the SLA evaluated at `now`.
    pub fn at(process: &Process, now: Timestamp) -> Self {
        let definition = catalog::definition(process.current_step_id);
        let sla = if process.closed {
            SlaStatus::undetermined()
        } else {
            crate::sla::status_for(process.current_timing(), now)
        };

        Self {
            id: process.id.clone(),
            created_at: process.created_at,
            current_step_id: process.current_step_id,
            step_title: definition.title.to_string(),
            responsible: definition.responsible,
            closed: process.closed,
            history_len: process.history.len(),
            sla,
            requester: process
                .text_field("nomeSolicitante")
                .filter(|name| !name.is_empty())
                .map(String::from),
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowStats {
    pub total: usize,
    /// Open processes
    pub pending: usize,
    /// Closed processes
    pub completed: usize,
    /// Open processes waiting on the selected role
    pub my_tasks: usize,
    /// Open processes whose current step is past its deadline
    pub overdue: usize,
}
