//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation of
//! concerns. Output is markdown, rendered by the terminal or passed verbatim
//! to MCP clients.

use std::fmt;

use jiff::Timestamp;
use serde_json::Value;

use super::datetime::LocalDateTime;
use crate::{
    catalog::{self, StepDefinition},
    models::{HistoryAction, HistoryEntry, Process, ProcessSummary, WorkflowStats},
    sla::{self, SlaStatus, SlaTier},
};

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SlaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SlaTier {
    /// Tier with a status icon.
    pub fn with_icon(&self) -> &'static str {
        match self {
            SlaTier::Undetermined => "· No deadline",
            SlaTier::OnTrack => "○ On track",
            SlaTier::Critical => "◐ Critical",
            SlaTier::Overdue => "● Overdue",
        }
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tier, self.breakdown()) {
            (SlaTier::Overdue, Some(late)) => write!(f, "{} by {late}", self.tier.with_icon()),
            (_, Some(left)) => write!(f, "{} ({left} left)", self.tier.with_icon()),
            (_, None) => write!(f, "{}", self.tier.with_icon()),
        }
    }
}

/// Text for a data value: strings verbatim, anything else as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} **{}** at {} by {}",
            LocalDateTime(&self.timestamp),
            self.action,
            catalog::definition(self.step_id).title,
            self.responsible.title()
        )?;
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            write!(f, ": {notes}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = catalog::definition(self.current_step_id);

        writeln!(f, "# {}", self.id)?;
        writeln!(f)?;

        if self.closed {
            writeln!(f, "- Status: ✓ Closed")?;
        } else {
            writeln!(f, "- Status: Open")?;
            writeln!(f, "- Current step: {}", step.title)?;
            writeln!(f, "- Responsible: {}", step.responsible.title())?;
            let status = sla::status_for(self.current_timing(), Timestamp::now());
            writeln!(f, "- SLA: {status}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        let answered: Vec<_> = self.data.iter().filter(|(_, v)| !is_blank(v)).collect();
        if !answered.is_empty() {
            writeln!(f, "\n## Data")?;
            writeln!(f)?;
            for (field, value) in answered {
                writeln!(f, "- {field}: {}", value_text(value))?;
            }
        }

        if !self.closed {
            let missing = self.missing_fields();
            if !missing.is_empty() {
                writeln!(f, "\n## Missing for {}", step.title)?;
                writeln!(f)?;
                for field in missing {
                    writeln!(f, "- {field}")?;
                }
            }
        }

        if self.history.is_empty() {
            writeln!(f, "\nNo history yet.")?;
        } else {
            writeln!(f, "\n## History")?;
            writeln!(f)?;
            for entry in self.chronological_history() {
                write!(f, "{entry}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.closed {
            "✓ Closed".to_string()
        } else {
            self.step_title.clone()
        };
        writeln!(f, "## {} ({state})", self.id)?;
        writeln!(f)?;

        if let Some(requester) = &self.requester {
            writeln!(f, "- **Requester**: {requester}")?;
        }
        if !self.closed {
            writeln!(f, "- **Waiting on**: {}", self.responsible.title())?;
            writeln!(f, "- **SLA**: {}", self.sla)?;
        }
        writeln!(f, "- **Entries**: {}", self.history_len)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} (`{}`)", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- Responsible: {}", self.responsible.title())?;
        writeln!(f, "- SLA: {}", self.sla)?;
        writeln!(f, "- Applies when: {}", self.activation)?;

        let required = catalog::required_rules(self.id);
        if !required.is_empty() {
            let fields: Vec<_> = required.iter().map(|rule| rule.field).collect();
            writeln!(f, "- Requires: {}", fields.join(", "))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for WorkflowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| Total | Pending | Completed | My tasks | Overdue |")?;
        writeln!(f, "|---|---|---|---|---|")?;
        writeln!(
            f,
            "| {} | {} | {} | {} | {} |",
            self.total, self.pending, self.completed, self.my_tasks, self.overdue
        )
    }
}
