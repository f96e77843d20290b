//! Activation resolver: which catalog steps apply to a process.
//!
//! Activation is re-evaluated from the current process data on every
//! transition. A later step's relevance can hinge on an answer given in an
//! earlier step, so the active sequence is never cached on the process.

use std::fmt;

use crate::{
    catalog,
    models::{ProcessData, StepId},
};

/// Data-driven activation rule attached to a step definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The step always applies
    Always,
    /// The field holds the JSON boolean `true`
    FieldIsTrue(&'static str),
    /// The field holds exactly this string
    FieldEquals {
        field: &'static str,
        value: &'static str,
    },
}

impl Condition {
    /// Evaluate the rule against a data snapshot. Pure.
    pub fn evaluate(&self, data: &ProcessData) -> bool {
        match self {
            Condition::Always => true,
            Condition::FieldIsTrue(field) => {
                matches!(data.get(*field), Some(serde_json::Value::Bool(true)))
            }
            Condition::FieldEquals { field, value } => {
                data.get(*field).and_then(|v| v.as_str()) == Some(*value)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => f.write_str("always"),
            Condition::FieldIsTrue(field) => write!(f, "when {field} is true"),
            Condition::FieldEquals { field, value } => write!(f, "when {field} = \"{value}\""),
        }
    }
}

/// Steps applying to `data`, in catalog order.
pub fn active_step_ids(data: &ProcessData) -> Vec<StepId> {
    catalog::steps()
        .iter()
        .filter(|definition| definition.activation.evaluate(data))
        .map(|definition| definition.id)
        .collect()
}

/// Step following `current` in the active sequence for `data`.
///
/// Returns `None` when `current` is the last active step or is not part of
/// the active sequence at all.
pub fn next_step_id(current: StepId, data: &ProcessData) -> Option<StepId> {
    let active = active_step_ids(data);
    let position = active.iter().position(|id| *id == current)?;
    active.get(position + 1).copied()
}
