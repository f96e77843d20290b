//! Process state machine.
//!
//! States are the catalog step ids plus `closed`. The only transition is
//! [`Process::send_to_next`], which consults the activation resolver with the
//! data as it stands at that moment. The workflow only moves forward and the
//! history is only ever prepended to.
//!
//! These functions take the current instant explicitly and never touch
//! storage; [`crate::workflow::ProcessStore`] wraps them with persistence.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::json;

use crate::{
    activation, catalog,
    models::{HistoryAction, HistoryEntry, Process, ProcessData, Role, StepId, StepTiming},
};

/// Text fields every new process starts with, blank.
const BLANK_FIELDS: [&str; 16] = [
    "nomeSolicitante",
    "objetivo",
    "descricao",
    "tipoCadastro",
    "temperaturaMDG",
    "ncmCode",
    "verificacaoTributaria",
    "regrasICMS",
    "checklistRegulatorio",
    "observacoesRegulatorio",
    "dadosSistemaExterno",
    "dadosInclusaoData",
    "dataEnvioMarcacao",
    "dataMarcacao",
    "dataMDGFinalizado",
    "dataParametrizacao",
];

/// Outcome of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Moved to the next active step
    Advanced { from: StepId, to: StepId },
    /// No active step was left, so the process moved to closure
    RoutedToClosure { from: StepId },
    /// Closure was sent; the process is terminal
    Closed,
    /// The process was already closed; nothing changed
    AlreadyClosed,
}

impl Transition {
    /// Step that became current, if the send moved the process.
    pub fn target(&self) -> Option<StepId> {
        match self {
            Transition::Advanced { to, .. } => Some(*to),
            Transition::RoutedToClosure { .. } => Some(StepId::Closure),
            Transition::Closed | Transition::AlreadyClosed => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Advanced { from, to } => write!(
                f,
                "Sent from {} to {}",
                catalog::definition(*from).title,
                catalog::definition(*to).title
            ),
            Transition::RoutedToClosure { from } => write!(
                f,
                "Sent from {} to {}",
                catalog::definition(*from).title,
                catalog::definition(StepId::Closure).title
            ),
            Transition::Closed => f.write_str("Process closed"),
            Transition::AlreadyClosed => f.write_str("Process was already closed, nothing changed"),
        }
    }
}

/// Data template of a freshly opened process.
pub fn initial_data(now: Timestamp) -> ProcessData {
    let mut data: ProcessData = BLANK_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!("")))
        .collect();
    data.insert("urgencia".to_string(), json!("Médio"));
    data.insert("dataAbertura".to_string(), json!(now.to_string()));
    data
}

impl Process {
    /// Open a process at the catalog's first step, starting its timer.
    pub fn open(id: String, now: Timestamp) -> Self {
        let first = catalog::first();
        let mut steps_start = std::collections::BTreeMap::new();
        steps_start.insert(
            first.id,
            StepTiming {
                started_at: now,
                sla: first.sla,
            },
        );

        Self {
            id,
            created_at: now,
            data: initial_data(now),
            current_step_id: first.id,
            history: Vec::new(),
            steps_start,
            closed: false,
        }
    }

    /// Role expected to act on the current step.
    pub fn responsible_role(&self) -> Role {
        catalog::definition(self.current_step_id).responsible
    }

    /// Whether `role` may save or send this process.
    pub fn can_edit(&self, role: Role) -> bool {
        !self.closed && self.responsible_role() == role
    }

    /// Steps that currently apply to this process, in order.
    pub fn active_steps(&self) -> Vec<StepId> {
        activation::active_step_ids(&self.data)
    }

    /// Required fields of the current step that are still unanswered.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        catalog::missing_required_fields(self.current_step_id, &self.data)
    }

    /// Merge `partial` into the data (shallow overwrite) and record a
    /// "saved" entry. The current step and timings are untouched.
    pub fn save_draft(&mut self, partial: ProcessData, now: Timestamp) {
        self.data.extend(partial);
        let entry = self.entry(HistoryAction::Saved, now, None);
        self.history.insert(0, entry);
    }

    /// Record a "sent" entry and move to the next active step, to closure,
    /// or close the process.
    ///
    /// A closed process is left untouched and reports
    /// [`Transition::AlreadyClosed`].
    pub fn send_to_next(&mut self, notes: Option<String>, now: Timestamp) -> Transition {
        if self.closed {
            return Transition::AlreadyClosed;
        }

        let entry = self.entry(HistoryAction::Sent, now, notes);
        self.history.insert(0, entry);

        let from = self.current_step_id;
        match activation::next_step_id(from, &self.data) {
            Some(next) => {
                self.enter(next, now);
                Transition::Advanced { from, to: next }
            }
            None if from != StepId::Closure => {
                self.enter(StepId::Closure, now);
                Transition::RoutedToClosure { from }
            }
            None => {
                self.closed = true;
                Transition::Closed
            }
        }
    }

    fn enter(&mut self, step: StepId, now: Timestamp) {
        self.current_step_id = step;
        self.steps_start.insert(
            step,
            StepTiming {
                started_at: now,
                sla: catalog::definition(step).sla,
            },
        );
    }

    fn entry(&self, action: HistoryAction, now: Timestamp, notes: Option<String>) -> HistoryEntry {
        HistoryEntry {
            step_id: self.current_step_id,
            responsible: self.responsible_role(),
            timestamp: now,
            action,
            data_snapshot: self.data.clone(),
            notes,
        }
    }
}

/// Whether `role` may save or send `process`.
pub fn can_edit(process: &Process, role: Role) -> bool {
    process.can_edit(role)
}
