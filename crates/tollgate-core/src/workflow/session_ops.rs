//! Session operations: the role acting on this store.

use log::info;

use super::ProcessStore;
use crate::{
    error::{Result, WorkflowError},
    models::{Process, Role},
    params::{Id, SelectRole},
};

impl ProcessStore {
    /// Sets the role for this session and persists the choice.
    pub fn select_role(&mut self, params: &SelectRole) {
        info!("Selected role {}", params.role);
        self.state.current_role = Some(params.role);
        self.persist();
    }

    /// Forgets the selected role.
    pub fn clear_role(&mut self) {
        self.state.current_role = None;
        self.persist();
    }

    pub fn current_role(&self) -> Option<Role> {
        self.state.current_role
    }

    /// Open processes whose current step belongs to the selected role, in
    /// store order. Empty when no role is selected.
    pub fn my_tasks(&self) -> Vec<&Process> {
        let Some(role) = self.state.current_role else {
            return Vec::new();
        };

        self.state
            .processes
            .iter()
            .filter(|p| p.can_edit(role))
            .collect()
    }

    /// Whether the selected role may edit `process`.
    pub fn can_edit(&self, process: &Process) -> bool {
        self.state
            .current_role
            .is_some_and(|role| process.can_edit(role))
    }

    /// The process, if the selected role may save or send it.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotEditable` when the process is closed, no
    /// role is selected, or another role owns the current step.
    pub fn ensure_editable(&self, params: &Id) -> Result<&Process> {
        let process = self.require_process(params)?;
        let owner = process.responsible_role();

        let reason = if process.closed {
            Some("the process is closed".to_string())
        } else {
            match self.state.current_role {
                None => Some(format!("no role selected, the current step belongs to {owner}")),
                Some(role) if role != owner => {
                    Some(format!("the current step belongs to {owner}, acting as {role}"))
                }
                Some(_) => None,
            }
        };

        match reason {
            Some(reason) => Err(WorkflowError::NotEditable {
                id: process.id.clone(),
                reason,
            }),
            None => Ok(process),
        }
    }
}
