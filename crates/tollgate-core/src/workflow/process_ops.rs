//! Process operations for the ProcessStore.

use jiff::{tz::TimeZone, Timestamp};
use log::info;

use super::ProcessStore;
use crate::{
    catalog,
    error::{Result, WorkflowError},
    machine::Transition,
    models::Process,
    params::{Id, SaveDraft, SendToNext},
};

impl ProcessStore {
    /// Creates a new process at the first catalog step and stores it ahead
    /// of the existing ones.
    ///
    /// The id has the form `<PREFIX>-<YYMMDD>-<NNN>` where the sequence is
    /// one more than the number of stored processes, bumped until unique.
    pub fn create_process(&mut self) -> Process {
        self.create_process_at(Timestamp::now())
    }

    pub(crate) fn create_process_at(&mut self, now: Timestamp) -> Process {
        let id = self.next_id(now);
        let process = Process::open(id, now);
        info!("Created process {}", process.id);

        self.state.processes.insert(0, process.clone());
        self.persist();
        process
    }

    /// Retrieves a process by its id.
    pub fn get_process(&self, params: &Id) -> Option<&Process> {
        self.state.processes.iter().find(|p| p.id == params.id)
    }

    /// Retrieves a process by its id, failing when it does not exist.
    pub fn require_process(&self, params: &Id) -> Result<&Process> {
        self.get_process(params)
            .ok_or_else(|| WorkflowError::process_not_found(&params.id))
    }

    /// Merges the given fields into the process data and records a "saved"
    /// history entry. No role check and no validation is applied here.
    pub fn save_draft(&mut self, params: &SaveDraft) -> Result<Process> {
        self.save_draft_at(params, Timestamp::now())
    }

    pub(crate) fn save_draft_at(&mut self, params: &SaveDraft, now: Timestamp) -> Result<Process> {
        let process = self.process_mut(&params.id)?;
        process.save_draft(params.data.clone(), now);
        let saved = process.clone();

        self.persist();
        Ok(saved)
    }

    /// Records a "sent" history entry and advances the process.
    ///
    /// Sending a closed process is a no-op reported as
    /// [`Transition::AlreadyClosed`]; nothing is written in that case.
    pub fn send_to_next(&mut self, params: &SendToNext) -> Result<Transition> {
        self.send_to_next_at(params, Timestamp::now())
    }

    pub(crate) fn send_to_next_at(
        &mut self,
        params: &SendToNext,
        now: Timestamp,
    ) -> Result<Transition> {
        let process = self.process_mut(&params.id)?;
        let transition = process.send_to_next(params.notes.clone(), now);
        if transition == Transition::AlreadyClosed {
            return Ok(transition);
        }

        info!("{}: {transition}", params.id);
        self.persist();
        Ok(transition)
    }

    /// Checks the required fields of the process' current step.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ValidationFailed` listing the unanswered
    /// fields, or `WorkflowError::ProcessNotFound`.
    pub fn validate_current_step(&self, params: &Id) -> Result<()> {
        let process = self.require_process(params)?;
        catalog::validate_step(process.current_step_id, &process.data)
    }

    fn process_mut(&mut self, id: &str) -> Result<&mut Process> {
        self.state
            .processes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| WorkflowError::process_not_found(id))
    }

    fn next_id(&self, now: Timestamp) -> String {
        let date = now.to_zoned(TimeZone::UTC).strftime("%y%m%d").to_string();
        let mut sequence = self.state.processes.len() + 1;
        loop {
            let id = format!("{}-{date}-{sequence:03}", self.id_prefix);
            if !self.state.processes.iter().any(|p| p.id == id) {
                return id;
            }
            sequence += 1;
        }
    }
}
