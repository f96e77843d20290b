//! Read-only queries for the ProcessStore.

use jiff::Timestamp;

use super::ProcessStore;
use crate::{
    display::ProcessSummaries,
    models::{Process, ProcessFilter, ProcessSummary, WorkflowStats},
    params::ListProcesses,
    sla::{self, SlaTier},
};

impl ProcessStore {
    /// All processes, newest first.
    pub fn processes(&self) -> &[Process] {
        &self.state.processes
    }

    /// Processes passing the filter, in store order.
    pub fn list_processes(&self, params: &ListProcesses) -> Vec<&Process> {
        let filter = ProcessFilter::from(params);
        self.state
            .processes
            .iter()
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Handle listing processes as summaries with their SLA evaluated now.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use tollgate_core::{params::ListProcesses, ProcessStoreBuilder};
    /// # async {
    /// let store = ProcessStoreBuilder::new().build().await?;
    /// let summaries = store.list_summaries(&ListProcesses::default());
    /// println!("{summaries}");
    /// # Result::<(), tollgate_core::WorkflowError>::Ok(())
    /// # };
    /// ```
    pub fn list_summaries(&self, params: &ListProcesses) -> ProcessSummaries {
        let now = Timestamp::now();
        ProcessSummaries(
            self.list_processes(params)
                .into_iter()
                .map(|p| ProcessSummary::at(p, now))
                .collect(),
        )
    }

    /// Dashboard counters, with overdue steps evaluated now.
    pub fn stats(&self) -> WorkflowStats {
        self.stats_at(Timestamp::now())
    }

    pub(crate) fn stats_at(&self, now: Timestamp) -> WorkflowStats {
        let processes = &self.state.processes;
        let pending = processes.iter().filter(|p| !p.closed).count();

        WorkflowStats {
            total: processes.len(),
            pending,
            completed: processes.len() - pending,
            my_tasks: self.my_tasks().len(),
            overdue: processes
                .iter()
                .filter(|p| !p.closed)
                .filter(|p| sla::status_for(p.current_timing(), now).tier == SlaTier::Overdue)
                .count(),
        }
    }
}
