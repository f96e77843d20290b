//! Data models for processes, steps and their audit trail.
//!
//! This module contains the core domain models of the approval workflow.
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures and presentation stay
//! apart.
//!
//! # Overview
//!
//! - [`Process`]: the record moving through the workflow, with its data bag,
//!   current step, timings and history
//! - [`HistoryEntry`]: append-only audit record of a save or send
//! - [`StepId`] / [`SlaDuration`]: identifiers and budgets used by the
//!   [`crate::catalog`]
//! - [`Role`]: the roles owning steps
//! - [`ProcessFilter`] / [`ProcessSummary`] / [`WorkflowStats`]: query
//!   helpers for lists and dashboards
//!
//! # Examples
//!
//! ```rust
//! use tollgate_core::models::{Process, StepId};
//! use jiff::Timestamp;
//!
//! let process = Process::open("REQ-250101-001".to_string(), Timestamp::UNIX_EPOCH);
//! assert_eq!(process.current_step_id, StepId::Primary);
//! assert!(!process.closed);
//! assert!(process.history.is_empty());
//! ```

pub mod filters;
pub mod history;
pub mod process;
pub mod role;
pub mod step;
pub mod summary;

#[cfg(test)]
mod tests;

pub use filters::{ProcessFilter, StatusFilter};
pub use history::{HistoryAction, HistoryEntry};
pub use process::{Process, ProcessData, StepTiming};
pub use role::Role;
pub use step::{SlaDuration, StepId};
pub use summary::{ProcessSummary, WorkflowStats};
