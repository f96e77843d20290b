//! Result wrapper types for displaying operation outcomes.
//!
//! These wrap the process touched by a create, save or send so every
//! interface reports outcomes the same way.

use std::fmt;

use crate::{machine::Transition, models::Process};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use tollgate_core::{display::CreateResult, models::Process};
///
/// let process = Process::open("REQ-250101-001".to_string(), Timestamp::now());
/// let result = CreateResult::new(process);
/// assert!(result.to_string().starts_with("Created process REQ-250101-001"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Process> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created process {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of a draft save, listing the
/// fields that were written.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Process> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved draft of process {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Fields written:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the outcome of a send.
pub struct TransitionResult<T> {
    pub resource: T,
    pub transition: Transition,
}

impl<T> TransitionResult<T> {
    pub fn new(resource: T, transition: Transition) -> Self {
        Self {
            resource,
            transition,
        }
    }
}

impl fmt::Display for TransitionResult<Process> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.resource.id, self.transition)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}
