//! Parameter structures for workflow operations
//!
//! These structures are shared by every interface (CLI, MCP, ...) without
//! framework-specific derives. Interface layers wrap or convert them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema derives are only compiled with the `schema` feature, which the
//! MCP server enables.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{ProcessData, Role, StatusFilter};

/// Generic parameters for operations addressing a single process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// Process identifier, e.g. `REQ-250114-003`
    pub id: String,
}

/// Parameters for saving a draft of the current step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SaveDraft {
    /// Process identifier
    pub id: String,
    /// Fields to merge into the process data (shallow overwrite)
    #[serde(default)]
    pub data: ProcessData,
}

/// Parameters for sending the current step to the next one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SendToNext {
    /// Process identifier
    pub id: String,
    /// Optional remarks for the next responsible role
    pub notes: Option<String>,
}

/// Parameters for listing processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListProcesses {
    /// all, pending or completed
    #[serde(default)]
    pub status: StatusFilter,
    /// Text matched against id, requester name and objective
    pub search: Option<String>,
    /// Only processes currently waiting on this role
    pub responsible: Option<Role>,
}

/// Parameters for selecting the session role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SelectRole {
    pub role: Role,
}

/// Parameters for previewing which steps apply to a set of answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PreviewSteps {
    /// Answers to evaluate activation against
    #[serde(default)]
    pub data: ProcessData,
}
