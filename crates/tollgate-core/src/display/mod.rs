//! Display formatting functions and result types.
//!
//! Domain models implement `Display` directly; collections and operation
//! outcomes get newtype wrappers. Everything renders markdown, which the CLI
//! styles for the terminal and the MCP server returns verbatim.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │ (Process, ...)  │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: ProcessSummaries, History, StepPreview
//! - [`results`]: CreateResult, UpdateResult, TransitionResult
//! - [`status`]: OperationStatus
//! - [`datetime`]: LocalDateTime
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage
//!
//! ```rust
//! use jiff::Timestamp;
//! use tollgate_core::{
//!     display::{CreateResult, OperationStatus},
//!     models::Process,
//! };
//!
//! let process = Process::open("REQ-250101-001".to_string(), Timestamp::now());
//! let output = CreateResult::new(process).to_string();
//! assert!(output.contains("Created process REQ-250101-001"));
//!
//! println!("{}", OperationStatus::success("Role set to fiscal"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{History, ProcessSummaries, StepPreview};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, TransitionResult, UpdateResult};
pub use status::OperationStatus;
