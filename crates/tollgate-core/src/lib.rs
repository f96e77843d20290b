//! Core library for the Tollgate approval workflow.
//!
//! A process moves through a fixed catalog of steps. Each step is owned by a
//! single role, carries an SLA, and may apply only when earlier answers say
//! so. This crate holds the catalog, the activation rules, the SLA clock, the
//! state machine and the persisted process store.
//!
//! # Layers
//!
//! - [`catalog`] and [`activation`]: static step definitions and the rules
//!   deciding which of them apply
//! - [`sla`]: deadline tiers and periodic re-evaluation
//! - [`machine`]: pure transitions on a [`models::Process`]
//! - [`workflow`]: the [`ProcessStore`] every interface talks to, persisted
//!   through [`db`]
//! - [`display`] and [`export`]: markdown and CSV output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use tollgate_core::{
//!     ProcessStoreBuilder,
//!     params::{SaveDraft, SendToNext},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ProcessStoreBuilder::new()
//!     .with_database_path(Some("workflow.db"))
//!     .build()
//!     .await?;
//!
//! let process = store.create_process();
//! let mut data = tollgate_core::models::ProcessData::new();
//! data.insert("itemNacional".to_string(), json!(false));
//! store.save_draft(&SaveDraft {
//!     id: process.id.clone(),
//!     data,
//! })?;
//!
//! let transition = store.send_to_next(&SendToNext {
//!     id: process.id,
//!     notes: None,
//! })?;
//! println!("{transition}");
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod catalog;
pub mod db;
pub mod display;
pub mod error;
pub mod export;
pub mod machine;
pub mod models;
pub mod params;
pub mod sla;
pub mod workflow;

// Re-export commonly used types
pub use catalog::StepDefinition;
pub use db::Database;
pub use display::{
    CreateResult, History, OperationStatus, ProcessSummaries, StepPreview, TransitionResult,
    UpdateResult,
};
pub use error::{Result, WorkflowError};
pub use machine::Transition;
pub use models::{
    HistoryAction, HistoryEntry, Process, ProcessData, ProcessFilter, ProcessSummary, Role,
    SlaDuration, StatusFilter, StepId, StepTiming, WorkflowStats,
};
pub use sla::{SlaStatus, SlaTier, SlaWatch};
pub use workflow::{ProcessStore, ProcessStoreBuilder, WorkflowSnapshot};
