//! MCP tool handlers implementation

use std::sync::Arc;

use jiff::Timestamp;
use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use tollgate_core::{
    catalog,
    display::{
        CreateResult, OperationStatus, ProcessSummaries, StepPreview, TransitionResult,
        UpdateResult,
    },
    models::ProcessSummary,
    params as core, sla, ProcessStore,
};

use super::errors::{to_mcp_error, to_tool_result};

// ============================================================================
// Generic Parameter Wrapper Implementation
// ============================================================================
//
// The transparent wrapper adds the MCP-side derives around a core parameter
// type; serde passes straight through to the wrapped value.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type Id = McpParams<core::Id>;
pub type ListProcesses = McpParams<core::ListProcesses>;
pub type SaveDraft = McpParams<core::SaveDraft>;
pub type SendToNext = McpParams<core::SendToNext>;
pub type SelectRole = McpParams<core::SelectRole>;
pub type PreviewSteps = McpParams<core::PreviewSteps>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    store: Arc<Mutex<ProcessStore>>,
}

impl McpHandlers {
    pub fn new(store: Arc<Mutex<ProcessStore>>) -> Self {
        Self { store }
    }

    pub async fn create_process(&self) -> McpResult {
        debug!("create_process");

        let process = self.store.lock().await.create_process();
        text(CreateResult::new(process))
    }

    pub async fn show_process(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_process: {params:?}");

        let store = self.store.lock().await;
        match store.require_process(params.as_ref()) {
            Ok(process) => text(process),
            Err(e) => to_tool_result("Failed to show process", e),
        }
    }

    pub async fn list_processes(&self, Parameters(params): Parameters<ListProcesses>) -> McpResult {
        debug!("list_processes: {params:?}");

        let summaries = self.store.lock().await.list_summaries(params.as_ref());
        text(format!("# Processes\n\n{summaries}"))
    }

    pub async fn my_tasks(&self) -> McpResult {
        debug!("my_tasks");

        let store = self.store.lock().await;
        let Some(role) = store.current_role() else {
            return text(OperationStatus::failure(
                "No role selected. Call select_role first.",
            ));
        };

        let now = Timestamp::now();
        let summaries = ProcessSummaries(
            store
                .my_tasks()
                .into_iter()
                .map(|p| ProcessSummary::at(p, now))
                .collect(),
        );
        text(format!("# Waiting on {}\n\n{summaries}", role.title()))
    }

    pub async fn save_draft(&self, Parameters(params): Parameters<SaveDraft>) -> McpResult {
        debug!("save_draft: {params:?}");

        let params = params.as_ref();
        let mut store = self.store.lock().await;
        let id = core::Id {
            id: params.id.clone(),
        };
        if let Err(e) = store.ensure_editable(&id) {
            return to_tool_result("Refused to save", e);
        }

        let process = store
            .save_draft(params)
            .map_err(|e| to_mcp_error("Failed to save draft", &e))?;
        let changes = params.data.keys().cloned().collect();
        text(UpdateResult::with_changes(process, changes))
    }

    pub async fn send_to_next(&self, Parameters(params): Parameters<SendToNext>) -> McpResult {
        debug!("send_to_next: {params:?}");

        let params = params.as_ref();
        let mut store = self.store.lock().await;
        let id = core::Id {
            id: params.id.clone(),
        };
        let checked = store
            .ensure_editable(&id)
            .map(|_| ())
            .and_then(|()| store.validate_current_step(&id));
        if let Err(e) = checked {
            return to_tool_result("Refused to send", e);
        }

        let transition = store
            .send_to_next(params)
            .map_err(|e| to_mcp_error("Failed to send", &e))?;
        let process = store
            .require_process(&id)
            .map_err(|e| to_mcp_error("Failed to reload process", &e))?
            .clone();
        text(TransitionResult::new(process, transition))
    }

    pub async fn sla_status(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("sla_status: {params:?}");

        let store = self.store.lock().await;
        let process = match store.require_process(params.as_ref()) {
            Ok(process) => process,
            Err(e) => return to_tool_result("Failed to read SLA", e),
        };

        let step = catalog::definition(process.current_step_id);
        let status = if process.closed {
            sla::SlaStatus::undetermined()
        } else {
            sla::status_for(process.current_timing(), Timestamp::now())
        };
        text(format!(
            "# SLA of {}\n\n- Step: {} ({})\n- Budget: {}\n- Status: {status}\n",
            process.id, step.title, step.id, step.sla
        ))
    }

    pub async fn select_role(&self, Parameters(params): Parameters<SelectRole>) -> McpResult {
        debug!("select_role: {params:?}");

        let role = params.as_ref().role;
        self.store.lock().await.select_role(params.as_ref());
        text(OperationStatus::success(format!(
            "Acting as {} ({role})",
            role.title()
        )))
    }

    pub async fn list_steps(&self, Parameters(params): Parameters<PreviewSteps>) -> McpResult {
        debug!("list_steps: {params:?}");

        let preview = StepPreview::for_data(&params.as_ref().data);
        text(format!("# Steps\n\n{preview}"))
    }
}
