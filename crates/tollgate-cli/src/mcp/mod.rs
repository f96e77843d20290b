//! MCP server implementation for Tollgate
//!
//! Exposes the approval workflow over the Model Context Protocol so an
//! assistant can act as one of the workflow roles: create requests, fill in
//! the current step and send it on.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use tollgate_core::ProcessStore;

pub mod errors;
pub mod handlers;

pub use handlers::{Id, ListProcesses, McpResult, PreviewSteps, SaveDraft, SelectRole, SendToNext};

/// MCP server for Tollgate
#[derive(Clone)]
pub struct TollgateMcpServer {
    store: Arc<Mutex<ProcessStore>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TollgateMcpServer {
    /// Create a new Tollgate MCP server
    pub fn new(store: ProcessStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.store.clone())
    }

    #[tool(
        name = "create_process",
        description = "Open a new approval request. It starts at the 'Solicitante Primário' step, owned by primary_requester, with a fresh SLA clock. Returns the generated process id (e.g. REQ-250114-003)."
    )]
    async fn create_process(&self) -> McpResult {
        self.handlers().create_process().await
    }

    #[tool(
        name = "show_process",
        description = "Show one process: current step and responsible role, SLA status of the current step, the collected data, the fields still missing and the full history (oldest first)."
    )]
    async fn show_process(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_process(params).await
    }

    #[tool(
        name = "list_processes",
        description = "List processes newest first. Filter with status ('all', 'pending' or 'completed'), search (matches id, requester name and objective, case-insensitive) and responsible (role owning the current step)."
    )]
    async fn list_processes(&self, params: Parameters<ListProcesses>) -> McpResult {
        self.handlers().list_processes(params).await
    }

    #[tool(
        name = "my_tasks",
        description = "List the open processes waiting on the role selected with select_role."
    )]
    async fn my_tasks(&self) -> McpResult {
        self.handlers().my_tasks().await
    }

    #[tool(
        name = "save_draft",
        description = "Merge fields into a process's data without advancing it. Keys are overwritten one by one; other keys are kept. Only the role owning the current step may save, so call select_role first."
    )]
    async fn save_draft(&self, params: Parameters<SaveDraft>) -> McpResult {
        self.handlers().save_draft(params).await
    }

    #[tool(
        name = "send_to_next",
        description = "Complete the current step and move the process to the next applicable step. Fails listing the missing fields when the step's required answers are absent. Sending from 'Conclusão' closes the process. Optional notes are recorded in the history."
    )]
    async fn send_to_next(&self, params: Parameters<SendToNext>) -> McpResult {
        self.handlers().send_to_next(params).await
    }

    #[tool(
        name = "sla_status",
        description = "Report the SLA of a process's current step: budget, remaining or overdue time and tier (on track, critical, overdue, undetermined)."
    )]
    async fn sla_status(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().sla_status(params).await
    }

    #[tool(
        name = "select_role",
        description = "Act as a workflow role: primary_requester, services_specialist, fiscal, regulatory, requester, finance, costs, supply or tax_systems. The choice is remembered across sessions."
    )]
    async fn select_role(&self, params: Parameters<SelectRole>) -> McpResult {
        self.handlers().select_role(params).await
    }

    #[tool(
        name = "list_steps",
        description = "List the step catalog with responsible roles and SLAs, marking which steps apply to the given data (conditional steps depend on itemNacional, tipoCadastro and requerParametrizacao)."
    )]
    async fn list_steps(&self, params: Parameters<PreviewSteps>) -> McpResult {
        self.handlers().list_steps(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TollgateMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tollgate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Tollgate runs a role-gated approval workflow for new material requests. Each request (process) moves through a fixed catalog of steps; every step is owned by one role and has an SLA.

## Core Concepts
- **Process**: a request with an id like REQ-250114-003, its collected data and its history
- **Step**: one stage of the catalog; conditional steps are skipped depending on the answers
- **Role**: who may act on a step; select one with `select_role` before saving or sending

## Typical Flow
1. `select_role` with role=primary_requester
2. `create_process`, then `save_draft` with nomeSolicitante, objetivo, descricao, itemNacional and urgencia
3. `send_to_next` to hand the process to the next applicable step
4. Switch roles with `select_role` and use `my_tasks` to find work waiting on that role

## Tool Categories
- **Processes**: create_process, show_process, list_processes, save_draft, send_to_next
- **Session**: select_role, my_tasks
- **Catalog and SLA**: list_steps, sla_status"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: TollgateMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Tollgate MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let store = server.store.clone();
    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    let mut store = store.lock().await;
    if store.is_dirty() {
        store.flush()?;
    }

    info!("MCP server shutdown complete");
    Ok(())
}
