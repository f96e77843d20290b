//! Error handling utilities for MCP server

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData,
};
use tollgate_core::WorkflowError;

/// Convert a workflow error into a protocol-level MCP error.
pub fn to_mcp_error(message: &str, error: &WorkflowError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Recoverable failures (unknown id, missing fields, wrong role) are
/// reported to the client as a failed tool call it can act on; anything
/// else aborts the request.
pub fn to_tool_result(message: &str, error: WorkflowError) -> Result<CallToolResult, ErrorData> {
    if error.is_recoverable() {
        Ok(CallToolResult::error(vec![Content::text(format!(
            "{message}: {error}"
        ))]))
    } else {
        Err(to_mcp_error(message, &error))
    }
}
