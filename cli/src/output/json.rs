//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object on
//! stdout: a result object on success, or the error object on failure. Run
//! reports carry the warnings raised along the way.

use anyhow::{Context, Result};

use crate::domain::{ProvisionError, TeardownResult, WorkflowResult};

/// Format the outcome of a provisioning run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_provision(result: &WorkflowResult, warnings: &[String]) -> Result<String> {
    match result {
        WorkflowResult::Succeeded {
            container_name,
            container_id,
        } => {
            let obj = serde_json::json!({
                "status": "succeeded",
                "container_name": container_name,
                "container_id": container_id,
                "warnings": warnings,
            });
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")
        }
        WorkflowResult::Failed(err) => format_failure(err, warnings),
    }
}

/// Format the outcome of a teardown run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_teardown(result: &TeardownResult, warnings: &[String]) -> Result<String> {
    match result {
        TeardownResult::Completed {
            container_deleted,
            agent_deleted,
        } => {
            let obj = serde_json::json!({
                "status": "completed",
                "container_deleted": container_deleted,
                "agent_deleted": agent_deleted,
                "warnings": warnings,
            });
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")
        }
        TeardownResult::Failed(err) => format_failure(err, warnings),
    }
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "...",
///   "warnings": []
/// }
/// ```
fn format_failure(err: &ProvisionError, warnings: &[String]) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": err.to_string(),
        "code": err.code(),
        "warnings": warnings,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
