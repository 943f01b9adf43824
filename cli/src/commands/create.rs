//! `aci-agent create`: provision an agent container and wait for it to come online.

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::OutputSink;
use crate::application::services::provision::Provisioner;
use crate::commands::{InputArgs, exit_code};
use crate::domain::WorkflowResult;
use crate::infra::pipeline::{RecordingSink, VsoSink};
use crate::output::{HumanRenderer, TerminalReporter, json};

/// Arguments for the create command.
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Run `aci-agent create`.
///
/// # Errors
///
/// Returns an error only if the JSON report cannot be serialized; workflow
/// failures are reported through the sink and the exit status.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let result = if app.is_json() {
        let sink = RecordingSink::default();
        let result = provision(app, &sink).await;
        println!("{}", json::format_provision(&result, &sink.report().warnings)?);
        result
    } else {
        let result = provision(app, &VsoSink::stdout()).await;
        HumanRenderer::new(&app.output).render_provision(&result);
        result
    };
    Ok(exit_code(result.is_success()))
}

async fn provision(app: &AppContext, sink: &impl OutputSink) -> WorkflowResult {
    let reporter = TerminalReporter::new(&app.output);
    Provisioner {
        cli: &app.cli,
        control_plane: &app.control_plane,
        inputs: &app.inputs,
        sink,
        reporter: &reporter,
    }
    .run(Utc::now())
    .await
}
