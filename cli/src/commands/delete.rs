//! `aci-agent delete`: remove an agent container and its pool registration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::OutputSink;
use crate::application::services::teardown::Teardown;
use crate::commands::{InputArgs, exit_code};
use crate::domain::TeardownResult;
use crate::infra::pipeline::{RecordingSink, VsoSink};
use crate::output::{HumanRenderer, TerminalReporter, json};

/// Arguments for the delete command.
#[derive(Args, Debug, Default)]
pub struct DeleteArgs {
    /// Container (and agent) name; overrides the `containerName` input
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Run `aci-agent delete`.
///
/// # Errors
///
/// Returns an error only if the JSON report cannot be serialized.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let result = if app.is_json() {
        let sink = RecordingSink::default();
        let result = teardown(app, &sink).await;
        println!("{}", json::format_teardown(&result, &sink.report().warnings)?);
        result
    } else {
        let result = teardown(app, &VsoSink::stdout()).await;
        HumanRenderer::new(&app.output).render_teardown(&result);
        result
    };
    Ok(exit_code(matches!(result, TeardownResult::Completed { .. })))
}

async fn teardown(app: &AppContext, sink: &impl OutputSink) -> TeardownResult {
    let reporter = TerminalReporter::new(&app.output);
    Teardown {
        cli: &app.cli,
        control_plane: &app.control_plane,
        inputs: &app.inputs,
        sink,
        reporter: &reporter,
    }
    .run()
    .await
}
