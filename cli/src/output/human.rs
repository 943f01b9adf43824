//! Human-readable terminal renderer.

use crate::domain::{ProvisionError, TeardownResult, WorkflowResult};
use crate::output::OutputContext;

/// Renders domain results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("aci-agent v{version}"));
    }

    /// Render the outcome of a provisioning run.
    pub fn render_provision(&self, result: &WorkflowResult) {
        match result {
            WorkflowResult::Succeeded {
                container_name,
                container_id,
            } => {
                if !self.ctx.quiet {
                    println!();
                }
                self.ctx.header("Agent container ready");
                self.ctx.kv("Name:", container_name);
                self.ctx.kv("Id:  ", container_id);
            }
            WorkflowResult::Failed(err) => self.render_error(err),
        }
    }

    /// Render the outcome of a teardown run.
    pub fn render_teardown(&self, result: &TeardownResult) {
        match result {
            TeardownResult::Completed {
                container_deleted,
                agent_deleted,
            } => {
                self.ctx.kv("Container deleted:", yes_no(*container_deleted));
                self.ctx.kv("Agent removed:    ", yes_no(*agent_deleted));
            }
            TeardownResult::Failed(err) => self.render_error(err),
        }
    }

    fn render_error(&self, err: &ProvisionError) {
        self.ctx.error(&format!("{err} [{}]", err.code()));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
