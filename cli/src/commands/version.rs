//! Version command

use anyhow::{Context, Result};

use crate::output::{HumanRenderer, OutputContext};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(ctx: &OutputContext, json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let obj = serde_json::json!({ "version": version });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
    } else {
        HumanRenderer::new(ctx).render_version(version);
    }
    Ok(())
}
