//! Command implementations

pub mod create;
pub mod delete;
pub mod version;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;

/// Input layering flags shared by `create` and `delete`.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// Override a task input, e.g. `--input agentPool=linux-aci` (repeatable)
    #[arg(long = "input", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub inputs: Vec<(String, String)>,

    /// YAML file with inputs, variables and service connections
    #[arg(long, value_name = "PATH", env = "ACI_AGENT_INPUTS")]
    pub inputs_file: Option<PathBuf>,
}

/// Parse a `NAME=VALUE` pair; the value may itself contain `=`.
///
/// # Errors
///
/// Returns an error if there is no `=` or the name is empty.
pub fn parse_key_val(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got '{raw}'");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("input name must not be empty in '{raw}'");
    }
    Ok((name.to_string(), value.to_string()))
}

/// Map a run's success flag to the process exit status.
#[must_use]
pub fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
