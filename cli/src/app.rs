//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is the composition root: it wires the production adapters
//! (`AzCli`, `DevOps`, `LayeredInputs`) and the terminal output context once,
//! so command handlers only choose a sink and call a use-case.

use std::path::PathBuf;

use anyhow::Result;

use crate::infra::az_cli::AzCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::devops::DevOps;
use crate::infra::inputs::LayeredInputs;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output plus pipeline logging commands (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Where task inputs come from besides the pipeline environment.
#[derive(Default)]
pub struct InputFlags {
    /// `--input NAME=VALUE` overrides, in command-line order.
    pub overrides: Vec<(String, String)>,
    /// Explicit inputs file.
    pub file: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Input layering options.
    pub inputs: InputFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Azure CLI adapter.
    pub cli: AzCli<TokioCommandRunner>,
    /// Azure DevOps control plane.
    pub control_plane: DevOps,
    /// Layered task inputs.
    pub inputs: LayeredInputs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// JSON mode silences progress output so stdout carries a single object.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named inputs file cannot be loaded.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let inputs = LayeredInputs::load(flags.inputs.overrides, flags.inputs.file.as_deref())?;

        Ok(Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            cli: AzCli::new(TokioCommandRunner::default()),
            control_plane: DevOps,
            inputs,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}
