//! CLI argument parsing with clap derive

use std::process::ExitCode;

use aci_agent_common::inputs::CONTAINER_NAME;
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, InputFlags, OutputFlags};
use crate::commands::{self, InputArgs};
use crate::output::OutputContext;

/// Ephemeral Azure Container Instance build agents for Azure DevOps pools
#[derive(Parser, Debug)]
#[command(
    name = "aci-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Emit debug logs on stderr (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an agent container and wait for it to join the pool
    Create(commands::create::CreateArgs),

    /// Delete an agent container and its pool registration
    Delete(commands::delete::DeleteArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs file cannot be loaded or the JSON
    /// report cannot be written. Workflow failures map to the exit status.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
            ..
        } = self;
        let output = OutputFlags {
            no_color,
            quiet,
            json,
        };
        match command {
            Command::Version => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::version::run(&ctx, json)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Create(args) => {
                let app = AppContext::new(AppFlags {
                    output,
                    inputs: input_flags(args.inputs, None),
                })?;
                commands::create::run(&app).await
            }
            Command::Delete(args) => {
                let app = AppContext::new(AppFlags {
                    output,
                    inputs: input_flags(args.inputs, args.name),
                })?;
                commands::delete::run(&app).await
            }
        }
    }
}

fn input_flags(args: InputArgs, container_name: Option<String>) -> InputFlags {
    let mut overrides = args.inputs;
    if let Some(name) = container_name {
        overrides.push((CONTAINER_NAME.to_string(), name));
    }
    InputFlags {
        overrides,
        file: args.inputs_file,
    }
}
