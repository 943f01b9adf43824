//! aci-agent - Ephemeral Azure Container Instance build agents

use std::process::ExitCode;

use aci_agent_cli::cli::Cli;
use aci_agent_cli::logging;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
