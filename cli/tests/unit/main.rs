//! Unit test harness for aci-agent-cli.
//!
//! Tests here drive the application services against in-process mocks and
//! never spawn `az` or touch the network.

mod architecture;
mod provision_workflow;
mod teardown_workflow;
