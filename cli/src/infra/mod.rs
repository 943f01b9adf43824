//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the `az`
//! CLI adapter, the Azure DevOps REST client, input loading, and pipeline
//! logging commands.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod az_cli;
pub mod command_runner;
pub mod devops;
pub mod inputs;
pub mod pipeline;
