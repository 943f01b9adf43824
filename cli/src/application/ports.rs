//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared wire types,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use aci_agent_common::types::{TaskAgent, TaskAgentPool};
use anyhow::Result;

use crate::domain::container::ContainerSpec;
use crate::domain::{Credentials, Secret};

// ── Input Port ────────────────────────────────────────────────────────────────

/// Read-only access to task inputs, pipeline variables and service-connection
/// endpoints. Lookups are case-insensitive; blank values count as absent.
pub trait InputSource {
    /// A named task input, e.g. `agentPool`.
    fn input(&self, name: &str) -> Option<String>;
    /// A pipeline variable, e.g. `Build.BuildId`.
    fn variable(&self, name: &str) -> Option<String>;
    /// Authorization scheme of a service connection.
    fn endpoint_scheme(&self, endpoint: &str) -> Option<String>;
    /// An authorization parameter of a service connection.
    fn endpoint_auth(&self, endpoint: &str, key: &str) -> Option<String>;
    /// A data parameter of a service connection.
    fn endpoint_data(&self, endpoint: &str, key: &str) -> Option<String>;
}

// ── Cloud Port Traits ─────────────────────────────────────────────────────────

/// Provider session verbs that bracket every other provider call.
#[allow(async_fn_in_trait)]
pub trait CloudSession {
    /// Report the provider CLI version; used as a prerequisite check.
    async fn version(&self) -> Result<Output>;
    /// Route all subsequent invocations to a run-private credential store.
    ///
    /// # Errors
    ///
    /// Returns an error if a different store was already selected.
    fn use_config_dir(&self, dir: &Path) -> Result<()>;
    /// Select the sovereign cloud. Must precede `login`.
    async fn set_cloud(&self, name: &str) -> Result<Output>;
    /// Log in with the resolved credentials.
    async fn login(&self, credentials: &Credentials, tenant_id: Option<&str>) -> Result<Output>;
    /// Make `subscription_id` the active subscription.
    async fn set_subscription(&self, subscription_id: &str) -> Result<Output>;
    /// Clear all cached accounts.
    async fn logout(&self) -> Result<Output>;
}

/// Container instance operations.
#[allow(async_fn_in_trait)]
pub trait ContainerService {
    /// Create a container group; stdout carries the JSON descriptor.
    async fn create(&self, spec: &ContainerSpec<'_>) -> Result<Output>;
    /// Delete a container group without prompting.
    async fn delete(&self, name: &str, resource_group: &str) -> Result<Output>;
    /// Look up a subnet; stdout carries the JSON descriptor.
    async fn subnet_show(&self, resource_group: &str, vnet: &str, subnet: &str)
    -> Result<Output>;
}

/// Composite trait: any type implementing both sub-traits is a `CloudCli`.
pub trait CloudCli: CloudSession + ContainerService {}

/// Blanket implementation: any type implementing both sub-traits is a `CloudCli`.
impl<T> CloudCli for T where T: CloudSession + ContainerService {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with extra environment variables and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Control Plane Ports ───────────────────────────────────────────────────────

/// Typed RPC surface of the pool-membership API.
#[allow(async_fn_in_trait)]
pub trait PoolClient {
    /// List pools whose name matches `name`.
    async fn list_pools(&self, name: &str) -> Result<Vec<TaskAgentPool>>;
    /// List agents in `pool_id` whose name matches `agent_name`.
    async fn list_agents(&self, pool_id: i64, agent_name: &str) -> Result<Vec<TaskAgent>>;
    /// Remove an agent registration.
    async fn delete_agent(&self, pool_id: i64, agent_id: i64) -> Result<()>;
}

/// Opens a [`PoolClient`] once the organization and token are known.
pub trait ControlPlane {
    type Client: PoolClient;

    /// # Errors
    ///
    /// Returns an error if the collection URI is not a valid base URL.
    fn connect(&self, collection_uri: &str, token: &Secret) -> Result<Self::Client>;
}

// ── Reporting Ports ───────────────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Publishes the run's named outputs, its warnings and its single terminal
/// status.
pub trait OutputSink {
    /// Publish a named output value for downstream steps.
    fn set_output(&self, name: &str, value: &str);
    /// Surface a non-fatal issue in the run summary.
    fn warn(&self, message: &str);
    /// Publish the terminal status and its one consolidated message.
    fn complete(&self, succeeded: bool, message: &str);
}
