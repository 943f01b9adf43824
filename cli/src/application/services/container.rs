//! Application service: container instance create/delete.

use anyhow::Context;
use serde::Deserialize;

use crate::application::ports::{ContainerService, ProgressReporter};
use crate::application::services::session::ensure_success;
use crate::domain::ProvisionError;
use crate::domain::container::ContainerSpec;
use crate::domain::request::NetworkRef;

/// A container the run created and owns until it is deleted or handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub name: String,
    /// Provider-assigned resource id.
    pub id: String,
}

#[derive(Deserialize)]
struct ResourceId {
    id: String,
}

/// Look up the full resource id of a subnet.
///
/// # Errors
///
/// Returns `ProvisionError::Provisioning` if the lookup fails or the reply
/// carries no id.
pub async fn resolve_subnet_id(
    cli: &impl ContainerService,
    network: &NetworkRef,
) -> Result<String, ProvisionError> {
    let output = cli
        .subnet_show(&network.resource_group, &network.vnet, &network.subnet)
        .await
        .map_err(|e| ProvisionError::Provisioning(format!("{e:#}")))?;
    ensure_success(&output, "az network vnet subnet show").map_err(ProvisionError::Provisioning)?;
    let id = parse_id(&output.stdout, "subnet")?;
    tracing::debug!(subnet = %id, "resolved subnet");
    Ok(id)
}

/// Create the container instance.
///
/// # Errors
///
/// Returns `ProvisionError::Provisioning` with the exit code and stderr when
/// the create call fails.
pub async fn create_container(
    cli: &impl ContainerService,
    spec: &ContainerSpec<'_>,
) -> Result<ContainerHandle, ProvisionError> {
    let output = cli
        .create(spec)
        .await
        .map_err(|e| ProvisionError::Provisioning(format!("{e:#}")))?;
    ensure_success(&output, "az container create").map_err(ProvisionError::Provisioning)?;
    let id = parse_id(&output.stdout, "container")?;
    tracing::debug!(name = spec.name, %id, "container created");
    Ok(ContainerHandle {
        name: spec.name.to_string(),
        id,
    })
}

/// Delete a container instance. Failures are reported as warnings.
///
/// Returns whether the delete call succeeded.
pub async fn delete_container(
    cli: &impl ContainerService,
    name: &str,
    resource_group: &str,
    reporter: &impl ProgressReporter,
) -> bool {
    reporter.step(&format!("deleting container {name}..."));
    let result = cli
        .delete(name, resource_group)
        .await
        .map_err(|e| format!("{e:#}"))
        .and_then(|output| ensure_success(&output, "az container delete"));
    match result {
        Ok(()) => {
            tracing::debug!(name, "container deleted");
            reporter.success(&format!("container {name} deleted"));
            true
        }
        Err(message) => {
            tracing::warn!(name, %message, "container delete failed");
            reporter.warn(&format!("failed to delete container {name}: {message}"));
            false
        }
    }
}

fn parse_id(stdout: &[u8], what: &str) -> Result<String, ProvisionError> {
    serde_json::from_slice::<ResourceId>(stdout)
        .with_context(|| format!("parsing {what} descriptor"))
        .map(|r| r.id)
        .map_err(|e| ProvisionError::Provisioning(format!("{e:#}")))
}
