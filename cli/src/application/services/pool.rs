//! Application service: pool resolution and agent reconciliation.

use std::time::Duration;

use crate::application::ports::{PoolClient, ProgressReporter};
use crate::application::services::poll::poll_until;
use crate::domain::pool::{find_agent, select_pool};
use crate::domain::{AgentStatus, PoolRef, ProvisionError};

/// Interval between agent status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(8);

/// Resolve a pool name to exactly one pool.
///
/// # Errors
///
/// Returns `ProvisionError::InvalidPool` if the lookup fails or does not
/// yield exactly one pool with a matching name.
pub async fn resolve_pool(client: &impl PoolClient, name: &str) -> Result<PoolRef, ProvisionError> {
    let pools = client
        .list_pools(name)
        .await
        .map_err(|e| ProvisionError::InvalidPool {
            pool: name.to_string(),
            reason: format!("{e:#}"),
        })?;
    let pool = select_pool(&pools, name).map_err(|mismatch| ProvisionError::InvalidPool {
        pool: name.to_string(),
        reason: mismatch.to_string(),
    })?;
    tracing::debug!(pool = %pool.name, id = pool.id, "resolved pool");
    Ok(pool)
}

/// Wait until `agent_name` reports online in `pool`.
///
/// A zero timeout returns `true` without polling and reports a warning.
/// Lookup failures count as "not yet online".
pub async fn wait_online(
    client: &impl PoolClient,
    pool: &PoolRef,
    agent_name: &str,
    timeout_secs: u64,
    reporter: &impl ProgressReporter,
) -> bool {
    if timeout_secs == 0 {
        tracing::warn!(agent = agent_name, "online wait disabled");
        reporter.warn(&format!("skipping check if agent {agent_name} is online"));
        return true;
    }

    poll_until(POLL_INTERVAL, Duration::from_secs(timeout_secs), move || async move {
        match client.list_agents(pool.id, agent_name).await {
            Ok(agents) => {
                let status = find_agent(&agents, agent_name).map(|a| AgentStatus::from(a.status));
                tracing::debug!(agent = agent_name, ?status, "polled agent status");
                status == Some(AgentStatus::Online)
            }
            Err(e) => {
                tracing::warn!(agent = agent_name, error = %format!("{e:#}"), "agent lookup failed");
                reporter.warn(&format!("agent lookup failed: {e:#}"));
                false
            }
        }
    })
    .await
}

/// Remove the registration of `agent_name` from `pool`, if present.
/// Failures are reported as warnings.
///
/// Returns whether a registration was deleted.
pub async fn delete_agent(
    client: &impl PoolClient,
    pool: &PoolRef,
    agent_name: &str,
    reporter: &impl ProgressReporter,
) -> bool {
    let agents = match client.list_agents(pool.id, agent_name).await {
        Ok(agents) => agents,
        Err(e) => {
            tracing::warn!(agent = agent_name, error = %format!("{e:#}"), "agent lookup failed");
            reporter.warn(&format!("failed to look up agent {agent_name}: {e:#}"));
            return false;
        }
    };
    let Some(agent) = find_agent(&agents, agent_name) else {
        tracing::debug!(agent = agent_name, "no registration to delete");
        return false;
    };

    reporter.step(&format!("removing agent {agent_name} from pool {}...", pool.name));
    match client.delete_agent(pool.id, agent.id).await {
        Ok(()) => {
            reporter.success(&format!("agent {agent_name} removed"));
            true
        }
        Err(e) => {
            tracing::warn!(agent = agent_name, error = %format!("{e:#}"), "agent delete failed");
            reporter.warn(&format!("failed to remove agent {agent_name}: {e:#}"));
            false
        }
    }
}
