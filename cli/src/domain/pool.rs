//! Pool and agent reconciliation rules.

use aci_agent_common::types::{TaskAgent, TaskAgentPool, TaskAgentStatus};
use thiserror::Error;

/// A pool that resolved to exactly one control-plane entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRef {
    pub id: i64,
    pub name: String,
}

/// Agent connectivity as far as the wait loop is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Online,
    Offline,
    Unknown,
}

impl From<TaskAgentStatus> for AgentStatus {
    fn from(status: TaskAgentStatus) -> Self {
        match status {
            TaskAgentStatus::Online => Self::Online,
            TaskAgentStatus::Offline => Self::Offline,
            TaskAgentStatus::Unknown => Self::Unknown,
        }
    }
}

/// Why a pool name did not resolve.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolMismatch {
    #[error("no pool with this name exists")]
    NotFound,
    #[error("{0} pools matched the name")]
    Ambiguous(usize),
    #[error("the control plane returned pool '{0}'")]
    NameMismatch(String),
}

/// Resolve `name` against the pools returned by a name-filtered listing.
///
/// Exactly one pool must be returned and its name must equal `name`
/// case-insensitively.
///
/// # Errors
///
/// Returns the [`PoolMismatch`] describing why resolution failed.
pub fn select_pool(pools: &[TaskAgentPool], name: &str) -> Result<PoolRef, PoolMismatch> {
    match pools {
        [] => Err(PoolMismatch::NotFound),
        [pool] if pool.name.to_lowercase() == name.to_lowercase() => Ok(PoolRef {
            id: pool.id,
            name: pool.name.clone(),
        }),
        [pool] => Err(PoolMismatch::NameMismatch(pool.name.clone())),
        many => Err(PoolMismatch::Ambiguous(many.len())),
    }
}

/// Find the registration for `agent_name` in a name-filtered agent listing.
///
/// Entries whose name differs are never returned.
#[must_use]
pub fn find_agent<'a>(agents: &'a [TaskAgent], agent_name: &str) -> Option<&'a TaskAgent> {
    agents
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(agent_name))
}
