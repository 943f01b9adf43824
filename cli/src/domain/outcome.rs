//! Workflow stages and terminal results.

use std::fmt;

use crate::domain::error::ProvisionError;

/// Forward states of the provisioning state machine, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    #[default]
    Init,
    Validated,
    PoolChecked,
    AuthConfigured,
    LoggedIn,
    ContainerCreated,
    AgentOnline,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Validated => "validated",
            Self::PoolChecked => "pool-checked",
            Self::AuthConfigured => "auth-configured",
            Self::LoggedIn => "logged-in",
            Self::ContainerCreated => "container-created",
            Self::AgentOnline => "agent-online",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowResult {
    Succeeded {
        container_name: String,
        container_id: String,
    },
    Failed(ProvisionError),
}

impl WorkflowResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&ProvisionError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Succeeded { .. } => None,
        }
    }
}

/// Terminal outcome of a teardown run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownResult {
    Completed {
        container_deleted: bool,
        agent_deleted: bool,
    },
    Failed(ProvisionError),
}
