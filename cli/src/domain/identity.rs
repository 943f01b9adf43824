//! Agent and container naming.

use chrono::{DateTime, Utc};

use aci_agent_common::inputs;

use crate::domain::error::ConfigError;

/// Azure Container Instances limit for container group names.
pub const MAX_CONTAINER_NAME_LEN: usize = 63;

/// Names of the container and of the agent it registers. They are identical
/// today but kept apart so teardown can address each one explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub container_name: String,
    pub agent_name: String,
}

impl AgentIdentity {
    /// Derive a run-unique name: `<prefix><build id><release id><YYYYMMDDhhmmss>`.
    ///
    /// Two runs targeting the same pool differ in their build/release id; the
    /// timestamp separates reruns of the same build.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the resulting name exceeds
    /// [`MAX_CONTAINER_NAME_LEN`].
    pub fn generate(prefix: &str, run_id: &str, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let run_id: String = run_id
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        let name = format!(
            "{}{run_id}{}",
            prefix.to_lowercase(),
            now.format("%Y%m%d%H%M%S")
        );
        if name.len() > MAX_CONTAINER_NAME_LEN {
            return Err(ConfigError::InvalidValue {
                name: inputs::AGENT_PREFIX.to_string(),
                value: prefix.to_string(),
                reason: format!(
                    "generated name '{name}' is longer than {MAX_CONTAINER_NAME_LEN} characters"
                ),
            });
        }
        Ok(Self {
            container_name: name.clone(),
            agent_name: name,
        })
    }

    /// Identity of an existing container whose agent carries the same name.
    #[must_use]
    pub fn existing(container_name: &str) -> Self {
        Self {
            container_name: container_name.to_string(),
            agent_name: container_name.to_string(),
        }
    }
}
