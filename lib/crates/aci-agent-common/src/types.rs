//! Wire types for the Azure DevOps distributed-task REST API.
//!
//! Only the fields the provisioner reads are modelled; unknown fields are
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

/// REST API version sent with every distributed-task request.
pub const API_VERSION: &str = "7.1";

/// Envelope returned by Azure DevOps list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> ListResponse<T> {
    #[must_use]
    pub fn new(value: Vec<T>) -> Self {
        Self {
            count: value.len(),
            value,
        }
    }
}

/// An agent pool as returned by `GET _apis/distributedtask/pools`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgentPool {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hosted: Option<bool>,
}

/// Connectivity status reported for a registered agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskAgentStatus {
    Offline,
    Online,
    #[serde(other)]
    Unknown,
}

/// An agent registration as returned by `GET _apis/distributedtask/pools/{id}/agents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgent {
    pub id: i64,
    pub name: String,
    pub status: TaskAgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
