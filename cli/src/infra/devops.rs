//! Azure DevOps distributed-task REST client.
//!
//! Implements the `PoolClient` port over `{collection}/_apis/distributedtask`
//! with personal-access-token basic auth.

use std::time::Duration;

use aci_agent_common::types::{API_VERSION, ListResponse, TaskAgent, TaskAgentPool};
use anyhow::{Context, Result, bail, ensure};
use reqwest::Url;

use crate::application::ports::{ControlPlane, PoolClient};
use crate::domain::Secret;

/// Per-request timeout for control-plane calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for one Azure DevOps organization.
#[derive(Debug, Clone)]
pub struct DevOpsClient {
    client: reqwest::Client,
    base_url: String,
    token: Secret,
}

impl DevOpsClient {
    /// # Errors
    ///
    /// Returns an error if `collection_uri` is not an absolute http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(collection_uri: &str, token: Secret) -> Result<Self> {
        let parsed = Url::parse(collection_uri)
            .with_context(|| format!("invalid collection URI '{collection_uri}'"))?;
        ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "collection URI must be http or https: {collection_uri}"
        );
        let mut base_url = collection_uri.to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("aci-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/_apis/distributedtask/{path}", self.base_url)
    }
}

impl PoolClient for DevOpsClient {
    async fn list_pools(&self, name: &str) -> Result<Vec<TaskAgentPool>> {
        let resp = self
            .client
            .get(self.url("pools"))
            .query(&[("poolName", name), ("api-version", API_VERSION)])
            .basic_auth("", Some(self.token.expose()))
            .send()
            .await
            .context("send list pools request")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("failed to list pools: {status} {text}");
        }
        let body: ListResponse<TaskAgentPool> =
            resp.json().await.context("decode list pools response")?;
        Ok(body.value)
    }

    async fn list_agents(&self, pool_id: i64, agent_name: &str) -> Result<Vec<TaskAgent>> {
        let resp = self
            .client
            .get(self.url(&format!("pools/{pool_id}/agents")))
            .query(&[("agentName", agent_name), ("api-version", API_VERSION)])
            .basic_auth("", Some(self.token.expose()))
            .send()
            .await
            .context("send list agents request")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("failed to list agents in pool {pool_id}: {status} {text}");
        }
        let body: ListResponse<TaskAgent> =
            resp.json().await.context("decode list agents response")?;
        Ok(body.value)
    }

    async fn delete_agent(&self, pool_id: i64, agent_id: i64) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("pools/{pool_id}/agents/{agent_id}")))
            .query(&[("api-version", API_VERSION)])
            .basic_auth("", Some(self.token.expose()))
            .send()
            .await
            .context("send delete agent request")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("failed to delete agent {agent_id}: {status} {text}");
        }
        Ok(())
    }
}

/// Opens [`DevOpsClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevOps;

impl ControlPlane for DevOps {
    type Client = DevOpsClient;

    fn connect(&self, collection_uri: &str, token: &Secret) -> Result<DevOpsClient> {
        DevOpsClient::new(collection_uri, token.clone())
    }
}
