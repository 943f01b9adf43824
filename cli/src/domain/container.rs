//! Container payload assembly: environment channels and `az container create` argv.
//!
//! Pure functions only. Secrets are carried as [`Secret`] until the final
//! argv is rendered, and only ever into the secure-environment channel or the
//! registry password flag.

use crate::domain::credentials::{AzureContext, Credentials, RegistryCredentials, Secret};

/// Restart policy for agent containers: an agent that exits is done.
pub const RESTART_POLICY: &str = "Never";

/// Environment for the agent process, split by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentEnvironment {
    /// Visible in the container group definition.
    pub plain: Vec<(&'static str, String)>,
    /// Passed via `--secure-environment-variables`; never echoed by Azure.
    pub secure: Vec<(&'static str, Secret)>,
}

/// Service-principal material injected into the container on request, so
/// the agent can call back into Azure (e.g. to delete its own container).
pub struct SpnInjection<'a> {
    pub container_name: &'a str,
    pub resource_group: &'a str,
    pub context: &'a AzureContext,
    pub credentials: &'a Credentials,
}

/// Values the agent needs to self-register in its pool.
pub struct AgentRegistration<'a> {
    pub collection_uri: &'a str,
    pub pool: &'a str,
    pub agent_name: &'a str,
    pub token: &'a Secret,
}

/// Build the agent environment.
#[must_use]
pub fn agent_environment(
    registration: &AgentRegistration<'_>,
    spn: Option<&SpnInjection<'_>>,
) -> AgentEnvironment {
    let mut env = AgentEnvironment {
        plain: vec![
            ("AZP_URL", registration.collection_uri.to_string()),
            ("AZP_POOL", registration.pool.to_string()),
            ("AZP_AGENT_NAME", registration.agent_name.to_string()),
        ],
        secure: vec![("AZP_TOKEN", registration.token.clone())],
    };

    if let Some(spn) = spn {
        env.plain.extend([
            ("AZ_ACI_NAME", spn.container_name.to_string()),
            ("AZ_ACI_RG", spn.resource_group.to_string()),
            (
                "AZ_TENANT_ID",
                spn.context.tenant_id.clone().unwrap_or_default(),
            ),
            ("AZ_SUBSCRIPTION_ID", spn.context.subscription_id.clone()),
            (
                "AZ_MANAGED_IDENTITY",
                spn.credentials.is_managed_identity().to_string(),
            ),
            ("AZ_CLOUD", spn.context.cloud.clone().unwrap_or_default()),
        ]);
        if let Some(id) = spn.credentials.service_principal_id() {
            env.secure.push(("AZ_SERVICE_PRINCIPAL", Secret::new(id)));
        }
        if let Some(secret) = spn.credentials.service_principal_secret() {
            env.secure.push(("AZ_SERVICE_PRINCIPAL_KEY", secret.clone()));
        }
    }

    env
}

/// Launch parameters for one container instance.
pub struct ContainerSpec<'a> {
    pub name: &'a str,
    pub resource_group: &'a str,
    pub location: &'a str,
    pub image: &'a str,
    /// `Linux` or `Windows`.
    pub os_type: &'a str,
    pub cpu: &'a str,
    pub memory: &'a str,
    /// Full ARM id of the subnet, when the container joins a vnet.
    pub subnet_id: Option<&'a str>,
    pub environment: &'a AgentEnvironment,
    pub registry: Option<&'a RegistryCredentials>,
}

impl ContainerSpec<'_> {
    /// Render the argv passed to `az`, starting at the `container` subcommand.
    #[must_use]
    pub fn create_args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "container",
            "create",
            "--name",
            self.name,
            "--resource-group",
            self.resource_group,
            "--location",
            self.location,
            "--image",
            self.image,
            "--ip-address",
            "private",
            "--os-type",
            self.os_type,
            "--cpu",
            self.cpu,
            "--memory",
            self.memory,
            "--restart-policy",
            RESTART_POLICY,
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

        if let Some(subnet) = self.subnet_id {
            args.push("--subnet".into());
            args.push(subnet.to_string());
        }

        args.push("--environment-variables".into());
        args.extend(
            self.environment
                .plain
                .iter()
                .map(|(k, v)| format!("{k}={v}")),
        );

        args.push("--secure-environment-variables".into());
        args.extend(
            self.environment
                .secure
                .iter()
                .map(|(k, v)| format!("{k}={}", v.expose())),
        );

        if let Some(registry) = self.registry {
            args.push("--registry-username".into());
            args.push(registry.username.clone());
            args.push("--registry-password".into());
            args.push(registry.password.expose().to_string());
        }

        args.push("--output".into());
        args.push("json".into());
        args
    }
}
