//! Infrastructure implementation of the cloud port traits.
//!
//! `AzCli<R>` routes every provider call through a `CommandRunner` as an
//! `az` argv invocation. Once a run-private credential store is selected,
//! each child process receives it as `AZURE_CONFIG_DIR`; the parent
//! environment is never modified.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::application::ports::{CloudSession, CommandRunner, ContainerService};
use crate::domain::Credentials;
use crate::domain::container::ContainerSpec;

/// Name of the Azure CLI executable.
#[cfg(windows)]
pub const AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
pub const AZ_PROGRAM: &str = "az";

/// Environment variable the Azure CLI reads its configuration directory from.
pub const CONFIG_DIR_ENV: &str = "AZURE_CONFIG_DIR";

/// Timeout for `az container create`, which waits for the group to deploy.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Infrastructure adapter that routes all `az` calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct AzCli<R: CommandRunner> {
    runner: R,
    config_dir: OnceLock<PathBuf>,
}

impl<R: CommandRunner> AzCli<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            config_dir: OnceLock::new(),
        }
    }

    /// The credential store selected for this run, if any.
    #[cfg(test)]
    fn config_dir(&self) -> Option<&Path> {
        self.config_dir.get().map(PathBuf::as_path)
    }

    async fn az(&self, args: &[&str], what: &str) -> Result<Output> {
        self.az_with_timeout(args, None, what).await
    }

    async fn az_with_timeout(
        &self,
        args: &[&str],
        timeout: Option<Duration>,
        what: &str,
    ) -> Result<Output> {
        let dir = self.config_dir.get().map(|d| d.to_string_lossy().into_owned());
        let env: Vec<(&str, &str)> = dir
            .as_deref()
            .map(|d| vec![(CONFIG_DIR_ENV, d)])
            .unwrap_or_default();
        let result = match timeout {
            Some(t) => self.runner.run_with_timeout(AZ_PROGRAM, args, &env, t).await,
            None => self.runner.run(AZ_PROGRAM, args, &env).await,
        };
        result.with_context(|| format!("az {what}"))
    }
}

impl<R: CommandRunner> CloudSession for AzCli<R> {
    async fn version(&self) -> Result<Output> {
        self.az(&["--version"], "--version").await
    }

    fn use_config_dir(&self, dir: &Path) -> Result<()> {
        match self.config_dir.get() {
            Some(current) if current == dir => Ok(()),
            Some(current) => bail!(
                "az configuration already set to {}",
                current.display()
            ),
            None => {
                let _ = self.config_dir.set(dir.to_path_buf());
                Ok(())
            }
        }
    }

    async fn set_cloud(&self, name: &str) -> Result<Output> {
        self.az(&["cloud", "set", "-n", name], "cloud set").await
    }

    async fn login(&self, credentials: &Credentials, tenant_id: Option<&str>) -> Result<Output> {
        let mut args = vec!["login"];
        let cert;
        match credentials {
            Credentials::ManagedIdentity => args.push("--identity"),
            Credentials::ServicePrincipalKey { id, secret } => {
                args.extend(["--service-principal", "-u", id.as_str(), "-p", secret.expose()]);
            }
            Credentials::ServicePrincipalCertificate { id, cert_path } => {
                cert = cert_path.to_string_lossy();
                args.extend(["--service-principal", "-u", id.as_str(), "-p", cert.as_ref()]);
            }
        }
        if !credentials.is_managed_identity() {
            if let Some(tenant) = tenant_id {
                args.extend(["--tenant", tenant]);
            }
        }
        self.az(&args, "login").await
    }

    async fn set_subscription(&self, subscription_id: &str) -> Result<Output> {
        self.az(
            &["account", "set", "--subscription", subscription_id],
            "account set",
        )
        .await
    }

    async fn logout(&self) -> Result<Output> {
        self.az(&["account", "clear"], "account clear").await
    }
}

impl<R: CommandRunner> ContainerService for AzCli<R> {
    async fn create(&self, spec: &ContainerSpec<'_>) -> Result<Output> {
        let owned = spec.create_args();
        let args: Vec<&str> = owned.iter().map(String::as_str).collect();
        self.az_with_timeout(&args, Some(CREATE_TIMEOUT), "container create")
            .await
    }

    async fn delete(&self, name: &str, resource_group: &str) -> Result<Output> {
        self.az(
            &[
                "container",
                "delete",
                "--yes",
                "--name",
                name,
                "--resource-group",
                resource_group,
            ],
            "container delete",
        )
        .await
    }

    async fn subnet_show(
        &self,
        resource_group: &str,
        vnet: &str,
        subnet: &str,
    ) -> Result<Output> {
        self.az(
            &[
                "network",
                "vnet",
                "subnet",
                "show",
                "--resource-group",
                resource_group,
                "--name",
                subnet,
                "--vnet-name",
                vnet,
                "--output",
                "json",
            ],
            "network vnet subnet show",
        )
        .await
    }
}
