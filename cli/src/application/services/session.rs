//! Application service: cloud session lifecycle.
//!
//! Login state is tracked by a [`SessionGuard`]: it exists only after a
//! successful login and is consumed by [`SessionGuard::logout`], so logout
//! runs iff login succeeded.

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::NamedTempFile;

use crate::application::ports::{CloudSession, ProgressReporter};
use crate::domain::{AzureContext, ConfigError, Credentials, ProvisionError};

/// Directory name of the run-private credential store under the agent temp dir.
pub const CONFIG_DIR_NAME: &str = ".azclitask";

/// Proof of a successful login.
#[derive(Debug)]
#[must_use = "an unreleased session leaves cached credentials behind"]
pub struct SessionGuard {
    _private: (),
}

impl SessionGuard {
    /// Make the connection's subscription active.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Authentication` if the subscription cannot be
    /// selected.
    pub async fn set_subscription(
        &self,
        cli: &impl CloudSession,
        subscription_id: &str,
    ) -> Result<(), ProvisionError> {
        let output = cli
            .set_subscription(subscription_id)
            .await
            .map_err(|e| ProvisionError::Authentication(format!("{e:#}")))?;
        ensure_success(&output, "az account set").map_err(ProvisionError::Authentication)
    }

    /// Clear cached accounts. Failures are reported as warnings.
    pub async fn logout(self, cli: &impl CloudSession, reporter: &impl ProgressReporter) {
        let result = cli
            .logout()
            .await
            .map_err(|e| format!("{e:#}"))
            .and_then(|output| ensure_success(&output, "az account clear"));
        match result {
            Ok(()) => tracing::debug!("logged out"),
            Err(message) => {
                tracing::warn!(%message, "logout failed");
                reporter.warn(&format!("logout failed: {message}"));
            }
        }
    }
}

/// Verify the provider CLI is installed and runnable.
///
/// # Errors
///
/// Returns `ConfigError::CliUnavailable` if `az --version` cannot be run or
/// exits non-zero.
pub async fn check_prerequisites(cli: &impl CloudSession) -> Result<(), ConfigError> {
    let output = cli
        .version()
        .await
        .map_err(|e| ConfigError::CliUnavailable(format!("{e:#}")))?;
    ensure_success(&output, "az --version").map_err(ConfigError::CliUnavailable)
}

/// Route provider calls to a credential store private to this run.
///
/// Returns the selected directory, or `None` when the global store stays in
/// use (opted in, or no agent temp directory is known).
pub fn isolate_credential_store(
    cli: &impl CloudSession,
    agent_temp_dir: Option<&Path>,
    use_global_config: bool,
    reporter: &impl ProgressReporter,
) -> Option<PathBuf> {
    if use_global_config {
        tracing::debug!("using global credential store");
        return None;
    }
    let Some(temp) = agent_temp_dir else {
        tracing::warn!("agent temp directory is unknown");
        reporter.warn("agent temp directory is unknown; using the global az configuration");
        return None;
    };
    let dir = temp.join(CONFIG_DIR_NAME);
    match cli.use_config_dir(&dir) {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "isolated credential store");
            Some(dir)
        }
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %format!("{e:#}"),
                "credential store isolation failed"
            );
            reporter.warn(&format!("could not isolate az configuration: {e:#}"));
            None
        }
    }
}

/// Select the cloud (when named) and log in.
///
/// # Errors
///
/// Returns `ProvisionError::Authentication` carrying the provider's stderr if
/// either call fails. No guard is returned in that case.
pub async fn login(
    cli: &impl CloudSession,
    credentials: &Credentials,
    context: &AzureContext,
) -> Result<SessionGuard, ProvisionError> {
    if let Some(cloud) = context.cloud.as_deref() {
        let output = cli
            .set_cloud(cloud)
            .await
            .map_err(|e| ProvisionError::Authentication(format!("{e:#}")))?;
        ensure_success(&output, "az cloud set").map_err(ProvisionError::Authentication)?;
    }

    let output = cli
        .login(credentials, context.tenant_id.as_deref())
        .await
        .map_err(|e| ProvisionError::Authentication(format!("{e:#}")))?;
    ensure_success(&output, "az login").map_err(ProvisionError::Authentication)?;

    tracing::debug!(kind = credentials.kind(), "logged in");
    Ok(SessionGuard { _private: () })
}

/// Release everything a run holds against the provider, in order: the
/// certificate file, then the session.
pub async fn release(
    cert_file: Option<NamedTempFile>,
    session: Option<SessionGuard>,
    cli: &impl CloudSession,
    reporter: &impl ProgressReporter,
) {
    if let Some(file) = cert_file {
        if let Err(e) = file.close() {
            tracing::warn!(error = %e, "failed to remove certificate file");
            reporter.warn(&format!("failed to remove certificate file: {e}"));
        }
    }
    if let Some(session) = session {
        session.logout(cli, reporter).await;
    }
}

/// Map a non-zero exit to a message carrying the exit code and stderr.
pub(crate) fn ensure_success(output: &Output, what: &str) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let code = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |c| c.to_string());
    Err(format!("{what} failed (exit {code}): {}", stderr.trim()))
}
