//! Application service: manual teardown of a provisioned agent container.
//!
//! Deletes a named container and the agent registration of the same name.
//! Deletes are best-effort; the run fails only on configuration, pool, or
//! authentication errors.

use aci_agent_common::inputs;
use tempfile::NamedTempFile;

use crate::application::ports::{
    CloudCli, ControlPlane, InputSource, OutputSink, ProgressReporter,
};
use crate::application::services::container::delete_container;
use crate::application::services::credentials::resolve_credentials;
use crate::application::services::issues::IssueReporter;
use crate::application::services::pool::{delete_agent, resolve_pool};
use crate::application::services::session::{
    self, SessionGuard, check_prerequisites, isolate_credential_store,
};
use crate::domain::request::effective_token;
use crate::domain::{
    AgentIdentity, ConfigError, ProvisionError, RunEnvironment, TeardownRequest, TeardownResult,
};

/// Collaborators of one teardown run.
pub struct Teardown<'a, C, P, I, S, R> {
    pub cli: &'a C,
    pub control_plane: &'a P,
    pub inputs: &'a I,
    pub sink: &'a S,
    pub reporter: &'a R,
}

#[derive(Default)]
struct Held {
    cert_file: Option<NamedTempFile>,
    session: Option<SessionGuard>,
}

impl<C, P, I, S, R> Teardown<'_, C, P, I, S, R>
where
    C: CloudCli,
    P: ControlPlane,
    I: InputSource,
    S: OutputSink,
    R: ProgressReporter,
{
    /// Delete the container named by the `containerName` input and its agent.
    pub async fn run(&self) -> TeardownResult {
        let reporter = IssueReporter::new(self.reporter, self.sink);
        let mut held = Held::default();
        let outcome = self.delete_all(&mut held, &reporter).await;

        session::release(held.cert_file, held.session, self.cli, &reporter).await;

        match outcome {
            Ok((container_deleted, agent_deleted)) => {
                self.sink.complete(true, "teardown finished");
                TeardownResult::Completed {
                    container_deleted,
                    agent_deleted,
                }
            }
            Err(err) => {
                self.sink.complete(false, &err.to_string());
                TeardownResult::Failed(err)
            }
        }
    }

    async fn delete_all(
        &self,
        held: &mut Held,
        reporter: &impl ProgressReporter,
    ) -> Result<(bool, bool), ProvisionError> {

        reporter.step("validating inputs...");
        let request = TeardownRequest::from_inputs(|name| self.inputs.input(name))?;
        let env = RunEnvironment::from_variables(|name| self.inputs.variable(name))?;
        let token = effective_token(&request.token, &env)
            .cloned()
            .ok_or_else(|| ConfigError::MissingInputs(vec![inputs::AZURE_DEVOPS_TOKEN.into()]))?;
        check_prerequisites(self.cli).await?;
        let identity = AgentIdentity::existing(&request.container_name);

        reporter.step(&format!("checking agent pool {}...", request.pool));
        let client = self
            .control_plane
            .connect(&env.collection_uri, &token)
            .map_err(|e| ConfigError::InvalidValue {
                name: inputs::COLLECTION_URI.to_string(),
                value: env.collection_uri.clone(),
                reason: format!("{e:#}"),
            })?;
        let pool = resolve_pool(&client, &request.pool).await?;

        reporter.step("resolving credentials...");
        let resolved = resolve_credentials(
            self.inputs,
            &request.service_connection,
            env.temp_dir.as_deref(),
        )?;
        held.cert_file = resolved.cert_file;
        isolate_credential_store(
            self.cli,
            env.agent_temp_dir.as_deref(),
            request.use_global_config,
            reporter,
        );

        reporter.step("logging in to Azure...");
        let guard = session::login(self.cli, &resolved.credentials, &resolved.context).await?;
        held.session
            .insert(guard)
            .set_subscription(self.cli, &resolved.context.subscription_id)
            .await?;

        let container_deleted = delete_container(
            self.cli,
            &identity.container_name,
            &request.resource_group,
            reporter,
        )
        .await;
        let agent_deleted = delete_agent(&client, &pool, &identity.agent_name, reporter).await;
        Ok((container_deleted, agent_deleted))
    }
}
