//! Application service: provisioning workflow.
//!
//! Drives one run through `Init → Validated → PoolChecked → AuthConfigured →
//! LoggedIn → ContainerCreated → AgentOnline`. Any fatal error stops forward
//! progress; the cleanup tail runs on every path and publishes exactly one
//! terminal status.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use aci_agent_common::inputs::{self, OUTPUT_CONTAINER_ID, OUTPUT_CONTAINER_NAME};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::application::ports::{
    CloudCli, ControlPlane, InputSource, OutputSink, ProgressReporter,
};
use crate::application::services::container::{
    ContainerHandle, create_container, delete_container, resolve_subnet_id,
};
use crate::application::services::credentials::{resolve_credentials, resolve_registry};
use crate::application::services::issues::IssueReporter;
use crate::application::services::pool::{delete_agent, resolve_pool, wait_online};
use crate::application::services::session::{
    self, SessionGuard, check_prerequisites, isolate_credential_store,
};
use crate::domain::container::{AgentRegistration, ContainerSpec, SpnInjection, agent_environment};
use crate::domain::request::effective_token;
use crate::domain::{
    AgentIdentity, ConfigError, ProvisionError, ProvisioningRequest, RunEnvironment, Stage,
    WorkflowResult,
};

/// Collaborators of one provisioning run.
pub struct Provisioner<'a, C, P, I, S, R> {
    pub cli: &'a C,
    pub control_plane: &'a P,
    pub inputs: &'a I,
    pub sink: &'a S,
    pub reporter: &'a R,
}

/// Mutable state owned by exactly one run.
///
/// Guards held here are released by the cleanup tail on every exit path.
#[derive(Debug, Default)]
pub struct WorkflowContext {
    pub stage: Stage,
    pub identity: Option<AgentIdentity>,
    pub container: Option<ContainerHandle>,
    cert_file: Option<NamedTempFile>,
    session: Option<SessionGuard>,
}

impl WorkflowContext {
    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }
}

impl<C, P, I, S, R> Provisioner<'_, C, P, I, S, R>
where
    C: CloudCli,
    P: ControlPlane,
    I: InputSource,
    S: OutputSink,
    R: ProgressReporter,
{
    /// Provision one agent container and wait for it to come online.
    ///
    /// `now` seeds the timestamp in the generated agent name.
    pub async fn run(&self, now: DateTime<Utc>) -> WorkflowResult {
        let reporter = IssueReporter::new(self.reporter, self.sink);
        let mut ctx = WorkflowContext::default();
        let outcome = self.advance_stages(&mut ctx, now, &reporter).await;
        self.finish(ctx, outcome, &reporter).await
    }

    async fn advance_stages(
        &self,
        ctx: &mut WorkflowContext,
        now: DateTime<Utc>,
        reporter: &impl ProgressReporter,
    ) -> Result<ContainerHandle, ProvisionError> {

        // Init → Validated
        reporter.step("validating inputs...");
        let request = ProvisioningRequest::from_inputs(|name| self.inputs.input(name))?;
        let env = RunEnvironment::from_variables(|name| self.inputs.variable(name))?;
        let token = effective_token(&request.token, &env)
            .cloned()
            .ok_or_else(|| ConfigError::MissingInputs(vec![inputs::AZURE_DEVOPS_TOKEN.into()]))?;
        check_prerequisites(self.cli).await?;
        let identity = AgentIdentity::generate(&request.agent_prefix, &env.run_id(), now)?;
        ctx.identity = Some(identity.clone());
        ctx.advance(Stage::Validated);

        // Validated → PoolChecked
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
        ctx.advance(Stage::PoolChecked);

        // PoolChecked → AuthConfigured
        reporter.step("resolving credentials...");
        let registry = request
            .registry_endpoint
            .as_deref()
            .map(|endpoint| resolve_registry(self.inputs, endpoint))
            .transpose()?;
        let resolved = resolve_credentials(
            self.inputs,
            &request.service_connection,
            env.temp_dir.as_deref(),
        )?;
        ctx.cert_file = resolved.cert_file;
        isolate_credential_store(
            self.cli,
            env.agent_temp_dir.as_deref(),
            request.use_global_config,
            reporter,
        );
        ctx.advance(Stage::AuthConfigured);

        // AuthConfigured → LoggedIn
        reporter.step("logging in to Azure...");
        let guard = session::login(self.cli, &resolved.credentials, &resolved.context).await?;
        let guard = ctx.session.insert(guard);
        guard
            .set_subscription(self.cli, &resolved.context.subscription_id)
            .await?;
        ctx.advance(Stage::LoggedIn);

        // LoggedIn → ContainerCreated
        let subnet_id = match &request.network {
            Some(network) => Some(resolve_subnet_id(self.cli, network).await?),
            None => None,
        };
        let registration = AgentRegistration {
            collection_uri: &env.collection_uri,
            pool: &pool.name,
            agent_name: &identity.agent_name,
            token: &token,
        };
        let spn = request.add_spn_to_container.then_some(SpnInjection {
            container_name: &identity.container_name,
            resource_group: &request.resource_group,
            context: &resolved.context,
            credentials: &resolved.credentials,
        });
        let environment = agent_environment(&registration, spn.as_ref());
        let spec = ContainerSpec {
            name: &identity.container_name,
            resource_group: &request.resource_group,
            location: &request.location,
            image: &request.image,
            os_type: &request.os_type,
            cpu: &request.cpu,
            memory: &request.memory,
            subnet_id: subnet_id.as_deref(),
            environment: &environment,
            registry: registry.as_ref(),
        };
        reporter.step(&format!("creating container {}...", identity.container_name));
        let handle = create_container(self.cli, &spec).await?;
        ctx.container = Some(handle.clone());
        ctx.advance(Stage::ContainerCreated);

        // ContainerCreated → AgentOnline
        reporter.step(&format!(
            "waiting up to {}s for agent {} to come online...",
            request.online_timeout_secs, identity.agent_name
        ));
        if wait_online(
            &client,
            &pool,
            &identity.agent_name,
            request.online_timeout_secs,
            reporter,
        )
        .await
        {
            ctx.advance(Stage::AgentOnline);
            reporter.success(&format!("agent {} is online", identity.agent_name));
            return Ok(handle);
        }

        if request.skip_deletion_on_error {
            reporter.warn(&format!(
                "agent did not come online; keeping container {} for inspection",
                handle.name
            ));
        } else {
            delete_container(self.cli, &handle.name, &request.resource_group, reporter).await;
            delete_agent(&client, &pool, &identity.agent_name, reporter).await;
        }
        Err(ProvisionError::Timeout {
            agent: identity.agent_name,
            seconds: request.online_timeout_secs,
        })
    }

    async fn finish(
        &self,
        mut ctx: WorkflowContext,
        outcome: Result<ContainerHandle, ProvisionError>,
        reporter: &impl ProgressReporter,
    ) -> WorkflowResult {
        session::release(ctx.cert_file.take(), ctx.session.take(), self.cli, reporter).await;

        match outcome {
            Ok(handle) => {
                self.sink.complete(
                    true,
                    &format!("agent container {} is online", handle.name),
                );
                self.sink.set_output(OUTPUT_CONTAINER_NAME, &handle.name);
                self.sink.set_output(OUTPUT_CONTAINER_ID, &handle.id);
                WorkflowResult::Succeeded {
                    container_name: handle.name,
                    container_id: handle.id,
                }
            }
            Err(err) => {
                tracing::debug!(
                    stage = %ctx.stage,
                    code = err.code(),
                    agent = ctx.identity.as_ref().map(|i| i.agent_name.as_str()),
                    container = ctx.container.as_ref().map(|c| c.name.as_str()),
                    "run failed"
                );
                self.sink.complete(false, &err.to_string());
                WorkflowResult::Failed(err)
            }
        }
    }
}
