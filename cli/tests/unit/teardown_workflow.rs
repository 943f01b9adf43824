//! Teardown workflow tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use aci_agent_cli::application::services::teardown::Teardown;
use aci_agent_cli::domain::{ConfigError, ProvisionError, TeardownResult};
use aci_agent_cli::infra::inputs::LayeredInputs;

use crate::helpers::{create_env, delete_env, inputs};
use crate::mocks::{EventSink, Events, MockCloud, MockPool, PoolScript, RecordingReporter};

const CONTAINER: &str = "aci-4220240501123000";

struct Harness {
    events: Events,
    cloud: MockCloud,
    pool: MockPool,
    sink: EventSink,
    reporter: RecordingReporter,
}

impl Harness {
    fn new(script: PoolScript) -> Self {
        let events = Events::default();
        Self {
            cloud: MockCloud::new(&events),
            pool: MockPool::new(&events, script),
            sink: EventSink::new(&events),
            reporter: RecordingReporter::default(),
            events,
        }
    }

    async fn run(&self, inputs: &LayeredInputs) -> TeardownResult {
        Teardown {
            cli: &self.cloud,
            control_plane: &self.pool,
            inputs,
            sink: &self.sink,
            reporter: &self.reporter,
        }
        .run()
        .await
    }
}

#[tokio::test]
async fn test_teardown_deletes_container_then_agent_then_logs_out() {
    let h = Harness::new(PoolScript::online_at(1));

    let result = h.run(&inputs(delete_env(CONTAINER), &[])).await;

    assert_eq!(
        result,
        TeardownResult::Completed {
            container_deleted: true,
            agent_deleted: true,
        }
    );
    let container = h
        .events
        .position(&format!("az container delete {CONTAINER}"))
        .unwrap();
    let agent = h.events.position("agent delete 12 7").unwrap();
    let logout = h.events.position("az logout").unwrap();
    let complete = h.events.position("complete succeeded").unwrap();
    assert!(container < agent && agent < logout && logout < complete);
    assert!(!h.events.contains("az container create"));
}

#[tokio::test]
async fn test_teardown_reports_partial_cleanup_as_completed() {
    let mut h = Harness::new(PoolScript {
        registered: false,
        ..PoolScript::offline()
    });
    h.cloud.fail_delete = true;

    let result = h.run(&inputs(delete_env(CONTAINER), &[])).await;

    assert_eq!(
        result,
        TeardownResult::Completed {
            container_deleted: false,
            agent_deleted: false,
        }
    );
    assert!(h.events.contains("complete succeeded"));
    assert!(!h.reporter.warnings().is_empty());
    assert!(h.events.contains(&format!("warning: failed to delete container {CONTAINER}")));
}

#[tokio::test]
async fn test_teardown_requires_container_name() {
    let h = Harness::new(PoolScript::online_at(1));

    let result = h.run(&inputs(create_env(), &[])).await;

    assert_eq!(
        result,
        TeardownResult::Failed(ProvisionError::Configuration(ConfigError::MissingInputs(
            vec!["containerName".to_string()]
        )))
    );
    assert!(!h.events.contains("az "));
}

#[tokio::test]
async fn test_teardown_login_failure_deletes_nothing() {
    let mut h = Harness::new(PoolScript::online_at(1));
    h.cloud.fail_login = true;

    let result = h.run(&inputs(delete_env(CONTAINER), &[])).await;

    assert!(matches!(
        result,
        TeardownResult::Failed(ProvisionError::Authentication(_))
    ));
    assert!(!h.events.contains("az container delete"));
    assert!(!h.events.contains("agent delete"));
    assert!(!h.events.contains("az logout"));
    assert!(h.events.contains("complete failed"));
}

#[tokio::test]
async fn test_teardown_container_name_override_wins() {
    let h = Harness::new(PoolScript::online_at(1));

    let result = h
        .run(&inputs(delete_env("from-env"), &[("containerName", CONTAINER)]))
        .await;

    assert!(matches!(result, TeardownResult::Completed { .. }));
    assert!(h.events.contains(&format!("az container delete {CONTAINER}")));
    assert!(!h.events.contains("az container delete from-env"));
}
