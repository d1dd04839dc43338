//! Orchestration integration tests
//!
//! Registry, agents, and workflow exercised together through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use cadre_core::{
    run_workflow, ActionError, ActionPerformer, ActionRequest, AgentKind, AgentRegistry,
    CadreConfig, FailureKind, Message, MessageKind, Task, TaskStatus, WorkflowRequest,
};
use serde_json::{json, Value};

// === Full Round ===

#[tokio::test]
async fn test_four_agents_one_task_each() {
    let registry = AgentRegistry::new();
    let researcher = registry.create("researcher").unwrap();
    let analyzer = registry.create("analyzer").unwrap();
    let planner = registry.create("planner").unwrap();
    let executor = registry.create("executor").unwrap();

    let mut tasks = vec![
        Task::new(researcher.id(), "gather_data").with_param("topic", json!("X")),
        Task::new(analyzer.id(), "analyze_data")
            .with_param("data", json!({}))
            .with_param("depth", json!("basic")),
        Task::new(planner.id(), "create_strategy").with_param("timeline", json!("1_month")),
        Task::new(executor.id(), "implement_plan").with_param("resources", json!("basic")),
    ];

    for task in tasks.iter_mut() {
        let outcome = registry.dispatch(task).await;
        assert!(outcome.is_success(), "task {} failed: {:?}", task.id, outcome);
    }
    assert!(tasks.iter().all(|t| t.status() == TaskStatus::Completed));

    let statuses = registry.all_statuses().await;
    assert_eq!(statuses.len(), 4);
    for status in statuses.values() {
        assert!(status.is_active);
        assert_eq!(status.task_history_count, 1);
        assert_eq!(status.message_queue_size, 0);
    }
    assert_eq!(registry.task_log().len(), 4);

    registry.shutdown_all().await;
    let statuses = registry.all_statuses().await;
    assert!(statuses.values().all(|s| !s.is_active));
}

#[tokio::test]
async fn test_dispatch_after_shutdown_is_rejected() {
    let registry = AgentRegistry::new();
    let planner = registry.spawn(AgentKind::Planner);
    registry.shutdown_all().await;

    let mut task = Task::new(planner.id(), "create_strategy");
    let outcome = registry.dispatch(&mut task).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::AgentInactive));
    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(planner.status().await.task_history_count, 0);
    // Still recorded as dispatched
    assert_eq!(registry.task_log().len(), 1);
}

// === Messaging ===

#[tokio::test]
async fn test_route_then_process_reply() {
    let registry = AgentRegistry::new();
    let researcher = registry.spawn(AgentKind::Researcher);
    let analyzer = registry.spawn(AgentKind::Analyzer);

    let message = Message::new(MessageKind::Delegation, researcher.id(), analyzer.id())
        .with_entry("topic", json!("X"));
    assert!(registry.route(message).await);

    let reply = analyzer.lock().await.process_next().unwrap();
    assert_eq!(reply.receiver_id(), researcher.id());
    assert!(registry.route(reply).await);

    assert_eq!(analyzer.status().await.message_queue_size, 0);
    assert_eq!(researcher.status().await.message_queue_size, 1);
}

#[tokio::test]
async fn test_route_to_unknown_leaves_queues_unchanged() {
    let registry = AgentRegistry::new();
    for kind in AgentKind::all() {
        registry.spawn(kind);
    }
    let sender = registry.ids()[0].clone();

    assert!(!registry.route(Message::new(MessageKind::Query, sender, "nobody_00000000")).await);
    let statuses = registry.all_statuses().await;
    assert!(statuses.values().all(|s| s.message_queue_size == 0));
}

// === Concurrency ===

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_to_one_agent() {
    let registry = Arc::new(AgentRegistry::new());
    let executor = registry.spawn(AgentKind::Executor);

    let mut joins = Vec::new();
    for _ in 0..2 {
        let registry = Arc::clone(&registry);
        let agent_id = executor.id().to_string();
        joins.push(tokio::spawn(async move {
            let mut task = Task::new(agent_id, "implement_plan");
            registry.dispatch(&mut task).await
        }));
    }

    let mut counts = Vec::new();
    for join in joins {
        let outcome = join.await.unwrap();
        counts.push(outcome.result().unwrap()["execution_count"].as_u64().unwrap());
    }
    counts.sort();
    assert_eq!(counts, vec![1, 2]);
    assert_eq!(executor.status().await.task_history_count, 2);
    assert_eq!(registry.task_log().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_across_agents() {
    let registry = Arc::new(AgentRegistry::new());
    let handles: Vec<_> = AgentKind::all()
        .into_iter()
        .map(|kind| registry.spawn(kind))
        .collect();

    let joins: Vec<_> = handles
        .iter()
        .map(|handle| {
            let registry = Arc::clone(&registry);
            let mut task = Task::new(handle.id(), handle.kind().primary_action());
            tokio::spawn(async move { registry.dispatch(&mut task).await })
        })
        .collect();

    for join in joins {
        assert!(join.await.unwrap().is_success());
    }
    assert_eq!(registry.task_log().len(), 4);
}

// === Timestamps ===

#[tokio::test]
async fn test_task_timestamps_ordered() {
    let registry = AgentRegistry::new();
    let researcher = registry.spawn(AgentKind::Researcher);
    let mut task = Task::new(researcher.id(), "gather_data");

    registry.dispatch(&mut task).await;
    let started = task.started_at().unwrap();
    let finished = task.finished_at().unwrap();
    assert!(task.created_at() <= started);
    assert!(started <= finished);
}

#[tokio::test]
async fn test_task_log_preserves_dispatch_order() {
    let registry = AgentRegistry::new();
    let planner = registry.spawn(AgentKind::Planner);
    let mut ids = Vec::new();
    for _ in 0..5 {
        let mut task = Task::new(planner.id(), "create_strategy");
        registry.dispatch(&mut task).await;
        ids.push(task.id.clone());
    }

    let logged: Vec<_> = registry.task_log().into_iter().map(|t| t.id).collect();
    assert_eq!(logged, ids);
    let created: Vec<_> = registry
        .task_log()
        .iter()
        .map(|t| t.created_at())
        .collect();
    assert!(created.windows(2).all(|w| w[0] <= w[1]));
}

// === External Performer ===

struct Scripted;

#[async_trait]
impl ActionPerformer for Scripted {
    async fn perform(&self, request: &ActionRequest) -> Result<Value, ActionError> {
        match request.kind {
            AgentKind::Researcher => Ok(json!({
                "action": request.action,
                "summary": format!(
                    "{} findings",
                    request.parameters.get("topic").and_then(Value::as_str).unwrap_or("")
                ),
            })),
            _ => Err(ActionError::Failed("model unavailable".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn test_registry_performer_reaches_agents() {
    let registry = AgentRegistry::new().with_performer(Arc::new(Scripted));
    let researcher = registry.spawn(AgentKind::Researcher);
    let planner = registry.spawn(AgentKind::Planner);

    let mut research = Task::new(researcher.id(), "gather_data").with_param("topic", json!("X"));
    let outcome = registry.dispatch(&mut research).await;
    assert_eq!(outcome.result().unwrap()["summary"], json!("X findings"));

    let mut plan = Task::new(planner.id(), "create_strategy");
    let outcome = registry.dispatch(&mut plan).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::ActionFailed));
    assert!(!outcome.is_retryable());
    assert_eq!(plan.status(), TaskStatus::Failed);
    assert_eq!(plan.error(), Some("Action failed: model unavailable"));
    assert_eq!(planner.status().await.task_history_count, 1);
}

// === Workflow ===

#[tokio::test]
async fn test_full_workflow_from_config() {
    let config = CadreConfig::from_toml(
        r#"
        [agent]
        history_capacity = 4

        [workflow.model]
        temperature = 0.2
        "#,
    )
    .unwrap();
    let registry = AgentRegistry::with_config(&config);
    let request = WorkflowRequest::from_defaults("Analyze AI trends", &config.workflow);

    let report = run_workflow(&registry, &request).await.unwrap();
    assert_eq!(report.steps.len(), 4);
    assert!(report.all_succeeded());
    assert_eq!(report.failed(), 0);
    assert_eq!(report.model.temperature, 0.2);
    assert_eq!(
        report.result_for(AgentKind::Researcher).unwrap()["topic"],
        json!("Analyze AI trends")
    );
    assert_eq!(
        report.result_for(AgentKind::Executor).unwrap()["resources"],
        json!("allocated")
    );

    let kinds: Vec<_> = report.steps.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, AgentKind::all().to_vec());
    assert!(report.statuses.values().all(|s| s.task_history_count == 1));

    let text = serde_json::to_value(&report).unwrap();
    assert_eq!(text["steps"][0]["outcome"]["status"], json!("success"));
}
