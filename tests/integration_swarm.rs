//! End-to-end swarm tests
//!
//! Runs the full Planner -> Manager -> Orchestrator pipeline against scripted
//! gateways and a temporary project root.

use std::sync::Arc;
use std::time::Duration;

use codeswarm::error::{Result, SwarmError};
use codeswarm::gateway::{RetryPolicy, RetryingGateway, ScriptedGateway};
use codeswarm::llm::{CompletionResponse, LlmError, MockLlmClient};
use codeswarm::orchestrator::{LoopOutcome, Pipeline, RecordingObserver, RunEvent, RunSettings};
use codeswarm::prompt::PromptSet;
use codeswarm::roles::{Language, Role, WorkerId};
use codeswarm::storage::{BlobStore, FsBlobStore};
use tempfile::TempDir;

fn settings(language: Language, workers: usize) -> RunSettings {
    RunSettings {
        language,
        checklist: "README.md".to_string(),
        workers,
        pause: Duration::ZERO,
        clean: false,
    }
}

fn scripted(outputs: &[Option<&str>]) -> Arc<ScriptedGateway> {
    Arc::new(ScriptedGateway::new(
        outputs.iter().map(|o| o.map(str::to_string)).collect(),
    ))
}

/// Scenario A: hello world in one task
#[tokio::test]
async fn test_hello_world_project() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path().join("Project")));
    let gateway = scripted(&[
        Some("Write a single Python script that prints a greeting."),
        Some("```markdown\n- [ ] `main.py` print hello world\n```"),
        Some("```python\nprint('Hello, World!')\n```"),
    ]);
    let observer = Arc::new(RecordingObserver::new());
    let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::Python, 2))
        .with_observer(observer.clone());

    let summary = pipeline.run("hello world").await?;

    assert_eq!(summary.outcome, LoopOutcome::Completed);
    assert_eq!(summary.tasks_completed, 1);
    assert_eq!(summary.open_remaining, 0);
    assert_eq!(store.read("README.md")?, "- [x] `main.py` print hello world");
    assert_eq!(store.read("main.py")?, "print('Hello, World!')");
    assert_eq!(summary.artifacts, vec!["README.md", "main.py"]);
    assert_eq!(gateway.call_count(), 3);

    let events = observer.events();
    assert!(matches!(events.first(), Some(RunEvent::PlanReady { .. })));
    assert!(events.contains(&RunEvent::ChecklistWritten { open: 1 }));
    assert!(matches!(events.last(), Some(RunEvent::RunFinished { outcome: LoopOutcome::Completed })));
    Ok(())
}

/// Scenario B: two tasks on one artifact, the second sees the first's output
#[tokio::test]
async fn test_same_artifact_last_write_wins() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[
        Some("A small express server."),
        Some("- [ ] `app.js` create server\n- [ ] `app.js` add routes\n"),
        Some("```javascript\nconst v = 1;\n```"),
        Some("```javascript\nconst v = 2;\n```"),
    ]);
    let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::JavaScript, 2));

    let summary = pipeline.run("server please").await?;

    assert!(summary.is_success());
    assert_eq!(store.read("app.js")?, "const v = 2;");
    assert_eq!(store.read("README.md")?, "- [x] `app.js` create server\n- [x] `app.js` add routes");

    let calls = gateway.calls();
    assert!(calls[3].user.contains("```javascript\nconst v = 1;\n```"));
    Ok(())
}

/// Scenario C: no target and no fallback halts before any worker call
#[tokio::test]
async fn test_unresolvable_target_halts() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[Some("Docs only."), Some("- [ ] write documentation"), Some("never used")]);
    let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::Python, 2));

    let summary = pipeline.run("docs").await?;

    match &summary.outcome {
        LoopOutcome::Halted { task, reason } => {
            assert_eq!(task.description, "write documentation");
            assert!(reason.contains("No target artifact"));
        }
        other => panic!("expected halt, got {:?}", other),
    }
    assert_eq!(gateway.call_count(), 2);
    assert_eq!(summary.artifacts, vec!["README.md"]);
    assert_eq!(summary.open_remaining, 1);
    Ok(())
}

/// Scenario D: manager exhaustion aborts the run, no checklist is created
#[tokio::test]
async fn test_manager_exhaustion_aborts() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[Some("directive"), None]);
    let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::Go, 2));

    let err = pipeline.run("anything").await.unwrap_err();

    assert!(matches!(err, SwarmError::GatewayExhausted { role: Role::Manager }));
    assert!(!store.exists("README.md")?);
    assert!(store.list()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_planner_exhaustion_aborts() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[]);
    let pipeline = Pipeline::new(gateway.clone(), store, PromptSet::builtin()?, settings(Language::Python, 2));

    let err = pipeline.run("anything").await.unwrap_err();

    assert!(matches!(err, SwarmError::GatewayExhausted { role: Role::Planner }));
    assert_eq!(gateway.call_count(), 1);
    Ok(())
}

/// A fixed stub gives the same project twice
#[tokio::test]
async fn test_worker_idempotence() -> Result<()> {
    let outputs = [
        Some("directive"),
        Some("- [ ] `main.rb` greet\n- [ ] `lib.rb` helpers\n"),
        Some("puts 'hi'"),
        Some("def helper; end"),
    ];

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let temp = TempDir::new()?;
        let store = Arc::new(FsBlobStore::new(temp.path()));
        let gateway = scripted(&outputs);
        let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::Ruby, 3));
        pipeline.run("ruby greeter").await?;

        let files: Vec<(String, String)> = store
            .list()?
            .into_iter()
            .map(|name| {
                let content = store.read(&name).unwrap();
                (name, content)
            })
            .collect();
        snapshots.push((files, gateway.calls()));
    }

    assert_eq!(snapshots[0], snapshots[1]);
    Ok(())
}

#[tokio::test]
async fn test_round_robin_over_pool() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[
        Some("directive"),
        Some("- [ ] `a.go` one\n- [ ] `b.go` two\n- [ ] `c.go` three\n- [ ] `d.go` four\n"),
        Some("1"),
        Some("2"),
        Some("3"),
        Some("4"),
    ]);
    let observer = Arc::new(RecordingObserver::new());
    let pipeline = Pipeline::new(gateway, store, PromptSet::builtin()?, settings(Language::Go, 3))
        .with_observer(observer.clone());

    pipeline.run("go tool").await?;

    assert_eq!(
        observer.dispatch_labels(),
        vec![WorkerId(1), WorkerId(2), WorkerId(3), WorkerId(1)]
    );
    Ok(())
}

/// Items without a file all land in the first file named anywhere
#[tokio::test]
async fn test_lazy_main_artifact_fallback() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[
        Some("directive"),
        Some("- [ ] scaffold the page\n- [ ] `index.html` layout\n- [ ] polish styles\n"),
        Some("<p>scaffold</p>"),
        Some("<p>layout</p>"),
        Some("<p>polished</p>"),
    ]);
    let observer = Arc::new(RecordingObserver::new());
    let pipeline = Pipeline::new(gateway, store.clone(), PromptSet::builtin()?, settings(Language::HtmlCss, 2))
        .with_observer(observer.clone());

    let summary = pipeline.run("landing page").await?;

    assert!(summary.is_success());
    assert_eq!(summary.artifacts, vec!["README.md", "index.html"]);
    assert_eq!(store.read("index.html")?, "<p>polished</p>");
    let inferred = observer
        .events()
        .iter()
        .filter(|e| matches!(e, RunEvent::MainArtifactInferred { .. }))
        .count();
    assert_eq!(inferred, 1);
    Ok(())
}

/// Full stack: retrying gateway over a mock client
#[tokio::test]
async fn test_pipeline_over_retrying_gateway() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let client = MockLlmClient::new(vec![
        Ok(CompletionResponse::text("directive")),
        Err(LlmError::ApiError {
            status: 503,
            message: "busy".into(),
        }),
        Ok(CompletionResponse::text("- [ ] `main.ts` entry")),
        Ok(CompletionResponse::text("")),
        Ok(CompletionResponse::text("```typescript\nexport {};\n```")),
    ]);
    let gateway = Arc::new(RetryingGateway::new(client, RetryPolicy::new(3, Duration::ZERO)));
    let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin()?, settings(Language::TypeScript, 2));

    let summary = pipeline.run("ts module").await?;

    assert!(summary.is_success());
    assert_eq!(store.read("main.ts")?, "export {};");
    assert_eq!(gateway.client().call_count(), 5);
    Ok(())
}

#[tokio::test]
async fn test_worker_exhaustion_halts_with_partial_output() -> Result<()> {
    let temp = TempDir::new()?;
    let store = Arc::new(FsBlobStore::new(temp.path()));
    let gateway = scripted(&[
        Some("directive"),
        Some("- [ ] `a.py` one\n- [ ] `b.py` two\n"),
        Some("A"),
        None,
    ]);
    let pipeline = Pipeline::new(gateway, store.clone(), PromptSet::builtin()?, settings(Language::Python, 2));

    let summary = pipeline.run("two files").await?;

    assert!(!summary.is_success());
    assert_eq!(summary.tasks_completed, 1);
    assert_eq!(summary.open_remaining, 1);
    assert_eq!(store.read("a.py")?, "A");
    assert!(!store.exists("b.py")?);
    Ok(())
}
