mod support;

use std::sync::Arc;
use support::{RecordingSandbox, SandboxCall};
use weave::sandbox::SandboxRuntime;
use weave::session::BuilderSession;
use weave::step::StepStatus;
use weave::tree::mount::{project, MountEntry};
use weave::tree::find_file;

const FIRST_ROUND: &str = r#"<boltArtifact title="Todo App">
<boltAction type="file" filePath="src/App.tsx">A</boltAction>
<boltAction type="file" filePath="src/main.tsx">M</boltAction>
<boltAction type="shell">npm install</boltAction>
</boltArtifact>"#;

const SECOND_ROUND: &str = r#"<boltArtifact title="Styling">
<boltAction type="file" filePath="src/App.tsx">B</boltAction>
<boltAction type="file" filePath="src/index.css">body {}</boltAction>
</boltArtifact>"#;

#[tokio::test]
async fn full_flow_mounts_once_and_edits_write_single_files() {
    let sandbox = RecordingSandbox::new();
    let mut session = BuilderSession::new();
    session
        .attach_sandbox(Arc::clone(&sandbox) as Arc<dyn SandboxRuntime>)
        .await
        .unwrap();

    session.ingest_artifact(FIRST_ROUND);
    let summary = session.reconcile().await;
    assert!(summary.mounted_now);
    assert_eq!(summary.commands, vec!["npm install".to_string()]);
    assert_eq!(sandbox.mount_count(), 1);

    // direct user edit: single-file write, no re-mount
    session.edit_file("/src/App.tsx", "edited").await.unwrap();
    assert_eq!(sandbox.mount_count(), 1);
    assert_eq!(
        sandbox.writes(),
        vec![("src/App.tsx".to_string(), "edited".to_string())]
    );

    // re-projection reflects the edit without touching siblings
    let descriptor = project(session.tree());
    let MountEntry::Directory(src) = &descriptor["src"] else {
        panic!("expected src directory");
    };
    assert_eq!(
        src["App.tsx"],
        MountEntry::File {
            contents: "edited".to_string()
        }
    );
    assert_eq!(
        src["main.tsx"],
        MountEntry::File {
            contents: "M".to_string()
        }
    );
}

#[tokio::test]
async fn later_rounds_override_earlier_files_last_write_wins() {
    let sandbox = RecordingSandbox::new();
    let mut session = BuilderSession::new();
    session
        .attach_sandbox(Arc::clone(&sandbox) as Arc<dyn SandboxRuntime>)
        .await
        .unwrap();

    session.ingest_artifact(FIRST_ROUND);
    session.reconcile().await;
    session.ingest_artifact(SECOND_ROUND);
    session.reconcile().await;

    assert_eq!(
        find_file(session.tree(), "/src/App.tsx")
            .unwrap()
            .content
            .as_deref(),
        Some("B")
    );
    assert!(find_file(session.tree(), "/src/index.css").is_some());
    assert_eq!(session.pending_count(), 0);
}

#[tokio::test]
async fn settled_batch_issues_no_sandbox_traffic() {
    let sandbox = RecordingSandbox::new();
    let mut session = BuilderSession::new();
    session
        .attach_sandbox(Arc::clone(&sandbox) as Arc<dyn SandboxRuntime>)
        .await
        .unwrap();

    session.ingest_artifact(FIRST_ROUND);
    session.reconcile().await;
    let calls_after_first = sandbox.calls().len();

    let summary = session.reconcile().await;
    assert_eq!(summary.completed, 0);
    assert_eq!(sandbox.calls().len(), calls_after_first);
}

#[tokio::test]
async fn reconcile_before_boot_defers_mount_until_attach() {
    let sandbox = RecordingSandbox::new();
    let mut session = BuilderSession::new();

    session.ingest_artifact(FIRST_ROUND);
    let summary = session.reconcile().await;
    assert!(!summary.mounted_now);
    assert_eq!(sandbox.mount_count(), 0);

    session
        .attach_sandbox(Arc::clone(&sandbox) as Arc<dyn SandboxRuntime>)
        .await
        .unwrap();
    assert_eq!(sandbox.mount_count(), 1);
    assert!(session.bridge().is_mounted());
}

#[tokio::test]
async fn conflicting_step_fails_without_crashing_the_batch() {
    let conflicted = r#"<boltArtifact title="Broken">
<boltAction type="file" filePath="src/App.tsx">A</boltAction>
<boltAction type="file" filePath="src/App.tsx/nested.ts">X</boltAction>
<boltAction type="file" filePath="src/ok.ts">ok</boltAction>
</boltArtifact>"#;

    let mut session = BuilderSession::new();
    session.ingest_artifact(conflicted);
    let summary = session.reconcile().await;

    assert_eq!(summary.failed, 1);
    let failed: Vec<_> = session.steps_with_status(StepStatus::Failed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path.as_deref(), Some("src/App.tsx/nested.ts"));
    assert!(find_file(session.tree(), "/src/ok.ts").is_some());
}

#[tokio::test]
async fn run_commands_pass_through_the_bridge() {
    let sandbox = RecordingSandbox::new();
    let mut session = BuilderSession::new();
    session
        .attach_sandbox(Arc::clone(&sandbox) as Arc<dyn SandboxRuntime>)
        .await
        .unwrap();

    session.ingest_artifact(FIRST_ROUND);
    let summary = session.reconcile().await;
    for command in &summary.commands {
        session
            .bridge()
            .run_command("sh", &["-c".to_string(), command.clone()])
            .await
            .unwrap();
    }

    assert!(sandbox.calls().contains(&SandboxCall::Spawn {
        command: "sh".to_string()
    }));
}
