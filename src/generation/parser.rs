//! Artifact step parser
//!
//! Parses the XML-like artifact language the backend emits into build steps.
//! The wire schema (one `<boltArtifact>` wrapping `<boltAction>` elements)
//! is the backend's contract; this module follows it, it does not redefine
//! it. Unknown action types are skipped, everything parsed starts pending.

use crate::step::{BuildStep, StepId, StepKind, StepStatus};

const ARTIFACT_OPEN: &str = "<boltArtifact";
const ARTIFACT_CLOSE: &str = "</boltArtifact>";
const ACTION_OPEN: &str = "<boltAction";
const ACTION_CLOSE: &str = "</boltAction>";

/// Parse one artifact block out of raw generated text.
///
/// Returns an empty vec when the text carries no artifact. The first step
/// is the artifact's title (a folder-level marker the UI shows as the batch
/// heading); file actions become `CreateFile` steps and shell actions become
/// `RunCommand` steps, ids allocated from `start_id`.
pub fn parse_artifact(text: &str, start_id: StepId) -> Vec<BuildStep> {
    let Some(open) = text.find(ARTIFACT_OPEN) else {
        return Vec::new();
    };
    let Some(tag_len) = text[open..].find('>') else {
        return Vec::new();
    };
    let artifact_tag = &text[open..open + tag_len];
    let body_start = open + tag_len + 1;
    let body_end = text[body_start..]
        .find(ARTIFACT_CLOSE)
        .map(|i| body_start + i)
        .unwrap_or(text.len());
    let body = &text[body_start..body_end];

    let title = attr_value(artifact_tag, "title").unwrap_or("Project Files");
    let mut next_id = start_id;
    let mut steps = vec![BuildStep {
        id: next_id,
        title: title.to_string(),
        kind: StepKind::CreateFolder,
        path: None,
        code: None,
        status: StepStatus::Pending,
        failure: None,
    }];
    next_id += 1;

    let mut rest = body;
    while let Some(at) = rest.find(ACTION_OPEN) {
        let after = &rest[at..];
        let Some(tag_len) = after.find('>') else {
            break;
        };
        let action_tag = &after[..tag_len];
        let content_start = tag_len + 1;
        let (content, remainder) = match after[content_start..].find(ACTION_CLOSE) {
            Some(end) => (
                &after[content_start..content_start + end],
                &after[content_start + end + ACTION_CLOSE.len()..],
            ),
            None => (&after[content_start..], ""),
        };

        match attr_value(action_tag, "type") {
            Some("file") => {
                if let Some(path) = attr_value(action_tag, "filePath") {
                    steps.push(BuildStep::create_file(next_id, path, content.trim()));
                    next_id += 1;
                }
            }
            Some("shell") => {
                steps.push(BuildStep::run_command(next_id, content.trim()));
                next_id += 1;
            }
            _ => {}
        }

        rest = remainder;
    }

    steps
}

fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Sure, here is your project:
<boltArtifact id="todo-app" title="Todo App">
  <boltAction type="file" filePath="src/App.tsx">
export default function App() { return null; }
  </boltAction>
  <boltAction type="file" filePath="package.json">{ "name": "todo" }</boltAction>
  <boltAction type="shell">npm install</boltAction>
</boltArtifact>
Let me know if you need changes."#;

    #[test]
    fn parses_title_files_and_commands() {
        let steps = parse_artifact(SAMPLE, 1);
        assert_eq!(steps.len(), 4);

        assert_eq!(steps[0].title, "Todo App");
        assert_eq!(steps[0].kind, StepKind::CreateFolder);

        assert_eq!(steps[1].kind, StepKind::CreateFile);
        assert_eq!(steps[1].path.as_deref(), Some("src/App.tsx"));
        assert_eq!(
            steps[1].code.as_deref(),
            Some("export default function App() { return null; }")
        );

        assert_eq!(steps[2].path.as_deref(), Some("package.json"));

        assert_eq!(steps[3].kind, StepKind::RunCommand);
        assert_eq!(steps[3].code.as_deref(), Some("npm install"));

        assert!(steps.iter().all(|s| s.status == StepStatus::Pending));
        assert_eq!(
            steps.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn text_without_artifact_yields_no_steps() {
        assert!(parse_artifact("no steps here", 1).is_empty());
    }

    #[test]
    fn unterminated_artifact_is_parsed_to_end_of_text() {
        let text = r#"<boltArtifact title="Partial"><boltAction type="file" filePath="a.txt">A</boltAction>"#;
        let steps = parse_artifact(text, 10);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].path.as_deref(), Some("a.txt"));
        assert_eq!(steps[1].code.as_deref(), Some("A"));
    }

    #[test]
    fn unknown_action_types_are_skipped() {
        let text = r#"<boltArtifact title="T"><boltAction type="binary" filePath="x">zz</boltAction></boltArtifact>"#;
        let steps = parse_artifact(text, 1);
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn missing_title_falls_back_to_default() {
        let text = r#"<boltArtifact id="x"></boltArtifact>"#;
        let steps = parse_artifact(text, 1);
        assert_eq!(steps[0].title, "Project Files");
    }
}
