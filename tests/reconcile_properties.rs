//! Property tests for the reconciler and mount projection.

use proptest::prelude::*;
use std::collections::HashMap;
use weave::step::queue::reconcile_batch;
use weave::step::BuildStep;
use weave::tree::mount::{project, MountEntry};
use weave::tree::reconciler::apply_step;
use weave::tree::{collect_files, FileTreeNode};

/// Conflict-free virtual paths: folder segments and file names are drawn
/// from disjoint alphabets, so a file path never shadows a folder path.
fn path_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec(0..3usize, 0..3), 0..4usize).prop_map(|(dirs, file)| {
        let mut segments: Vec<String> = dirs.into_iter().map(|d| format!("dir{d}")).collect();
        segments.push(format!("file{file}.txt"));
        segments.join("/")
    })
}

fn steps_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((path_strategy(), "[a-z]{0,6}"), 1..12)
}

fn apply_all(specs: &[(String, String)]) -> Vec<FileTreeNode> {
    let mut tree: Vec<FileTreeNode> = Vec::new();
    for (idx, (path, code)) in specs.iter().enumerate() {
        tree = apply_step(&tree, &BuildStep::create_file(idx as u64 + 1, path, code)).unwrap();
    }
    tree
}

fn flatten_descriptor(
    entries: &std::collections::BTreeMap<String, MountEntry>,
    prefix: &str,
    out: &mut Vec<(String, String)>,
) {
    for (name, entry) in entries {
        let path = format!("{prefix}/{name}");
        match entry {
            MountEntry::Directory(children) => flatten_descriptor(children, &path, out),
            MountEntry::File { contents } => out.push((path, contents.clone())),
        }
    }
}

proptest! {
    #[test]
    fn last_write_wins_for_every_path(specs in steps_strategy()) {
        let tree = apply_all(&specs);

        let mut expected: HashMap<String, String> = HashMap::new();
        for (path, code) in &specs {
            expected.insert(format!("/{path}"), code.clone());
        }

        let actual: HashMap<String, String> = collect_files(&tree).into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn reapplying_the_whole_sequence_is_idempotent(specs in steps_strategy()) {
        let once = apply_all(&specs);
        let mut twice = once.clone();
        for (idx, (path, code)) in specs.iter().enumerate() {
            twice = apply_step(&twice, &BuildStep::create_file(idx as u64 + 1, path, code)).unwrap();
        }
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn exactly_one_folder_node_per_distinct_prefix(specs in steps_strategy()) {
        let tree = apply_all(&specs);

        fn check_unique_names(nodes: &[FileTreeNode]) -> bool {
            let mut names: Vec<&str> = nodes.iter().map(|n| n.name()).collect();
            names.sort_unstable();
            let unique = names.windows(2).all(|w| w[0] != w[1]);
            unique
                && nodes.iter().all(|n| match n {
                    FileTreeNode::Folder(f) => check_unique_names(&f.children),
                    FileTreeNode::File(_) => true,
                })
        }
        prop_assert!(check_unique_names(&tree));
    }

    #[test]
    fn projection_round_trips_path_content_pairs(specs in steps_strategy()) {
        let tree = apply_all(&specs);

        let mut from_descriptor = Vec::new();
        flatten_descriptor(&project(&tree), "", &mut from_descriptor);
        from_descriptor.sort();

        let mut from_tree = collect_files(&tree);
        from_tree.sort();

        prop_assert_eq!(from_descriptor, from_tree);
    }

    #[test]
    fn batch_reconcile_matches_sequential_application(specs in steps_strategy()) {
        let mut steps: Vec<BuildStep> = specs
            .iter()
            .enumerate()
            .map(|(idx, (path, code))| BuildStep::create_file(idx as u64 + 1, path, code))
            .collect();

        let outcome = reconcile_batch(&[], &mut steps);
        let batched = outcome.tree.unwrap_or_default();
        let sequential = apply_all(&specs);

        prop_assert_eq!(batched, sequential);
        prop_assert!(steps.iter().all(|s| !s.is_pending()));
    }
}
