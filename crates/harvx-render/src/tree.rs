//! Directory tree rendering, grounded on the tree-builder/renderer split
//! used by path-to-prompt tree tools in the pack: a `BTreeMap`-backed
//! node per directory (sorted for free, deterministic iteration),
//! directories before files at each level, 2-space indentation per
//! depth.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TreeNode {
    dirs: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

/// Builds a text directory tree from slash-separated relative paths
/// already in their final sorted render order.
#[must_use]
pub fn render_directory_tree(paths: &[String]) -> String {
    let mut root = TreeNode::default();
    for path in paths {
        let mut cursor = &mut root;
        let mut parts = path.split('/').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                cursor.files.push(part.to_string());
            } else {
                cursor = cursor.dirs.entry(part.to_string()).or_default();
            }
        }
    }

    let mut lines = Vec::new();
    write_node(&root, 0, &mut lines);
    lines.join("\n")
}

fn write_node(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (name, child) in &node.dirs {
        lines.push(format!("{indent}{name}/"));
        write_node(child, depth + 1, lines);
    }
    for name in &node.files {
        lines.push(format!("{indent}{name}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_sort_before_and_separately_from_files() {
        let paths = vec![
            "Cargo.toml".to_string(),
            "src/lib.rs".to_string(),
            "src/main.rs".to_string(),
            "README.md".to_string(),
        ];
        let tree = render_directory_tree(&paths);
        assert_eq!(tree, "src/\n  lib.rs\n  main.rs\nCargo.toml\nREADME.md");
    }

    #[test]
    fn nested_directories_indent_per_depth() {
        let paths = vec!["a/b/c.rs".to_string(), "a/d.rs".to_string()];
        let tree = render_directory_tree(&paths);
        assert_eq!(tree, "a/\n  b/\n    c.rs\n  d.rs");
    }

    #[test]
    fn empty_input_renders_empty_tree() {
        assert_eq!(render_directory_tree(&[]), "");
    }
}
