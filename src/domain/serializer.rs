//! Serializer: lazily renders a branch back into KeyValues lines.

use std::fmt;

use generational_arena::Index;
use itertools::Itertools;

use crate::domain::arena::{KvTree, Leaf};

const INDENT: char = '\t';

enum Step {
    /// Emit the branch header (or flatten it for the document root).
    Enter { idx: Index, depth: usize },
    /// Emit `{` at depth.
    Open { depth: usize },
    /// Emit the leaf at `pos`, then continue with the next one.
    Leaves { idx: Index, pos: usize, depth: usize },
    /// Emit `}` at depth.
    Close { depth: usize },
}

/// Pull-based line iterator over a serialized branch.
///
/// Created by [`KvTree::lines`]. Each call starts from scratch, so the same
/// branch can be serialized any number of times.
pub struct Lines<'a> {
    tree: &'a KvTree,
    stack: Vec<Step>,
}

impl<'a> Lines<'a> {
    fn new(tree: &'a KvTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![Step::Enter { idx: start, depth: 0 }],
        }
    }
}

fn indented(depth: usize, body: &str) -> String {
    let mut line = String::with_capacity(depth + body.len());
    line.extend(std::iter::repeat(INDENT).take(depth));
    line.push_str(body);
    line
}

fn leaf_line(depth: usize, leaf: &Leaf) -> String {
    indented(depth, &format!("\"{}\"\t\"{}\"", leaf.key, leaf.value))
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Enter { idx, depth } => {
                    let Some(branch) = self.tree.get(idx) else {
                        continue;
                    };
                    // the root is flattened: no header, no braces, no extra indent
                    let inner = if branch.is_file() { depth } else { depth + 1 };
                    if !branch.is_file() {
                        self.stack.push(Step::Close { depth });
                    }
                    self.stack.extend(
                        branch
                            .children()
                            .iter()
                            .rev()
                            .map(|&child| Step::Enter { idx: child, depth: inner }),
                    );
                    self.stack.push(Step::Leaves {
                        idx,
                        pos: 0,
                        depth: inner,
                    });
                    if !branch.is_file() {
                        self.stack.push(Step::Open { depth });
                        return Some(indented(depth, &format!("\"{}\"", branch.name)));
                    }
                }
                Step::Open { depth } => return Some(indented(depth, "{")),
                Step::Close { depth } => return Some(indented(depth, "}")),
                Step::Leaves { idx, pos, depth } => {
                    let leaf = self.tree.get(idx).and_then(|b| b.leaves().get(pos));
                    if let Some(leaf) = leaf {
                        self.stack.push(Step::Leaves {
                            idx,
                            pos: pos + 1,
                            depth,
                        });
                        return Some(leaf_line(depth, leaf));
                    }
                }
            }
        }
        None
    }
}

impl KvTree {
    /// Serialize `branch` and everything below it.
    pub fn lines(&self, branch: Index) -> Lines<'_> {
        Lines::new(self, branch)
    }

    /// Serialize the whole document.
    pub fn to_lines(&self) -> Lines<'_> {
        self.lines(self.root())
    }
}

impl fmt::Display for KvTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;

    #[test]
    fn given_nested_tree_when_serializing_then_emits_tab_indented_lines() {
        let mut tree = KvTree::new();
        let root = tree.root();
        tree.add_leaf(root, "version", "1").unwrap();
        let game_info = tree.add_branch(root, "GameInfo").unwrap();
        tree.add_leaf(game_info, "game", "Half-Life 2").unwrap();
        let tools = tree.add_branch(game_info, "Tools").unwrap();
        tree.add_leaf(tools, "platform", "Windows").unwrap();

        let lines: Vec<_> = tree.to_lines().collect();
        assert_eq!(
            lines,
            vec![
                "\"version\"\t\"1\"",
                "\"GameInfo\"",
                "{",
                "\t\"game\"\t\"Half-Life 2\"",
                "\t\"Tools\"",
                "\t{",
                "\t\t\"platform\"\t\"Windows\"",
                "\t}",
                "}",
            ]
        );
    }

    #[test]
    fn given_inner_branch_when_serializing_then_starts_unindented() {
        let tree = TreeBuilder::parse(["A", "{", "B", "{", "k v", "}", "}"]).unwrap();
        let a = tree.branch(tree.root(), "A").unwrap();
        let b = tree.branch(a, "B").unwrap();
        let lines: Vec<_> = tree.lines(b).collect();
        assert_eq!(lines, vec!["\"B\"", "{", "\t\"k\"\t\"v\"", "}"]);
    }

    #[test]
    fn given_empty_tree_when_serializing_then_no_lines() {
        assert_eq!(KvTree::new().to_lines().count(), 0);
        assert_eq!(KvTree::new().to_string(), "");
    }

    #[test]
    fn given_tree_when_serialized_twice_then_output_is_identical() {
        let tree = TreeBuilder::parse(["A", "{", "k v", "}"]).unwrap();
        let first: Vec<_> = tree.to_lines().collect();
        let second: Vec<_> = tree.to_lines().collect();
        assert_eq!(first, second);
    }
}
