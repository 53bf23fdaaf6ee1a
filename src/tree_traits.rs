//! Terminal rendering of a [`KvTree`] via `termtree`.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::KvTree;

/// Human-readable rendering for the `tree` command.
///
/// `termtree` nests one `Tree` value per level and renders and drops them
/// recursively, so this is meant for documents of ordinary nesting depth.
/// Parsing, serializing, `depth` and equality have no such limit.
pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for KvTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build(tree: &KvTree, idx: Index, label: String) -> Tree<String> {
            let mut node = Tree::new(label);
            if let Some(branch) = tree.get(idx) {
                for leaf in branch.leaves() {
                    node.push(Tree::new(leaf.to_string()));
                }
                for &child in branch.children() {
                    if let Some(child_branch) = tree.get(child) {
                        node.push(build(tree, child, child_branch.name.clone()));
                    }
                }
            }
            node
        }

        let root_label = self
            .get(self.root())
            .map(|b| b.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "<document>".to_string());
        build(self, self.root(), root_label)
    }
}
