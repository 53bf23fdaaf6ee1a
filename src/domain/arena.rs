//! Arena-backed KeyValues tree.
//!
//! Branches live in a generational arena and refer to each other by
//! [`Index`]. The parent link is a plain handle and never owns anything,
//! so the tree has no reference cycles.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered `(key, value)` pair attached to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Leaf {
    pub key: String,
    pub value: String,
}

impl Leaf {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// Tree node: either a named block or the synthetic document root.
#[derive(Debug, Clone)]
pub struct Branch {
    pub name: String,
    parent: Option<Index>,
    is_file: bool,
    leaves: Vec<Leaf>,
    children: Vec<Index>,
}

impl Branch {
    fn new(name: impl Into<String>, parent: Option<Index>, is_file: bool) -> Self {
        Self {
            name: name.into(),
            parent,
            is_file,
            leaves: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Index of the owning branch in the arena, None for the root
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// True only for the root representing the whole document
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Child handles in insertion order.
    pub fn children(&self) -> &[Index] {
        &self.children
    }
}

/// A parsed KeyValues document.
#[derive(Debug, Clone)]
pub struct KvTree {
    arena: Arena<Branch>,
    root: Index,
}

impl Default for KvTree {
    fn default() -> Self {
        Self::new()
    }
}

impl KvTree {
    /// Create a tree holding only an empty document root.
    pub fn new() -> Self {
        Self::with_name("")
    }

    /// Create a tree whose root carries `name` (usually the file name).
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Branch::new(name, None, true));
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&Branch> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut Branch> {
        self.arena.get_mut(idx)
    }

    fn branch_ref(&self, idx: Index) -> DomainResult<&Branch> {
        self.arena.get(idx).ok_or(DomainError::UnknownBranch)
    }

    fn branch_mut(&mut self, idx: Index) -> DomainResult<&mut Branch> {
        self.arena.get_mut(idx).ok_or(DomainError::UnknownBranch)
    }

    /// Number of branches, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Always false: the root exists for the lifetime of the tree.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Create a new branch named `name` as the last child of `parent`.
    #[instrument(level = "trace", skip(self, name))]
    pub fn add_branch(&mut self, parent: Index, name: impl Into<String>) -> DomainResult<Index> {
        self.branch_ref(parent)?;
        let idx = self.arena.insert(Branch::new(name, Some(parent), false));
        self.branch_mut(parent)?.children.push(idx);
        Ok(idx)
    }

    /// Make `child` the last child of `parent`, detaching it from its previous owner.
    ///
    /// No-op when `child` already belongs to `parent`. Moving a branch below
    /// itself or one of its descendants is rejected.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, child: Index, parent: Index) -> DomainResult<()> {
        let old_parent = self.branch_ref(child)?.parent;
        self.branch_ref(parent)?;

        if old_parent == Some(parent) {
            return Ok(());
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomainError::CycleDetected(self.branch_ref(child)?.name.clone()));
        }

        if let Some(old) = old_parent {
            self.branch_mut(old)?.children.retain(|&c| c != child);
        }
        self.branch_mut(child)?.parent = Some(parent);
        let siblings = &mut self.branch_mut(parent)?.children;
        if !siblings.contains(&child) {
            siblings.push(child);
        }
        trace!("re-parented branch");
        Ok(())
    }

    /// Append a leaf. Returns false if the identical pair is already present.
    pub fn add_leaf(
        &mut self,
        branch: Index,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> DomainResult<bool> {
        let leaf = Leaf::new(key, value);
        let leaves = &mut self.branch_mut(branch)?.leaves;
        if leaves.contains(&leaf) {
            return Ok(false);
        }
        leaves.push(leaf);
        Ok(true)
    }

    /// Handles from `idx` up to the root, starting with `idx` itself.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.arena.contains(idx).then_some(idx),
        }
    }

    /// Immediate children of `parent` whose name matches exactly.
    pub fn children_named(&self, parent: Index, name: &str) -> Vec<Index> {
        self.get(parent)
            .map(|branch| {
                branch
                    .children
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).is_some_and(|b| b.name == name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Leaves of `branch` whose key matches exactly.
    pub fn leaves_keyed(&self, branch: Index, key: &str) -> Vec<&Leaf> {
        self.get(branch)
            .map(|b| b.leaves.iter().filter(|l| l.key == key).collect())
            .unwrap_or_default()
    }

    /// The single child of `parent` named `name`.
    ///
    /// Fails with `BranchNotFound` on zero matches and `AmbiguousBranch` on
    /// more than one.
    pub fn branch(&self, parent: Index, name: &str) -> DomainResult<Index> {
        self.branch_ref(parent)?;
        match self.children_named(parent, name).as_slice() {
            [] => Err(DomainError::BranchNotFound(name.to_string())),
            [only] => Ok(*only),
            many => Err(DomainError::AmbiguousBranch {
                name: name.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Follow `path` from `start` with the strict single-child accessor.
    pub fn branch_path<S: AsRef<str>>(&self, start: Index, path: &[S]) -> DomainResult<Index> {
        path.iter()
            .try_fold(start, |current, name| self.branch(current, name.as_ref()))
    }

    /// Deep-copy `source` (a branch of `other`) as the last child of `parent`.
    ///
    /// A copied document root becomes an ordinary branch.
    #[instrument(level = "debug", skip(self, other))]
    pub fn graft(&mut self, parent: Index, other: &KvTree, source: Index) -> DomainResult<Index> {
        let src = other.branch_ref(source)?;
        let copy = self.add_branch(parent, src.name.clone())?;
        let mut stack = vec![(source, copy)];

        while let Some((from, to)) = stack.pop() {
            let from_branch = other.branch_ref(from)?;
            self.branch_mut(to)?.leaves = from_branch.leaves.clone();
            for &child in &from_branch.children {
                let name = other.branch_ref(child)?.name.clone();
                let new_child = self.add_branch(to, name)?;
                stack.push((child, new_child));
            }
        }
        Ok(copy)
    }

    /// Nesting depth below the root; a document without branches has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(branch) = self.get(idx) {
                stack.extend(branch.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        max_depth
    }

    /// Preorder traversal starting at the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    fn same_shape(&self, a: Index, other: &KvTree, b: Index) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            let (Some(x), Some(y)) = (self.get(a), other.get(b)) else {
                return false;
            };
            if x.name != y.name
                || x.is_file != y.is_file
                || x.leaves != y.leaves
                || x.children.len() != y.children.len()
            {
                return false;
            }
            pending.extend(x.children.iter().copied().zip(y.children.iter().copied()));
        }
        true
    }
}

/// Structural equality: names, leaves, order and nesting. Handles are ignored.
/// The root names are not compared since they only label the source.
impl PartialEq for KvTree {
    fn eq(&self, other: &Self) -> bool {
        match (self.get(self.root), other.get(other.root)) {
            (Some(a), Some(b)) => {
                a.leaves == b.leaves
                    && a.children.len() == b.children.len()
                    && a.children
                        .iter()
                        .zip(&b.children)
                        .all(|(&ca, &cb)| self.same_shape(ca, other, cb))
            }
            _ => false,
        }
    }
}

impl Eq for KvTree {}

pub struct Ancestors<'a> {
    tree: &'a KvTree,
    next: Option<Index>,
}

impl Iterator for Ancestors<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|b| b.parent);
        Some(current)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a KvTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a KvTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a Branch);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(branch) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(branch.children.iter().rev());
                return Some((current, branch));
            }
        }
        None
    }
}
