//! Toolset definitions stored as KeyValues.
//!
//! ```text
//! "Toolsets"
//! {
//!     "Toolset"
//!     {
//!         "name"      "Hammer (Half-Life 2)"
//!         "platform"  "Windows"
//!         "path"      "Half-Life 2/bin/hammer.exe"
//!         "arg0"      "-nop4"
//!         "arg1"      "-dev"
//!         "vproject"  "Half-Life 2/hl2"
//!     }
//! }
//! ```

use generational_arena::Index;

use crate::domain::arena::KvTree;
use crate::domain::error::{DomainError, DomainResult};

pub const TOOLSETS_BRANCH: &str = "Toolsets";
pub const TOOLSET_BRANCH: &str = "Toolset";

const KEY_NAME: &str = "name";
const KEY_PLATFORM: &str = "platform";
const KEY_PATH: &str = "path";
/// Arguments are stored as `arg0`, `arg1`, ... so repeated values survive
/// leaf deduplication and keep their order.
const KEY_ARG_PREFIX: &str = "arg";
const KEY_VPROJECT: &str = "vproject";

/// An external tool that can be launched against a game install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolset {
    pub name: String,
    /// Platform name as reported by the OS ("Windows", "Linux", "Darwin")
    pub platform: String,
    /// Executable path, relative to the Steam apps directory unless absolute
    pub path: String,
    pub args: Vec<String>,
    /// Game directory exported as `VPROJECT`, relative like `path`
    pub vproject: Option<String>,
}

impl Toolset {
    /// Decode a `Toolset` branch.
    pub fn from_branch(tree: &KvTree, branch: Index) -> DomainResult<Self> {
        let label = tree
            .get(branch)
            .map(|b| b.name.clone())
            .ok_or(DomainError::UnknownBranch)?;

        let optional = |key: &str| -> DomainResult<Option<String>> {
            match tree.leaves_keyed(branch, key).as_slice() {
                [] => Ok(None),
                [leaf] => Ok(Some(leaf.value.clone())),
                _ => Err(DomainError::DuplicateLeaf {
                    branch: label.clone(),
                    key: key.to_string(),
                }),
            }
        };
        let required = |key: &str| -> DomainResult<String> {
            optional(key)?.ok_or_else(|| DomainError::MissingLeaf {
                branch: label.clone(),
                key: key.to_string(),
            })
        };

        Ok(Self {
            name: required(KEY_NAME)?,
            platform: required(KEY_PLATFORM)?,
            path: required(KEY_PATH)?,
            args: decode_args(tree, branch, &label)?,
            vproject: optional(KEY_VPROJECT)?,
        })
    }

    /// Append this toolset as a `Toolset` branch below `parent`.
    pub fn to_branch(&self, tree: &mut KvTree, parent: Index) -> DomainResult<Index> {
        let branch = tree.add_branch(parent, TOOLSET_BRANCH)?;
        tree.add_leaf(branch, KEY_NAME, &self.name)?;
        tree.add_leaf(branch, KEY_PLATFORM, &self.platform)?;
        tree.add_leaf(branch, KEY_PATH, &self.path)?;
        for (pos, arg) in self.args.iter().enumerate() {
            tree.add_leaf(branch, format!("{KEY_ARG_PREFIX}{pos}"), arg)?;
        }
        if let Some(vproject) = &self.vproject {
            tree.add_leaf(branch, KEY_VPROJECT, vproject)?;
        }
        Ok(branch)
    }
}

/// Collect `argN` leaves ordered by `N`. Gaps are allowed, a repeated `N` is not.
fn decode_args(tree: &KvTree, branch: Index, label: &str) -> DomainResult<Vec<String>> {
    let mut positional: Vec<(usize, &str, &str)> = tree
        .get(branch)
        .map(|b| b.leaves())
        .unwrap_or_default()
        .iter()
        .filter_map(|leaf| {
            let pos = leaf.key.strip_prefix(KEY_ARG_PREFIX)?.parse().ok()?;
            Some((pos, leaf.key.as_str(), leaf.value.as_str()))
        })
        .collect();
    positional.sort_by_key(|&(pos, _, _)| pos);

    if let Some(pair) = positional.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(DomainError::DuplicateLeaf {
            branch: label.to_string(),
            key: pair[1].1.to_string(),
        });
    }
    Ok(positional
        .into_iter()
        .map(|(_, _, value)| value.to_string())
        .collect())
}

/// Decode every `Toolset` below the document's `Toolsets` branch.
pub fn decode_all(tree: &KvTree) -> DomainResult<Vec<Toolset>> {
    let toolsets = tree.branch(tree.root(), TOOLSETS_BRANCH)?;
    tree.children_named(toolsets, TOOLSET_BRANCH)
        .into_iter()
        .map(|branch| Toolset::from_branch(tree, branch))
        .collect()
}

/// Build a complete toolsets document.
pub fn encode_all(toolsets: &[Toolset]) -> DomainResult<KvTree> {
    let mut tree = KvTree::new();
    let root = tree.root();
    let parent = tree.add_branch(root, TOOLSETS_BRANCH)?;
    for toolset in toolsets {
        toolset.to_branch(&mut tree, parent)?;
    }
    Ok(tree)
}
