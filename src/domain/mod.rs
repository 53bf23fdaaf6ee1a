//! Domain layer: KeyValues tokens, tree, builder and serializer
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod serializer;
pub mod token;
pub mod toolset;

pub use arena::{Branch, KvTree, Leaf};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use generational_arena::Index;
pub use serializer::Lines;
pub use token::{tokenize, tokenize_line, Token};
pub use toolset::Toolset;

/// Parse a sequence of lines into a document tree.
pub fn parse<I, S>(lines: I) -> DomainResult<KvTree>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TreeBuilder::parse(lines)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Unknown variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
