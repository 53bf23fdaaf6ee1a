//! Tree builder: turns a token stream into a [`KvTree`].
//!
//! A bare name descends into a new branch immediately, `}` ascends and `{`
//! carries no structural meaning.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::KvTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::token::{tokenize_line, Token};

/// Incremental tree construction state.
pub struct TreeBuilder {
    tree: KvTree,
    current: Index,
    line_no: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_tree(KvTree::new())
    }

    /// Start from an existing (usually empty) tree, e.g. one with a named root.
    pub fn with_tree(tree: KvTree) -> Self {
        let current = tree.root();
        Self {
            tree,
            current,
            line_no: 0,
        }
    }

    /// Feed one raw line.
    pub fn push_line(&mut self, line: &str) -> DomainResult<()> {
        self.line_no += 1;
        match tokenize_line(line) {
            Some(token) => self.push_token(token),
            None => Ok(()),
        }
    }

    /// Apply one token to the current position.
    pub fn push_token(&mut self, token: Token) -> DomainResult<()> {
        match token {
            Token::Pair { key, value } => {
                self.tree.add_leaf(self.current, key, value)?;
            }
            Token::Open => {}
            Token::Close => {
                let parent = self
                    .tree
                    .get(self.current)
                    .and_then(|branch| branch.parent())
                    .ok_or(DomainError::UnbalancedClose { line: self.line_no })?;
                trace!(line = self.line_no, "ascend");
                self.current = parent;
            }
            Token::Name(name) => {
                trace!(line = self.line_no, name = %name, "descend");
                self.current = self.tree.add_branch(self.current, name)?;
            }
        }
        Ok(())
    }

    /// Finish building. Fails if any branch is still open.
    pub fn finish(self) -> DomainResult<KvTree> {
        if self.current != self.tree.root() {
            let name = self
                .tree
                .get(self.current)
                .map(|branch| branch.name.clone())
                .unwrap_or_default();
            return Err(DomainError::UnclosedBranch { name });
        }
        debug!(branches = self.tree.len(), lines = self.line_no, "parsed document");
        Ok(self.tree)
    }

    /// Parse a whole sequence of lines.
    #[instrument(level = "debug", skip_all)]
    pub fn parse<I, S>(lines: I) -> DomainResult<KvTree>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::new();
        for line in lines {
            builder.push_line(line.as_ref())?;
        }
        builder.finish()
    }

    /// Parse a whole document held in memory.
    pub fn parse_str(text: &str) -> DomainResult<KvTree> {
        Self::parse(text.lines())
    }
}
