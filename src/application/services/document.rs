//! Document service
//!
//! Loads and stores KeyValues documents through the `FileSystem` boundary.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{KvTree, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Service for reading, writing and re-formatting KeyValues files.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a document. The root branch is named after the file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<KvTree> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        self.parse(path, &content)
    }

    /// Parse in-memory `content` as if it had been read from `path`.
    pub fn parse(&self, path: &Path, content: &str) -> ApplicationResult<KvTree> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut builder = TreeBuilder::with_tree(KvTree::with_name(name));
        content
            .lines()
            .try_for_each(|line| builder.push_line(line))
            .and_then(|_| builder.finish())
            .map_err(|source| ApplicationError::Parse {
                path: path.to_path_buf(),
                source,
            })
            .inspect(|tree| debug!("loaded {} branches from {}", tree.len(), path.display()))
    }

    /// Serialize `tree` and write it to `path`, newline-terminated.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &KvTree) -> ApplicationResult<()> {
        let mut content = String::new();
        for line in tree.to_lines() {
            content.push_str(&line);
            content.push('\n');
        }
        self.fs
            .write(path, &content)
            .with_write_context("write document", path)
    }

    /// Parse `path` and return its normalized serialization.
    pub fn format(&self, path: &Path) -> ApplicationResult<String> {
        let tree = self.load(path)?;
        Ok(tree.to_string())
    }
}
