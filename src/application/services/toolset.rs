//! Toolset service
//!
//! Reads toolset definitions and resolves them into launchable requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::DocumentService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{expand_env_vars, toolset, Toolset};
use crate::infrastructure::traits::FileSystem;

/// Environment variable pointing tools at a game directory.
pub const VPROJECT_VAR: &str = "VPROJECT";

/// A resolved, ready-to-start tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub name: String,
    /// Absolute path to the executable
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Value for `VPROJECT`, if the toolset defines one
    pub vproject: Option<PathBuf>,
}

/// Service for loading toolsets and resolving them against a Steam install.
pub struct ToolsetService {
    fs: Arc<dyn FileSystem>,
    documents: DocumentService,
}

impl ToolsetService {
    /// Create a new toolset service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            documents: DocumentService::new(Arc::clone(&fs)),
            fs,
        }
    }

    /// Load all toolset definitions from a KeyValues file.
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Toolset>> {
        let tree = self.documents.load(path)?;
        Ok(toolset::decode_all(&tree)?)
    }

    /// Store toolset definitions as a KeyValues file.
    pub fn save(&self, path: &Path, toolsets: &[Toolset]) -> ApplicationResult<()> {
        let tree = toolset::encode_all(toolsets)?;
        self.documents.save(path, &tree)
    }

    /// Keep the toolsets for `platform` whose executable exists.
    #[instrument(level = "debug", skip(self, toolsets))]
    pub fn discover(
        &self,
        toolsets: &[Toolset],
        platform: &str,
        apps_dir: Option<&Path>,
    ) -> Vec<LaunchRequest> {
        toolsets
            .iter()
            .filter(|t| t.platform == platform)
            .filter_map(|t| {
                let Some(program) = resolve(&t.path, apps_dir) else {
                    debug!("{}: relative path without apps directory", t.name);
                    return None;
                };
                if !self.fs.is_file(&program) {
                    debug!("{}: not installed at {}", t.name, program.display());
                    return None;
                }
                Some(LaunchRequest {
                    name: t.name.clone(),
                    program,
                    args: t.args.clone(),
                    vproject: t.vproject.as_deref().and_then(|v| resolve(v, apps_dir)),
                })
            })
            .collect()
    }

    /// Find an installed toolset by its exact name.
    pub fn find(
        &self,
        toolsets: &[Toolset],
        name: &str,
        platform: &str,
        apps_dir: Option<&Path>,
    ) -> ApplicationResult<LaunchRequest> {
        self.discover(toolsets, platform, apps_dir)
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ApplicationError::ToolsetNotFound(name.to_string()))
    }
}

/// Resolve a `/`-separated tool path against the apps directory.
fn resolve(raw: &str, apps_dir: Option<&Path>) -> Option<PathBuf> {
    let expanded = expand_env_vars(raw);
    let path = PathBuf::from(&expanded);
    if path.is_absolute() {
        return Some(path);
    }
    let mut resolved = apps_dir?.to_path_buf();
    resolved.extend(expanded.split(['/', '\\']).filter(|c| !c.is_empty()));
    Some(resolved)
}
