//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DocumentService, ToolsetService};
use crate::config::Settings;
use crate::infrastructure::launcher::ToolLauncher;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub documents: DocumentService,
    pub toolsets: ToolsetService,
    pub launcher: ToolLauncher,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            documents: DocumentService::new(Arc::clone(&fs)),
            toolsets: ToolsetService::new(Arc::clone(&fs)),
            launcher: ToolLauncher::new(),
            fs,
        }
    }
}
