//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    project_dir: PathBuf,
    link_service: LinkService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, project_dir: PathBuf) -> Self {
        Self::with_deps(settings, project_dir, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, project_dir: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        let link_service = LinkService::new(Arc::clone(&fs), settings.separator.clone());
        Self {
            settings: Arc::new(settings),
            fs,
            project_dir,
            link_service,
        }
    }

    pub fn link_service(&self) -> &LinkService {
        &self.link_service
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Manifest location after resolving it against the project directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.settings.manifest_path(&self.project_dir)
    }
}
