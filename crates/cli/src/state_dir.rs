//! Platform-specific state directory management

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Manages platform-specific application directories
pub struct StateDir {
    /// Project directories from the directories crate
    project_dirs: Option<ProjectDirs>,
    /// Override directory for testing or custom installations
    override_dir: Option<PathBuf>,
}

impl StateDir {
    /// Resolve directories, preferring `override_dir`, then `WAYPOINT_STATE_DIR`
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        let override_dir =
            override_dir.or_else(|| std::env::var_os("WAYPOINT_STATE_DIR").map(PathBuf::from));
        if override_dir.is_some() {
            return Self {
                project_dirs: None,
                override_dir,
            };
        }

        let project_dirs = ProjectDirs::from("dev", "Waypoint", "waypoint");
        if project_dirs.is_none() {
            warn!("Failed to determine platform-specific directories, will use fallback");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    /// Get the configuration directory
    pub fn config_dir(&self) -> PathBuf {
        self.resolve("config", ProjectDirs::config_dir)
    }

    /// Get the data directory for persistent storage
    pub fn data_dir(&self) -> PathBuf {
        self.resolve("data", ProjectDirs::data_dir)
    }

    /// File holding the persisted session token
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    fn resolve(&self, name: &str, platform: fn(&ProjectDirs) -> &Path) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join(name);
        }

        self.project_dirs.as_ref().map_or_else(
            // Fallback to current directory
            || PathBuf::from(".").join(name),
            |dirs| platform(dirs).to_path_buf(),
        )
    }
}
