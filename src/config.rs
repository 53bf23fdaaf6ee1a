//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kvtree/kvtree.toml`
//! 3. Environment variables: `KVTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Unified configuration for kvtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// KeyValues file holding toolset definitions
    pub tools_file: PathBuf,
    /// Steam `steamapps/common` directory that relative tool paths resolve against
    pub steam_apps_dir: Option<PathBuf>,
    /// Platform name toolsets are filtered by ("Windows", "Linux", "Darwin")
    pub platform: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tools_file: global_config_dir()
                .map(|dir| dir.join("toolsets.txt"))
                .unwrap_or_else(|| PathBuf::from("toolsets.txt")),
            steam_apps_dir: default_steam_apps_dir(),
            platform: current_platform().to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tools_file: Option<PathBuf>,
    pub steam_apps_dir: Option<PathBuf>,
    pub platform: Option<String>,
}

/// Platform name in the spelling toolset definitions use.
pub fn current_platform() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "Darwin",
        "linux" => "Linux",
        other => other,
    }
}

/// Default Steam apps directory; only known for Windows installs.
fn default_steam_apps_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        std::env::var_os("PROGRAMFILES(X86)")
            .map(|pf| PathBuf::from(pf).join("Steam").join("steamapps").join("common"))
    } else {
        None
    }
}

/// Get the XDG config directory for kvtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kvtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kvtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.tools_file.to_string_lossy().as_ref());
        self.tools_file = PathBuf::from(expanded);

        if let Some(dir) = &self.steam_apps_dir {
            self.steam_apps_dir = Some(PathBuf::from(expand_env_vars(
                dir.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            tools_file: overlay
                .tools_file
                .clone()
                .unwrap_or_else(|| self.tools_file.clone()),
            steam_apps_dir: overlay
                .steam_apps_dir
                .clone()
                .or_else(|| self.steam_apps_dir.clone()),
            platform: overlay
                .platform
                .clone()
                .unwrap_or_else(|| self.platform.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `config_file` replaces the global config location when given.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        let path = config_file
            .map(Path::to_path_buf)
            .or_else(global_config_path);
        if let Some(path) = path {
            if path.exists() {
                let raw = load_raw_settings(&path)?;
                current = current.merge_with(&raw);
            } else if config_file.is_some() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply KVTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("KVTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tools_file") {
            settings.tools_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("steam_apps_dir") {
            settings.steam_apps_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("platform") {
            settings.platform = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# kvtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/kvtree/kvtree.toml
#   Env:    KVTREE_* environment variables (explicit overrides)

# KeyValues file with "Toolsets" definitions
# tools_file = "~/.config/kvtree/toolsets.txt"

# Directory relative tool paths are resolved against
# steam_apps_dir = "C:/Program Files (x86)/Steam/steamapps/common"

# Only toolsets for this platform are offered ("Windows", "Linux", "Darwin")
# platform = "Windows"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
