//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treelink/treelink.toml`
//! 3. Project config: `<project_dir>/.treelink.toml`
//! 4. Environment variables: `TREELINK_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DEFAULT_SEPARATOR};

/// How query results are printed. Names are matched case-insensitively in
/// config files and environment variables alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    /// One branch per tree, one leaf per path
    #[default]
    Tree,
    /// One `tree:path` line per node
    Plain,
}

impl FromStr for OutputFormat {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "plain" => Ok(Self::Plain),
            other => Err(ApplicationError::Config {
                message: format!("unknown output format '{}' (expected tree or plain)", other),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ApplicationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => f.write_str("tree"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub manifest: Option<PathBuf>,
    pub separator: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Unified configuration for treelink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Link manifest (default: links.toml, relative to the project directory)
    pub manifest: PathBuf,
    /// Separator between path segments in node specs (default: ".")
    pub separator: String,
    /// Output format for query results
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("links.toml"),
            separator: DEFAULT_SEPARATOR.to_string(),
            format: OutputFormat::default(),
        }
    }
}

/// Get the XDG config directory for treelink.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treelink").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treelink.toml"))
}

/// Get the path to the project config file.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".treelink.toml")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
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
    /// Expand shell variables and tilde in the manifest path.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.manifest.to_string_lossy().as_ref());
        self.manifest = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base). Overlay wins if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            manifest: overlay
                .manifest
                .clone()
                .unwrap_or_else(|| self.manifest.clone()),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
            format: overlay.format.unwrap_or(self.format),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for the local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = project_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply TREELINK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREELINK").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("manifest") {
            settings.manifest = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = val.parse()?;
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.separator.is_empty() {
            return Err(ApplicationError::Config {
                message: "separator must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The manifest path, resolved against `project_dir` when relative.
    pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
        if self.manifest.is_absolute() {
            self.manifest.clone()
        } else {
            project_dir.join(&self.manifest)
        }
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
