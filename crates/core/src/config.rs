//! Configuration management for Prompter.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.prompter/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The configuration is workspace-centric: the prompts
//! directory and the provider override file both resolve against the
//! workspace root unless given as absolute paths.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default prompts directory, relative to the workspace.
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Default provider override file, relative to the prompts directory.
pub const DEFAULT_PROVIDERS_FILE: &str = "providers.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .prompter/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory holding prompt records
    pub prompts_dir: PathBuf,

    /// Provider override file
    pub providers_file: PathBuf,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    prompts: Option<PromptsSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptsSection {
    dir: Option<String>,
    #[serde(rename = "providersFile")]
    providers_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            providers_file: PathBuf::from(DEFAULT_PROVIDERS_FILE),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `PROMPTER_WORKSPACE`: Override workspace path
    /// - `PROMPTER_CONFIG`: Path to config file
    /// - `PROMPTER_DIR`: Prompts directory
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use prompter_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Prompts: {:?}", config.prompts_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        let workspace = std::env::var("PROMPTER_WORKSPACE").ok().map(PathBuf::from);
        let config_file = std::env::var("PROMPTER_CONFIG").ok().map(PathBuf::from);
        Self::load_with(workspace, config_file)
    }

    /// Load configuration for an explicit workspace and config file.
    ///
    /// `None` falls back to the current directory and
    /// `<workspace>/.prompter/config.yaml` respectively. The config file is
    /// optional when it is the default location, but an explicitly named
    /// file must exist.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config_file {
            Some(cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!("Config file not found: {:?}", cf)));
                }
                config.config_file = Some(cf.clone());
                cf
            }
            None => config.prompter_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(dir) = std::env::var("PROMPTER_DIR") {
            config.prompts_dir = PathBuf::from(dir);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
            })?
        };

        let mut result = self.clone();

        if let Some(prompts) = config_file.prompts {
            if let Some(dir) = prompts.dir {
                result.prompts_dir = PathBuf::from(dir);
            }
            if let Some(file) = prompts.providers_file {
                result.providers_file = PathBuf::from(file);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        prompts_dir: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(prompts_dir) = prompts_dir {
            self.prompts_dir = prompts_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .prompter directory.
    pub fn prompter_dir(&self) -> PathBuf {
        self.workspace.join(".prompter")
    }

    /// Resolved prompts directory.
    pub fn prompts_path(&self) -> PathBuf {
        if self.prompts_dir.is_absolute() {
            self.prompts_dir.clone()
        } else {
            self.workspace.join(&self.prompts_dir)
        }
    }

    /// Resolved provider override file.
    pub fn providers_path(&self) -> PathBuf {
        if self.providers_file.is_absolute() {
            self.providers_file.clone()
        } else {
            self.prompts_path().join(&self.providers_file)
        }
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> AppResult<()> {
        let prompts = self.prompts_path();
        if prompts.exists() && !prompts.is_dir() {
            return Err(AppError::Config(format!(
                "Prompts path is not a directory: {:?}",
                prompts
            )));
        }

        if self.providers_file.as_os_str().is_empty() {
            return Err(AppError::Config(
                "providersFile cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
