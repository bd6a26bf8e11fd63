//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `SPECSMITH_` prefix, `__` between sections
//!    (`SPECSMITH_FETCH__WORKERS=8`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use specsmith_adapters::{CommandLine, FetchSettings, fetch::DEFAULT_USER_AGENT, process::DEFAULT_EXECUTABLE};
use specsmith_core::{
    application::{ArgumentAllowList, services::DEFAULT_FETCH_WORKERS},
    domain::{BumpPolicy, Dialect},
};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SPECSMITH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub generator: GeneratorConfig,
    pub pipeline: PipelineConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Size of the fetch pool; `1` fetches sequentially.
    pub workers: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generator command line; leading words are kept (`java -jar gen.jar`).
    pub executable: String,
    /// Replaces the built-in argument allow-list when non-empty.
    pub allowed_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub target_dialect: Dialect,
    pub pre_stable_breaking_bumps_minor: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Entries shown in change reports.
    pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Used when `--output-format` is left at `auto`.
    pub format: OutputFormat,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_FETCH_WORKERS,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            allowed_args: Vec::new(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_dialect: Dialect::SchemaV2,
            pre_stable_breaking_bumps_minor: BumpPolicy::default().pre_stable_breaking_bumps_minor,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { limit: 15 }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, environment())
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).required(required))
            .add_source(env)
            .build()
            .map_err(config_error)?;
        settings.try_deserialize().map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.specsmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "specsmith", "specsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".specsmith.toml"))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.fetch.timeout_secs),
            user_agent: self.fetch.user_agent.clone(),
        }
    }

    pub fn command_line(&self) -> CliResult<CommandLine> {
        CommandLine::parse(&self.generator.executable).map_err(CliError::Core)
    }

    pub fn allow_list(&self) -> ArgumentAllowList {
        if self.generator.allowed_args.is_empty() {
            ArgumentAllowList::default()
        } else {
            ArgumentAllowList::new(self.generator.allowed_args.iter().cloned())
        }
    }

    pub fn bump_policy(&self) -> BumpPolicy {
        BumpPolicy {
            pre_stable_breaking_bumps_minor: self.pipeline.pre_stable_breaking_bumps_minor,
        }
    }

    /// Look up a dotted key, e.g. `fetch.workers`.
    pub fn get(&self, key: &str) -> CliResult<serde_json::Value> {
        let tree = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        let pointer = format!("/{}", key.replace('.', "/"));
        tree.pointer(&pointer).cloned().ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        })
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
