//! Configuration for truthtree
//!
//! Settings come from a TOML file and can be overridden by environment
//! variables.
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./truthtree.toml` - Project-local configuration
//! 2. `~/.config/truthtree/config.toml` - User configuration (XDG)
//! 3. `~/.truthtree/config.toml` - User configuration (legacy)
//! 4. `/etc/truthtree/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `TRUTHTREE_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `TRUTHTREE_FORMAT` - Output format (json, summary)
//! - `TRUTHTREE_MAX_STEPS` - Maximum develop steps for the prover
//! - `TRUTHTREE_MAX_NODES` - Maximum tree size for the prover
//! - `TRUTHTREE_MAX_GAMMA` - Maximum instances per reusable node
//! - `TRUTHTREE_TERM_PREFIX` - Prefix of synthesized term names
//! - `TRUTHTREE_SEED_CONSTANTS` - Register premise constants as terms (true/false)
//!
//! # Example Configuration
//!
//! ```toml
//! [general]
//! log_level = "normal"
//! format = "json"
//!
//! [prover]
//! max_steps = 10000
//! max_nodes = 10000
//! max_gamma_instances = 5
//!
//! [tree]
//! term_prefix = "t"
//! seed_constants = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prover::ProverConfig;
use crate::tree::{TreeOptions, DEFAULT_TERM_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TruthTreeConfig {
    pub general: GeneralConfig,
    pub prover: ProverSection,
    pub tree: TreeSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: LogLevel,
    pub format: OutputFormat,
}

/// Limits for the automatic prover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverSection {
    pub max_steps: usize,
    pub max_nodes: usize,
    pub max_gamma_instances: usize,
}

impl Default for ProverSection {
    fn default() -> Self {
        let defaults = ProverConfig::default();
        Self {
            max_steps: defaults.max_steps,
            max_nodes: defaults.max_nodes,
            max_gamma_instances: defaults.max_gamma_instances,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSection {
    /// Prefix of synthesized term names
    pub term_prefix: String,
    /// Register the free identifiers of premises as tree terms
    pub seed_constants: bool,
}

impl Default for TreeSection {
    fn default() -> Self {
        Self {
            term_prefix: DEFAULT_TERM_PREFIX.to_string(),
            seed_constants: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Result and tree snapshot as JSON
    #[default]
    Json,
    /// One line per run
    Summary,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "summary" | "text" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// The `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
            LogLevel::Debug => "trace",
        }
    }
}

impl TruthTreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the first file found in
    /// [`config_paths`](Self::config_paths), then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<string>"), e.to_string()))
    }

    /// Config file search paths, in priority order
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./truthtree.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("truthtree").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".truthtree").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/truthtree/config.toml"));

        paths
    }

    /// Apply `TRUTHTREE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("TRUTHTREE_LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)) {
            self.general.log_level = level;
        }
        if let Some(format) = lookup("TRUTHTREE_FORMAT").and_then(|v| OutputFormat::from_str(&v)) {
            self.general.format = format;
        }
        if let Some(steps) = lookup("TRUTHTREE_MAX_STEPS").and_then(|v| v.parse().ok()) {
            self.prover.max_steps = steps;
        }
        if let Some(nodes) = lookup("TRUTHTREE_MAX_NODES").and_then(|v| v.parse().ok()) {
            self.prover.max_nodes = nodes;
        }
        if let Some(gamma) = lookup("TRUTHTREE_MAX_GAMMA").and_then(|v| v.parse().ok()) {
            self.prover.max_gamma_instances = gamma;
        }
        if let Some(prefix) = lookup("TRUTHTREE_TERM_PREFIX") {
            self.tree.term_prefix = prefix;
        }
        if let Some(val) = lookup("TRUTHTREE_SEED_CONSTANTS") {
            self.tree.seed_constants = val == "true" || val == "1" || val == "yes";
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prover.max_gamma_instances == 0 {
            return Err(ConfigError::Invalid(
                "prover.max_gamma_instances must be at least 1".to_string(),
            ));
        }
        if self.tree.term_prefix.is_empty()
            || self.tree.term_prefix.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "tree.term_prefix {:?} must be non-empty and contain no whitespace",
                self.tree.term_prefix
            )));
        }
        Ok(())
    }

    pub fn prover_config(&self) -> ProverConfig {
        ProverConfig {
            max_steps: self.prover.max_steps,
            max_nodes: self.prover.max_nodes,
            max_gamma_instances: self.prover.max_gamma_instances,
        }
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            term_prefix: self.tree.term_prefix.clone(),
            seed_constants: self.tree.seed_constants,
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn default_config_content() -> &'static str {
        r#"# truthtree configuration file

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"
# Output format: json, summary
format = "json"

[prover]
# Maximum develop steps before giving up
max_steps = 10000
# Maximum number of live nodes
max_nodes = 10000
# Maximum instances of one universal (or false existential) node
max_gamma_instances = 5

[tree]
# Prefix of synthesized term names (t0, t1, ...)
term_prefix = "t"
# Instantiate universals with the constants of the premises
seed_constants = true
"#
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {1}", path = .0.display())]
    Io(PathBuf, String),
    #[error("Parse error in {path}: {1}", path = .0.display())]
    Parse(PathBuf, String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
