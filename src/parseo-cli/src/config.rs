//! Configuration management for parseo
//!
//! Configuration comes from a TOML file, `PARSEO_*` environment variables
//! and command-line flags, applied in that order. The file declares the
//! variable resolvers, the whitelisted standard functions and the engine
//! options used to build the [`Engine`].

use anyhow::{anyhow, Context as _, Result};
use parseo_engine::{
    AttributeVariable, BindMode, Engine, EngineOptions, PatternVariable, DEFAULT_CACHE_SIZE,
};
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 2] = ["parseo.toml", ".parseo.toml"];

/// Main configuration structure for parseo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine behaviour
    pub engine: EngineOptions,
    /// Function whitelist
    pub functions: FunctionsConfig,
    /// Compiled expression cache
    pub cache: CacheConfig,
    /// CSV context loading
    pub csv: CsvConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
    /// Variable resolvers, matched in order
    pub variables: Vec<VariableConfig>,
}

/// Function whitelist configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Standard functions to whitelist (`["*"]` for all of them)
    pub standard: Vec<String>,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached evaluators
    pub size: usize,
}

/// CSV reading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Field separator
    pub separator: String,
    /// Whether the first row holds column names
    pub has_header: bool,
}

/// Debug and diagnostic configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Verbosity level (0=warn, 1=info, 2=debug, 3+=trace)
    pub verbosity: u8,
}

/// One variable resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VariableConfig {
    /// Identifiers matching a regular expression
    Pattern {
        /// Display name used in error messages
        name: String,
        /// Regular expression matched against the whole identifier
        pattern: String,
        /// Context key the binding reads from
        context: String,
        /// How the first capture group becomes a subscript
        #[serde(default)]
        bind: BindMode,
    },
    /// `name.attr` forms
    Attribute {
        /// Attribute base
        name: String,
        /// Context key the binding reads from
        context: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            functions: FunctionsConfig::default(),
            cache: CacheConfig::default(),
            csv: CsvConfig::default(),
            debug: DebugConfig::default(),
            variables: vec![
                VariableConfig::Pattern {
                    name: "M*".to_string(),
                    pattern: r"M(\d+)".to_string(),
                    context: "source".to_string(),
                    bind: BindMode::Index,
                },
                VariableConfig::Pattern {
                    name: "C*".to_string(),
                    pattern: r"C(\d+)".to_string(),
                    context: "config".to_string(),
                    bind: BindMode::Index,
                },
                VariableConfig::Attribute {
                    name: "config".to_string(),
                    context: "config_map".to_string(),
                },
            ],
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            has_header: true,
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| anyhow!("Invalid TOML config {}: {}", path.display(), e))
    }

    /// Load configuration from the discovered file (or `explicit`) and the environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::find_config_file(None) {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };
        config.merge_env();
        Ok(config)
    }

    /// Find a configuration file in the standard locations
    pub(crate) fn find_config_file(current_dir: Option<&Path>) -> Option<PathBuf> {
        let current_dir = match current_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        for name in CONFIG_NAMES {
            let path = current_dir.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let home = std::env::var("HOME").ok()?;
        CONFIG_NAMES
            .iter()
            .map(|name| Path::new(&home).join(".config").join("parseo").join(name))
            .find(|path| path.exists())
    }

    fn merge_env(&mut self) {
        self.merge_env_with_reader(|key| std::env::var(key).ok());
    }

    /// Apply `PARSEO_*` overrides; unparsable values keep the defaults
    pub(crate) fn merge_env_with_reader<F>(&mut self, env_reader: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // PARSEO_VERBOSITY
        if let Some(val) = env_reader("PARSEO_VERBOSITY") {
            self.debug.verbosity = val.parse().unwrap_or(DebugConfig::default().verbosity);
        }

        // PARSEO_CACHE_SIZE
        if let Some(val) = env_reader("PARSEO_CACHE_SIZE") {
            self.cache.size = val.parse().unwrap_or(CacheConfig::default().size);
        }

        // PARSEO_MAX_DEPTH
        if let Some(val) = env_reader("PARSEO_MAX_DEPTH") {
            self.engine.max_depth = val.parse().unwrap_or(EngineOptions::default().max_depth);
        }
    }

    /// Apply command-line flags
    pub fn apply_cli(&mut self, verbose: u8) {
        if verbose > 0 {
            self.debug.verbosity = verbose;
        }
    }

    /// Build an engine from the configured whitelist
    pub fn build_engine(&self) -> Result<Engine> {
        let mut builder = Engine::builder().options(self.engine.clone());

        for variable in &self.variables {
            builder = match variable {
                VariableConfig::Pattern {
                    name,
                    pattern,
                    context,
                    bind,
                } => builder.variable(PatternVariable::new(
                    name.as_str(),
                    pattern,
                    context.as_str(),
                    *bind,
                )?),
                VariableConfig::Attribute { name, context } => {
                    builder.variable(AttributeVariable::new(name.as_str(), context.as_str()))
                }
            };
        }

        for name in &self.functions.standard {
            builder = if name == "*" {
                builder.standard_library()
            } else {
                builder.standard_function(name)
            };
        }

        Ok(builder.build()?)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// CSV separator as a single byte
    pub fn csv_separator(&self) -> Result<u8> {
        match self.csv.separator.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(anyhow!("CSV separator must be a single character")),
        }
    }
}

/// Create a default config file, refusing to overwrite unless `force`
pub fn create_default_config_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists, use --force to overwrite",
            path.display()
        ));
    }
    Config::default().save(path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.engine.max_depth == 0 {
        return Err(anyhow!("Max depth must be greater than 0"));
    }
    if config.cache.size == 0 {
        return Err(anyhow!("Cache size must be greater than 0"));
    }
    config.csv_separator()?;
    Ok(())
}
