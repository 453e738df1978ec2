// File: src/config.rs
// Purpose: Route declarations and settings from trellis.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "trellis.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    /// Declared path parameters, registered in declaration order
    #[serde(default)]
    pub params: Vec<ParamConfig>,

    /// Declared resources
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,

    #[serde(default)]
    pub dev: DevConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Prefix of every built URL (default: "/")
    #[serde(default = "default_app_path")]
    pub app_path: String,

    /// Extension appended to built URLs, without the dot
    #[serde(default)]
    pub default_extension: Option<String>,

    /// Name under which declared parameters appear in diagnostics
    #[serde(default = "default_params_holder")]
    pub params_holder: String,
}

/// A declared path parameter
///
/// ```toml
/// [[params]]
/// name = "tag"
/// kind = "prefixed"
/// prefix = "tag"
/// inner = { kind = "segment" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamConfig {
    pub name: String,

    #[serde(flatten)]
    pub kind: ParamKind,
}

/// Kind of a declared path parameter and its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParamKind {
    /// One segment
    Segment,

    /// One segment matching a `prefix*suffix` wildcard
    SegmentPattern { pattern: String },

    /// Regex with one capture group, and the build pattern replacing `*`
    Regex { pattern: String, build: String },

    /// `yyyy/mm/dd`
    YearMonthDay,

    /// All remaining segments
    MultiSegment {
        #[serde(default)]
        min: usize,
    },

    /// A constant segment followed by the inner parameter
    Prefixed { prefix: String, inner: Box<ParamKind> },

    /// Integer converted from the inner parameter (default: one segment)
    Integer {
        #[serde(default)]
        inner: Option<Box<ParamKind>>,
    },

    /// Compact `yyyymmdd` date converted from the inner parameter (default: one segment)
    Date {
        #[serde(default)]
        inner: Option<Box<ParamKind>>,
    },

    /// The inner parameter, or nothing
    Optional { inner: Box<ParamKind> },
}

/// A declared resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Literal segments and `{param}` references, e.g. "/users/{id}"
    pub route: String,

    /// Opaque data attached to the resource
    #[serde(default)]
    pub data: Option<String>,
}

/// Development configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_true")]
    pub hot_reload: bool,

    /// Poll interval of the file watcher where polling is used, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

// Default values
fn default_name() -> String {
    "trellis-app".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_app_path() -> String {
    "/".to_string()
}

fn default_params_holder() -> String {
    "params".to_string()
}

fn default_poll_interval() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_path: default_app_path(),
            default_extension: None,
            params_holder: default_params_holder(),
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            hot_reload: true,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Config {
    /// Load configuration from a trellis.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./trellis.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(CONFIG_FILE)
    }

    /// Parse configuration from TOML text; empty text gives the default config
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }
}
