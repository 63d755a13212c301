//! TOML configuration parsing and validation.
//!
//! ```toml
//! [source]
//! path = "data/source.csv"
//! name = "source.csv"        # identifier recorded in metadata (default: file name)
//! delimiter = ","
//!
//! [output]
//! dir = "public/data"
//! structured = true          # write data_normalized.json
//! schema = true              # write schema.json
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [analytics]
//! sink = "log"               # "disabled" or "log"
//!
//! [[scenarios]]
//! id = "workplace-problem"
//! title = "Problems at work"
//! category = "Work"
//! keywords = ["wage", "overtime"]
//! ```

use anyhow::{bail, Context, Result};
use rights_guide_core::models::{MatchMode, Scenario};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl SourceConfig {
    /// Source identifier recorded in snapshot metadata.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }

    /// Delimiter as a byte. `load_config` guarantees it is ASCII.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub structured: bool,
    #[serde(default = "default_true")]
    pub schema: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            structured: true,
            schema: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/data")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    #[serde(default = "default_sink")]
    pub sink: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            sink: default_sink(),
        }
    }
}

fn default_sink() -> String {
    "disabled".to_string()
}

/// Urgency badge shown by the presentation layer. Ignored by retrieval.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// A scenario entry as configured. `mode` defaults to `category` when a
/// category is given and to `keyword` otherwise.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ScenarioConfig {
    pub fn match_mode(&self) -> MatchMode {
        self.mode.unwrap_or(if self.category.is_some() {
            MatchMode::Category
        } else {
            MatchMode::Keyword
        })
    }

    /// The filter descriptor handed to the retrieval engine.
    pub fn to_scenario(&self) -> Scenario {
        Scenario {
            id: self.id.clone(),
            match_mode: self.match_mode(),
            category_ref: self.category.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

impl Config {
    /// Look up a configured scenario by id.
    pub fn scenario(&self, id: &str) -> Option<&ScenarioConfig> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.source.path.as_os_str().is_empty() {
        bail!("source.path must not be empty");
    }

    if !config.source.delimiter.is_ascii() || config.source.delimiter == '"' {
        bail!(
            "source.delimiter must be a single ASCII character other than '\"', got {:?}",
            config.source.delimiter
        );
    }

    match config.analytics.sink.as_str() {
        "disabled" | "log" => {}
        other => bail!(
            "Unknown analytics sink: '{}'. Must be disabled or log.",
            other
        ),
    }

    let mut ids = HashSet::new();
    for scenario in &config.scenarios {
        if scenario.id.trim().is_empty() {
            bail!("scenario id must not be empty");
        }
        if !ids.insert(scenario.id.as_str()) {
            bail!("duplicate scenario id: '{}'", scenario.id);
        }
        if scenario.match_mode() == MatchMode::Category && scenario.category.is_none() {
            bail!(
                "scenario '{}' uses category mode but has no category",
                scenario.id
            );
        }
    }

    Ok(config)
}
