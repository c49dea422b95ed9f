//! Configuration module for pipes-rs
//!
//! A junction's pipes can be described declaratively and assembled by
//! [`JunctionBuilder`](crate::plumbing::JunctionBuilder). A description
//! lists named pipes, their direction and the stages inside each one.
//!
//! # Files
//!
//! Configs are stored as TOML (`.toml`) or JSON (`.json`); the format is
//! picked from the file extension.
//!
//! ```toml
//! version = 1
//!
//! [[pipes]]
//! name = "toLogger"
//! direction = "output"
//!
//! [[pipes.stages]]
//! type = "filter"
//! name = "scale"
//! filter = "scale_rect"
//! params = 10
//!
//! [[pipes.stages]]
//! type = "queue"
//! mode = "sort"
//! ```

use crate::error::{PipesError, Result};
use crate::plumbing::{ConfigValue, FilterMode, PipeDirection, QueueMode, StageType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Config file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            other => Err(PipesError::Config(format!(
                "Unsupported config extension {:?} for {:?}",
                other, path
            ))),
        }
    }
}

/// One stage inside a configured pipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    /// Plain pass-through pipe
    Pipe,
    /// Filter stage; `filter` names a function registered with the builder
    Filter {
        name: String,
        filter: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<ConfigValue>,
        #[serde(default)]
        mode: FilterMode,
    },
    /// Queue stage; a name lets targeted queue control reach it
    Queue {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        mode: QueueMode,
    },
}

impl StageConfig {
    pub fn stage_type(&self) -> StageType {
        match self {
            StageConfig::Pipe => StageType::Pipe,
            StageConfig::Filter { .. } => StageType::Filter,
            StageConfig::Queue { .. } => StageType::Queue,
        }
    }
}

/// One named junction pipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeConfig {
    pub name: String,
    pub direction: PipeDirection,
    /// Stages in write order; empty means a single plain pipe
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl PipeConfig {
    pub fn new(name: impl Into<String>, direction: PipeDirection) -> Self {
        Self {
            name: name.into(),
            direction,
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.stages.push(stage);
        self
    }
}

/// Declarative description of a junction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub pipes: Vec<PipeConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pipes: Vec::new(),
        }
    }
}

impl JunctionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipe(mut self, pipe: PipeConfig) -> Self {
        self.pipes.push(pipe);
        self
    }

    pub fn pipe(&self, name: &str) -> Option<&PipeConfig> {
        self.pipes.iter().find(|p| p.name == name)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PipesError::Serialization(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            PipesError::Serialization(format!("Failed to serialize TOML config: {}", e))
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| PipesError::Serialization(format!("Failed to parse JSON config: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PipesError::Serialization(format!("Failed to serialize JSON config: {}", e))
        })
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipesError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config = match format {
            ConfigFormat::Toml => Self::from_toml_str(&content)?,
            ConfigFormat::Json => Self::from_json_str(&content)?,
        };
        config.validate()?;
        tracing::info!("Loaded junction config from {:?} ({} pipes)", path, config.pipes.len());
        Ok(config)
    }

    /// Save config to disk, format chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PipesError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = match format {
            ConfigFormat::Toml => self.to_toml_string()?,
            ConfigFormat::Json => self.to_json_string()?,
        };
        std::fs::write(path, content).map_err(|e| {
            PipesError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Check names: pipe names non-empty and unique, filter stages named.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pipe in &self.pipes {
            if pipe.name.trim().is_empty() {
                return Err(PipesError::Config("Pipe name must not be empty".to_string()));
            }
            if !seen.insert(pipe.name.as_str()) {
                return Err(PipesError::Config(format!(
                    "Duplicate pipe name '{}'",
                    pipe.name
                )));
            }
            for (index, stage) in pipe.stages.iter().enumerate() {
                if let StageConfig::Filter { name, filter, .. } = stage {
                    if name.trim().is_empty() {
                        return Err(PipesError::Config(format!(
                            "Filter stage {} of pipe '{}' has no name",
                            index, pipe.name
                        )));
                    }
                    if filter.trim().is_empty() {
                        return Err(PipesError::Config(format!(
                            "Filter stage '{}' of pipe '{}' has no filter function",
                            name, pipe.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
