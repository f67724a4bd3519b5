//! Configuration handling for create-local-app.
//! This module loads and saves the JSON configuration record at its two scopes:
//! the project-local `.create-local-app.json` and the user-global
//! `~/.create-local-app/config.json`.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{LOCAL_CONFIG_FILE, USER_CONFIG_DIR, USER_CONFIG_FILE};
use crate::error::{Error, Result};

/// Per-view feature toggles of a generated project.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfigEntry {
    #[serde(default)]
    pub menu_order: i64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub disabled_facets: IndexMap<String, bool>,
}

/// The persisted configuration record.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub domain: String,
    /// Name of the template last used
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    /// Project-relative path suffixes that are never overwritten once they exist
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preserve_files: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub view_config: IndexMap<String, ViewConfigEntry>,
}

impl Config {
    /// Names of the fields required to create a project without prompting.
    ///
    /// The organization counts as missing when its name part (before the first
    /// comma) is blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let org_name = self.organization.split(',').next().unwrap_or_default();
        [
            ("Organization", org_name),
            ("ProjectName", self.project_name.as_str()),
            ("Github", self.github.as_str()),
            ("Domain", self.domain.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Fails with a `ValidationError` naming every missing field.
    ///
    /// # Arguments
    /// * `mode` - What needs the fields, used in the message (`--auto`, `--create`, ...)
    pub fn require_fields(&self, mode: &str) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::ValidationError(format!(
                "{} requires values for {}",
                mode,
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

/// Which file a configuration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Local,
    Global,
    /// Neither file exists
    Empty,
}

/// JSON Schema of the configuration document.
pub fn config_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "Organization": { "type": "string" },
            "ProjectName": { "type": "string" },
            "Github": { "type": "string" },
            "Domain": { "type": "string" },
            "Template": { "type": "string" },
            "PreserveFiles": { "type": "array", "items": { "type": "string" } },
            "ViewConfig": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "properties": {
                        "menuOrder": { "type": "integer" },
                        "disabled": { "type": "boolean" },
                        "disabledFacets": {
                            "type": "object",
                            "additionalProperties": { "type": "boolean" }
                        }
                    }
                }
            }
        }
    })
}

/// Validates a raw configuration document against [`config_schema`].
pub fn validate_config(document: &serde_json::Value) -> Result<()> {
    let validator = jsonschema::validator_for(&config_schema())
        .map_err(|e| Error::ConfigError(format!("Invalid schema: {}", e)))?;

    let errors: Vec<String> = validator.iter_errors(document).map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        return Err(Error::ConfigError(errors.join("; ")));
    }
    Ok(())
}

/// Parses a configuration document.
///
/// View names are lower-cased; their order is kept.
pub fn parse_config(content: &str) -> Result<Config> {
    let document: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| Error::ConfigError(format!("failed to parse config file: {}", e)))?;
    validate_config(&document)?;

    // Deserialized from the text so view order survives.
    let mut config: Config = serde_json::from_str(content)?;
    config.view_config = config
        .view_config
        .into_iter()
        .map(|(name, entry)| (name.to_lowercase(), entry))
        .collect();
    Ok(config)
}

/// Loads a configuration file. A missing file yields an empty configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No configuration at {}.", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("failed to read config file {}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Writes a configuration file as indented JSON, creating parent directories.
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
        .map_err(|e| Error::ConfigError(format!("failed to write config file {}: {}", path.display(), e)))
}

/// The user's registry root, `~/.create-local-app`.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(USER_CONFIG_DIR))
        .ok_or_else(|| Error::ConfigError("failed to get user home directory".to_string()))
}

/// The configuration record at both of its scopes.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    local_path: PathBuf,
    global_path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(local_path: P, global_path: P) -> Self {
        Self { local_path: local_path.into(), global_path: global_path.into() }
    }

    /// Store for a project directory and a registry root.
    pub fn for_project<P: AsRef<Path>, Q: AsRef<Path>>(project_dir: P, config_dir: Q) -> Self {
        Self::new(
            project_dir.as_ref().join(LOCAL_CONFIG_FILE),
            config_dir.as_ref().join(USER_CONFIG_FILE),
        )
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    /// Loads the project-local configuration if present, else the user-global one.
    pub fn load(&self) -> Result<(Config, ConfigScope)> {
        if self.local_path.exists() {
            return Ok((load_config(&self.local_path)?, ConfigScope::Local));
        }
        if self.global_path.exists() {
            return Ok((load_config(&self.global_path)?, ConfigScope::Global));
        }
        Ok((Config::default(), ConfigScope::Empty))
    }

    pub fn save_global(&self, config: &Config) -> Result<()> {
        save_config(&self.global_path, config)
    }

    pub fn save_local(&self, config: &Config) -> Result<()> {
        save_config(&self.local_path, config)
    }

    /// Sets `Template` in an existing project-local file, leaving the rest as is.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the file existed and was rewritten
    pub fn record_template(&self, template: &str) -> Result<bool> {
        if !self.local_path.is_file() {
            return Ok(false);
        }
        let mut local = load_config(&self.local_path)?;
        if local.template == template {
            return Ok(false);
        }
        local.template = template.to_string();
        self.save_local(&local)?;
        Ok(true)
    }

    /// Writes back to the scope the configuration came from; the global file when
    /// it came from nowhere.
    pub fn save(&self, config: &Config, scope: ConfigScope) -> Result<()> {
        match scope {
            ConfigScope::Local => self.save_local(config),
            ConfigScope::Global | ConfigScope::Empty => self.save_global(config),
        }
    }
}
