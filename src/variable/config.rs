use crate::variable::resolver::TemplateResolver;
use crate::variable::types::{Value, VariableConfig, VariableStore};
use crate::{CollrunError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A Postman environment export (`*.postman_environment.json`)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PostmanEnvironment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<PostmanEnvironmentValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostmanEnvironmentValue {
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Loads initial variables for a run
pub struct ConfigLoader;

impl ConfigLoader {
    const CONFIG_FILE: &'static str = "collrun.toml";

    /// Load a config file from an explicit path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<VariableConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CollrunError::ConfigError(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| CollrunError::ConfigError(format!("failed to parse config file: {}", e)))
    }

    /// Search order:
    /// 1. current directory, then each parent
    /// 2. ~/.config/collrun/
    ///
    /// `Ok(None)` when no config exists; a config that exists but does not
    /// load is an error.
    pub fn find_and_load() -> Result<Option<VariableConfig>> {
        let start = std::env::current_dir()?;
        Self::find_and_load_from(&start)
    }

    /// Same search as [`find_and_load`](Self::find_and_load), from `start`
    pub fn find_and_load_from(start: &Path) -> Result<Option<VariableConfig>> {
        match Self::find_in_ancestors(start).or_else(Self::user_config_path) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Self::load_from_path(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(Self::CONFIG_FILE))
            .find(|path| path.exists())
    }

    fn user_config_path() -> Option<PathBuf> {
        let path = dirs::home_dir()?
            .join(".config")
            .join("collrun")
            .join(Self::CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Load a Postman environment export, skipping disabled entries
    pub fn load_postman_environment<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Value)>> {
        let content = fs::read_to_string(path.as_ref())?;
        let environment: PostmanEnvironment = serde_json::from_str(&content)?;

        tracing::debug!(
            "Loaded environment {} with {} values",
            environment.name.as_deref().unwrap_or("<unnamed>"),
            environment.values.len()
        );

        Ok(environment
            .values
            .into_iter()
            .filter(|v| v.enabled)
            .map(|v| (v.key, Value::from_json(v.value)))
            .collect())
    }

    /// Merge the config environment into `store`.
    ///
    /// `${VAR}` references in string values are expanded from the process
    /// environment.
    pub fn apply_environment(
        store: &mut VariableStore,
        config: &VariableConfig,
        env_name: &str,
    ) -> Result<()> {
        let env = config.get_environment(env_name).ok_or_else(|| {
            CollrunError::ConfigError(format!("environment '{}' not found", env_name))
        })?;

        for (key, value) in &env.variables {
            let value = match Value::from_toml(value) {
                Value::String(s) => Value::String(TemplateResolver::resolve_env_vars(&s)),
                other => other,
            };
            store.set(key.clone(), value);
        }

        Ok(())
    }

    /// Parse a CLI variable argument "key=value"
    pub fn parse_cli_var(s: &str) -> Option<(String, String)> {
        s.split_once('=')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
    }
}
