//! TOML-based application configuration.
//!
//! Stores:
//! - Monitoring service locations and request timeout
//! - The plan-generation endpoint
//! - The results view URL used for the display handoff
//!
//! Configuration is stored at `~/.config/focuswrap/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Where the two monitoring services listen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_service_url")]
    pub domain_base_url: String,
    #[serde(default = "default_service_url")]
    pub attention_base_url: String,
    #[serde(default = "default_monitoring_timeout")]
    pub request_timeout_ms: u64,
}

/// Plan-generation adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_planner_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_planner_timeout")]
    pub request_timeout_ms: u64,
}

/// Results view that receives the session handoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsConfig {
    #[serde(default = "default_results_view")]
    pub view_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focuswrap/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub results: ResultsConfig,
}

// Default functions
fn default_service_url() -> String {
    "http://localhost:5000".into()
}
fn default_monitoring_timeout() -> u64 {
    2_000
}
fn default_planner_endpoint() -> String {
    "http://localhost:3000/api/generate-dashboard".into()
}
fn default_planner_timeout() -> u64 {
    30_000
}
fn default_results_view() -> String {
    "http://localhost:3000/focus-wrapped".into()
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            domain_base_url: default_service_url(),
            attention_base_url: default_service_url(),
            request_timeout_ms: default_monitoring_timeout(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_planner_endpoint(),
            request_timeout_ms: default_planner_timeout(),
        }
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            view_url: default_results_view(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.monitoring.domain_base_url, "http://localhost:5000");
        assert_eq!(parsed.monitoring.request_timeout_ms, 2_000);
        assert_eq!(parsed.results.view_url, cfg.results.view_url);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [monitoring]
            domain_base_url = "http://127.0.0.1:5001"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.monitoring.domain_base_url, "http://127.0.0.1:5001");
        assert_eq!(parsed.monitoring.attention_base_url, "http://localhost:5000");
        assert_eq!(parsed.planner.request_timeout_ms, 30_000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(
            cfg.get("monitoring.request_timeout_ms").as_deref(),
            Some("2000")
        );
        assert_eq!(
            cfg.get("planner.endpoint").as_deref(),
            Some("http://localhost:3000/api/generate-dashboard")
        );
        assert!(cfg.get("monitoring.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_string_and_number() {
        let mut cfg = Config::default();
        cfg.set("monitoring.attention_base_url", "http://localhost:6000")
            .unwrap();
        cfg.set("monitoring.request_timeout_ms", "500").unwrap();
        assert_eq!(cfg.monitoring.attention_base_url, "http://localhost:6000");
        assert_eq!(cfg.monitoring.request_timeout_ms, 500);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.planner.request_timeout_ms, 30_000);
    }

    #[test]
    fn save_to_then_load_from_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("results.view_url", "http://127.0.0.1:8080/wrapped")
            .unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.results.view_url, "http://127.0.0.1:8080/wrapped");
    }

    #[test]
    fn load_from_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "monitoring = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_number() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("monitoring.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("monitoring.request_timeout_ms", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("monitoring", "x"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
