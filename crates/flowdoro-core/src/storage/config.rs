//! TOML-based application configuration.
//!
//! Stores behavior switches that sit outside the user-editable timer
//! settings:
//! - Session policies (flow streak re-arm, countdown reset on save)
//! - Notification preferences
//! - Point values for the scoring rules
//!
//! Configuration is stored at `~/.config/flowdoro/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::score::ScoringRules;
use crate::session::{FlowRearm, SessionPolicy};

/// Session behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub flow_rearm: FlowRearm,
    /// Saving settings resets the countdown even mid-session.
    #[serde(default = "default_true")]
    pub reset_countdown_on_save: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long a notification stays visible.
    #[serde(default = "default_notification_secs")]
    pub duration_secs: u64,
}

/// Point values awarded or deducted by the scoring rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_task_points")]
    pub task_complete_points: u32,
    #[serde(default = "default_flow_bonus")]
    pub flow_bonus_points: u32,
    #[serde(default = "default_pause_penalty")]
    pub pause_penalty_points: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/flowdoro/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_true() -> bool {
    true
}
fn default_notification_secs() -> u64 {
    3
}
fn default_task_points() -> u32 {
    20
}
fn default_flow_bonus() -> u32 {
    30
}
fn default_pause_penalty() -> u32 {
    15
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            flow_rearm: FlowRearm::default(),
            reset_countdown_on_save: true,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: default_notification_secs(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            task_complete_points: default_task_points(),
            flow_bonus_points: default_flow_bonus(),
            pause_penalty_points: default_pause_penalty(),
        }
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the leaf at `key`, parsing `value` as the type already stored there.
    fn assign(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut node = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                node = node.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let table = node.as_object_mut().ok_or_else(unknown)?;
        let existing = table.get(leaf).ok_or_else(unknown)?;

        let replacement = match existing {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot assign a whole section".into()))
            }
            _ => serde_json::Value::String(value.into()),
        };

        table.insert(leaf.to_string(), replacement);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. See [`Config::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::assign(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            task_complete: self.scoring.task_complete_points,
            flow_bonus: self.scoring.flow_bonus_points,
            pause_penalty: self.scoring.pause_penalty_points,
        }
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            flow_rearm: self.session.flow_rearm,
            reset_countdown_on_save: self.session.reset_countdown_on_save,
        }
    }

    pub fn notification_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.notifications.duration_secs)
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
        assert!(parsed.session.reset_countdown_on_save);
        assert_eq!(parsed.session.flow_rearm, FlowRearm::OnFirstTask);
        assert_eq!(parsed.notifications.duration_secs, 3);
        assert_eq!(parsed.scoring.flow_bonus_points, 30);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[session]\nflow_rearm = \"each_session\"\n").unwrap();
        assert_eq!(parsed.session.flow_rearm, FlowRearm::EachSession);
        assert!(parsed.session.reset_countdown_on_save);
        assert_eq!(parsed.scoring.task_complete_points, 20);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("scoring.pause_penalty_points").as_deref(), Some("15"));
        assert_eq!(cfg.get("session.flow_rearm").as_deref(), Some("on_first_task"));
        assert!(cfg.get("session").is_none());
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("session.reset_countdown_on_save", "false").unwrap();
        cfg.set("scoring.flow_bonus_points", "50").unwrap();
        cfg.set("session.flow_rearm", "each_session").unwrap();
        assert!(!cfg.session.reset_countdown_on_save);
        assert_eq!(cfg.scoring.flow_bonus_points, 50);
        assert_eq!(cfg.session.flow_rearm, FlowRearm::EachSession);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("ui.dark_mode", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("notifications.enabled", "sometimes"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("session.flow_rearm", "never"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("scoring", "1"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert!(cfg.notifications.enabled);

        let mut changed = cfg.clone();
        changed.notifications.duration_secs = 5;
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().notifications.duration_secs, 5);
    }

    #[test]
    fn policy_and_rules_follow_config() {
        let mut cfg = Config::default();
        cfg.scoring.pause_penalty_points = 5;
        cfg.session.reset_countdown_on_save = false;
        assert_eq!(cfg.scoring_rules().pause_penalty, 5);
        assert!(!cfg.session_policy().reset_countdown_on_save);
    }
}
