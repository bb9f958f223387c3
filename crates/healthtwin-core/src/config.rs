//! TOML-based page configuration.
//!
//! Holds the tunables of the landing page:
//! - Demo flow step labels and cycling intervals
//! - Notification banner timings
//! - Sign-up simulation delay and button labels
//! - Particle counts, easter-egg threshold, optional RNG seed
//! - Scroll layout gap
//!
//! Read from `$HEALTHTWIN_CONFIG` if set, else
//! `<config dir>/healthtwin/config.toml`. A missing file means defaults.
//! Nothing is ever written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::demo::{CyclerTiming, DemoFlow, DEFAULT_RESUME_PAUSE_MS, DEFAULT_TICK_INTERVAL_MS};
use crate::error::{ConfigError, ValidationError};
use crate::view::avatar::DEFAULT_EASTER_EGG_CLICKS;
use crate::view::notify::NotificationTiming;
use crate::view::scroll::DEFAULT_SCROLL_GAP_PX;
use crate::view::signup::SignupOptions;

pub const CONFIG_ENV: &str = "HEALTHTWIN_CONFIG";

/// Demo flow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_resume_pause_ms")]
    pub resume_pause_ms: u64,
    /// One label per step selector; the number of labels fixes N.
    #[serde(default = "DemoFlow::default_labels")]
    pub labels: Vec<String>,
}

/// Notification banner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_enter_delay_ms")]
    pub enter_delay_ms: u64,
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    #[serde(default = "default_exit_ms")]
    pub exit_ms: u64,
}

/// Sign-up simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupConfig {
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_idle_label")]
    pub idle_label: String,
    #[serde(default = "default_busy_label")]
    pub busy_label: String,
}

/// Decorative effects configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_hero_particles")]
    pub hero_particles: usize,
    #[serde(default = "default_celebration_particles")]
    pub celebration_particles: usize,
    #[serde(default = "default_celebration_duration_ms")]
    pub celebration_duration_ms: u64,
    #[serde(default = "default_easter_egg_clicks")]
    pub easter_egg_clicks: u32,
    /// Fixed seed for reproducible particle layouts.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_scroll_gap_px")]
    pub scroll_gap_px: f64,
}

/// Page configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub signup: SignupConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
fn default_resume_pause_ms() -> u64 {
    DEFAULT_RESUME_PAUSE_MS
}
fn default_enter_delay_ms() -> u64 {
    100
}
fn default_display_ms() -> u64 {
    5_000
}
fn default_exit_ms() -> u64 {
    400
}
fn default_submit_delay_ms() -> u64 {
    2_000
}
fn default_idle_label() -> String {
    "Get Early Access".into()
}
fn default_busy_label() -> String {
    "Joining...".into()
}
fn default_hero_particles() -> usize {
    8
}
fn default_celebration_particles() -> usize {
    25
}
fn default_celebration_duration_ms() -> u64 {
    3_000
}
fn default_easter_egg_clicks() -> u32 {
    DEFAULT_EASTER_EGG_CLICKS
}
fn default_scroll_gap_px() -> f64 {
    DEFAULT_SCROLL_GAP_PX
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            resume_pause_ms: default_resume_pause_ms(),
            labels: DemoFlow::default_labels(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: default_enter_delay_ms(),
            display_ms: default_display_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
            idle_label: default_idle_label(),
            busy_label: default_busy_label(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            hero_particles: default_hero_particles(),
            celebration_particles: default_celebration_particles(),
            celebration_duration_ms: default_celebration_duration_ms(),
            easter_egg_clicks: default_easter_egg_clicks(),
            seed: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scroll_gap_px: default_scroll_gap_px(),
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            // "none" clears optional numbers; required ones fail on deserialize.
            serde_json::Value::Number(_) if value == "none" => serde_json::Value::Null,
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            // Optional numbers (the seed) serialize as null.
            serde_json::Value::Null => {
                if value == "none" {
                    serde_json::Value::Null
                } else {
                    let n = value
                        .parse::<u64>()
                        .map_err(|e| invalid(e.to_string()))?;
                    serde_json::Value::Number(n.into())
                }
            }
            serde_json::Value::Object(_) => return Err(unknown()),
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Path the config is read from: `$HEALTHTWIN_CONFIG`, else the
    /// platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("healthtwin").join("config.toml"))
    }

    /// Parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`validate`](Self::validate).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Load from the default path, or return defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be used.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unusable configuration");
            Self::default()
        })
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit the
    /// existing type, or the result fails validation. On error `self` is
    /// unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flow().map_err(|e| ConfigError::InvalidValue {
            key: "demo.labels".into(),
            message: e.to_string(),
        })?;
        self.cycler_timing()
            .validate()
            .map_err(|e| match e {
                ValidationError::ZeroInterval { field } => ConfigError::InvalidValue {
                    key: format!("demo.{field}"),
                    message: "must be greater than zero".into(),
                },
                other => ConfigError::InvalidValue {
                    key: "demo".into(),
                    message: other.to_string(),
                },
            })?;
        if self.notifications.display_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.display_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !self.layout.scroll_gap_px.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "layout.scroll_gap_px".into(),
                message: "must be a finite number".into(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if no step labels are configured.
    pub fn flow(&self) -> Result<DemoFlow, ValidationError> {
        DemoFlow::from_labels(self.demo.labels.iter().cloned())
    }

    pub fn cycler_timing(&self) -> CyclerTiming {
        CyclerTiming {
            tick_interval_ms: self.demo.tick_interval_ms,
            resume_pause_ms: self.demo.resume_pause_ms,
        }
    }

    pub fn notification_timing(&self) -> NotificationTiming {
        NotificationTiming {
            enter_delay_ms: self.notifications.enter_delay_ms,
            display_ms: self.notifications.display_ms,
            exit_ms: self.notifications.exit_ms,
        }
    }

    pub fn signup_options(&self) -> SignupOptions {
        SignupOptions {
            submit_delay_ms: self.signup.submit_delay_ms,
            idle_label: self.signup.idle_label.clone(),
            busy_label: self.signup.busy_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.demo.tick_interval_ms, 6_000);
        assert_eq!(cfg.demo.resume_pause_ms, 10_000);
        assert_eq!(cfg.demo.labels.len(), 5);
        assert_eq!(cfg.notifications.display_ms, 5_000);
        assert_eq!(cfg.signup.submit_delay_ms, 2_000);
        assert_eq!(cfg.effects.celebration_particles, 25);
        assert_eq!(cfg.effects.easter_egg_clicks, 7);
        assert_eq!(cfg.layout.scroll_gap_px, 20.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[demo]\ntick_interval_ms = 3000\nlabels = [\"a\", \"b\"]").unwrap();
        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.demo.tick_interval_ms, 3_000);
        assert_eq!(cfg.demo.resume_pause_ms, 10_000);
        assert_eq!(cfg.flow().unwrap().len(), 2);
        assert_eq!(cfg.signup.idle_label, "Get Early Access");
    }

    #[test]
    fn empty_labels_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[demo]\nlabels = []").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "demo.labels"));
    }

    #[test]
    fn garbage_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "demo = [[[").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("demo.tick_interval_ms").as_deref(), Some("6000"));
        assert_eq!(cfg.get("signup.busy_label").as_deref(), Some("Joining..."));
        assert_eq!(cfg.get("effects.seed").as_deref(), Some("null"));
        assert!(cfg.get("demo.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("demo.resume_pause_ms", "4000").unwrap();
        cfg.set("signup.idle_label", "Join").unwrap();
        cfg.set("effects.seed", "42").unwrap();
        cfg.set("layout.scroll_gap_px", "12.5").unwrap();
        cfg.set("demo.labels", "[\"one\", \"two\", \"three\"]").unwrap();
        assert_eq!(cfg.demo.resume_pause_ms, 4_000);
        assert_eq!(cfg.signup.idle_label, "Join");
        assert_eq!(cfg.effects.seed, Some(42));
        assert_eq!(cfg.layout.scroll_gap_px, 12.5);
        assert_eq!(cfg.flow().unwrap().len(), 3);
    }

    #[test]
    fn seed_can_be_cleared() {
        let mut cfg = Config::default();
        cfg.set("effects.seed", "7").unwrap();
        assert_eq!(cfg.effects.seed, Some(7));
        cfg.set("effects.seed", "none").unwrap();
        assert_eq!(cfg.effects.seed, None);
        assert!(matches!(
            cfg.set("demo.tick_interval_ms", "none"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("demo.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("demo", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_without_mutating() {
        let mut cfg = Config::default();
        assert!(cfg.set("demo.tick_interval_ms", "soon").is_err());
        assert!(cfg.set("demo.tick_interval_ms", "0").is_err());
        assert!(cfg.set("demo.labels", "[]").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn derived_component_settings() {
        let cfg = Config::default();
        assert_eq!(cfg.cycler_timing(), CyclerTiming::default());
        assert_eq!(cfg.notification_timing(), NotificationTiming::default());
        assert_eq!(cfg.signup_options(), SignupOptions::default());
    }
}
