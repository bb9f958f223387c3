use std::path::{Path, PathBuf};

use healthtwin_core::Config;

pub mod config;
pub mod demo;
pub mod signup;
pub mod view;

/// Where a command's configuration comes from.
pub struct ConfigSource {
    pub path: Option<PathBuf>,
    /// `--set` pairs, applied in order on top of the file.
    pub overrides: Vec<(String, String)>,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `--config` wins over `$HEALTHTWIN_CONFIG` and the default location.
    pub fn load(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match self.path() {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        for (key, value) in &self.overrides {
            config.set(key, value)?;
            tracing::debug!(key = %key, value = %value, "config override applied");
        }
        Ok(config)
    }
}

/// Parse a `key=value` override. Only the first `=` splits.
pub fn parse_override(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected <key>=<value>, got {s:?}")),
    }
}
