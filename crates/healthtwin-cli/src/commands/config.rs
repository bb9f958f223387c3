use std::path::Path;

use clap::Subcommand;
use healthtwin_core::Config;

use super::ConfigSource;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "demo.tick_interval_ms", "effects.seed")
        key: String,
    },
    /// List all config values, after any `--set` overrides
    List,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction, source: &ConfigSource) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = source.load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::List => {
            let config = source.load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Path => {
            let location = source
                .path()
                .map(Path::to_path_buf)
                .or_else(Config::default_path)
                .ok_or("no config directory on this platform")?;
            println!("{}", location.display());
        }
    }
    Ok(())
}
