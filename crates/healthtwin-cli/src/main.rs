use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Env var holding the log filter. `RUST_LOG` is used when it is unset.
const LOG_ENV: &str = "HEALTHTWIN_LOG";

#[derive(Parser)]
#[command(name = "healthtwin-cli", version, about = "HealthTwin landing page CLI")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override one config value, e.g. `--set demo.tick_interval_ms=3000`
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = commands::parse_override)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo step cycler
    Demo {
        #[command(subcommand)]
        action: commands::demo::DemoAction,
    },
    /// Early-access sign-up form
    Signup {
        #[command(subcommand)]
        action: commands::signup::SignupAction,
    },
    /// Presentational helpers (slider, scroll, avatar, particles, reveal, css)
    View {
        #[command(subcommand)]
        action: commands::view::ViewAction,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let source = commands::ConfigSource {
        path: cli.config,
        overrides: cli.overrides,
    };
    let result = match cli.command {
        Commands::Demo { action } => commands::demo::run(action, &source),
        Commands::Signup { action } => commands::signup::run(action),
        Commands::View { action } => commands::view::run(action, &source),
        Commands::Config { action } => commands::config::run(action, &source),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
