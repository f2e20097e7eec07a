use std::path::PathBuf;

use clap::{CommandFactory, Parser};

mod handlers;

use handlers::{CommandHandler, Context, utils::WriteAdapter};
use mviz_core::{config::Settings, expand_path, logger::init_logger};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "mviz-cli", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// Path to the config file, defaults to `Mviz.toml` in the user's config directory
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Override the log level from the config file (off, error, warn, info, debug, trace)
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: handlers::Command,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    let flags = Flags::parse();

    let config_path = match &flags.config {
        Some(path) => expand_path(path),
        None => Settings::get_config_path()?,
    };

    let settings = Settings::init(config_path.clone(), flags.log_level, None)?;

    init_logger(settings.general.log_level);
    log::debug!("Loaded settings from {}", config_path.display());

    let ctx = Context {
        settings,
        config_path,
    };

    let mut stdout_adapter = WriteAdapter(std::io::stdout());
    let mut stderr_adapter = WriteAdapter(std::io::stderr());

    flags
        .subcommand
        .handle(&ctx, &mut stdout_adapter, &mut stderr_adapter)
}
