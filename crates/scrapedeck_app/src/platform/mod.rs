//! Terminal front end: config, logging, the event loop and the renderer.
mod app;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use deck_logging::{deck_info, deck_warn};
use scrapedeck_client::ClientHandle;

use crate::cli::{Cli, Command};
use app::App;
use effects::EffectRunner;

pub use config::DEFAULT_CONFIG_PATH;

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let (mut config, config_error) = match config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(err) => (config::AppConfig::default(), Some(err)),
    };
    logging::initialize(config.log_destination);
    if let Some(err) = config_error {
        deck_warn!("Falling back to default settings: {:#}", err);
        eprintln!("Warning: {err:#}; using default settings");
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    deck_info!("scrapedeck talking to {}", config.base_url);

    let client = ClientHandle::new(config.api_settings())
        .with_context(|| format!("cannot use backend address {:?}", config.base_url))?;
    let mut runner = EffectRunner::new(client);
    let settings = config.search_settings();

    let code = match cli.command {
        Command::Logs { action } => commands::logs(&mut runner, action),
        Command::Search(args) => commands::search(&mut App::new(runner, settings), args),
        Command::Watch(args) => commands::watch(&mut App::new(runner, settings), args),
        Command::Images(args) => commands::images(&mut App::new(runner, settings), args),
    };
    Ok(code)
}
