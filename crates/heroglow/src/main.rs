use std::path::Path;

use clap::Parser;
use heroglow_config::Config;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod app;
mod cli;
mod headless;
mod logging;

use app::App;
use cli::{Cli, Command, RunArgs};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    match cli.command {
        None => run(&cli.run),
        Some(Command::Run(args)) => run(&args),
        Some(Command::Snapshot(args)) => {
            logging::init_stderr()?;
            let config = load_config(args.config.as_deref())?;
            headless::snapshot(&args, &config)
        }
        Some(Command::Texture(args)) => {
            logging::init_stderr()?;
            let config = load_config(args.config.as_deref())?;
            headless::texture(&args, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> color_eyre::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn run(args: &RunArgs) -> color_eyre::Result<()> {
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    logging::init_file(&log_path)?;

    let config = args.apply(load_config(args.config.as_deref())?);
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "starting {} scene (max {}, seed {seed}, {} fps)",
        config.scene, config.max_entities, config.fps
    );

    let app = App::new(&config, StdRng::seed_from_u64(seed));
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
