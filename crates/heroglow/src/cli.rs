//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use heroglow_config::Config;
use heroglow_core::{AnimationSpeed, SceneKind};

#[derive(Parser, Debug)]
#[command(name = "heroglow", version, about = "Procedural hero animations in the terminal")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive animation (the default).
    Run(RunArgs),
    /// Simulate headless and print the final pool as JSON.
    Snapshot(SnapshotArgs),
    /// Write a synthesized texture as PNG.
    Texture(TextureArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Scene to show (particles, geometric or dataflow).
    #[arg(long)]
    pub scene: Option<SceneKind>,

    /// Upper bound on live entities; 0 shows a blank scene.
    #[arg(long)]
    pub max_entities: Option<u32>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Animation speed (slow, medium or fast).
    #[arg(long)]
    pub speed: Option<AnimationSpeed>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Config file to read instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to write the log while the TUI owns the terminal.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    /// Layer the flags that were given over `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(max_entities) = self.max_entities {
            config.max_entities = max_entities;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    #[arg(long, default_value_t = SceneKind::Dataflow)]
    pub scene: SceneKind,

    #[arg(long, default_value_t = 12)]
    pub max_entities: u32,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 60)]
    pub ticks: u32,

    /// Delta per tick, in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    pub dt_ms: f32,

    /// Config file supplying scene tuning.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TextureKind {
    Beam,
    Sprite,
}

#[derive(Args, Debug, Clone)]
pub struct TextureArgs {
    #[arg(long, value_enum)]
    pub kind: TextureKind,

    /// Output PNG path.
    #[arg(long)]
    pub out: PathBuf,

    /// Canvas width; defaults to the configured size.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height; defaults to the configured size.
    #[arg(long)]
    pub height: Option<u32>,

    /// Config file supplying default texture sizes.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
