//! Commands that run without a terminal UI.

use color_eyre::eyre::WrapErr;
use heroglow_config::Config;
use heroglow_core::TextureSize;
use heroglow_scene::{SceneState, synthesize_beam, synthesize_sprite};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{SnapshotArgs, TextureArgs, TextureKind};

/// Run `ticks` fixed steps from a seed and return the final state.
pub fn simulate(args: &SnapshotArgs, config: &Config) -> color_eyre::Result<SceneState> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut state = SceneState::new(
        args.scene,
        args.max_entities as usize,
        config.tuning.seed_count as usize,
        &mut rng,
    )?;
    let dt = args.dt_ms / 1000.0;
    for _ in 0..args.ticks {
        state = state.tick(dt, &mut rng);
    }
    info!(
        "{} scene after {} ticks: {} live entities",
        args.scene,
        args.ticks,
        state.active_count()
    );
    Ok(state)
}

pub fn snapshot(args: &SnapshotArgs, config: &Config) -> color_eyre::Result<()> {
    let state = simulate(args, config)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

pub fn texture(args: &TextureArgs, config: &Config) -> color_eyre::Result<()> {
    let configured = match args.kind {
        TextureKind::Beam => config.tuning.beam_texture,
        TextureKind::Sprite => config.tuning.sprite_texture,
    };
    let size = TextureSize::new(
        args.width.unwrap_or(configured.width),
        args.height.unwrap_or(configured.height),
    );
    let texture = match args.kind {
        TextureKind::Beam => synthesize_beam(size)?,
        TextureKind::Sprite => synthesize_sprite(size)?,
    };
    texture
        .save_png(&args.out)
        .wrap_err_with(|| format!("failed to write {}", args.out.display()))?;
    info!(
        "wrote {}x{} texture to {}",
        size.width,
        size.height,
        args.out.display()
    );
    Ok(())
}
