//! Invaderers headless host
//!
//! Loads settings and balance tables, then lets the autopilot play a run
//! at the fixed timestep with audio and rendering routed to the log.
//!
//! Usage: `invaderers [settings.json] [enemy_table.txt icon_table.txt]`

use std::fs;

use anyhow::{Context, Result};
use glam::Mat4;

use invaderers::audio::{AudioManager, AudioSink, SoundEffect};
use invaderers::platform::{Autopilot, InputSampler};
use invaderers::renderer::{Renderer, Tint, default_camera, render_frame};
use invaderers::sim::{Entity, GameState, tick};
use invaderers::{BalanceTables, Settings};

/// Ten minutes at 60 frames per second
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Frames between status lines
const REPORT_INTERVAL: u64 = 600;

struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, voice: usize, effect: SoundEffect, volume: f32) {
        log::trace!("voice {}: {} at {:.2}", voice, effect.asset(), volume);
    }
}

/// Counts sprites instead of drawing them
#[derive(Default)]
struct NullRenderer {
    sprites: usize,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _sprite: &Entity, _camera_to_world: &Mat4, _tint: Tint) {
        self.sprites += 1;
    }
}

fn load_tables(args: &[String]) -> Result<BalanceTables> {
    match args {
        [enemy_path, icon_path, ..] => {
            let enemy_text = fs::read_to_string(enemy_path)
                .with_context(|| format!("failed reading enemy table {enemy_path}"))?;
            let icon_text = fs::read_to_string(icon_path)
                .with_context(|| format!("failed reading icon table {icon_path}"))?;
            let tables = BalanceTables::from_texts(&enemy_text, &icon_text)
                .with_context(|| format!("failed parsing {enemy_path} / {icon_path}"))?;
            log::info!("Loaded balance tables from {} and {}", enemy_path, icon_path);
            Ok(tables)
        }
        _ => Ok(BalanceTables::builtin()),
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.first() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let tables = load_tables(args.get(1..).unwrap_or_default())?;

    let fire = &settings.fire;
    log::info!(
        "Fire triggers: ball {}, lightning {}, star {}, slow {}, heart {}",
        fire.ball.as_str(),
        fire.lightning.as_str(),
        fire.star.as_str(),
        fire.slow.as_str(),
        fire.heart.as_str()
    );
    let mut state =
        GameState::new(settings, tables).context("balance tables do not cover the run")?;
    let mut pilot = Autopilot::default();
    let mut sampler = InputSampler::default();
    let mut audio = AudioManager::new();
    let mut sink = LogAudio;
    let mut renderer = NullRenderer::default();
    let camera = default_camera();

    while !state.is_over() && state.run.frame < MAX_FRAMES {
        pilot.steer(&state);
        let input = sampler.sample(&pilot);
        let events = tick(&mut state, &input);
        audio.handle_events(&events, &mut sink);
        render_frame(&state, &camera, &mut renderer);

        if state.run.frame % REPORT_INTERVAL == 0 {
            log::info!(
                "Frame {}: stage {}, {} invaders, lives {}, score {}",
                state.run.frame,
                state.run.stage,
                state.run.live_enemies,
                state.player.lives,
                state.run.score
            );
        }
    }

    log::info!(
        "Run finished after {} frames ({:?}): stage {}, score {}, damage taken {}, {} sprites",
        state.run.frame,
        state.run.phase,
        state.run.stage,
        state.run.score,
        state.player.damage_taken,
        renderer.sprites
    );
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Invaderers (headless) starting...");

    if let Err(err) = run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_names_path() {
        let args = ["no/such/enemies.txt".to_string(), "icons.txt".to_string()];
        let err = load_tables(&args).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/enemies.txt"));
    }

    #[test]
    fn test_no_table_args_uses_builtin() {
        assert!(load_tables(&[]).is_ok());
    }
}
