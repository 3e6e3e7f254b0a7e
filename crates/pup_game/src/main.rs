use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use glam::Vec2;
use pup_core::input::{InputSource, InputState, Key};
use pup_core::units::{GAME_HEIGHT_PX, GAME_WIDTH_PX};
use pup_core::{SpriteSheetRegistry, TimeState};
use pup_game::config::{load_config_from_path, GameConfig};
use pup_game::render::CommandRecorder;
use pup_game::replay::load_replay_from_path;
use pup_game::{load_level_from_path, Game, GameOptions, LevelLayout, LoadError};

const DEFAULT_CONFIG_PATH: &str = "assets/game.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    log::info!("Pup tower starting with config {}", config_path.display());
    if let Err(err) = run(&config_path) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(config_path: &Path) -> Result<(), LoadError> {
    let config = load_config_from_path(config_path)?;

    let layouts = config
        .levels
        .iter()
        .map(|path| load_level_from_path(path))
        .collect::<Result<Vec<LevelLayout>, _>>()?;

    let mut sheets = SpriteSheetRegistry::new();
    for path in &config.sprite_sheets {
        sheets.load_file(path)?;
    }

    let (fixed_dt, frames) = input_frames(&config)?;
    let mut game = Game::new(
        layouts,
        sheets,
        GameOptions {
            rng_seed: config.rng_seed,
            win_delay: config.win_delay,
            show_debug_boxes: config.show_debug_boxes,
        },
    )?;

    let mut time = TimeState::new(fixed_dt, config.max_frame_time);
    let mut input = InputState::new();
    let mut surface = CommandRecorder::new();
    let viewport = Vec2::new(GAME_WIDTH_PX, GAME_HEIGHT_PX);
    let mut failed_steps = 0u32;

    for keys in &frames {
        input.set_held(keys);
        if input.is_pressed(Key::Escape) {
            log::info!("Escape pressed, stopping");
            break;
        }

        time.begin_frame(fixed_dt);
        while time.should_step() {
            let step = panic::catch_unwind(AssertUnwindSafe(|| {
                game.update(fixed_dt as f32, &input);
            }));
            if step.is_err() {
                failed_steps += 1;
                log::error!("Update step {} panicked; continuing", time.fixed_step_count);
            }
        }
        input.end_frame();

        surface.clear();
        game.render(&mut surface, viewport);

        if game.finished {
            break;
        }
    }

    log::info!(
        "Run finished after {} steps ({:.2}s simulated): level {}/{} '{}', won: {}, bones left: {}, tallest tower: {}, draw commands: {}, failed steps: {}",
        time.fixed_step_count,
        time.total_time,
        game.level_index() + 1,
        game.level_count(),
        game.level.level_id(),
        game.level.won || game.finished,
        game.level.bones.len(),
        game.level.tallest_tower(),
        surface.commands.len(),
        failed_steps
    );
    Ok(())
}

/// Per-step held-key sets: the replay if configured, otherwise idle input for
/// `run_seconds`.
fn input_frames(config: &GameConfig) -> Result<(f64, Vec<HashSet<Key>>), LoadError> {
    match &config.replay {
        Some(path) => {
            let replay = load_replay_from_path(path)?;
            log::info!("Loaded replay {} ({} frames)", path.display(), replay.frames.len());
            let dt = config.step_dt_for_replay(replay.fixed_dt)?;
            Ok((dt, replay.expanded_inputs()))
        }
        None => {
            let steps = (config.run_seconds / config.fixed_dt).round() as usize;
            Ok((config.fixed_dt, vec![HashSet::new(); steps]))
        }
    }
}
