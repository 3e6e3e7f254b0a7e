use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoadError;

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_fixed_dt")]
    pub fixed_dt: f64,
    #[serde(default = "default_max_frame_time")]
    pub max_frame_time: f64,
    #[serde(default)]
    pub rng_seed: u64,
    /// Seconds between collecting the last bone and moving on.
    #[serde(default = "default_win_delay")]
    pub win_delay: f32,
    #[serde(default)]
    pub levels: Vec<PathBuf>,
    #[serde(default)]
    pub sprite_sheets: Vec<PathBuf>,
    #[serde(default)]
    pub replay: Option<PathBuf>,
    /// Headless run length when no replay is given.
    #[serde(default = "default_run_seconds")]
    pub run_seconds: f64,
    #[serde(default)]
    pub show_debug_boxes: bool,
}

impl GameConfig {
    /// Resolves relative asset paths against `base` (the config's folder).
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.levels.iter_mut().for_each(resolve);
        self.sprite_sheets.iter_mut().for_each(resolve);
        if let Some(replay) = self.replay.as_mut() {
            resolve(replay);
        }
    }

    /// Step size for a replay run. A replay is recorded at its own rate,
    /// which overrides `fixed_dt`.
    pub fn step_dt_for_replay(&self, replay_dt: f32) -> Result<f64, LoadError> {
        let replay_dt = f64::from(replay_dt);
        if replay_dt <= 0.0 || replay_dt > self.max_frame_time {
            return Err(LoadError::Invalid(format!(
                "Config validation failed: replay fixed_dt {replay_dt} must be in (0, max_frame_time = {}]",
                self.max_frame_time
            )));
        }
        if (replay_dt - self.fixed_dt).abs() > 1e-6 {
            log::info!(
                "Replay fixed_dt {replay_dt} overrides configured fixed_dt {}",
                self.fixed_dt
            );
        }
        Ok(replay_dt)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, LoadError> {
    let raw = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let mut config = parse_config(&raw).map_err(|e| match e {
        ConfigFailure::Json(source) => LoadError::json(path, source),
        ConfigFailure::Invalid(msg) => LoadError::Invalid(msg),
    })?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

enum ConfigFailure {
    Json(serde_json::Error),
    Invalid(String),
}

fn parse_config(raw: &str) -> Result<GameConfig, ConfigFailure> {
    let config: GameConfig = serde_json::from_str(raw).map_err(ConfigFailure::Json)?;
    validate_config(&config).map_err(ConfigFailure::Invalid)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.fixed_dt <= 0.0 {
        return Err("Config validation failed: fixed_dt must be > 0".to_string());
    }
    if config.max_frame_time < config.fixed_dt {
        return Err("Config validation failed: max_frame_time must be >= fixed_dt".to_string());
    }
    if config.win_delay < 0.0 {
        return Err("Config validation failed: win_delay must be >= 0".to_string());
    }
    if config.levels.is_empty() {
        return Err("Config validation failed: levels list is empty".to_string());
    }
    if config.run_seconds < 0.0 {
        return Err("Config validation failed: run_seconds must be >= 0".to_string());
    }
    Ok(())
}

const fn default_fixed_dt() -> f64 {
    1.0 / 60.0
}

const fn default_max_frame_time() -> f64 {
    0.25
}

const fn default_win_delay() -> f32 {
    1.0
}

const fn default_run_seconds() -> f64 {
    10.0
}
