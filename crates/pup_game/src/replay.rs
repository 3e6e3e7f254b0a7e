use std::collections::HashSet;
use std::fs;
use std::path::Path;

use pup_core::input::Key;
use serde::Deserialize;

use crate::error::LoadError;

/// Scripted input: runs of held-key sets, one set per fixed step.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<HashSet<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let keys: HashSet<Key> = frame.keys.iter().copied().collect();
            for _ in 0..frame.repeat.max(1) {
                out.push(keys.clone());
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let raw = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let replay: ReplaySequence = serde_json::from_str(&raw).map_err(|e| LoadError::json(path, e))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), LoadError> {
    if replay.fixed_dt <= 0.0 {
        return Err(LoadError::Invalid(
            "Replay validation failed: fixed_dt must be > 0".to_string(),
        ));
    }
    if replay.frames.is_empty() {
        return Err(LoadError::Invalid(
            "Replay validation failed: frames list is empty".to_string(),
        ));
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
