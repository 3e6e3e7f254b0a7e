//! Sprite-sheet metadata and deterministic time-to-frame lookup.
//!
//! Sheets are exported from Aseprite as a JSON array of frames (each with a
//! source rectangle and a duration in milliseconds) plus named frame tags that
//! mark out animations. Durations are held as integer microseconds.
//!
//! Every animation loops: `frame_at` wraps the elapsed time around the total
//! length of the tagged frame range.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("failed to read sprite sheet {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse sprite sheet {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("sprite sheet validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone)]
pub struct SheetFrame {
    pub rect: FrameRect,
    pub duration_us: u64,
}

/// Inclusive frame range for one named animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRange {
    pub from: usize,
    pub to: usize,
    pub length_us: u64,
}

#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub name: String,
    pub frames: Vec<SheetFrame>,
    pub animations: HashMap<String, AnimationRange>,
}

impl SpriteSheet {
    /// Frame index to show `time_s` seconds into a looping animation.
    pub fn frame_at(&self, animation: &str, time_s: f32) -> Option<usize> {
        let range = self.animations.get(animation)?;
        if range.length_us == 0 {
            return Some(range.from);
        }
        let elapsed_us = (f64::from(time_s.max(0.0)) * 1_000_000.0) as u64;
        let local_us = elapsed_us % range.length_us;

        let mut cumulative_us = 0;
        for index in range.from..=range.to {
            cumulative_us += self.frames[index].duration_us;
            if cumulative_us > local_us {
                return Some(index);
            }
        }
        Some(range.to)
    }

    pub fn has_animation(&self, animation: &str) -> bool {
        self.animations.contains_key(animation)
    }
}

/// Loaded sheets keyed by sheet name (the JSON file stem).
#[derive(Debug, Default)]
pub struct SpriteSheetRegistry {
    sheets: HashMap<String, SpriteSheet>,
}

impl SpriteSheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), SheetError> {
        let sheet = load_sprite_sheet(path)?;
        self.insert(sheet);
        Ok(())
    }

    pub fn insert(&mut self, sheet: SpriteSheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    pub fn get(&self, name: &str) -> Option<&SpriteSheet> {
        self.sheets.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

// --- Aseprite JSON (private) ---

#[derive(Debug, Deserialize)]
struct SheetJson {
    frames: Vec<FrameJson>,
    meta: MetaJson,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    frame: FrameRect,
    duration: u64,
}

#[derive(Debug, Deserialize)]
struct MetaJson {
    #[serde(default, rename = "frameTags")]
    frame_tags: Vec<FrameTagJson>,
}

#[derive(Debug, Deserialize)]
struct FrameTagJson {
    name: String,
    from: usize,
    to: usize,
}

pub fn load_sprite_sheet(path: &Path) -> Result<SpriteSheet, SheetError> {
    let raw = fs::read_to_string(path).map_err(|source| SheetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_sprite_sheet(&name, &raw).map_err(|err| match err {
        ParseFailure::Json(source) => SheetError::Json {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Invalid(msg) => SheetError::Invalid(msg),
    })
}

#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    Invalid(String),
}

fn parse_sprite_sheet(name: &str, raw: &str) -> Result<SpriteSheet, ParseFailure> {
    let json: SheetJson = serde_json::from_str(raw).map_err(ParseFailure::Json)?;
    validate_sheet_json(name, &json).map_err(ParseFailure::Invalid)?;

    let frames: Vec<SheetFrame> = json
        .frames
        .iter()
        .map(|f| SheetFrame {
            rect: f.frame,
            duration_us: f.duration * 1000,
        })
        .collect();

    let mut animations = HashMap::new();
    for tag in json.meta.frame_tags {
        let length_us = frames[tag.from..=tag.to]
            .iter()
            .map(|f| f.duration_us)
            .sum();
        animations.insert(
            tag.name,
            AnimationRange {
                from: tag.from,
                to: tag.to,
                length_us,
            },
        );
    }

    Ok(SpriteSheet {
        name: name.to_string(),
        frames,
        animations,
    })
}

fn validate_sheet_json(name: &str, json: &SheetJson) -> Result<(), String> {
    if name.is_empty() {
        return Err("sheet name is empty".to_string());
    }
    if json.frames.is_empty() {
        return Err(format!("sheet '{}' has no frames", name));
    }
    for tag in &json.meta.frame_tags {
        if tag.from > tag.to || tag.to >= json.frames.len() {
            return Err(format!(
                "sheet '{}' tag '{}' has invalid range {}..={} for {} frames",
                name,
                tag.name,
                tag.from,
                tag.to,
                json.frames.len()
            ));
        }
    }
    Ok(())
}
