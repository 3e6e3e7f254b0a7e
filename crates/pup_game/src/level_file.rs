//! Level layouts: a tile grid plus an ordered spawn list.
//!
//! Two on-disk forms decode to the same [`LevelLayout`]:
//! - a PNG where each pixel is one cell, keyed by colour;
//! - a JSON file of ASCII rows.
//!
//! Spawn cells are always air. Spawns are listed in row-major order, which
//! fixes entity order (and therefore update order) for the level.

use std::fs;
use std::path::Path;

use image::RgbaImage;
use serde::Deserialize;

use crate::error::LoadError;
use crate::tiles::{Tile, TileGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    PlayerDog,
    WanderDog,
    StandDog,
    Bone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub kind: SpawnKind,
    pub col: i32,
    pub row: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub level_id: String,
    pub tiles: TileGrid,
    pub spawns: Vec<Spawn>,
}

impl LevelLayout {
    /// Builds a layout from ASCII rows: `.` air, `#` ground, `P` player,
    /// `D` wandering dog, `S` standing dog, `B` bone.
    pub fn from_rows(level_id: &str, rows: &[&str]) -> Result<Self, LoadError> {
        validate_rows(level_id, rows)?;
        let mut tiles = Vec::with_capacity(rows.len());
        let mut spawns = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let kind = match ch {
                    '.' => None,
                    '#' => {
                        cells.push(Tile::Ground);
                        continue;
                    }
                    'P' => Some(SpawnKind::PlayerDog),
                    'D' => Some(SpawnKind::WanderDog),
                    'S' => Some(SpawnKind::StandDog),
                    'B' => Some(SpawnKind::Bone),
                    other => {
                        return Err(LoadError::Invalid(format!(
                            "Level validation failed: '{level_id}' has unknown cell '{other}' at ({col}, {row})"
                        )))
                    }
                };
                cells.push(Tile::Air);
                if let Some(kind) = kind {
                    spawns.push(Spawn {
                        kind,
                        col: col as i32,
                        row: row as i32,
                    });
                }
            }
            tiles.push(cells);
        }
        let layout = Self {
            level_id: level_id.to_string(),
            tiles: TileGrid::from_rows(tiles),
            spawns,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Decodes one cell per pixel. Alpha is ignored.
    pub fn from_image(level_id: &str, image: &RgbaImage) -> Result<Self, LoadError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(LoadError::Invalid(format!(
                "Level validation failed: '{level_id}' image is empty"
            )));
        }
        let mut tiles = vec![vec![Tile::Air; image.width() as usize]; image.height() as usize];
        let mut spawns = Vec::new();
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, _] = pixel.0;
            let kind = match (r, g, b) {
                (0xff, 0xff, 0xff) => None,
                (0xff, 0x00, 0x00) => Some(SpawnKind::PlayerDog),
                (0x00, 0x00, 0xff) => Some(SpawnKind::WanderDog),
                (0x00, 0xff, 0x00) => Some(SpawnKind::StandDog),
                (0xff, 0xff, 0x00) => Some(SpawnKind::Bone),
                _ => {
                    tiles[y as usize][x as usize] = Tile::Ground;
                    continue;
                }
            };
            if let Some(kind) = kind {
                spawns.push(Spawn {
                    kind,
                    col: x as i32,
                    row: y as i32,
                });
            }
        }
        let layout = Self {
            level_id: level_id.to_string(),
            tiles: TileGrid::from_rows(tiles),
            spawns,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn bone_count(&self) -> usize {
        self.spawns
            .iter()
            .filter(|s| s.kind == SpawnKind::Bone)
            .count()
    }

    fn validate(&self) -> Result<(), LoadError> {
        let players = self
            .spawns
            .iter()
            .filter(|s| s.kind == SpawnKind::PlayerDog)
            .count();
        match players {
            0 => return Err(LoadError::NoPlayer(self.level_id.clone())),
            1 => {}
            n => {
                return Err(LoadError::Invalid(format!(
                    "Level validation failed: '{}' has {n} player spawns",
                    self.level_id
                )))
            }
        }

        // Each dog can hold one bone.
        let (bones, dogs) = (self.bone_count(), self.spawns.len() - self.bone_count());
        if bones > dogs {
            return Err(LoadError::Invalid(format!(
                "Level validation failed: '{}' has {bones} bones but only {dogs} dogs",
                self.level_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    version: String,
    level_id: String,
    rows: Vec<String>,
}

/// Loads a `.png` or `.json` level. The level id of a PNG is its file stem.
pub fn load_level_from_path(path: &Path) -> Result<LevelLayout, LoadError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let layout = match ext.as_str() {
        "png" => {
            let image = image::open(path)
                .map_err(|source| LoadError::Image {
                    path: path.to_path_buf(),
                    source,
                })?
                .to_rgba8();
            let level_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            LevelLayout::from_image(&level_id, &image)?
        }
        "json" => {
            let raw = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
            let file: LevelFile = serde_json::from_str(&raw).map_err(|e| LoadError::json(path, e))?;
            validate_level_file(&file)?;
            let rows: Vec<&str> = file.rows.iter().map(String::as_str).collect();
            LevelLayout::from_rows(&file.level_id, &rows)?
        }
        other => {
            return Err(LoadError::Invalid(format!(
                "unsupported level format '{other}' for {}",
                path.display()
            )))
        }
    };
    log::info!(
        "Loaded level '{}' ({}x{}, {} spawns)",
        layout.level_id,
        layout.tiles.width(),
        layout.tiles.height(),
        layout.spawns.len()
    );
    Ok(layout)
}

fn validate_level_file(file: &LevelFile) -> Result<(), LoadError> {
    if file.version.trim().is_empty() {
        return Err(LoadError::Invalid(
            "Level validation failed: version is empty".to_string(),
        ));
    }
    if file.level_id.trim().is_empty() {
        return Err(LoadError::Invalid(
            "Level validation failed: level_id is empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_rows(level_id: &str, rows: &[&str]) -> Result<(), LoadError> {
    let Some(first) = rows.first() else {
        return Err(LoadError::Invalid(format!(
            "Level validation failed: '{level_id}' has no rows"
        )));
    };
    let width = first.chars().count();
    if width == 0 {
        return Err(LoadError::Invalid(format!(
            "Level validation failed: '{level_id}' rows are empty"
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(LoadError::Invalid(format!(
                "Level validation failed: '{level_id}' row {i} has width {} (expected {width})",
                row.chars().count()
            )));
        }
    }
    Ok(())
}
