//! Tile grid: the gameplay truth for terrain.
//!
//! Cells are either AIR or GROUND, stored row-major as `[row][col]`. Lookups
//! outside the grid follow a single boundary policy: everything above the
//! grid is open air, everything beside or below it is solid ground. A level
//! is therefore walled in on three sides and open to the sky.

use pup_core::units::PHYSICS_SCALE;

/// Edge length of one tile in physics units.
pub const TILE_SIZE: f32 = 10.0 * PHYSICS_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Air,
    Ground,
}

/// Which boundary of a tile to snap to along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEdge {
    /// Left edge on X, top edge on Y.
    Near,
    /// Last unit inside the tile: right edge on X, bottom edge on Y.
    Far,
}

impl TileEdge {
    fn ratio(self) -> f32 {
        match self {
            TileEdge::Near => 0.0,
            TileEdge::Far => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<Vec<Tile>>,
    width: i32,
    height: i32,
}

impl TileGrid {
    /// Builds a grid from rows. Rows are expected to share a width; shorter rows
    /// are padded with air so indexing stays rectangular.
    pub fn from_rows(mut tiles: Vec<Vec<Tile>>) -> Self {
        let width = tiles.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut tiles {
            row.resize(width, Tile::Air);
        }
        let height = tiles.len();
        Self {
            tiles,
            width: width as i32,
            height: height as i32,
        }
    }

    #[cfg(test)]
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self::from_rows(vec![vec![tile; width]; height])
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[cfg(test)]
    pub fn set(&mut self, col: i32, row: i32, tile: Tile) {
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            log::warn!("Ignoring tile write outside grid at ({col}, {row})");
            return;
        }
        self.tiles[row as usize][col as usize] = tile;
    }

    pub fn get_tile(&self, col: i32, row: i32) -> Tile {
        if row < 0 {
            return Tile::Air;
        }
        if col < 0 || col >= self.width || row >= self.height {
            return Tile::Ground;
        }
        self.tiles[row as usize][col as usize]
    }

    pub fn get_tile_from_coord(&self, x: f32, y: f32) -> Tile {
        self.get_tile(tile_index(x), tile_index(y))
    }

    /// Absolute position of the `edge` of the tile containing `coord` on one
    /// axis. Tiles are square, so the same math serves X and Y. Collision
    /// resolution snaps entity edges onto these values.
    pub fn get_tile_pos_from_coord(&self, coord: f32, edge: TileEdge) -> f32 {
        let index = tile_index(coord) as f32;
        index * TILE_SIZE + edge.ratio() * (TILE_SIZE - 1.0)
    }
}

pub fn tile_index(coord: f32) -> i32 {
    (coord / TILE_SIZE).floor() as i32
}
