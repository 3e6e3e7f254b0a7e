//! Axis-aligned moving rectangle with tile collision.
//!
//! Movement is axis-separable: X is applied and resolved first, then Y using
//! the corrected X. After each move the position is rounded to whole physics
//! units, then the two leading corners in the direction of travel are tested
//! against the tile grid. On contact the leading edge is snapped one unit short
//! of the tile boundary and that velocity component is zeroed. There is no
//! sweep.

use glam::Vec2;
use pup_core::units::{round_half_up, FPS, PHYSICS_SCALE};

use crate::tiles::{Tile, TileEdge, TileGrid};

pub const GRAVITY: f32 = (1.0 / 8.0) * PHYSICS_SCALE * FPS * FPS;
pub const X_DAMP: f32 = (1.0 / 8.0) * PHYSICS_SCALE * FPS * FPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingDir {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub dx: f32,
    pub dy: f32,
    pub can_collide: bool,
    pub gravity: f32,
    pub x_damp_amt: f32,
    pub facing: FacingDir,
    pub running: bool,
    /// Seconds of animation time elapsed.
    pub anim_count: f32,
}

impl Body {
    pub fn new(w: f32, h: f32) -> Self {
        debug_assert!(w >= 0.0 && h >= 0.0, "body size must be non-negative");
        Self {
            x: 0.0,
            y: 0.0,
            w,
            h,
            dx: 0.0,
            dy: 0.0,
            can_collide: true,
            gravity: GRAVITY,
            x_damp_amt: X_DAMP,
            facing: FacingDir::default(),
            running: false,
            anim_count: 0.0,
        }
    }

    /// Apply gravity, advance the animation clock, then move and collide.
    ///
    /// Intent (velocity, facing) must already have been set for this step.
    pub fn update(&mut self, dt: f32, tiles: &TileGrid) {
        self.apply_gravity(dt);
        self.advance(dt, tiles);
    }

    /// Like [`Body::update`] but without gravity.
    pub fn advance(&mut self, dt: f32, tiles: &TileGrid) {
        self.anim_count += dt;
        self.move_x(self.dx * dt, tiles);
        self.move_y(self.dy * dt, tiles);
    }

    pub fn apply_gravity(&mut self, dt: f32) {
        self.dy += self.gravity * dt;
    }

    /// Linear damping of `dx` toward zero by at most `x_damp_amt * dt`,
    /// landing exactly on zero instead of overshooting.
    pub fn dampen_x(&mut self, dt: f32) {
        let amt = self.x_damp_amt * dt;
        if self.dx > amt {
            self.dx -= amt;
        } else if self.dx < -amt {
            self.dx += amt;
        } else {
            self.dx = 0.0;
        }
    }

    /// Returns true when the move ended against ground.
    pub fn move_x(&mut self, delta: f32, tiles: &TileGrid) -> bool {
        self.x = round_half_up(self.x + delta);

        if !self.can_collide {
            return false;
        }

        if delta < 0.0 && self.is_touching(tiles, Tile::Ground, Some(Dir::Left), Vec2::ZERO) {
            self.on_left_collision(tiles);
            return true;
        }
        if delta > 0.0 && self.is_touching(tiles, Tile::Ground, Some(Dir::Right), Vec2::ZERO) {
            self.on_right_collision(tiles);
            return true;
        }
        false
    }

    /// Returns true when the move ended against ground.
    pub fn move_y(&mut self, delta: f32, tiles: &TileGrid) -> bool {
        self.y = round_half_up(self.y + delta);

        if !self.can_collide {
            return false;
        }

        if delta < 0.0 && self.is_touching(tiles, Tile::Ground, Some(Dir::Up), Vec2::ZERO) {
            self.on_up_collision(tiles);
            return true;
        }
        if delta > 0.0 && self.is_touching(tiles, Tile::Ground, Some(Dir::Down), Vec2::ZERO) {
            self.on_down_collision(tiles);
            return true;
        }
        false
    }

    fn on_up_collision(&mut self, tiles: &TileGrid) {
        let reset_pos = tiles.get_tile_pos_from_coord(self.min_y(), TileEdge::Far);
        self.set_min_y(reset_pos + 1.0);
        self.dy = 0.0;
    }

    fn on_down_collision(&mut self, tiles: &TileGrid) {
        let reset_pos = tiles.get_tile_pos_from_coord(self.max_y(), TileEdge::Near);
        self.set_max_y(reset_pos - 1.0);
        self.dy = 0.0;
    }

    fn on_left_collision(&mut self, tiles: &TileGrid) {
        let reset_pos = tiles.get_tile_pos_from_coord(self.min_x(), TileEdge::Far);
        self.set_min_x(reset_pos + 1.0);
        self.dx = 0.0;
    }

    fn on_right_collision(&mut self, tiles: &TileGrid) {
        let reset_pos = tiles.get_tile_pos_from_coord(self.max_x(), TileEdge::Near);
        self.set_max_x(reset_pos - 1.0);
        self.dx = 0.0;
    }

    pub fn is_standing_on_ground(&self, tiles: &TileGrid) -> bool {
        self.is_touching(tiles, Tile::Ground, Some(Dir::Down), Vec2::new(0.0, 1.0))
    }

    /// Whether any sampled corner lies in a `tile` cell. `dir` picks the two
    /// corners on that side; `None` samples all four.
    pub fn is_touching(&self, tiles: &TileGrid, tile: Tile, dir: Option<Dir>, offset: Vec2) -> bool {
        let (min_x, max_x, min_y, max_y) = (self.min_x(), self.max_x(), self.min_y(), self.max_y());
        let corners: &[(f32, f32)] = match dir {
            Some(Dir::Left) => &[(min_x, min_y), (min_x, max_y)],
            Some(Dir::Right) => &[(max_x, min_y), (max_x, max_y)],
            Some(Dir::Up) => &[(min_x, min_y), (max_x, min_y)],
            Some(Dir::Down) => &[(min_x, max_y), (max_x, max_y)],
            None => &[(min_x, min_y), (max_x, min_y), (min_x, max_y), (max_x, max_y)],
        };
        corners
            .iter()
            .any(|&(x, y)| tiles.get_tile_from_coord(x + offset.x, y + offset.y) == tile)
    }

    /// Box overlap test with both boxes grown by `leniency` on every side.
    /// Negative leniency demands that much real overlap.
    pub fn is_touching_body(&self, other: &Body, leniency: f32) -> bool {
        other.max_x() + leniency > self.min_x()
            && self.max_x() + leniency > other.min_x()
            && other.max_y() + leniency > self.min_y()
            && self.max_y() + leniency > other.min_y()
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn set_min_x(&mut self, val: f32) {
        self.x = val;
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn set_mid_x(&mut self, val: f32) {
        self.x = val - self.w / 2.0;
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    pub fn set_max_x(&mut self, val: f32) {
        self.x = val - self.w;
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn set_min_y(&mut self, val: f32) {
        self.y = val;
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn set_mid_y(&mut self, val: f32) {
        self.y = val - self.h / 2.0;
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    pub fn set_max_y(&mut self, val: f32) {
        self.y = val - self.h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TILE_SIZE;

    const DT: f32 = 1.0 / 60.0;

    /// 8x4 room: floor on row 3, a wall column at col 5 on rows 0..3.
    fn room() -> TileGrid {
        let mut grid = TileGrid::filled(8, 4, Tile::Air);
        for col in 0..8 {
            grid.set(col, 3, Tile::Ground);
        }
        for row in 0..3 {
            grid.set(5, row, Tile::Ground);
        }
        grid
    }

    fn floating_body(x: f32, y: f32) -> Body {
        let mut body = Body::new(78.0, 79.0);
        body.x = x;
        body.y = y;
        body.gravity = 0.0;
        body
    }

    #[test]
    fn setters_preserve_size() {
        let mut body = Body::new(78.0, 79.0);
        body.set_mid_x(123.0);
        assert_eq!(body.max_x() - body.min_x(), 78.0);
        assert_eq!(body.mid_x(), 123.0);
        body.set_max_y(-40.0);
        assert_eq!(body.max_y() - body.min_y(), 79.0);
        assert_eq!(body.max_y(), -40.0);
        body.set_mid_y(7.5);
        assert_eq!(body.mid_y(), 7.5);
    }

    #[test]
    fn moving_right_into_wall_snaps_one_unit_short() {
        let grid = room();
        let mut body = floating_body(200.0, 100.0);
        body.dx = 720.0;
        for _ in 0..60 {
            body.update(DT, &grid);
        }
        assert_eq!(body.max_x(), 5.0 * TILE_SIZE - 1.0);
        assert_eq!(body.dx, 0.0);
    }

    #[test]
    fn moving_left_into_boundary_snaps_to_first_column() {
        let grid = room();
        let mut body = floating_body(40.0, 100.0);
        body.dx = -720.0;
        for _ in 0..30 {
            body.update(DT, &grid);
        }
        assert_eq!(body.min_x(), 0.0);
        assert_eq!(body.dx, 0.0);
    }

    #[test]
    fn falling_lands_on_floor() {
        let grid = room();
        let mut body = floating_body(10.0, 0.0);
        body.gravity = GRAVITY;
        for _ in 0..120 {
            body.update(DT, &grid);
        }
        assert_eq!(body.max_y(), 3.0 * TILE_SIZE - 1.0);
        assert_eq!(body.dy, 0.0);
        assert!(body.is_standing_on_ground(&grid));
    }

    #[test]
    fn ceiling_stops_upward_motion() {
        let mut grid = room();
        grid.set(0, 0, Tile::Ground);
        let mut body = floating_body(0.0, 100.0);
        let hit = body.move_y(-40.0, &grid);
        assert!(hit);
        assert_eq!(body.min_y(), TILE_SIZE);
        assert_eq!(body.dy, 0.0);
    }

    #[test]
    fn non_colliding_body_passes_through() {
        let grid = room();
        let mut body = floating_body(300.0, 100.0);
        body.can_collide = false;
        assert!(!body.move_x(200.0, &grid));
        assert_eq!(body.min_x(), 500.0);
    }

    #[test]
    fn fast_body_tunnels_through_thin_wall() {
        // Leading-corner sampling only: a jump past the whole tile is not seen.
        let grid = room();
        let mut body = floating_body(300.0, 100.0);
        let hit = body.move_x(190.0, &grid);
        assert!(!hit);
        assert!(body.min_x() > 6.0 * TILE_SIZE);
    }

    #[test]
    fn positions_are_rounded_each_move() {
        let grid = room();
        let mut body = floating_body(10.0, 10.0);
        body.move_x(0.4, &grid);
        assert_eq!(body.x, 10.0);
        body.move_x(0.6, &grid);
        assert_eq!(body.x, 11.0);
    }

    #[test]
    fn dampen_x_never_overshoots() {
        let mut body = Body::new(1.0, 1.0);
        body.dx = 100.0;
        body.dampen_x(DT);
        assert!((body.dx - (100.0 - X_DAMP * DT)).abs() < 1e-3);
        body.dampen_x(DT);
        assert_eq!(body.dx, 0.0);
        body.dx = -30.0;
        body.dampen_x(DT);
        assert_eq!(body.dx, 0.0);
    }

    #[test]
    fn touching_body_respects_leniency() {
        let mut a = Body::new(10.0, 10.0);
        let mut b = Body::new(10.0, 10.0);
        a.x = 0.0;
        b.x = 12.0;
        assert!(!a.is_touching_body(&b, 0.0));
        assert!(a.is_touching_body(&b, 3.0));
        b.x = 8.0;
        assert!(a.is_touching_body(&b, 0.0));
        assert!(!a.is_touching_body(&b, -3.0));
        assert!(b.is_touching_body(&a, 0.0));
    }

    #[test]
    fn touching_samples_only_the_requested_side() {
        let grid = room();
        let mut body = floating_body(10.0, 10.0);
        assert!(!body.is_touching(&grid, Tile::Ground, None, Vec2::ZERO));
        body.set_max_y(3.0 * TILE_SIZE + 5.0);
        assert!(body.is_touching(&grid, Tile::Ground, Some(Dir::Down), Vec2::ZERO));
        assert!(!body.is_touching(&grid, Tile::Ground, Some(Dir::Up), Vec2::ZERO));
        assert!(body.is_touching(&grid, Tile::Ground, None, Vec2::ZERO));
    }

    #[test]
    fn advance_ignores_gravity() {
        let grid = room();
        let mut body = floating_body(10.0, 10.0);
        body.gravity = GRAVITY;
        body.advance(DT, &grid);
        assert_eq!((body.y, body.dy), (10.0, 0.0));
        body.update(DT, &grid);
        assert!(body.dy > 0.0);
        assert_eq!(body.y, 11.0);
    }
}
