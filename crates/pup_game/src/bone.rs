use pup_core::math::loop_wave;
use pup_core::units::{phys_from_px, PHYSICS_SCALE};

use crate::body::Body;
use crate::tiles::TileGrid;

pub const BONE_SIZE: f32 = 12.0 * PHYSICS_SCALE;

/// Seconds per full bob cycle when drawn.
const BOB_PERIOD: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Bone {
    pub body: Body,
    pub done: bool,
}

impl Bone {
    pub fn new(mid_x: f32, mid_y: f32) -> Self {
        let mut body = Body::new(BONE_SIZE, BONE_SIZE);
        body.gravity = 0.0;
        body.can_collide = false;
        body.set_mid_x(mid_x);
        body.set_mid_y(mid_y);
        Self { body, done: false }
    }

    pub fn update(&mut self, dt: f32, tiles: &TileGrid) {
        self.body.update(dt, tiles);
    }

    /// Vertical draw offset for the idle bob. Cosmetic only.
    pub fn bob_offset(&self) -> f32 {
        -phys_from_px(2.0) * loop_wave(self.body.anim_count / BOB_PERIOD)
    }
}
