use glam::{Affine2, Vec2};
use pup_core::math::{experp, smoothing_factor};
use pup_core::units::PHYSICS_SCALE;

const POSITION_RATE: f32 = 5.0;
const SCALE_RATE: f32 = 0.2;
/// Where the focus lands on screen, as a fraction of the viewport.
const FOCUS_ANCHOR: Vec2 = Vec2::new(0.5, 0.7);

pub const MAX_SCALE: f32 = 3.0;
pub const MIN_SCALE: f32 = 1.5;

/// Zoom that keeps a tower of `height` dogs comfortably in view.
pub fn desired_scale_for_tower(height: usize) -> f32 {
    let extra = height.saturating_sub(1) as f32;
    (MAX_SCALE - 0.25 * extra).clamp(MIN_SCALE, MAX_SCALE)
}

#[derive(Debug, Clone, Default)]
pub struct FocusCamera {
    cur_pos: Option<Vec2>,
    scale: Option<f32>,
}

impl FocusCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.cur_pos
    }

    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(MAX_SCALE)
    }

    pub fn update(&mut self, focus: Vec2, desired_scale: f32, dt: f32) {
        self.cur_pos = Some(match self.cur_pos {
            None => focus,
            Some(cur) => cur.lerp(focus, smoothing_factor(POSITION_RATE, dt)),
        });
        self.scale = Some(match self.scale {
            None => desired_scale,
            Some(cur) => experp(cur, desired_scale, smoothing_factor(SCALE_RATE, dt)),
        });
    }

    /// Snap on the next update, e.g. after a level change.
    pub fn reset(&mut self) {
        self.cur_pos = None;
        self.scale = None;
    }

    /// World-to-screen transform for a viewport of `viewport` pixels. Scale
    /// is screen pixels per art pixel.
    pub fn transform(&self, viewport: Vec2) -> Affine2 {
        let scale = self.scale() / PHYSICS_SCALE;
        let pos = self.cur_pos.unwrap_or(Vec2::ZERO);
        Affine2::from_translation(viewport * FOCUS_ANCHOR)
            * Affine2::from_scale(Vec2::splat(scale))
            * Affine2::from_translation(-pos)
    }
}
