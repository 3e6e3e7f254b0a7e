//! Distance units. Simulation works in whole phys units, `PHYSICS_SCALE` per
//! screen px; positions are rounded after every move.

pub const PHYSICS_SCALE: f32 = 8.0;
pub const DEFAULT_PIXEL_SCALE: f32 = 3.0;
pub const FPS: f32 = 60.0;

pub const GAME_WIDTH_PX: f32 = 60.0 * 3.0 * DEFAULT_PIXEL_SCALE;
pub const GAME_HEIGHT_PX: f32 = 60.0 * 2.0 * DEFAULT_PIXEL_SCALE;

pub fn phys_from_px(val: f32) -> f32 {
    val * PHYSICS_SCALE
}

/// Rounds to the nearest integer with halves going toward positive infinity,
/// so that rounding is translation invariant (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(val: f32) -> f32 {
    (val + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_scale_up() {
        assert_eq!(phys_from_px(10.0), 80.0);
    }

    #[test]
    fn round_half_up_is_translation_invariant() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(7.49), 7.0);
    }
}
