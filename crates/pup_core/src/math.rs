pub fn lerp(from: f32, to: f32, amt: f32) -> f32 {
    (to - from) * amt + from
}

/// Interpolates in log space. Both ends must be positive.
pub fn experp(from: f32, to: f32, amt: f32) -> f32 {
    lerp(from.ln(), to.ln(), amt).exp()
}

/// Inverse of [`lerp`]: where `t` sits between `min` and `max`. Not clamped.
pub fn inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    (t - min) / (max - min)
}

pub fn clamp_inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    inv_lerp(t, min, max).clamp(0.0, 1.0)
}

/// Smooth 0 -> 1 -> 0 wave over one unit of `t`.
pub fn loop_wave(t: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::TAU * t).cos()
}

/// Fraction of the remaining distance to cover this step for a frame-rate
/// independent exponential approach at `rate` per second.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn clamp_inv_lerp_saturates() {
        assert_eq!(clamp_inv_lerp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_inv_lerp(5.0, 0.0, 10.0), 0.5);
        assert_eq!(clamp_inv_lerp(50.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn experp_midpoint_is_geometric_mean() {
        let mid = experp(1.0, 4.0, 0.5);
        assert!((mid - 2.0).abs() < 1e-5);
    }

    #[test]
    fn loop_wave_peaks_halfway() {
        assert!(loop_wave(0.0).abs() < 1e-6);
        assert!((loop_wave(0.5) - 1.0).abs() < 1e-6);
        assert!(loop_wave(1.0).abs() < 1e-5);
    }

    #[test]
    fn smoothing_factor_is_bounded() {
        let s = smoothing_factor(20.0, 1.0 / 60.0);
        assert!(s > 0.25 && s < 0.3);
        assert_eq!(smoothing_factor(20.0, 0.0), 0.0);
    }
}
