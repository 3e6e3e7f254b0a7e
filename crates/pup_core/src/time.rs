/// Fixed-timestep accumulator: real frame time goes in, identical `fixed_dt`
/// steps come out.
pub struct TimeState {
    pub fixed_dt: f64,
    pub max_frame_time: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
}

impl TimeState {
    pub fn new(fixed_dt: f64, max_frame_time: f64) -> Self {
        Self {
            fixed_dt,
            max_frame_time,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
        }
    }

    pub fn begin_frame(&mut self, real_dt: f64) {
        let mut real_dt = real_dt;

        // Spiral-of-death cap
        if real_dt > self.max_frame_time {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                real_dt * 1000.0,
                self.max_frame_time * 1000.0
            );
            real_dt = self.max_frame_time;
        }

        self.accumulator += real_dt;
    }

    pub fn should_step(&mut self) -> bool {
        // Tolerate float error so that feeding exactly `fixed_dt` yields one step.
        if self.accumulator + 1e-9 >= self.fixed_dt {
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fixed_dt_is_one_step() {
        let mut time = TimeState::default();
        time.begin_frame(1.0 / 60.0);
        assert!(time.should_step());
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 1);
        assert!((time.total_time - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn long_frame_is_capped() {
        let mut time = TimeState::default();
        time.begin_frame(5.0);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 15);
    }

    #[test]
    fn partial_frames_accumulate() {
        let mut time = TimeState::default();
        time.begin_frame(0.01);
        assert!(!time.should_step());
        time.begin_frame(0.01);
        assert!(time.should_step());
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 1);
    }
}
