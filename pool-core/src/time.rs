/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
    /// Most ticks a single frame may produce.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    ///
    /// Negative or non-finite frame deltas are ignored.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * f64::from(self.max_steps));
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= f64::from(steps) * self.dt;
        steps
    }

    /// Drop any buffered time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a tick still buffered (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(0.01);
        assert_eq!(ts.accumulate(0.01), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(0.01);
        assert_eq!(ts.accumulate(0.004), 0);
        assert_eq!(ts.accumulate(0.007), 1);
        assert!((ts.alpha() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut ts = FixedTimestep::new(0.01);
        assert_eq!(ts.accumulate(1.0), 10);

        let mut ts = FixedTimestep::new(0.01).with_max_steps(3);
        assert_eq!(ts.accumulate(1.0), 3);
    }

    #[test]
    fn ignores_bad_frame_deltas() {
        let mut ts = FixedTimestep::new(0.01);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f64::NAN), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_buffered_time() {
        let mut ts = FixedTimestep::new(0.01);
        ts.accumulate(0.008);
        ts.reset();
        assert_eq!(ts.accumulate(0.003), 0);
        assert!(ts.alpha() < 0.5);
    }
}
