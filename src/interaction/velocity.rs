use smallvec::SmallVec;

use crate::core::Point;

/// Number of samples kept by [`VelocityCalculator`].
pub const VELOCITY_SAMPLES: usize = 8;

/// Samples older than this, relative to the newest one, are ignored.
pub const VELOCITY_WINDOW_SECONDS: f64 = 0.1;

/// Moving estimate of pointer speed over the last few samples.
///
/// Positions are in pixels (or degrees for rotation, stored in `x`) and
/// timestamps in seconds. Velocity is the displacement between the oldest
/// and newest sample inside the window divided by the elapsed time, so a
/// pointer that pauses before release reports no speed.
#[derive(Debug, Clone, Default)]
pub struct VelocityCalculator {
    samples: SmallVec<[(f64, Point); VELOCITY_SAMPLES]>,
}

impl VelocityCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Records a sample. Non-finite input and timestamps going backwards
    /// are dropped.
    pub fn add_sample(&mut self, time: f64, position: Point) {
        if !time.is_finite() || !position.x.is_finite() || !position.y.is_finite() {
            return;
        }
        if self.samples.last().is_some_and(|(last, _)| time < *last) {
            return;
        }
        if self.samples.len() == VELOCITY_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push((time, position));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Velocity in units per second, zero with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> Point {
        let Some(&(newest_time, newest)) = self.samples.last() else {
            return Point::default();
        };
        let Some(&(oldest_time, oldest)) = self
            .samples
            .iter()
            .find(|(time, _)| newest_time - time <= VELOCITY_WINDOW_SECONDS)
        else {
            return Point::default();
        };
        let elapsed = newest_time - oldest_time;
        if elapsed <= f64::EPSILON {
            return Point::default();
        }
        Point::new(
            (newest.x - oldest.x) / elapsed,
            (newest.y - oldest.y) / elapsed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steady_motion_reports_its_speed() {
        let mut calculator = VelocityCalculator::new();
        for step in 0..5 {
            let t = f64::from(step) * 0.01;
            calculator.add_sample(t, Point::new(t * 300.0, -t * 100.0));
        }
        let velocity = calculator.velocity();
        assert_relative_eq!(velocity.x, 300.0, epsilon = 1e-9);
        assert_relative_eq!(velocity.y, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn ring_keeps_only_latest_samples() {
        let mut calculator = VelocityCalculator::new();
        for step in 0..20 {
            calculator.add_sample(f64::from(step) * 0.001, Point::default());
        }
        assert_eq!(calculator.len(), VELOCITY_SAMPLES);
    }

    #[test]
    fn pause_before_release_yields_zero() {
        let mut calculator = VelocityCalculator::new();
        calculator.add_sample(0.0, Point::new(0.0, 0.0));
        calculator.add_sample(0.02, Point::new(40.0, 0.0));
        calculator.add_sample(0.5, Point::new(40.0, 0.0));
        assert_eq!(calculator.velocity(), Point::default());
    }
}
