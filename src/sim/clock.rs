use super::types::TimeStep;

/// A simulation clock that walks the steps of a fixed horizon.
///
/// The `Clock` provides methods to advance time step-by-step or run
/// a function at each time step until completion. Every step carries the
/// minute of the day it starts at.
///
/// # Examples
///
/// ```
/// use ev_charge_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(60, 20);
/// let mut minutes = Vec::new();
///
/// clock.run(|step| minutes.push(step.minute_of_day));
/// assert_eq!(minutes, vec![0, 20, 40]);
/// ```
pub struct Clock {
    /// Index of the next step to hand out
    current: usize,
    /// Total steps in the horizon
    total: usize,
    /// Length of one step in minutes
    step_minutes: usize,
}

impl Clock {
    /// Creates a clock covering `horizon_minutes` in steps of `step_minutes`.
    ///
    /// A zero step length yields an empty clock.
    pub fn new(horizon_minutes: usize, step_minutes: usize) -> Self {
        let total = horizon_minutes.checked_div(step_minutes).unwrap_or(0);
        Self {
            current: 0,
            total,
            step_minutes,
        }
    }

    /// Total number of steps in the horizon.
    pub fn total_steps(&self) -> usize {
        self.total
    }

    /// Returns the step at `index` without advancing the clock.
    pub fn step_at(&self, index: usize) -> TimeStep {
        TimeStep::new(index, self.step_minutes)
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - The step that was current before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<TimeStep> {
        if self.current < self.total {
            let step = self.step_at(self.current);
            self.current += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Runs a function for each remaining step in the clock.
    pub fn run(&mut self, mut f: impl FnMut(TimeStep)) {
        while let Some(step) = self.tick() {
            f(step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = Clock::new(1440, 1);
        assert_eq!(clock.current, 0);
        assert_eq!(clock.total_steps(), 1440);
    }

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(2, 1);
        assert_eq!(clock.tick().map(|s| s.index), Some(0));
        assert_eq!(clock.tick().map(|s| s.index), Some(1));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_run_visits_every_step() {
        let mut clock = Clock::new(1440, 60);
        let mut hours = Vec::new();

        clock.run(|step| hours.push(step.minute_of_day / 60));

        assert_eq!(hours, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_multi_day_wraps_time_of_day() {
        let clock = Clock::new(2 * 1440, 60);
        assert_eq!(clock.total_steps(), 48);
        assert_eq!(clock.step_at(25).minute_of_day, 60);
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = Clock::new(10, 0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }
}
