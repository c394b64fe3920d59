//! Simulation clock advancing the mean anomaly with elapsed wall time.

use std::time::Duration;

use crate::{
    constants::{Degree, DEFAULT_DEGREES_PER_SECOND, DEFAULT_MAX_TICK_STEP_MS},
    neotrack_errors::NeoTrackError,
};

#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Mean anomaly rate (degrees per real second)
    degrees_per_second: f64,
    /// Longest interval a single tick accounts for
    max_step: Duration,
    paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        SimulationClock::new(
            DEFAULT_DEGREES_PER_SECOND,
            Duration::from_millis(DEFAULT_MAX_TICK_STEP_MS),
        )
    }
}

impl SimulationClock {
    pub fn new(degrees_per_second: f64, max_step: Duration) -> Self {
        SimulationClock {
            degrees_per_second,
            max_step,
            paused: false,
        }
    }

    /// Mean anomaly increment for a frame that lasted `elapsed`.
    ///
    /// The interval is capped at `max_step` so a stalled display does not make the
    /// target jump; a paused clock yields zero.
    pub fn step(&self, elapsed: Duration) -> Degree {
        if self.paused {
            return 0.0;
        }
        self.degrees_per_second * elapsed.min(self.max_step).as_secs_f64()
    }

    pub fn degrees_per_second(&self) -> f64 {
        self.degrees_per_second
    }

    /// Change the mean anomaly rate.
    ///
    /// Return
    /// ------
    /// * [`NeoTrackError::InvalidConfig`] for a negative or non-finite rate, the current
    ///   rate being kept.
    pub fn set_degrees_per_second(&mut self, rate: f64) -> Result<(), NeoTrackError> {
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(NeoTrackError::InvalidConfig(format!(
                "degrees_per_second must be finite and non-negative, got {rate}"
            )));
        }
        self.degrees_per_second = rate;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
