//! # Tracker configuration
//!
//! [`TrackerConfig`] gathers every tunable of the simulation: backend location, trail
//! length, clock rate and the unit conversions between orbital and scene coordinates.
//!
//! Sources, lowest priority first:
//!
//! 1. [`TrackerConfig::default`]
//! 2. a JSON document ([`TrackerConfig::from_json_str`]), missing keys keep their default
//! 3. `NEOTRACK_*` environment variables ([`TrackerConfig::apply_env`])
//!
//! ```rust
//! use neotrack::config::TrackerConfig;
//!
//! let config = TrackerConfig::from_json_str(r#"{"trail_capacity": 250, "orbit_scale": 40.0}"#).unwrap();
//! assert_eq!(config.trail_capacity, 250);
//! assert_eq!(config.degrees_per_second, TrackerConfig::default().degrees_per_second);
//! ```
//!
//! ## Scales
//!
//! The backend answers in AU and the catalog in kilometres; the renderer wants scene
//! units. Both conversions are plain factors, chosen per scene:
//!
//! - `orbit_scale`: scene units per AU, applied to every resolved position.
//! - `diameter_scale`: model scale per kilometre of mean diameter, clamped to
//!   `[min_display_scale, max_display_scale]`.

use std::time::Duration;

use serde::Deserialize;

use crate::{
    constants::{
        Kilometer, DEFAULT_BACKEND_URL, DEFAULT_DEGREES_PER_SECOND, DEFAULT_FRAME_INTERVAL_MS,
        DEFAULT_MAX_TICK_STEP_MS, DEFAULT_TRAIL_CAPACITY,
    },
    neotrack_errors::NeoTrackError,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub trail_capacity: usize,
    pub degrees_per_second: f64,
    pub max_tick_step_ms: u64,
    pub frame_interval_ms: u64,
    pub orbit_scale: f64,
    pub diameter_scale: f64,
    pub min_display_scale: f64,
    pub max_display_scale: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 10,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            degrees_per_second: DEFAULT_DEGREES_PER_SECOND,
            max_tick_step_ms: DEFAULT_MAX_TICK_STEP_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            orbit_scale: 1.0,
            diameter_scale: 1.0,
            min_display_scale: 0.05,
            max_display_scale: 5.0,
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, NeoTrackError> {
        let config: TrackerConfig = serde_json::from_str(json)
            .map_err(|err| NeoTrackError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration overridden by the process environment.
    pub fn from_env() -> Result<Self, NeoTrackError> {
        let mut config = TrackerConfig::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `NEOTRACK_*` variables looked up through `lookup`.
    ///
    /// Recognised keys: `NEOTRACK_BACKEND_URL`, `NEOTRACK_TRAIL_CAPACITY`,
    /// `NEOTRACK_DEGREES_PER_SECOND`, `NEOTRACK_ORBIT_SCALE`, `NEOTRACK_DIAMETER_SCALE`,
    /// `NEOTRACK_REQUEST_TIMEOUT_SECS`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), NeoTrackError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NEOTRACK_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(value) = lookup("NEOTRACK_TRAIL_CAPACITY") {
            self.trail_capacity = parse_var("NEOTRACK_TRAIL_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("NEOTRACK_DEGREES_PER_SECOND") {
            self.degrees_per_second = parse_var("NEOTRACK_DEGREES_PER_SECOND", &value)?;
        }
        if let Some(value) = lookup("NEOTRACK_ORBIT_SCALE") {
            self.orbit_scale = parse_var("NEOTRACK_ORBIT_SCALE", &value)?;
        }
        if let Some(value) = lookup("NEOTRACK_DIAMETER_SCALE") {
            self.diameter_scale = parse_var("NEOTRACK_DIAMETER_SCALE", &value)?;
        }
        if let Some(value) = lookup("NEOTRACK_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("NEOTRACK_REQUEST_TIMEOUT_SECS", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), NeoTrackError> {
        let invalid = |msg: &str| -> Result<(), NeoTrackError> {
            Err(NeoTrackError::InvalidConfig(msg.to_string()))
        };

        if self.trail_capacity == 0 {
            return invalid("trail_capacity must be at least 1");
        }
        if self.frame_interval_ms == 0 {
            return invalid("frame_interval_ms must be at least 1");
        }
        if self.max_tick_step_ms == 0 {
            return invalid("max_tick_step_ms must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            return invalid("request_timeout_secs must be at least 1");
        }
        if !(self.degrees_per_second.is_finite() && self.degrees_per_second >= 0.0) {
            return invalid("degrees_per_second must be finite and non-negative");
        }
        let positive = [
            self.orbit_scale,
            self.diameter_scale,
            self.min_display_scale,
            self.max_display_scale,
        ];
        if positive.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return invalid("scales must be finite and strictly positive");
        }
        if self.min_display_scale > self.max_display_scale {
            return invalid("min_display_scale exceeds max_display_scale");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_tick_step(&self) -> Duration {
        Duration::from_millis(self.max_tick_step_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Model scale of a target of mean diameter `diameter`.
    pub fn display_scale(&self, diameter: Kilometer) -> f64 {
        (diameter * self.diameter_scale).clamp(self.min_display_scale, self.max_display_scale)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, NeoTrackError> {
    value
        .trim()
        .parse()
        .map_err(|_| NeoTrackError::InvalidConfig(format!("{key}: cannot parse {value:?}")))
}
