//! Fixed-step game clock
//!
//! Frames arrive at whatever rate the host manages; the simulation only ever
//! advances in whole ticks of `fixed_timestep` seconds.

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Length of one simulation tick (in seconds)
    pub fixed_timestep: f32,
    /// Maximum frame delta accepted, to avoid a spiral of death after a stall
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Simulated seconds since start
    pub total_time: f64,
    /// Frames fed through `update`
    pub frame_count: u64,
    /// Ticks handed out by `fixed_steps`
    pub tick_count: u64,
    /// Whether the clock is paused
    pub paused: bool,
    accumulator: f32,
}

impl GameTime {
    /// Create a clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Feed the raw delta of the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.frame_count += 1;
        if self.paused {
            return;
        }

        let delta = raw_delta.clamp(0.0, self.config.max_delta_time) * self.config.time_scale;
        self.total_time += delta as f64;
        self.accumulator += delta;
    }

    /// Number of whole ticks to run this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let step = self.config.fixed_timestep;
        if step <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            steps += 1;
        }
        self.tick_count += steps as u64;
        steps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn fixed_interpolation(&self) -> f32 {
        self.accumulator / self.config.fixed_timestep
    }

    /// Tick length in seconds
    pub fn tick_delta(&self) -> f32 {
        self.config.fixed_timestep
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.1,
            ..Default::default()
        });
        time.update(0.25);
        assert_eq!(time.fixed_steps(), 2);
        time.update(0.06);
        assert_eq!(time.fixed_steps(), 1);
        assert_eq!(time.tick_count, 3);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut time = GameTime::default();
        time.update(10.0);
        // 0.25s at 60 Hz, give or take float rounding
        let steps = time.fixed_steps();
        assert!((14..=15).contains(&steps), "got {steps} steps");
    }

    #[test]
    fn test_paused_clock_produces_no_ticks() {
        let mut time = GameTime::default();
        time.pause();
        time.update(0.1);
        assert_eq!(time.fixed_steps(), 0);
        assert_eq!(time.frame_count, 1);

        time.resume();
        time.update(0.1);
        assert!(time.fixed_steps() > 0);
    }
}
