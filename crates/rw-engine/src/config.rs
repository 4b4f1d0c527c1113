use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Configuration for an engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Latched events are re-forwarded every `periodic_period` ticks. 0 disables.
    pub periodic_period: u64,
    /// Divisor applied to pursuit offsets. Zero makes every pursuit fault.
    pub pursuit_divisor: i32,
    /// Minimum primary offset per sub-mode before the primary branch runs.
    pub pursuit_thresholds: [i32; 4],
    /// Maximum altitude change per tick.
    pub attraction_step: i32,
    /// Maximum yaw change per tick while aiming.
    pub aim_step: i32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Parameter count passed with every forwarded event.
    pub event_param_count: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            periodic_period: 4,
            pursuit_divisor: 8,
            pursuit_thresholds: [0, 64, 256, 1024],
            attraction_step: 16,
            aim_step: 32,
            max_events: 0,
            event_param_count: 1,
        }
    }
}

impl EngineConfig {
    /// Set the re-forward period for latched events.
    pub fn with_periodic_period(mut self, period: u64) -> Self {
        self.periodic_period = period;
        self
    }

    /// Set the pursuit divisor.
    pub fn with_pursuit_divisor(mut self, divisor: i32) -> Self {
        self.pursuit_divisor = divisor;
        self
    }

    /// Set the per-sub-mode pursuit thresholds.
    pub fn with_pursuit_thresholds(mut self, thresholds: [i32; 4]) -> Self {
        self.pursuit_thresholds = thresholds;
        self
    }

    /// Set the altitude step.
    pub fn with_attraction_step(mut self, step: i32) -> Self {
        self.attraction_step = step;
        self
    }

    /// Set the aim step.
    pub fn with_aim_step(mut self, step: i32) -> Self {
        self.aim_step = step;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Check the values the solver and dispatcher cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.attraction_step < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "attraction_step must not be negative, got {}",
                self.attraction_step
            )));
        }
        if self.aim_step < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "aim_step must not be negative, got {}",
                self.aim_step
            )));
        }
        if let Some(t) = self.pursuit_thresholds.iter().find(|t| **t < 0) {
            return Err(EngineError::InvalidConfig(format!(
                "pursuit thresholds must not be negative, got {t}"
            )));
        }
        Ok(())
    }
}
