//! Bounded pursuit of a target value.
//!
//! Both out-of-range branches step by `+max_step`, including the one where
//! the value sits above its target. Callers relying on downward pursuit of
//! large gaps will see the value climb and wrap through the 16-bit range
//! before it closes in.

use serde::{Deserialize, Serialize};

/// Outcome of one solver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attraction {
    /// The value after the step, as stored.
    pub value: i16,
    /// The stored value equals the target exactly.
    pub reached: bool,
}

/// Move `current` toward `target` by at most `max_step`.
///
/// Inside the window the value snaps onto the target. Outside it the value
/// moves by `+max_step` with 16-bit wrapping.
pub fn attract_toward(current: i16, target: i32, max_step: i32) -> Attraction {
    let diff = i64::from(target) - i64::from(current);
    let step = i64::from(max_step);

    let value = if diff < -step || diff > step {
        (current as u16 as i32).wrapping_add(max_step) as i16
    } else {
        target as i16
    };

    Attraction {
        value,
        reached: i32::from(value) == target,
    }
}

/// A scalar chasing a target, one bounded step per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pursuit {
    /// Current value.
    pub current: i16,
    /// Value being chased.
    pub target: i16,
}

impl Pursuit {
    /// Create a pursuit starting at `current`.
    pub fn new(current: i16, target: i16) -> Self {
        Self { current, target }
    }

    /// Apply one solver step in place. Returns whether the target was reached.
    pub fn step(&mut self, max_step: i32) -> bool {
        let result = attract_toward(self.current, i32::from(self.target), max_step);
        self.current = result.value;
        result.reached
    }

    /// Whether the current value already sits on the target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
