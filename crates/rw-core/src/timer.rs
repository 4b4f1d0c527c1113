//! Per-entity countdowns and clock-driven periodic triggers.
//!
//! A [`Timer`] only moves down during a tick. It is raised again only by an
//! explicit [`Timer::arm`] from outside the tick.

use serde::{Deserialize, Serialize};

use crate::entity::EventCode;

/// A 16-bit countdown that fires once on its 1 -> 0 transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timer(i16);

impl Timer {
    /// Create a timer with `remaining` ticks left. Negative values clamp to 0.
    pub fn new(remaining: i16) -> Self {
        Self(remaining.max(0))
    }

    /// Ticks left before the timer fires.
    pub fn remaining(self) -> i16 {
        self.0
    }

    /// Whether the timer has run out.
    pub fn is_idle(self) -> bool {
        self.0 <= 0
    }

    /// Reload the timer. Negative values clamp to 0.
    pub fn arm(&mut self, remaining: i16) {
        self.0 = remaining.max(0);
    }

    /// Count down by one tick. Returns `true` exactly when this call moved
    /// the timer from 1 to 0; an idle timer stays at 0 and returns `false`.
    pub fn tick(&mut self) -> bool {
        if self.0 <= 0 {
            self.0 = 0;
            return false;
        }
        self.0 -= 1;
        self.0 == 0
    }
}

/// `true` when `clock` is a multiple of `period`. A zero period never fires.
pub fn is_periodic(period: u64, clock: u64) -> bool {
    clock.checked_rem(period) == Some(0)
}

/// The fixed set of countdown slots every record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerId {
    /// Weapon volley cooldown.
    Fire,
    /// Searchlight sweep cycle.
    Sweep,
    /// Hover hold before repositioning.
    Hover,
    /// Alert phase timeout.
    Alert,
}

impl TimerId {
    /// All slots in bank order.
    pub const ALL: [TimerId; 4] = [Self::Fire, Self::Sweep, Self::Hover, Self::Alert];

    /// Event code forwarded when this slot fires, unless overridden at spawn.
    pub fn default_event(self) -> EventCode {
        match self {
            Self::Fire => EventCode(0x0101),
            Self::Sweep => EventCode(0x0102),
            Self::Hover => EventCode(0x0103),
            Self::Alert => EventCode(0x0104),
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Fire => 0,
            Self::Sweep => 1,
            Self::Hover => 2,
            Self::Alert => 3,
        }
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fire => write!(f, "fire"),
            Self::Sweep => write!(f, "sweep"),
            Self::Hover => write!(f, "hover"),
            Self::Alert => write!(f, "alert"),
        }
    }
}

/// One countdown and the event it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSlot {
    /// The countdown itself.
    pub timer: Timer,
    /// Code forwarded when the countdown fires.
    pub event: EventCode,
}

/// The four countdown slots of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerBank {
    slots: [TimerSlot; 4],
}

impl Default for TimerBank {
    fn default() -> Self {
        Self {
            slots: TimerId::ALL.map(|id| TimerSlot {
                timer: Timer::default(),
                event: id.default_event(),
            }),
        }
    }
}

impl TimerBank {
    /// Borrow a slot.
    pub fn slot(&self, id: TimerId) -> &TimerSlot {
        &self.slots[id.index()]
    }

    /// Borrow a slot mutably.
    pub fn slot_mut(&mut self, id: TimerId) -> &mut TimerSlot {
        &mut self.slots[id.index()]
    }

    /// Ticks left on a slot.
    pub fn remaining(&self, id: TimerId) -> i16 {
        self.slot(id).timer.remaining()
    }

    /// Reload a slot.
    pub fn arm(&mut self, id: TimerId, remaining: i16) {
        self.slot_mut(id).timer.arm(remaining);
    }

    /// Count down one slot. See [`Timer::tick`].
    pub fn tick_timer(&mut self, id: TimerId) -> bool {
        self.slot_mut(id).timer.tick()
    }

    /// Count down every slot, returning the ones that fired this call in bank order.
    pub fn tick_all(&mut self) -> Vec<(TimerId, EventCode)> {
        TimerId::ALL
            .into_iter()
            .filter_map(|id| {
                let slot = self.slot_mut(id);
                slot.timer.tick().then_some((id, slot.event))
            })
            .collect()
    }

    /// Whether every slot has run out.
    pub fn all_idle(&self) -> bool {
        self.slots.iter().all(|s| s.timer.is_idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_on_last_tick() {
        let mut timer = Timer::new(3);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(!timer.tick());
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn idle_timer_stays_at_zero() {
        let mut timer = Timer::default();
        for _ in 0..10 {
            assert!(!timer.tick());
        }
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn negative_values_clamp() {
        assert_eq!(Timer::new(-5).remaining(), 0);
        let mut timer = Timer::new(2);
        timer.arm(-1);
        assert!(timer.is_idle());
    }

    #[test]
    fn periodic_every_fourth_tick() {
        let hits: Vec<u64> = (0..8).filter(|&c| is_periodic(4, c)).collect();
        assert_eq!(hits, vec![0, 4]);
    }

    #[test]
    fn zero_period_never_fires() {
        assert!((0..16).all(|c| !is_periodic(0, c)));
    }

    #[test]
    fn bank_default_codes() {
        let bank = TimerBank::default();
        for id in TimerId::ALL {
            assert_eq!(bank.slot(id).event, id.default_event());
            assert_eq!(bank.remaining(id), 0);
        }
        assert!(bank.all_idle());
    }

    #[test]
    fn bank_tick_all_reports_fired_slots() {
        let mut bank = TimerBank::default();
        bank.arm(TimerId::Fire, 1);
        bank.arm(TimerId::Hover, 2);

        let fired = bank.tick_all();
        assert_eq!(fired, vec![(TimerId::Fire, TimerId::Fire.default_event())]);

        let fired = bank.tick_all();
        assert_eq!(fired, vec![(TimerId::Hover, TimerId::Hover.default_event())]);

        assert!(bank.tick_all().is_empty());
        assert!(bank.all_idle());
    }

    #[test]
    fn slots_are_independent() {
        let mut bank = TimerBank::default();
        bank.arm(TimerId::Sweep, 5);
        assert!(!bank.tick_timer(TimerId::Sweep));
        assert_eq!(bank.remaining(TimerId::Sweep), 4);
        assert_eq!(bank.remaining(TimerId::Alert), 0);
    }
}
