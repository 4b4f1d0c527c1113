use rw_core::is_periodic;

/// Global frame counter. Only the engine advances it; stages read it.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock resuming at `tick`.
    pub fn starting_at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the current tick is a multiple of `period`.
    pub fn is_periodic(&self, period: u64) -> bool {
        is_periodic(period, self.tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = SimClock::new();
        assert_eq!(clock.tick(), 0);
        assert!(clock.is_periodic(4));
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = SimClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.advance(), 3);
        assert_eq!(clock.tick(), 3);
    }

    #[test]
    fn clock_periodic_hits() {
        let mut clock = SimClock::starting_at(0);
        let mut hits = Vec::new();
        for _ in 0..8 {
            if clock.is_periodic(4) {
                hits.push(clock.tick());
            }
            clock.advance();
        }
        assert_eq!(hits, vec![0, 4]);
    }

    #[test]
    fn clock_resumes() {
        let mut clock = SimClock::starting_at(41);
        assert_eq!(clock.advance(), 42);
    }
}
