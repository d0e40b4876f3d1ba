/// Per-episode counters, reset at the start of every episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeCounters {
    /// Foods eaten
    pub score: u32,
    /// Direction changes
    pub turn_count: u32,
    /// Ticks taken
    pub steps: u32,
    /// Turns made at a wall that avoided the collision
    pub wall_turn_evade: u32,
    /// Consecutive ticks without a direction change
    pub straight_ticks: u32,
}

impl EpisodeCounters {
    /// Record the heading decision of one tick
    pub fn record_heading(&mut self, turned: bool) {
        if turned {
            self.turn_count += 1;
            self.straight_ticks = 0;
        } else {
            self.straight_ticks += 1;
        }
    }
}

/// Where an episode is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Active,
    /// Ended by a collision
    Terminated,
    /// Ended by reaching the step limit
    Truncated,
}

impl EpisodeStatus {
    /// Decide the status after a tick; termination takes precedence
    pub fn after_tick(terminated: bool, truncated: bool) -> Self {
        if terminated {
            EpisodeStatus::Terminated
        } else if truncated {
            EpisodeStatus::Truncated
        } else {
            EpisodeStatus::Active
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, EpisodeStatus::Active)
    }
}

/// Truncation rule: the step limit has been reached
pub fn is_truncated(steps: u32, max_steps: u32) -> bool {
    steps >= max_steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_counters() {
        let mut counters = EpisodeCounters::default();
        counters.record_heading(false);
        counters.record_heading(false);
        assert_eq!(counters.straight_ticks, 2);
        assert_eq!(counters.turn_count, 0);

        counters.record_heading(true);
        assert_eq!(counters.straight_ticks, 0);
        assert_eq!(counters.turn_count, 1);
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(EpisodeStatus::after_tick(false, false), EpisodeStatus::Active);
        assert_eq!(EpisodeStatus::after_tick(true, false), EpisodeStatus::Terminated);
        assert_eq!(EpisodeStatus::after_tick(false, true), EpisodeStatus::Truncated);
        assert_eq!(EpisodeStatus::after_tick(true, true), EpisodeStatus::Terminated);

        assert!(!EpisodeStatus::Active.is_over());
        assert!(EpisodeStatus::Terminated.is_over());
        assert!(EpisodeStatus::Truncated.is_over());
    }

    #[test]
    fn test_truncation_limit() {
        assert!(!is_truncated(9, 10));
        assert!(is_truncated(10, 10));
        assert!(is_truncated(11, 10));
    }
}
