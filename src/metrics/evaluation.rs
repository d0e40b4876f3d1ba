//! Rolling evaluation statistics over finished episodes

use std::collections::VecDeque;

use super::episode::EpisodeRecord;

/// Evaluation statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_curriculum::metrics::EvaluationStats;
///
/// let stats = EvaluationStats::new(100);
/// assert_eq!(stats.total_episodes(), 0);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EvaluationStats {
    /// Most recent episodes (rolling window)
    records: VecDeque<EpisodeRecord>,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl EvaluationStats {
    /// Create a new tracker keeping the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            window_size: window_size.max(1),
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(&mut self, record: EpisodeRecord) {
        self.total_episodes += 1;
        self.total_steps += record.steps;
        if self.records.len() >= self.window_size {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn mean_reward(&self) -> f32 {
        self.mean(|r| r.reward)
    }

    /// Population standard deviation of the episode reward
    pub fn std_reward(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        let mean = self.mean_reward();
        let variance = self.mean(|r| (r.reward - mean).powi(2));
        variance.sqrt()
    }

    pub fn mean_score(&self) -> f32 {
        self.mean(|r| r.score as f32)
    }

    pub fn mean_steps(&self) -> f32 {
        self.mean(|r| r.steps as f32)
    }

    pub fn mean_max_length(&self) -> f32 {
        self.mean(|r| r.max_length as f32)
    }

    /// Fraction of episodes that ended by collision
    pub fn termination_rate(&self) -> f32 {
        self.mean(|r| if r.terminated { 1.0 } else { 0.0 })
    }

    /// Fraction of episodes that ended by the step limit
    pub fn timeout_rate(&self) -> f32 {
        self.mean(|r| if r.time_out { 1.0 } else { 0.0 })
    }

    pub fn mean_turns(&self) -> f32 {
        self.mean(|r| r.turn_count as f32)
    }

    pub fn mean_wall_evades(&self) -> f32 {
        self.mean(|r| r.wall_turn_evade as f32)
    }

    /// Mean score divided by mean steps
    pub fn food_per_step(&self) -> f32 {
        let steps = self.mean_steps();
        if steps == 0.0 { 0.0 } else { self.mean_score() / steps }
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the window size for rolling averages
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} ± {:.2} | Score: {:.2} | Len: {:.1} | Ep steps: {:.1} | Term: {:.1}% | Timeout: {:.1}% | Turns: {:.1} | Wall evade: {:.2} | Food/step: {:.4}",
            self.total_episodes,
            self.total_steps,
            self.mean_reward(),
            self.std_reward(),
            self.mean_score(),
            self.mean_max_length(),
            self.mean_steps(),
            self.termination_rate() * 100.0,
            self.timeout_rate() * 100.0,
            self.mean_turns(),
            self.mean_wall_evades(),
            self.food_per_step(),
        )
    }

    fn mean(&self, f: impl Fn(&EpisodeRecord) -> f32) -> f32 {
        if self.records.is_empty() {
            0.0
        } else {
            self.records.iter().map(f).sum::<f32>() / self.records.len() as f32
        }
    }
}

impl Default for EvaluationStats {
    fn default() -> Self {
        Self::new(100)
    }
}
