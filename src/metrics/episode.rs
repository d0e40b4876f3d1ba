use std::collections::BTreeMap;

use serde::Serialize;

use crate::rl::EnvStep;

/// Summary of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    /// 1-based episode number within the run
    pub episode: usize,
    pub steps: usize,
    pub reward: f32,
    pub score: u32,
    pub max_length: usize,
    pub terminated: bool,
    pub time_out: bool,
    pub turn_count: u32,
    pub wall_turn_evade: u32,
    /// Reward terms summed across the episode
    pub reward_terms: BTreeMap<String, f32>,
}

/// Accumulates per-step outputs into an [`EpisodeRecord`]
///
/// Reward-breakdown terms are summed; the info counters keep their last value.
#[derive(Debug, Clone, Default)]
pub struct EpisodeAccumulator {
    episodes_finished: usize,
    steps: usize,
    reward: f32,
    max_length: usize,
    terms: BTreeMap<String, f32>,
    last: Option<EnvStep>,
}

impl EpisodeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one step; `snake_length` is the body length after the step
    pub fn record_step(&mut self, step: &EnvStep, snake_length: usize) {
        for (name, value) in step.info.reward_breakdown.iter() {
            *self.terms.entry(name.to_string()).or_insert(0.0) += value;
        }
        self.steps += 1;
        self.reward += step.reward;
        self.max_length = self.max_length.max(snake_length);
        self.last = Some(step.clone());
    }

    /// Steps recorded in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Close the current episode and start a new one
    pub fn finish(&mut self) -> EpisodeRecord {
        self.episodes_finished += 1;
        let last = self.last.take();
        let info = last.as_ref().map(|step| &step.info);

        let record = EpisodeRecord {
            episode: self.episodes_finished,
            steps: self.steps,
            reward: self.reward,
            score: info.map_or(0, |i| i.score),
            max_length: self.max_length,
            terminated: last.as_ref().is_some_and(|step| step.terminated),
            time_out: info.is_some_and(|i| i.time_out),
            turn_count: info.map_or(0, |i| i.turn_count),
            wall_turn_evade: info.map_or(0, |i| i.wall_turn_evade),
            reward_terms: std::mem::take(&mut self.terms),
        };

        self.steps = 0;
        self.reward = 0.0;
        self.max_length = 0;
        record
    }
}
