//! Reward composition
//!
//! A reward is the sum of independently named terms. Which terms are active
//! is data: [`RewardMode`] picks a registry of `(term, weight)` pairs, and the
//! per-tick values are kept in a [`RewardBreakdown`] for diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::grid::GridWorld;
use super::state::Position;

/// Selects which named subset of reward terms is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardMode {
    /// Full shaping table: food seeking with survival and death terms
    #[default]
    Length,
    /// Survival, death and wall proximity only
    Survival,
}

/// Weights ("modifiers") of the reward terms
///
/// All values are magnitudes; each term applies its own sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub survival: f32,
    pub death: f32,
    pub food: f32,
    pub closer: f32,
    pub away: f32,
    pub turn_toward_food: f32,
    pub straight: f32,
    /// Consecutive straight ticks tolerated before `straight_penalty` applies
    pub straight_limit: u32,
    pub wall_proximity: f32,
    /// Bonus for a last-instant turn at a wall (0 disables the term)
    pub wall_evasion: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            survival: 0.2,
            death: 50.0,
            food: 50.0,
            closer: 1.0,
            away: 0.5,
            turn_toward_food: 2.0,
            straight: 0.2,
            straight_limit: 10,
            wall_proximity: 0.5,
            wall_evasion: 0.0,
        }
    }
}

impl RewardWeights {
    pub(crate) fn values(&self) -> [(&'static str, f32); 9] {
        [
            ("survival", self.survival),
            ("death", self.death),
            ("food", self.food),
            ("closer", self.closer),
            ("away", self.away),
            ("turn_toward_food", self.turn_toward_food),
            ("straight", self.straight),
            ("wall_proximity", self.wall_proximity),
            ("wall_evasion", self.wall_evasion),
        ]
    }
}

/// Everything a reward term may look at for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub prev_head: Position,
    pub new_head: Position,
    /// Food position at the start of the tick
    pub food: Position,
    pub prev_direction: Direction,
    pub new_direction: Direction,
    pub terminated: bool,
    pub ate_food: bool,
    /// Consecutive straight ticks, including this one
    pub straight_ticks: u32,
    pub near_wall: bool,
    pub wall_evade: bool,
}

impl TickContext {
    fn turned(&self) -> bool {
        self.prev_direction != self.new_direction
    }
}

/// Named reward term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardTerm {
    Survival,
    DeathPenalty,
    FoodEaten,
    MoveCloser,
    MoveAway,
    TurnTowardFood,
    StraightPenalty { limit: u32 },
    WallProximity,
    WallEvasion,
}

impl RewardTerm {
    pub fn name(&self) -> &'static str {
        match self {
            RewardTerm::Survival => "survival",
            RewardTerm::DeathPenalty => "death_penalty",
            RewardTerm::FoodEaten => "food_eaten",
            RewardTerm::MoveCloser => "move_closer",
            RewardTerm::MoveAway => "move_away",
            RewardTerm::TurnTowardFood => "turn_toward_food",
            RewardTerm::StraightPenalty { .. } => "straight_penalty",
            RewardTerm::WallProximity => "wall_proximity",
            RewardTerm::WallEvasion => "wall_evasion",
        }
    }

    /// Contribution of this term, or `None` when it does not apply
    pub fn evaluate(&self, weight: f32, ctx: &TickContext, distances: (i32, i32)) -> Option<f32> {
        let (before, after) = distances;
        let applies = match self {
            RewardTerm::Survival => !ctx.terminated,
            RewardTerm::DeathPenalty => ctx.terminated,
            RewardTerm::FoodEaten => ctx.ate_food,
            RewardTerm::MoveCloser => after < before,
            RewardTerm::MoveAway => after > before,
            RewardTerm::TurnTowardFood => {
                ctx.turned() && ctx.new_direction == Direction::toward(ctx.new_head, ctx.food)
            }
            RewardTerm::StraightPenalty { limit } => ctx.straight_ticks > *limit,
            RewardTerm::WallProximity => ctx.near_wall && !ctx.terminated,
            RewardTerm::WallEvasion => ctx.wall_evade && !ctx.terminated,
        };
        if !applies {
            return None;
        }

        let sign = match self {
            RewardTerm::DeathPenalty
            | RewardTerm::MoveAway
            | RewardTerm::StraightPenalty { .. }
            | RewardTerm::WallProximity => -1.0,
            _ => 1.0,
        };
        Some(sign * weight)
    }
}

/// Per-term values of the most recent tick, plus their total
///
/// Serializes as a flat map of term names with an extra `total` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardBreakdown {
    #[serde(flatten)]
    terms: BTreeMap<&'static str, f32>,
    total: f32,
}

impl RewardBreakdown {
    fn from_terms(terms: BTreeMap<&'static str, f32>) -> Self {
        let total = terms.values().sum();
        Self { terms, total }
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.terms.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    /// Applied terms in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.terms.iter().map(|(&name, &value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Registry of weighted reward terms
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEngine {
    terms: Vec<(RewardTerm, f32)>,
}

impl RewardEngine {
    /// Build the registry for `mode`; zero-weight terms are left out
    pub fn new(mode: RewardMode, weights: &RewardWeights) -> Self {
        let table = match mode {
            RewardMode::Length => vec![
                (RewardTerm::Survival, weights.survival),
                (RewardTerm::DeathPenalty, weights.death),
                (RewardTerm::FoodEaten, weights.food),
                (RewardTerm::MoveCloser, weights.closer),
                (RewardTerm::MoveAway, weights.away),
                (RewardTerm::TurnTowardFood, weights.turn_toward_food),
                (
                    RewardTerm::StraightPenalty {
                        limit: weights.straight_limit,
                    },
                    weights.straight,
                ),
                (RewardTerm::WallEvasion, weights.wall_evasion),
            ],
            RewardMode::Survival => vec![
                (RewardTerm::Survival, weights.survival),
                (RewardTerm::DeathPenalty, weights.death),
                (RewardTerm::WallProximity, weights.wall_proximity),
            ],
        };

        Self {
            terms: table.into_iter().filter(|&(_, weight)| weight != 0.0).collect(),
        }
    }

    /// Active terms and their weights
    pub fn terms(&self) -> &[(RewardTerm, f32)] {
        &self.terms
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.terms.iter().any(|(term, _)| term.name() == name)
    }

    /// Evaluate every active term for one tick
    pub fn compute(&self, ctx: &TickContext) -> RewardBreakdown {
        let distances = (
            GridWorld::dist(ctx.prev_head, ctx.food),
            GridWorld::dist(ctx.new_head, ctx.food),
        );

        let terms = self
            .terms
            .iter()
            .filter_map(|(term, weight)| {
                term.evaluate(*weight, ctx, distances)
                    .map(|value| (term.name(), value))
            })
            .collect();

        RewardBreakdown::from_terms(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TickContext {
        TickContext {
            prev_head: Position::new(150, 100),
            new_head: Position::new(160, 100),
            food: Position::new(200, 100),
            prev_direction: Direction::Right,
            new_direction: Direction::Right,
            terminated: false,
            ate_food: false,
            straight_ticks: 1,
            near_wall: false,
            wall_evade: false,
        }
    }

    fn length_engine() -> RewardEngine {
        RewardEngine::new(RewardMode::Length, &RewardWeights::default())
    }

    #[test]
    fn test_default_weights() {
        let weights = RewardWeights::default();
        assert_eq!(weights.survival, 0.2);
        assert_eq!(weights.death, 50.0);
        assert_eq!(weights.food, 50.0);
        assert_eq!(weights.closer, 1.0);
        assert_eq!(weights.away, 0.5);
        assert_eq!(weights.turn_toward_food, 2.0);
        assert_eq!(weights.straight, 0.2);
        assert_eq!(weights.straight_limit, 10);
    }

    #[test]
    fn test_mode_registries() {
        let length = length_engine();
        for name in [
            "survival",
            "death_penalty",
            "food_eaten",
            "move_closer",
            "move_away",
            "turn_toward_food",
            "straight_penalty",
        ] {
            assert!(length.is_active(name), "{name} should be active");
        }
        assert!(!length.is_active("wall_proximity"));
        assert!(!length.is_active("wall_evasion"));

        let survival = RewardEngine::new(RewardMode::Survival, &RewardWeights::default());
        assert_eq!(survival.terms().len(), 3);
        assert!(survival.is_active("survival"));
        assert!(survival.is_active("death_penalty"));
        assert!(survival.is_active("wall_proximity"));
        assert!(!survival.is_active("food_eaten"));
    }

    #[test]
    fn test_zero_weight_terms_are_skipped() {
        let weights = RewardWeights {
            away: 0.0,
            wall_evasion: 5.0,
            ..Default::default()
        };
        let engine = RewardEngine::new(RewardMode::Length, &weights);
        assert!(!engine.is_active("move_away"));
        assert!(engine.is_active("wall_evasion"));
    }

    #[test]
    fn test_move_closer() {
        let breakdown = length_engine().compute(&ctx());

        assert_eq!(breakdown.get("survival"), Some(0.2));
        assert_eq!(breakdown.get("move_closer"), Some(1.0));
        assert!(!breakdown.contains("move_away"));
        assert!(!breakdown.contains("death_penalty"));
        assert_eq!(breakdown.total(), 0.2 + 1.0);
    }

    #[test]
    fn test_move_away_and_tie() {
        let mut away = ctx();
        away.food = Position::new(100, 100);
        let breakdown = length_engine().compute(&away);
        assert_eq!(breakdown.get("move_away"), Some(-0.5));
        assert!(!breakdown.contains("move_closer"));

        // Perpendicular move past the food column keeps the distance equal
        let mut tie = ctx();
        tie.prev_head = Position::new(150, 100);
        tie.new_head = Position::new(150, 90);
        tie.food = Position::new(150, 95);
        let breakdown = length_engine().compute(&tie);
        assert!(!breakdown.contains("move_closer"));
        assert!(!breakdown.contains("move_away"));
    }

    #[test]
    fn test_death_replaces_survival() {
        let mut dead = ctx();
        dead.terminated = true;
        let breakdown = length_engine().compute(&dead);

        assert_eq!(breakdown.get("death_penalty"), Some(-50.0));
        assert!(!breakdown.contains("survival"));
    }

    #[test]
    fn test_food_eaten() {
        let mut eat = ctx();
        eat.food = eat.new_head;
        eat.ate_food = true;
        let breakdown = length_engine().compute(&eat);

        assert_eq!(breakdown.get("food_eaten"), Some(50.0));
        assert_eq!(breakdown.get("move_closer"), Some(1.0));
    }

    #[test]
    fn test_turn_toward_food() {
        let mut turn = ctx();
        turn.food = Position::new(150, 20);
        turn.new_direction = Direction::Up;
        turn.new_head = Position::new(150, 90);
        turn.straight_ticks = 0;
        let breakdown = length_engine().compute(&turn);
        assert_eq!(breakdown.get("turn_toward_food"), Some(2.0));

        // Turning away from the food earns nothing
        turn.new_direction = Direction::Down;
        turn.new_head = Position::new(150, 110);
        let breakdown = length_engine().compute(&turn);
        assert!(!breakdown.contains("turn_toward_food"));

        // Heading toward the food without turning earns nothing
        let breakdown = length_engine().compute(&ctx());
        assert!(!breakdown.contains("turn_toward_food"));
    }

    #[test]
    fn test_turn_toward_food_is_judged_after_the_move() {
        // Food up and to the right: Up looks right from the old head, but from
        // the new head at (150, 90) the food lies straight to the Right
        let mut diagonal = ctx();
        diagonal.food = Position::new(160, 90);
        diagonal.new_direction = Direction::Up;
        diagonal.new_head = Position::new(150, 90);
        diagonal.straight_ticks = 0;

        assert_eq!(Direction::toward(diagonal.prev_head, diagonal.food), Direction::Up);
        assert!(!length_engine().compute(&diagonal).contains("turn_toward_food"));

        // Food further up keeps Up as the post-move heading
        diagonal.food = Position::new(160, 40);
        assert_eq!(
            length_engine().compute(&diagonal).get("turn_toward_food"),
            Some(2.0)
        );
    }

    #[test]
    fn test_straight_penalty_after_limit() {
        let mut straight = ctx();
        straight.straight_ticks = 10;
        assert!(!length_engine().compute(&straight).contains("straight_penalty"));

        straight.straight_ticks = 11;
        assert_eq!(
            length_engine().compute(&straight).get("straight_penalty"),
            Some(-0.2)
        );
    }

    #[test]
    fn test_survival_mode_wall_proximity() {
        let engine = RewardEngine::new(RewardMode::Survival, &RewardWeights::default());
        let mut near = ctx();
        near.near_wall = true;
        let breakdown = engine.compute(&near);

        assert_eq!(breakdown.get("survival"), Some(0.2));
        assert_eq!(breakdown.get("wall_proximity"), Some(-0.5));
        assert!(!breakdown.contains("move_closer"));
        assert_eq!(breakdown.len(), 2);
    }

    #[test]
    fn test_wall_evasion_bonus() {
        let weights = RewardWeights {
            wall_evasion: 5.0,
            ..Default::default()
        };
        let engine = RewardEngine::new(RewardMode::Length, &weights);
        let mut evade = ctx();
        evade.wall_evade = true;
        assert_eq!(engine.compute(&evade).get("wall_evasion"), Some(5.0));

        evade.terminated = true;
        assert!(!engine.compute(&evade).contains("wall_evasion"));
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let mut busy = ctx();
        busy.straight_ticks = 20;
        busy.ate_food = true;
        busy.food = busy.new_head;
        let breakdown = length_engine().compute(&busy);

        let sum: f32 = breakdown.iter().map(|(_, value)| value).sum();
        assert_eq!(sum, breakdown.total());
        assert!(breakdown.len() >= 3);
    }

    #[test]
    fn test_breakdown_serializes_flat() {
        let json = serde_json::to_value(length_engine().compute(&ctx())).unwrap();
        assert_eq!(json["move_closer"], 1.0);
        assert!(json["total"].is_number());
        assert!(json.get("terms").is_none());
    }

    #[test]
    fn test_reward_mode_serde() {
        assert_eq!(serde_json::to_string(&RewardMode::Length).unwrap(), "\"length\"");
        let mode: RewardMode = serde_json::from_str("\"survival\"").unwrap();
        assert_eq!(mode, RewardMode::Survival);
    }
}
