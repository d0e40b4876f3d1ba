use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_curriculum::game::action::{position_after, resolve_direction};
use snake_curriculum::game::collision::check_collision;
use snake_curriculum::game::{Action, Direction, GameConfig, GameState, RewardMode};
use snake_curriculum::metrics::{EpisodeAccumulator, EpisodeRecord, EvaluationStats};
use snake_curriculum::rl::SnakeEnvironment;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_curriculum")]
#[command(version, about = "Roll out scripted policies in the curriculum snake environment")]
struct Cli {
    /// Number of episodes to run
    #[arg(long, default_value = "10")]
    episodes: usize,

    /// Frame width in units (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Frame height in units (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// Step limit per episode (overrides the config file)
    #[arg(long)]
    max_steps: Option<u32>,

    /// Reward mode (overrides the config file)
    #[arg(long)]
    reward_mode: Option<RewardModeArg>,

    /// Environment seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the opening-food curriculum
    #[arg(long)]
    no_curriculum: bool,

    /// JSON file with a full or partial game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Policy driving the snake
    #[arg(long, default_value = "greedy")]
    policy: Policy,

    /// Write per-episode records as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RewardModeArg {
    /// Length-focused shaping (food, approach, turns, walls)
    Length,
    /// Survival-focused shaping
    Survival,
}

impl From<RewardModeArg> for RewardMode {
    fn from(arg: RewardModeArg) -> Self {
        match arg {
            RewardModeArg::Length => RewardMode::Length,
            RewardModeArg::Survival => RewardMode::Survival,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Uniformly random actions
    Random,
    /// Head for the food, avoiding immediate death when possible
    Greedy,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.frame_width = width;
    }
    if let Some(height) = cli.height {
        config.frame_height = height;
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(mode) = cli.reward_mode {
        config.reward_mode = mode.into();
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_curriculum {
        config.curriculum = false;
    }

    config.validate()?;
    Ok(config)
}

/// Action toward the food that does not collide on the next tick, if any
fn greedy_action(state: &GameState) -> Action {
    let head = state.snake.head();
    let current = state.snake.direction;
    let preferred = Direction::toward(head, state.food);

    let survives = |action: Action| {
        let direction = resolve_direction(current, action);
        let next = position_after(head, direction);
        let grows = next == state.food;
        check_collision(&state.snake, next, grows, &state.grid).is_none()
    };

    let mut candidates = vec![Action::from(preferred), Action::from(current)];
    candidates.extend(current.perpendicular().map(Action::from));

    candidates
        .into_iter()
        .find(|&action| survives(action))
        .unwrap_or(Action::from(preferred))
}

fn choose_action(policy: Policy, state: &GameState, rng: &mut ChaCha8Rng) -> Action {
    match policy {
        Policy::Random => Action::ALL[rng.gen_range(0..Action::COUNT)],
        Policy::Greedy => greedy_action(state),
    }
}

fn run_episode(
    env: &mut SnakeEnvironment,
    policy: Policy,
    rng: &mut ChaCha8Rng,
    acc: &mut EpisodeAccumulator,
) -> EpisodeRecord {
    loop {
        let action = choose_action(policy, env.state(), rng);
        let step = env.step(action);
        acc.record_step(&step, env.state().snake.len());
        if step.done() {
            return acc.finish();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    info!(
        width = config.frame_width,
        height = config.frame_height,
        max_steps = config.max_steps,
        reward_mode = ?config.reward_mode,
        curriculum = config.curriculum,
        seed = config.seed,
        "starting rollouts"
    );

    let mut policy_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
    let mut env = SnakeEnvironment::new(config)?;
    let mut acc = EpisodeAccumulator::new();
    let mut stats = EvaluationStats::default();
    let mut records = Vec::with_capacity(cli.episodes);

    for episode in 0..cli.episodes {
        if episode > 0 {
            env.reset(None);
        }
        debug!(episode = env.state().episode, phase = ?env.state().phase, "episode start");

        let record = run_episode(&mut env, cli.policy, &mut policy_rng, &mut acc);
        info!(
            episode = record.episode,
            steps = record.steps,
            reward = record.reward,
            score = record.score,
            time_out = record.time_out,
            "episode finished"
        );
        stats.record_episode(record.clone());
        records.push(record);
    }

    println!("{}", stats.format_summary());

    if let Some(path) = &cli.json_out {
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote episode records");
    }

    Ok(())
}
