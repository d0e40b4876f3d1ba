pub mod episode;
pub mod evaluation;

pub use episode::{EpisodeAccumulator, EpisodeRecord};
pub use evaluation::EvaluationStats;
