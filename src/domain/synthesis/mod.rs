pub mod chunker;
pub mod error;
pub mod service;
pub mod stats;

pub use chunker::{estimate_minutes, split_into_chunks, split_sentences, TextChunk, WORDS_PER_MINUTE};
pub use error::SynthesisError;
pub use service::{SynthesisCoordinator, SynthesisCoordinatorApi, SynthesisResult};
pub use stats::{EpisodeFailure, EpisodeRecord, GenerationStats, PRO_TIER_COST_PER_CHARACTER};
