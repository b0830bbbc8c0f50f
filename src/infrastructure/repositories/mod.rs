pub mod anthropic_llm_repository;
pub mod elevenlabs_tts_repository;
pub mod episode_repository;
pub mod llm_repository;
pub mod openai_llm_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod summary_cache_repository;
pub mod tts_repository;

pub use anthropic_llm_repository::AnthropicLlmRepository;
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use episode_repository::EpisodeRepository;
pub use llm_repository::LlmRepository;
pub use openai_llm_repository::OpenAiLlmRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use summary_cache_repository::{cache_key, SummaryCacheRepository};
pub use tts_repository::TtsRepository;
