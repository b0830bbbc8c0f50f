use super::chunker::{estimate_minutes, split_into_chunks};
use super::error::SynthesisError;
use crate::infrastructure::audio::{AudioFormat, AudioStitcher};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub audio_data: Vec<u8>,
    pub chunk_count: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub duration_minutes: f64,
}

impl SynthesisResult {
    fn empty() -> Self {
        Self {
            audio_data: Vec::new(),
            chunk_count: 0,
            char_count: 0,
            word_count: 0,
            duration_minutes: 0.0,
        }
    }
}

#[async_trait]
pub trait SynthesisCoordinatorApi: Send + Sync {
    /// Synthesize text of any length as one continuous audio artifact
    ///
    /// Text within the per-request limit is sent as-is. Longer text is split
    /// on paragraph and sentence boundaries, synthesized chunk by chunk in
    /// order, and stitched. The first failing chunk aborts the whole text.
    ///
    /// Empty text is a no-op returning an empty result.
    async fn synthesize_long_text(&self, text: &str) -> Result<SynthesisResult, SynthesisError>;

    /// Characters sent per backend request
    fn max_chars(&self) -> usize;

    /// Encoding of the produced audio
    fn audio_format(&self) -> AudioFormat;
}

pub struct SynthesisCoordinator {
    tts_repo: Arc<dyn TtsRepository>,
    stitcher: Box<dyn AudioStitcher>,
    voice: String,
    max_chars: usize,
}

impl SynthesisCoordinator {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        stitcher: Box<dyn AudioStitcher>,
        voice: String,
        max_chars: usize,
    ) -> Self {
        Self {
            tts_repo,
            stitcher,
            voice,
            max_chars,
        }
    }

    /// Coordinator using the backend's own voice, limit and audio format.
    ///
    /// A `max_chars` override is clamped to the backend limit.
    pub fn for_backend(
        tts_repo: Arc<dyn TtsRepository>,
        voice: Option<String>,
        max_chars: Option<usize>,
    ) -> Self {
        let limit = tts_repo.max_chars_per_request();
        let max_chars = max_chars.map_or(limit, |m| m.clamp(1, limit));
        let voice = voice.unwrap_or_else(|| tts_repo.default_voice().to_string());
        let stitcher = tts_repo.audio_format().stitcher();

        Self::new(tts_repo, stitcher, voice, max_chars)
    }
}

#[async_trait]
impl SynthesisCoordinatorApi for SynthesisCoordinator {
    async fn synthesize_long_text(&self, text: &str) -> Result<SynthesisResult, SynthesisError> {
        let chunks = split_into_chunks(text, self.max_chars);
        if chunks.is_empty() {
            tracing::debug!("Nothing to synthesize");
            return Ok(SynthesisResult::empty());
        }

        tracing::info!(
            provider = self.tts_repo.provider(),
            voice = %self.voice,
            chunk_count = chunks.len(),
            max_chars = self.max_chars,
            "Starting synthesis"
        );

        let mut segments = Vec::with_capacity(chunks.len());
        let mut result = SynthesisResult::empty();

        for chunk in &chunks {
            let chunk_chars = chunk.text.chars().count();
            tracing::debug!(
                chunk_index = chunk.order_index,
                chunk_chars = chunk_chars,
                "Synthesizing chunk"
            );

            let audio = self
                .tts_repo
                .synthesize(&chunk.text, &self.voice)
                .await
                .map_err(|message| {
                    tracing::error!(
                        chunk_index = chunk.order_index,
                        error = %message,
                        "Chunk synthesis failed, aborting"
                    );
                    SynthesisError::Chunk {
                        index: chunk.order_index,
                        message,
                    }
                })?;

            segments.push(audio);
            result.char_count += chunk_chars;
            result.word_count += chunk.text.split_whitespace().count();
            result.duration_minutes += estimate_minutes(&chunk.text);
        }

        result.chunk_count = segments.len();
        result.audio_data = if segments.len() == 1 {
            segments.pop().unwrap_or_default()
        } else {
            self.stitcher
                .stitch(segments)
                .map_err(SynthesisError::Stitch)?
        };

        tracing::info!(
            chunk_count = result.chunk_count,
            characters = result.char_count,
            duration_minutes = result.duration_minutes,
            audio_size_bytes = result.audio_data.len(),
            "Synthesis completed"
        );

        Ok(result)
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    fn audio_format(&self) -> AudioFormat {
        self.tts_repo.audio_format()
    }
}
