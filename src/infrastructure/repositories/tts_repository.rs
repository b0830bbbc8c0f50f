use crate::infrastructure::audio::AudioFormat;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs, OpenAI, AWS Polly, etc.)
///
/// Implementations synthesize exactly the text they are given. Splitting long
/// text and merging the audio is the synthesis coordinator's job; callers
/// must respect `max_chars_per_request`.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one request worth of text
    ///
    /// # Arguments
    /// * `text` - Speech-ready text, at most `max_chars_per_request` characters
    /// * `voice` - Provider voice selector (name or id)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String>;

    /// Largest text, in characters, accepted by a single request
    fn max_chars_per_request(&self) -> usize;

    /// Encoding of the bytes returned by `synthesize`
    fn audio_format(&self) -> AudioFormat;

    fn default_voice(&self) -> &str;

    /// Friendly voice names this provider understands, with descriptions
    fn known_voices(&self) -> Vec<(&'static str, &'static str)>;

    /// Provider name for logging
    fn provider(&self) -> &'static str;
}
