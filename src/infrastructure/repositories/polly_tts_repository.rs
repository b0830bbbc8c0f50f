use super::tts_repository::TtsRepository;
use crate::infrastructure::audio::AudioFormat;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// English voices available on the neural engine
const NEURAL_VOICES: [(&str, &str); 9] = [
    ("Joanna", "US English, female"),
    ("Matthew", "US English, male"),
    ("Ivy", "US English, female child"),
    ("Kendra", "US English, female"),
    ("Kimberly", "US English, female"),
    ("Salli", "US English, female"),
    ("Joey", "US English, male"),
    ("Justin", "US English, male child"),
    ("Kevin", "US English, male child"),
];

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    default_voice: String,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, default_voice: Option<String>) -> Self {
        Self {
            polly_client,
            default_voice: default_voice.unwrap_or_else(|| "Joanna".to_string()),
        }
    }

    /// Polly voice ids are capitalised; accept any casing from the CLI
    fn voice_id(voice: &str) -> VoiceId {
        let canonical = NEURAL_VOICES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(voice))
            .map(|(name, _)| *name)
            .unwrap_or(voice);
        VoiceId::from(canonical)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = Self::voice_id(voice);
        let voice_name = voice_id.as_str().to_string();

        tracing::debug!(
            voice = %voice_name,
            text_length = text.chars().count(),
            "Calling AWS Polly synthesize_speech"
        );

        let response = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    voice = %voice_name,
                    text_length = text.chars().count(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error for voice {}: {}", voice_name, e)
            })?;

        let audio_bytes = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| format!("Failed to read Polly audio stream: {}", e))?
            .into_bytes()
            .to_vec();

        if audio_bytes.is_empty() {
            return Err(format!("AWS Polly returned no audio for voice {}", voice_name));
        }

        tracing::info!(
            provider = "polly",
            voice = %voice_name,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "TTS request completed"
        );

        Ok(audio_bytes)
    }

    fn max_chars_per_request(&self) -> usize {
        MAX_BATCH_SIZE
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn default_voice(&self) -> &str {
        &self.default_voice
    }

    fn known_voices(&self) -> Vec<(&'static str, &'static str)> {
        NEURAL_VOICES.to_vec()
    }

    fn provider(&self) -> &'static str {
        "polly"
    }
}
