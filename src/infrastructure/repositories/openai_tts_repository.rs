use super::tts_repository::TtsRepository;
use crate::infrastructure::audio::AudioFormat;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

const VOICES: [(&str, &str); 6] = [
    ("alloy", "neutral, balanced"),
    ("echo", "warm, clear"),
    ("fable", "expressive, British"),
    ("onyx", "deep, authoritative"),
    ("nova", "soft, friendly"),
    ("shimmer", "bright, articulate"),
];

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, default_voice: Option<String>) -> Self {
        Self {
            client,
            model,
            default_voice: default_voice.unwrap_or_else(|| "alloy".to_string()),
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn voice_for(name: &str) -> Voice {
        match name.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            other => {
                tracing::warn!(voice = other, "Unknown OpenAI voice, using alloy");
                Voice::Alloy
            }
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            model = %self.model,
            voice = voice,
            text_length = text.chars().count(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice: Self::voice_for(voice),
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    voice = voice,
                    text_length = text.len(),
                    "OpenAI TTS API call failed"
                );
                format!("OpenAI TTS error: {}", e)
            })?;

        let audio_bytes = response.bytes.to_vec();

        tracing::info!(
            provider = "openai",
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
        VOICES.to_vec()
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
