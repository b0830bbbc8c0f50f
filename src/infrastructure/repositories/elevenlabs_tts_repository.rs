use super::tts_repository::TtsRepository;
use crate::infrastructure::audio::{wrap_pcm16, AudioFormat};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const ELEVENLABS_TTS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// ElevenLabs accepts 5000 characters on most plans; keep a margin
const MAX_BATCH_SIZE: usize = 4500;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Friendly names for the stock ElevenLabs voices
const VOICES: [(&str, &str, &str); 9] = [
    ("rachel", "21m00Tcm4TlvDq8ikWAM", "American, female, calm"),
    ("domi", "AZnzlk1XvdvUeBnXmlld", "American, female, strong"),
    ("bella", "EXAVITQu4vr4xnSDxMaL", "American, female, soft"),
    ("antoni", "ErXwobaYiN019PkySvjV", "American, male"),
    ("elli", "MF3mGyEYCl7XYWbV9V6O", "American, female, young"),
    ("josh", "TxGEqnHWrfWFTfGW9XjX", "American, male, deep"),
    ("arnold", "VR6AewLTigWG4xSOukaG", "American, male, crisp"),
    ("adam", "pNInz6obpgDQGcFmaJgB", "American, male, deep"),
    ("sam", "yoZ06aMxZJJ28mfd3POQ", "American, male, raspy"),
];

/// Supported `output_format` families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputEncoding {
    Mp3,
    /// Headerless 16-bit mono PCM at the given rate
    Pcm { sample_rate: u32 },
}

impl OutputEncoding {
    fn parse(output_format: &str) -> Result<Self, String> {
        let unsupported = || {
            format!(
                "unsupported ELEVENLABS_OUTPUT_FORMAT '{}' (expected mp3_<rate>_<bitrate> or pcm_<rate>)",
                output_format
            )
        };

        match output_format.split_once('_') {
            Some(("mp3", _)) => Ok(Self::Mp3),
            Some(("pcm", rate)) => rate
                .parse()
                .map(|sample_rate| Self::Pcm { sample_rate })
                .map_err(|_| unsupported()),
            _ => Err(unsupported()),
        }
    }

    fn accept(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Pcm { .. } => "application/octet-stream",
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    api_key: String,
    model_id: String,
    output_format: String,
    encoding: OutputEncoding,
    default_voice: String,
    http_client: reqwest::Client,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        api_key: String,
        model_id: String,
        output_format: String,
        default_voice: Option<String>,
    ) -> Result<Self, String> {
        let encoding = OutputEncoding::parse(&output_format)?;
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            api_key,
            model_id,
            output_format,
            encoding,
            default_voice: default_voice.unwrap_or_else(|| "rachel".to_string()),
            http_client,
        })
    }

    /// Resolve a friendly voice name to its id; anything else is taken as an id
    fn voice_id(voice: &str) -> &str {
        VOICES
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(voice))
            .map(|(_, id, _)| *id)
            .unwrap_or(voice)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = Self::voice_id(voice);
        let url = format!("{}/{}", ELEVENLABS_TTS_URL, voice_id);

        tracing::info!(
            model = %self.model_id,
            voice = voice,
            voice_id = voice_id,
            text_length = text.chars().count(),
            "Calling ElevenLabs TTS API"
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("output_format", self.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .header("Accept", self.encoding.accept())
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice_id = voice_id, "ElevenLabs request failed");
                format!("ElevenLabs request error: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                voice_id = voice_id,
                text_length = text.len(),
                "ElevenLabs TTS API call failed"
            );
            return Err(format!("ElevenLabs returned status {}: {}", status, error_text));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read ElevenLabs audio: {}", e))?;
        let audio_bytes = match self.encoding {
            OutputEncoding::Mp3 => body.to_vec(),
            OutputEncoding::Pcm { sample_rate } => wrap_pcm16(&body, sample_rate)?,
        };

        tracing::info!(
            provider = "elevenlabs",
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
        match self.encoding {
            OutputEncoding::Mp3 => AudioFormat::Mp3,
            OutputEncoding::Pcm { .. } => AudioFormat::Wav,
        }
    }

    fn default_voice(&self) -> &str {
        &self.default_voice
    }

    fn known_voices(&self) -> Vec<(&'static str, &'static str)> {
        VOICES.iter().map(|(name, _, desc)| (*name, *desc)).collect()
    }

    fn provider(&self) -> &'static str {
        "elevenlabs"
    }
}
