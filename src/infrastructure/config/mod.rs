use crate::domain::content::EpisodeTemplates;
use crate::error::{AppError, AppResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub tts_engine: TtsEngine,
    pub tts_voice: Option<String>,
    pub max_chars_per_request: Option<usize>,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_model_id: String,
    pub elevenlabs_output_format: String,
    // OpenAI
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub openai_chat_model: String,
    // AWS Polly
    pub aws_region: String,
    // Code summaries
    pub llm_provider: LlmProvider,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub summary_cache_enabled: bool,
    pub summary_cache_path: PathBuf,
    // Sources
    pub site_url: String,
    // Output
    pub output_dir: PathBuf,
    pub fetch_delay: Duration,
    pub templates: EpisodeTemplates,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsEngine {
    ElevenLabs,
    OpenAi,
    Polly,
}

impl FromStr for TtsEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elevenlabs" => Ok(TtsEngine::ElevenLabs),
            "openai" => Ok(TtsEngine::OpenAi),
            "polly" => Ok(TtsEngine::Polly),
            other => Err(format!(
                "unknown TTS engine '{}' (expected elevenlabs, openai or polly)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(LlmProvider::Anthropic),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(format!(
                "unknown LLM provider '{}' (expected anthropic or openai)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable lookup. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let defaults = EpisodeTemplates::default();

        let config = Config {
            tts_engine: or("TTS_ENGINE", "elevenlabs")
                .parse()
                .map_err(AppError::Config)?,
            tts_voice: var("TTS_VOICE"),
            max_chars_per_request: var("MAX_CHARS_PER_REQUEST")
                .map(|v| parse_number::<usize>("MAX_CHARS_PER_REQUEST", &v))
                .transpose()?,
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_model_id: or("ELEVENLABS_MODEL_ID", "eleven_multilingual_v2"),
            elevenlabs_output_format: or("ELEVENLABS_OUTPUT_FORMAT", "mp3_44100_128"),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_tts_model: or("OPENAI_TTS_MODEL", "tts-1"),
            openai_chat_model: or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            aws_region: or("AWS_REGION", "eu-west-1"),
            llm_provider: or("LLM_PROVIDER", "anthropic")
                .parse()
                .map_err(AppError::Config)?,
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            anthropic_model: or("ANTHROPIC_API_MODEL", "claude-sonnet-4-20250514"),
            summary_cache_enabled: or("SUMMARY_CACHE_ENABLED", "true").to_lowercase() != "false",
            summary_cache_path: PathBuf::from(or(
                "SUMMARY_CACHE_PATH",
                "cache/code_summaries.json",
            )),
            site_url: or("SITE_URL", "https://31daysofvibecoding.com"),
            output_dir: PathBuf::from(or("OUTPUT_DIR", "output")),
            fetch_delay: parse_delay(&or("FETCH_DELAY_SECS", "1.0"))?,
            templates: EpisodeTemplates {
                series_name: or("SERIES_NAME", &defaults.series_name),
                series_length: var("SERIES_LENGTH")
                    .map(|v| parse_number::<u32>("SERIES_LENGTH", &v))
                    .transpose()?
                    .unwrap_or(defaults.series_length),
                intro: or("EPISODE_INTRO_TEMPLATE", &defaults.intro),
                outro: or("EPISODE_OUTRO_TEMPLATE", &defaults.outro),
                final_outro: or("EPISODE_FINAL_OUTRO_TEMPLATE", &defaults.final_outro),
            },
            log_format: match or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(config)
    }

    /// Credential lookup that turns a missing key into a configuration error
    pub fn require(value: &Option<String>, name: &str) -> AppResult<String> {
        value
            .clone()
            .ok_or_else(|| AppError::Config(format!("{} is not set", name)))
    }

    /// Command-line override of FETCH_DELAY_SECS, validated the same way
    pub fn set_fetch_delay_secs(&mut self, secs: f64) -> AppResult<()> {
        self.fetch_delay = delay_from_secs(secs)?;
        Ok(())
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join("generation_stats.json")
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a positive number, got '{}'", name, value)))
}

fn parse_delay(value: &str) -> AppResult<Duration> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("FETCH_DELAY_SECS is not a number: '{}'", value)))?;
    delay_from_secs(secs)
}

fn delay_from_secs(secs: f64) -> AppResult<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(AppError::Config(format!(
            "FETCH_DELAY_SECS must be zero or more, got {}",
            secs
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}
