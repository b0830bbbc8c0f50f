use super::service::SynthesisResult;
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// ElevenLabs Pro tier price per synthesized character, in USD
pub const PRO_TIER_COST_PER_CHARACTER: f64 = 0.00024;

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeRecord {
    pub index: u32,
    pub characters: usize,
    pub words: usize,
    pub chunk_count: usize,
    pub duration_estimate_minutes: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeFailure {
    pub index: u32,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-run record of generated episodes and failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub total_characters: usize,
    pub total_episodes: usize,
    pub total_minutes: f64,
    /// Dollar cost of `total_characters` at the Pro tier rate
    pub estimated_cost_at_pro_tier: f64,
    pub episodes: Vec<EpisodeRecord>,
    pub errors: Vec<EpisodeFailure>,
}

impl GenerationStats {
    pub fn add_episode(&mut self, index: u32, result: &SynthesisResult) {
        self.total_characters += result.char_count;
        self.total_episodes += 1;
        self.total_minutes += result.duration_minutes;
        self.estimated_cost_at_pro_tier =
            self.total_characters as f64 * PRO_TIER_COST_PER_CHARACTER;
        self.episodes.push(EpisodeRecord {
            index,
            characters: result.char_count,
            words: result.word_count,
            chunk_count: result.chunk_count,
            duration_estimate_minutes: result.duration_minutes,
            timestamp: Utc::now(),
        });
    }

    pub fn add_error(&mut self, index: u32, error: impl Into<String>) {
        self.errors.push(EpisodeFailure {
            index,
            error: error.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn summary(&self) -> String {
        format!(
            "Generated {} episodes\nTotal characters: {}\nEstimated listening time: {:.1} minutes\nEstimated cost (Pro tier): ${:.2}\nErrors: {}",
            self.total_episodes,
            self.total_characters,
            self.total_minutes,
            self.estimated_cost_at_pro_tier,
            self.errors.len()
        )
    }

    /// Write the stats as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "Generation stats saved");
        Ok(())
    }
}
