use crate::domain::content::ProcessedText;
use crate::error::{AppError, AppResult};
use crate::infrastructure::audio::AudioFormat;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SEPARATOR_WIDTH: usize = 50;

/// File-backed store for per-article text and audio artifacts.
///
/// Layout under the output directory:
/// - `text/day_NN.txt` - metadata header, separator, speech text
/// - `audio/day_NN.<ext>` - stitched episode audio
pub struct EpisodeRepository {
    text_dir: PathBuf,
    audio_dir: PathBuf,
}

impl EpisodeRepository {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref();
        Self {
            text_dir: output_dir.join("text"),
            audio_dir: output_dir.join("audio"),
        }
    }

    pub fn text_path(&self, index: u32) -> PathBuf {
        self.text_dir.join(format!("day_{:02}.txt", index))
    }

    pub fn audio_path(&self, index: u32, format: AudioFormat) -> PathBuf {
        self.audio_dir
            .join(format!("day_{:02}.{}", index, format.extension()))
    }

    /// Write the text artifact for an article
    pub fn save_text(&self, text: &ProcessedText) -> AppResult<PathBuf> {
        std::fs::create_dir_all(&self.text_dir)?;
        let path = self.text_path(text.sequence_index());

        let content = format!(
            "Title: {}\nDay: {}\nDate: {}\nCharacters: {}\nWords: {}\n{}\n\n{}",
            text.title(),
            text.sequence_index(),
            text.date(),
            text.char_count(),
            text.word_count(),
            "=".repeat(SEPARATOR_WIDTH),
            text.body_text()
        );
        std::fs::write(&path, content)?;

        tracing::debug!(
            index = text.sequence_index(),
            path = %path.display(),
            "Text artifact saved"
        );
        Ok(path)
    }

    /// Read a previously saved text artifact back
    pub fn load_text(&self, index: u32) -> AppResult<ProcessedText> {
        let path = self.text_path(index);
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Cached text not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        let (metadata, body) = parse_artifact(&content);

        let sequence_index = metadata
            .get("day")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(index);
        let title = metadata.get("title").cloned().unwrap_or_default();
        let date = metadata.get("date").cloned().unwrap_or_default();

        Ok(ProcessedText::new(sequence_index, title, date, body))
    }

    /// Indexes with a stored text artifact, ascending
    pub fn cached_indexes(&self) -> AppResult<Vec<u32>> {
        if !self.text_dir.exists() {
            return Ok(Vec::new());
        }

        let mut indexes: Vec<u32> = std::fs::read_dir(&self.text_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                name.strip_prefix("day_")?
                    .strip_suffix(".txt")?
                    .parse()
                    .ok()
            })
            .collect();
        indexes.sort_unstable();
        Ok(indexes)
    }

    pub fn save_audio(&self, index: u32, format: AudioFormat, audio: &[u8]) -> AppResult<PathBuf> {
        std::fs::create_dir_all(&self.audio_dir)?;
        let path = self.audio_path(index, format);
        std::fs::write(&path, audio)?;

        tracing::info!(
            index = index,
            path = %path.display(),
            size_bytes = audio.len(),
            "Episode audio saved"
        );
        Ok(path)
    }
}

/// Split an artifact into lower-cased `Key: value` metadata and the body.
///
/// The header ends at the first line starting with `=`; the blank line that
/// follows it is not part of the body.
fn parse_artifact(content: &str) -> (HashMap<String, String>, String) {
    let mut metadata = HashMap::new();
    let lines: Vec<&str> = content.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with('=') {
            let body = lines.get(i + 2..).map(|rest| rest.join("\n")).unwrap_or_default();
            return (metadata, body);
        }
        if let Some((key, value)) = line.split_once(": ") {
            metadata.insert(key.to_lowercase(), value.to_string());
        }
    }

    // No separator: treat the whole file as body
    (HashMap::new(), content.to_string())
}
