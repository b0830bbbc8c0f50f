use once_cell::sync::Lazy;
use regex::Regex;

static DAY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*Day\s+\d+\s*:\s*").unwrap());

pub const DEFAULT_SERIES_NAME: &str = "31 Days of Vibe Coding";
pub const DEFAULT_SERIES_LENGTH: u32 = 31;
pub const DEFAULT_INTRO: &str = "Welcome to Day {index} of {series}. Today's topic is: {title}.";
pub const DEFAULT_OUTRO: &str =
    "That's it for Day {index}. Join us tomorrow for Day {next}. Thanks for listening to {series}.";
pub const DEFAULT_FINAL_OUTRO: &str = "Congratulations! You've completed {series}. Thanks for listening to the entire series. Now go build something amazing with AI.";

/// Spoken copy wrapped around every episode.
///
/// Templates understand `{index}`, `{next}`, `{title}` and `{series}`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeTemplates {
    pub series_name: String,
    /// Index of the last episode; it gets the final outro
    pub series_length: u32,
    pub intro: String,
    pub outro: String,
    pub final_outro: String,
}

impl Default for EpisodeTemplates {
    fn default() -> Self {
        Self {
            series_name: DEFAULT_SERIES_NAME.to_string(),
            series_length: DEFAULT_SERIES_LENGTH,
            intro: DEFAULT_INTRO.to_string(),
            outro: DEFAULT_OUTRO.to_string(),
            final_outro: DEFAULT_FINAL_OUTRO.to_string(),
        }
    }
}

impl EpisodeTemplates {
    pub fn intro(&self, index: u32, title: &str) -> String {
        self.render(&self.intro, index, &clean_title(title))
    }

    pub fn outro(&self, index: u32) -> String {
        if index >= self.series_length {
            self.render(&self.final_outro, index, "")
        } else {
            self.render(&self.outro, index, "")
        }
    }

    fn render(&self, template: &str, index: u32, title: &str) -> String {
        template
            .replace("{index}", &index.to_string())
            .replace("{next}", &(index + 1).to_string())
            .replace("{series}", &self.series_name)
            .replace("{title}", title)
    }
}

/// Strip a leading `Day N:` marker from an article title.
pub fn clean_title(title: &str) -> String {
    DAY_PREFIX.replace(title, "").trim().to_string()
}
