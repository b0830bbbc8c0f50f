use serde::Serialize;

/// Speech-ready text for one article.
///
/// Counts are derived from `body_text` at construction and cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedText {
    sequence_index: u32,
    title: String,
    date: String,
    body_text: String,
    char_count: usize,
    word_count: usize,
}

impl ProcessedText {
    pub fn new(
        sequence_index: u32,
        title: impl Into<String>,
        date: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        let body_text = body_text.into();
        let char_count = body_text.chars().count();
        let word_count = body_text.split_whitespace().count();

        Self {
            sequence_index,
            title: title.into(),
            date: date.into(),
            body_text,
            char_count,
            word_count,
        }
    }

    pub fn sequence_index(&self) -> u32 {
        self.sequence_index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}
