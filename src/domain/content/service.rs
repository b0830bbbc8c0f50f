use super::extract::{extract_segments, Segment};
use super::model::ProcessedText;
use super::normalize::normalize_for_speech;
use super::templates::{clean_title, EpisodeTemplates};
use crate::domain::summary::{display_name, CodeBlock, CodeSummarizerApi};
use async_trait::async_trait;
use std::sync::Arc;

/// What to say in place of a code block.
pub enum CodeBlockHandling {
    /// Ask the summarizer for a one-sentence description
    Summarize {
        summarizer: Arc<dyn CodeSummarizerApi>,
        force_refresh: bool,
    },
    /// Fixed bracketed placeholder naming the language
    Placeholder,
}

#[async_trait]
pub trait ContentTransformerApi: Send + Sync {
    /// Turn article markup into speech-ready text wrapped in intro and outro.
    ///
    /// Never fails: malformed markup degrades to its bare text and summarizer
    /// problems degrade to rule-based descriptions.
    async fn transform(
        &self,
        markup: &str,
        sequence_index: u32,
        title: &str,
        date: &str,
    ) -> ProcessedText;
}

pub struct ContentTransformer {
    code_blocks: CodeBlockHandling,
    templates: EpisodeTemplates,
}

impl ContentTransformer {
    pub fn new(code_blocks: CodeBlockHandling, templates: EpisodeTemplates) -> Self {
        Self {
            code_blocks,
            templates,
        }
    }

    async fn describe(&self, block: &CodeBlock, context: &str) -> String {
        match &self.code_blocks {
            CodeBlockHandling::Summarize {
                summarizer,
                force_refresh,
            } => {
                let summary = summarizer
                    .summarize(&block.code, &block.language, context, *force_refresh)
                    .await;
                normalize_for_speech(&summary)
            }
            CodeBlockHandling::Placeholder => placeholder(&block.language),
        }
    }
}

#[async_trait]
impl ContentTransformerApi for ContentTransformer {
    async fn transform(
        &self,
        markup: &str,
        sequence_index: u32,
        title: &str,
        date: &str,
    ) -> ProcessedText {
        let context = clean_title(title);
        let segments = extract_segments(markup);
        let mut paragraphs = Vec::with_capacity(segments.len() + 2);
        let mut code_blocks = 0usize;

        paragraphs.push(self.templates.intro(sequence_index, title));
        for segment in &segments {
            let spoken = match segment {
                Segment::Paragraph(text) | Segment::Heading(text) => normalize_for_speech(text),
                Segment::Code(block) => {
                    code_blocks += 1;
                    self.describe(block, &context).await
                }
            };
            if !spoken.is_empty() {
                paragraphs.push(spoken);
            }
        }
        paragraphs.push(self.templates.outro(sequence_index));

        let processed = ProcessedText::new(sequence_index, title, date, paragraphs.join("\n\n"));

        tracing::info!(
            index = sequence_index,
            segments = segments.len(),
            code_blocks = code_blocks,
            characters = processed.char_count(),
            words = processed.word_count(),
            "Article transformed"
        );

        processed
    }
}

/// Spoken stand-in for a code block when summaries are disabled.
pub fn placeholder(language: &str) -> String {
    format!(
        "[{} code example - see the article for details]",
        display_name(language)
    )
}
