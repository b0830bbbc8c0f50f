use super::error::SummaryError;
use super::model::SummaryStats;
use super::rules::rule_based_summary;
use crate::domain::synthesis::split_sentences;
use crate::infrastructure::repositories::{cache_key, LlmRepository, SummaryCacheRepository};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Instructions sent with every summarization request.
pub const SYSTEM_PROMPT: &str = r#"You describe code examples for a podcast. The listener cannot see the code.

Describe what the code shows in exactly ONE short, factual sentence.
- Start with "Showing" or a similarly brief lead-in.
- Say what the code IS, not what it means or why it exists.
- Mention the language naturally when it is obvious.
- Do not speculate about the surrounding article.

Examples:
- "Showing git commands that stage all changes and commit with a work-in-progress message."
- "Showing a Python function that validates email addresses using a regex pattern."
- "Showing a React dashboard component with stat cards and an activity feed.""#;

/// How summaries are produced on a cache miss.
pub enum SummaryStrategy {
    /// Ask a language model, falling back to the rule table on failure.
    LlmBacked(Arc<dyn LlmRepository>),
    /// Rule table only. Cached model output is still reused.
    RuleBased,
}

#[async_trait]
pub trait CodeSummarizerApi: Send + Sync {
    /// Describe a code block in one spoken sentence.
    ///
    /// Always returns a non-empty string; failures degrade to the rule-based
    /// description.
    async fn summarize(
        &self,
        code: &str,
        language: &str,
        context: &str,
        force_refresh: bool,
    ) -> String;

    fn stats(&self) -> SummaryStats;
}

pub struct CodeSummarizer {
    strategy: SummaryStrategy,
    cache: Arc<SummaryCacheRepository>,
    fallback: fn(&str, &str) -> String,
    cache_hits: AtomicU64,
    api_calls: AtomicU64,
    errors: AtomicU64,
}

impl CodeSummarizer {
    pub fn new(strategy: SummaryStrategy, cache: Arc<SummaryCacheRepository>) -> Self {
        Self {
            strategy,
            cache,
            fallback: rule_based_summary,
            cache_hits: AtomicU64::new(0),
            api_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CodeSummarizerApi for CodeSummarizer {
    async fn summarize(
        &self,
        code: &str,
        language: &str,
        context: &str,
        force_refresh: bool,
    ) -> String {
        let key = cache_key(language, code);

        if !force_refresh {
            if let Some(cached) = self.cache.get(&key) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, language = language, "Code summary cache hit");
                return cached;
            }
        }

        let llm = match &self.strategy {
            SummaryStrategy::LlmBacked(llm) => llm,
            SummaryStrategy::RuleBased => return (self.fallback)(code, language),
        };

        let summary = match self.generate(llm.as_ref(), code, language, context).await {
            Ok(summary) => {
                self.api_calls.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    key = %key,
                    provider = llm.provider(),
                    summary_length = summary.len(),
                    "Code block summarized"
                );
                summary
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    error = %e,
                    key = %key,
                    provider = llm.provider(),
                    "Code summarization failed, using rule-based description"
                );
                (self.fallback)(code, language)
            }
        };

        // Fallbacks are cached too; only force_refresh retries the model.
        self.cache.insert(&key, &summary);
        summary
    }

    fn stats(&self) -> SummaryStats {
        SummaryStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            api_calls: self.api_calls.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cache_size: self.cache.len(),
        }
    }
}

impl CodeSummarizer {
    async fn generate(
        &self,
        llm: &dyn LlmRepository,
        code: &str,
        language: &str,
        context: &str,
    ) -> Result<String, SummaryError> {
        let prompt = build_prompt(code, language, context);
        let response = llm
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(SummaryError::Llm)?;
        parse_summary(&response)
    }
}

fn build_prompt(code: &str, language: &str, context: &str) -> String {
    let subject = if language.is_empty() { "code" } else { language };
    let mut prompt = format!(
        "Briefly describe this {} in one sentence:\n\n```{}\n{}\n```",
        subject, language, code
    );
    if !context.trim().is_empty() {
        prompt.push_str(&format!(
            "\n\nThe example comes from an article titled \"{}\".",
            context.trim()
        ));
    }
    prompt
}

/// Reduce a model response to its first sentence on a single line.
fn parse_summary(response: &str) -> Result<String, SummaryError> {
    let flattened = response.split_whitespace().collect::<Vec<_>>().join(" ");
    let first = split_sentences(unquote(&flattened))
        .into_iter()
        .next()
        .map(unquote)
        .unwrap_or_default();
    if first.is_empty() {
        return Err(SummaryError::EmptyResponse);
    }
    Ok(first.to_string())
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'').trim()
}
