use async_trait::async_trait;

/// Repository for one-shot language-model completions.
/// Abstracts the underlying provider (Anthropic, OpenAI, ...)
///
/// Every failure mode (transport, auth, rate limit, empty or malformed
/// payload) is reported as `Err` with a human-readable message.
#[async_trait]
pub trait LlmRepository: Send + Sync {
    /// Run a completion with the given system instructions and user prompt.
    ///
    /// Returns the trimmed response text, never an empty string.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, String>;

    /// Provider name for logging
    fn provider(&self) -> &'static str;
}
