use serde::{Deserialize, Serialize};

/// A code block lifted out of article markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub code: String,
    /// Fence language tag, empty when unknown
    pub language: String,
}

impl CodeBlock {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// Counters exposed by the summarizer for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub cache_hits: u64,
    pub api_calls: u64,
    pub errors: u64,
    pub cache_size: usize,
}
