pub mod error;
pub mod language;
pub mod model;
pub mod rules;
pub mod service;

pub use error::SummaryError;
pub use language::display_name;
pub use model::{CodeBlock, SummaryStats};
pub use rules::{classify, rule_based_summary, SnippetKind};
pub use service::{CodeSummarizer, CodeSummarizerApi, SummaryStrategy};
