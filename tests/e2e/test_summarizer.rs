use crate::e2e::helpers::{CannedLlm, TestContext, UnavailableLlm};

use podcast_generator::domain::summary::{CodeSummarizer, CodeSummarizerApi, SummaryStrategy};
use podcast_generator::infrastructure::repositories::{cache_key, SummaryCacheRepository};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const LANGUAGES: [&str; 8] = ["", "python", "bash", "js", "rust", "sql", "yaml", "markdown"];
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789 _(){}=:;\n";

fn random_code(rng: &mut StdRng) -> String {
    let len = rng.random_range(1..60);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[tokio::test]
async fn it_should_return_cached_summary_on_second_call() {
    let ctx = TestContext::new();
    let llm = Arc::new(CannedLlm::new("Showing a greeting function"));
    let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm.clone()), ctx.cache());

    let code = "def greet(name):\n    return f\"hi {name}\"";
    let first = summarizer.summarize(code, "python", "Greetings", false).await;
    let second = summarizer.summarize(code, "python", "Greetings", false).await;

    assert_eq!(first, "Showing a greeting function (call 1)");
    assert_eq!(second, first);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);

    let stats = summarizer.stats();
    assert_eq!(stats.api_calls, 1);
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn it_should_reuse_summaries_across_runs() {
    let ctx = TestContext::new();
    let code = "SELECT id FROM users";

    {
        let llm = Arc::new(CannedLlm::new("Showing a user query"));
        let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm), ctx.cache());
        summarizer.summarize(code, "sql", "", false).await;
    }

    let llm = Arc::new(CannedLlm::new("Different answer"));
    let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm.clone()), ctx.cache());
    let summary = summarizer.summarize(code, "sql", "", false).await;

    assert_eq!(summary, "Showing a user query (call 1)");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn it_should_overwrite_entry_on_force_refresh() {
    let ctx = TestContext::new();
    let llm = Arc::new(CannedLlm::new("Showing a loop"));
    let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm.clone()), ctx.cache());

    summarizer.summarize("for i in x: pass", "python", "", false).await;
    let refreshed = summarizer.summarize("for i in x: pass", "python", "", true).await;

    assert_eq!(refreshed, "Showing a loop (call 2)");
    let reloaded = SummaryCacheRepository::load(ctx.cache_path());
    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.get(&cache_key("python", "for i in x: pass")).as_deref(),
        Some("Showing a loop (call 2)")
    );
}

#[tokio::test]
async fn it_should_describe_git_commit_when_model_unavailable() {
    let ctx = TestContext::new();
    let llm = Arc::new(UnavailableLlm::default());
    let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm), ctx.cache());

    let summary = summarizer
        .summarize("git add -A\ngit commit -m \"wip\"", "bash", "", false)
        .await;

    assert!(summary.contains("commit"), "got: {}", summary);
    assert_eq!(summarizer.stats().errors, 1);
}

#[tokio::test]
async fn it_should_degrade_and_cache_fallback_for_arbitrary_input() {
    let ctx = TestContext::new();
    let llm = Arc::new(UnavailableLlm::default());
    let summarizer = CodeSummarizer::new(SummaryStrategy::LlmBacked(llm.clone()), ctx.cache());
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let code = random_code(&mut rng);
        let language = LANGUAGES[rng.random_range(0..LANGUAGES.len())];

        let first = summarizer.summarize(&code, language, "", false).await;
        let hits_before = summarizer.stats().cache_hits;
        let second = summarizer.summarize(&code, language, "", false).await;

        assert!(!first.trim().is_empty());
        assert_eq!(second, first);
        assert_eq!(summarizer.stats().cache_hits, hits_before + 1);
    }

    let stats = summarizer.stats();
    assert_eq!(stats.api_calls, 0);
    assert_eq!(stats.errors as usize, llm.calls.load(Ordering::SeqCst));
}

#[tokio::test]
async fn it_should_not_write_rule_output_to_cache() {
    let ctx = TestContext::new();
    let summarizer = CodeSummarizer::new(SummaryStrategy::RuleBased, ctx.cache());

    let summary = summarizer.summarize("import os", "python", "", false).await;

    assert_eq!(summary, "Here we have some Python imports and setup code.");
    assert!(!ctx.cache_path().exists());
}

#[test]
fn it_should_produce_unique_keys_for_distinct_inputs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut pairs = HashSet::new();
    let mut keys = HashSet::new();

    while pairs.len() < 10_000 {
        let language = LANGUAGES[rng.random_range(0..LANGUAGES.len())].to_string();
        let code = random_code(&mut rng);
        if pairs.insert((language.clone(), code.clone())) {
            assert!(
                keys.insert(cache_key(&language, &code)),
                "collision for {:?}",
                (language, code)
            );
        }
    }

    assert_eq!(keys.len(), 10_000);
}

#[test]
fn it_should_start_empty_from_corrupt_cache_file() {
    let ctx = TestContext::new();
    std::fs::create_dir_all(ctx.cache_path().parent().unwrap()).unwrap();
    std::fs::write(ctx.cache_path(), "{\"truncated\": ").unwrap();

    let cache = SummaryCacheRepository::load(ctx.cache_path());

    assert!(cache.is_empty());
}
