use async_trait::async_trait;
use podcast_generator::domain::content::{CodeBlockHandling, ContentTransformer, EpisodeTemplates};
use podcast_generator::domain::episode::EpisodeService;
use podcast_generator::domain::summary::{CodeSummarizer, SummaryStrategy};
use podcast_generator::domain::synthesis::{SynthesisCoordinator, SynthesisCoordinatorApi};
use podcast_generator::infrastructure::audio::AudioFormat;
use podcast_generator::infrastructure::http::ArticleFetcher;
use podcast_generator::infrastructure::repositories::{
    EpisodeRepository, LlmRepository, SummaryCacheRepository, TtsRepository,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Language model that always fails, counting attempts
#[derive(Default)]
pub struct UnavailableLlm {
    pub calls: AtomicUsize,
}

#[async_trait]
impl LlmRepository for UnavailableLlm {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("connection refused".to_string())
    }

    fn provider(&self) -> &'static str {
        "unavailable"
    }
}

/// Language model answering with a fixed sentence per call
pub struct CannedLlm {
    pub reply: String,
    pub calls: AtomicUsize,
}

impl CannedLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmRepository for CannedLlm {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} (call {})", self.reply, n + 1))
    }

    fn provider(&self) -> &'static str {
        "canned"
    }
}

/// TTS backend returning the request text as audio bytes.
///
/// Requests whose text contains `fail_marker` fail.
pub struct MockTts {
    pub limit: usize,
    pub fail_marker: Option<String>,
    pub requests: Mutex<Vec<String>>,
}

impl MockTts {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            fail_marker: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(limit: usize, marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::new(limit)
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for MockTts {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>, String> {
        self.requests.lock().unwrap().push(text.to_string());
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err("503 service unavailable".to_string());
            }
        }
        Ok(text.as_bytes().to_vec())
    }

    fn max_chars_per_request(&self) -> usize {
        self.limit
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn default_voice(&self) -> &str {
        "mock"
    }

    fn known_voices(&self) -> Vec<(&'static str, &'static str)> {
        vec![("mock", "test voice")]
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

/// Isolated output and cache directories for one test
pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.dir.path().join("cache").join("code_summaries.json")
    }

    pub fn cache(&self) -> Arc<SummaryCacheRepository> {
        Arc::new(SummaryCacheRepository::load(self.cache_path()))
    }

    pub fn episodes(&self) -> Arc<EpisodeRepository> {
        Arc::new(EpisodeRepository::new(self.output_dir()))
    }

    /// Save markup under the test directory and return its path
    pub fn write_html(&self, name: &str, markup: &str) -> PathBuf {
        let path = self.dir.path().join("pages").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, markup).unwrap();
        path
    }

    /// Episode service with rule-based summaries and the given TTS mock
    pub fn episode_service(&self, tts: Option<Arc<MockTts>>) -> EpisodeService {
        let summarizer = Arc::new(CodeSummarizer::new(SummaryStrategy::RuleBased, self.cache()));
        let transformer = Arc::new(ContentTransformer::new(
            CodeBlockHandling::Summarize {
                summarizer,
                force_refresh: false,
            },
            EpisodeTemplates::default(),
        ));
        let synthesizer = tts.map(|tts| {
            Arc::new(SynthesisCoordinator::for_backend(tts, None, None))
                as Arc<dyn SynthesisCoordinatorApi>
        });
        let fetcher = Arc::new(ArticleFetcher::new(Duration::ZERO).unwrap());

        EpisodeService::new(fetcher, transformer, synthesizer, self.episodes())
    }
}

/// Article page in the shape the fetcher expects
pub fn article_page(day: u32, title: &str, body: &str) -> String {
    format!(
        r#"<html><body>
        <nav><a href="/">Home</a></nav>
        <h1>Day {day}: {title}</h1>
        <p>Jan {day}, 2026</p>
        <article>{body}</article>
        <footer>Copyright</footer>
        </body></html>"#
    )
}
