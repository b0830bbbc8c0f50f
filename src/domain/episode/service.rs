use super::error::EpisodeError;
use crate::domain::content::{ContentTransformerApi, ProcessedText};
use crate::domain::synthesis::{GenerationStats, SynthesisCoordinatorApi, SynthesisResult};
use crate::infrastructure::http::{parse_article, read_local_page, Article, ArticleFetcher};
use crate::infrastructure::repositories::EpisodeRepository;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Where an article's markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Only handle the article with this sequence index
    pub day: Option<u32>,
    /// Stop after writing text artifacts
    pub scrape_only: bool,
    /// Stop once this many articles have been processed
    pub limit: Option<usize>,
}

/// Outcome of a run. Failed articles appear only in `stats.errors`.
#[derive(Debug, Default)]
pub struct RunReport {
    pub texts: Vec<ProcessedText>,
    pub stats: GenerationStats,
}

#[async_trait]
pub trait EpisodeServiceApi: Send + Sync {
    /// Fetch, transform and store each article, then synthesize its audio.
    ///
    /// A failure in one article is recorded and the rest carry on.
    async fn run(&self, sources: &[ArticleSource], options: RunOptions) -> RunReport;

    /// Synthesize audio from text artifacts saved by an earlier run.
    ///
    /// Without `day`, every stored artifact is used.
    async fn run_from_cache(&self, day: Option<u32>) -> RunReport;
}

pub struct EpisodeService {
    fetcher: Arc<ArticleFetcher>,
    transformer: Arc<dyn ContentTransformerApi>,
    synthesizer: Option<Arc<dyn SynthesisCoordinatorApi>>,
    episodes: Arc<EpisodeRepository>,
}

impl EpisodeService {
    /// `synthesizer` is `None` when the run never produces audio
    pub fn new(
        fetcher: Arc<ArticleFetcher>,
        transformer: Arc<dyn ContentTransformerApi>,
        synthesizer: Option<Arc<dyn SynthesisCoordinatorApi>>,
        episodes: Arc<EpisodeRepository>,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            synthesizer,
            episodes,
        }
    }

    async fn load_article(
        &self,
        source: &ArticleSource,
        fallback_index: u32,
    ) -> Result<Article, EpisodeError> {
        let (location, markup) = match source {
            ArticleSource::Url(url) => (url.clone(), self.fetcher.fetch_page(url).await?),
            ArticleSource::File(path) => (
                path.display().to_string(),
                read_local_page(path).map_err(|e| EpisodeError::Source(e.to_string()))?,
            ),
        };
        Ok(parse_article(&location, &markup, fallback_index))
    }

    async fn process_article(&self, article: &Article) -> Result<ProcessedText, EpisodeError> {
        let text = self
            .transformer
            .transform(
                &article.content_html,
                article.sequence_index,
                &article.title,
                &article.date,
            )
            .await;

        let path = self.episodes.save_text(&text)?;
        tracing::info!(
            index = text.sequence_index(),
            title = %text.title(),
            characters = text.char_count(),
            words = text.word_count(),
            path = %path.display(),
            "Article processed"
        );
        Ok(text)
    }

    async fn generate_audio(&self, text: &ProcessedText) -> Result<SynthesisResult, EpisodeError> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or(EpisodeError::AudioDisabled)?;

        let result = synthesizer.synthesize_long_text(text.body_text()).await?;
        if result.chunk_count == 0 {
            return Err(EpisodeError::EmptyText(text.sequence_index()));
        }

        self.episodes.save_audio(
            text.sequence_index(),
            synthesizer.audio_format(),
            &result.audio_data,
        )?;
        Ok(result)
    }

    async fn generate_all(&self, report: &mut RunReport) {
        for text in &report.texts {
            let index = text.sequence_index();
            match self.generate_audio(text).await {
                Ok(result) => report.stats.add_episode(index, &result),
                Err(e) => {
                    tracing::error!(index = index, error = %e, "Episode audio failed");
                    report.stats.add_error(index, e.to_string());
                }
            }
        }
    }
}

#[async_trait]
impl EpisodeServiceApi for EpisodeService {
    async fn run(&self, sources: &[ArticleSource], options: RunOptions) -> RunReport {
        let mut report = RunReport::default();

        for (position, source) in sources.iter().enumerate() {
            if options.limit.is_some_and(|limit| report.texts.len() >= limit) {
                tracing::info!(processed = report.texts.len(), "Article limit reached");
                break;
            }
            let fallback_index = position as u32 + 1;

            let article = match self.load_article(source, fallback_index).await {
                Ok(article) => article,
                Err(e) => {
                    tracing::error!(source = ?source, error = %e, "Could not load article");
                    report.stats.add_error(fallback_index, e.to_string());
                    continue;
                }
            };

            if options.day.is_some_and(|day| day != article.sequence_index) {
                tracing::debug!(index = article.sequence_index, "Skipping article outside --day");
                continue;
            }

            match self.process_article(&article).await {
                Ok(text) => report.texts.push(text),
                Err(e) => {
                    tracing::error!(index = article.sequence_index, error = %e, "Could not process article");
                    report.stats.add_error(article.sequence_index, e.to_string());
                }
            }
        }

        if !options.scrape_only && self.synthesizer.is_some() {
            self.generate_all(&mut report).await;
        }

        report
    }

    async fn run_from_cache(&self, day: Option<u32>) -> RunReport {
        let mut report = RunReport::default();

        let indexes = match day {
            Some(day) => vec![day],
            None => match self.episodes.cached_indexes() {
                Ok(indexes) => indexes,
                Err(e) => {
                    tracing::error!(error = %e, "Could not list cached text");
                    report.stats.add_error(0, e.to_string());
                    return report;
                }
            },
        };

        for index in indexes {
            match self.episodes.load_text(index) {
                Ok(text) => report.texts.push(text),
                Err(e) => {
                    tracing::warn!(index = index, error = %e, "Cached text unavailable");
                    report.stats.add_error(index, e.to_string());
                }
            }
        }

        self.generate_all(&mut report).await;
        report
    }
}
