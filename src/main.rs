use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use clap::Parser;
use podcast_generator::domain::content::{CodeBlockHandling, ContentTransformer};
use podcast_generator::domain::episode::{
    ArticleSource, EpisodeService, EpisodeServiceApi, RunOptions,
};
use podcast_generator::domain::summary::{CodeSummarizer, CodeSummarizerApi, SummaryStrategy};
use podcast_generator::domain::synthesis::{SynthesisCoordinator, SynthesisCoordinatorApi};
use podcast_generator::error::{AppError, AppResult};
use podcast_generator::infrastructure::config::{Config, LlmProvider, LogFormat, TtsEngine};
use podcast_generator::infrastructure::http::ArticleFetcher;
use podcast_generator::infrastructure::repositories::{
    AnthropicLlmRepository, ElevenLabsTtsRepository, EpisodeRepository, LlmRepository,
    OpenAiLlmRepository, OpenAiTtsRepository, PollyTtsRepository, SummaryCacheRepository,
    TtsRepository,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Articles handled by a `--test` run
const TEST_RUN_ARTICLES: usize = 2;

/// Generate podcast episodes from long-form articles
#[derive(Debug, Parser)]
#[command(name = "podcast-generator", version)]
struct Args {
    /// Article page to fetch (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Local article markup (repeatable)
    #[arg(long = "html", value_name = "FILE")]
    html_files: Vec<PathBuf>,

    /// Series home page to crawl when no --url or --html is given
    #[arg(long, value_name = "URL")]
    site: Option<String>,

    /// Only handle this episode number
    #[arg(long, value_name = "N")]
    day: Option<u32>,

    /// Write text artifacts without generating audio
    #[arg(long, conflicts_with = "from_cache")]
    scrape_only: bool,

    /// Quick run over the first two articles
    #[arg(long, conflicts_with = "from_cache")]
    test: bool,

    /// Seconds to wait after each page fetch
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Generate audio from previously saved text artifacts
    #[arg(long)]
    from_cache: bool,

    /// TTS backend: elevenlabs, openai or polly
    #[arg(long)]
    engine: Option<TtsEngine>,

    /// Voice name or id for the TTS backend
    #[arg(long)]
    voice: Option<String>,

    /// Describe code blocks with a language model
    #[arg(long)]
    use_llm: bool,

    /// Ignore cached code summaries and regenerate them
    #[arg(long)]
    resummarize: bool,

    /// Replace code blocks with a fixed placeholder
    #[arg(long, conflicts_with_all = ["use_llm", "resummarize"])]
    no_code_summaries: bool,

    /// List voices for the selected engine and exit
    #[arg(long)]
    list_voices: bool,

    /// Delete the code summary cache and exit
    #[arg(long)]
    clear_cache: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(engine) = args.engine {
        config.tts_engine = engine;
    }
    if args.voice.is_some() {
        config.tts_voice = args.voice.clone();
    }
    if let Some(site) = &args.site {
        config.site_url = site.clone();
    }
    if let Some(delay) = args.delay {
        config.set_fetch_delay_secs(delay)?;
    }

    // Initialize logging
    init_logging(&config, args.verbose);

    if args.clear_cache {
        // Clear the file even when caching is switched off for runs
        SummaryCacheRepository::load(&config.summary_cache_path).clear()?;
        println!(
            "Code summary cache cleared ({})",
            config.summary_cache_path.display()
        );
        return Ok(());
    }

    let cache = Arc::new(if config.summary_cache_enabled {
        SummaryCacheRepository::load(&config.summary_cache_path)
    } else {
        SummaryCacheRepository::disabled()
    });

    if args.list_voices {
        let tts_repo = build_tts_repository(&config).await?;
        println!("Voices for {} (default: {}):", tts_repo.provider(), tts_repo.default_voice());
        for (name, description) in tts_repo.known_voices() {
            println!("  {:<10} {}", name, description);
        }
        return Ok(());
    }

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories and clients
    let episodes = Arc::new(EpisodeRepository::new(&config.output_dir));
    let fetcher = Arc::new(ArticleFetcher::new(config.fetch_delay)?);

    let synthesizer: Option<Arc<dyn SynthesisCoordinatorApi>> = if args.scrape_only {
        None
    } else {
        let tts_repo = build_tts_repository(&config).await?;
        Some(Arc::new(SynthesisCoordinator::for_backend(
            tts_repo,
            None,
            config.max_chars_per_request,
        )))
    };

    // 2. Services
    let summarizer = if args.no_code_summaries {
        None
    } else {
        let strategy = if args.use_llm {
            SummaryStrategy::LlmBacked(build_llm_repository(&config)?)
        } else {
            SummaryStrategy::RuleBased
        };
        Some(Arc::new(CodeSummarizer::new(strategy, cache.clone())))
    };

    let code_blocks = match &summarizer {
        Some(summarizer) => CodeBlockHandling::Summarize {
            summarizer: summarizer.clone(),
            force_refresh: args.resummarize,
        },
        None => CodeBlockHandling::Placeholder,
    };
    let transformer = Arc::new(ContentTransformer::new(code_blocks, config.templates.clone()));
    let episode_service = EpisodeService::new(fetcher.clone(), transformer, synthesizer, episodes);

    // 3. Run
    let report = if args.from_cache {
        episode_service.run_from_cache(args.day).await
    } else {
        let mut sources: Vec<ArticleSource> = args
            .urls
            .iter()
            .cloned()
            .map(ArticleSource::Url)
            .chain(args.html_files.iter().cloned().map(ArticleSource::File))
            .collect();
        if sources.is_empty() {
            let urls = fetcher
                .discover(&config.site_url, config.templates.series_length as usize)
                .await?;
            if urls.is_empty() {
                anyhow::bail!("no articles found at {}", config.site_url);
            }
            sources = urls.into_iter().map(ArticleSource::Url).collect();
        }

        let options = RunOptions {
            day: args.day,
            scrape_only: args.scrape_only,
            limit: args.test.then_some(TEST_RUN_ARTICLES),
        };
        episode_service.run(&sources, options).await
    };

    if let Some(summarizer) = &summarizer {
        let stats = summarizer.stats();
        tracing::info!(
            cache_hits = stats.cache_hits,
            api_calls = stats.api_calls,
            errors = stats.errors,
            cache_size = stats.cache_size,
            "Code summary statistics"
        );
    }

    let total_chars: usize = report.texts.iter().map(|t| t.char_count()).sum();
    println!("Processed {} articles ({} characters)", report.texts.len(), total_chars);

    if !args.scrape_only {
        if let Err(e) = report.stats.save(&config.stats_path()) {
            tracing::warn!(error = %e, "Could not save generation stats");
        }
        println!("{}", report.stats.summary());
    }

    if report.texts.is_empty() && !report.stats.errors.is_empty() {
        anyhow::bail!("no article could be processed");
    }

    Ok(())
}

async fn build_tts_repository(config: &Config) -> AppResult<Arc<dyn TtsRepository>> {
    let voice = config.tts_voice.clone();

    let tts_repo: Arc<dyn TtsRepository> = match config.tts_engine {
        TtsEngine::ElevenLabs => {
            let api_key = Config::require(&config.elevenlabs_api_key, "ELEVENLABS_API_KEY")?;
            Arc::new(
                ElevenLabsTtsRepository::new(
                    api_key,
                    config.elevenlabs_model_id.clone(),
                    config.elevenlabs_output_format.clone(),
                    voice,
                )
                .map_err(AppError::Config)?,
            )
        }
        TtsEngine::OpenAi => {
            let api_key = Config::require(&config.openai_api_key, "OPENAI_API_KEY")?;
            Arc::new(OpenAiTtsRepository::new(
                openai_client(api_key),
                config.openai_tts_model.clone(),
                voice,
            ))
        }
        TtsEngine::Polly => {
            tracing::info!(region = %config.aws_region, "Initializing AWS Polly client");

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            if !has_access_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = aws_sdk_polly::Client::new(&aws_config);

            Arc::new(PollyTtsRepository::new(Arc::new(polly_client), voice))
        }
    };

    tracing::info!(
        provider = tts_repo.provider(),
        voice = tts_repo.default_voice(),
        max_chars = tts_repo.max_chars_per_request(),
        "TTS backend ready"
    );
    Ok(tts_repo)
}

fn build_llm_repository(config: &Config) -> AppResult<Arc<dyn LlmRepository>> {
    let llm_repo: Arc<dyn LlmRepository> = match config.llm_provider {
        LlmProvider::Anthropic => {
            let api_key = Config::require(&config.anthropic_api_key, "ANTHROPIC_API_KEY")?;
            Arc::new(
                AnthropicLlmRepository::new(api_key, config.anthropic_model.clone())
                    .map_err(AppError::Config)?,
            )
        }
        LlmProvider::OpenAi => {
            let api_key = Config::require(&config.openai_api_key, "OPENAI_API_KEY")?;
            Arc::new(OpenAiLlmRepository::new(
                openai_client(api_key),
                config.openai_chat_model.clone(),
            ))
        }
    };

    tracing::info!(provider = llm_repo.provider(), "Code summaries use a language model");
    Ok(llm_repo)
}

fn openai_client(api_key: String) -> Arc<OpenAiClient<OpenAIConfig>> {
    Arc::new(OpenAiClient::with_config(
        OpenAIConfig::new().with_api_key(api_key),
    ))
}

fn init_logging(config: &Config, verbose: bool) {
    let default_filter = if verbose {
        "podcast_generator=debug"
    } else {
        "podcast_generator=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
