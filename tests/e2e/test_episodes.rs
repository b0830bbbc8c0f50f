use crate::e2e::helpers::{article_page, MockTts, TestContext};

use podcast_generator::domain::episode::{ArticleSource, EpisodeServiceApi, RunOptions};
use podcast_generator::domain::synthesis::PRO_TIER_COST_PER_CHARACTER;
use podcast_generator::infrastructure::audio::AudioFormat;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn write_series(ctx: &TestContext, days: &[(u32, &str, &str)]) -> Vec<ArticleSource> {
    days.iter()
        .map(|(day, title, body)| {
            let path = ctx.write_html(&format!("day{}.html", day), &article_page(*day, title, body));
            ArticleSource::File(path)
        })
        .collect()
}

#[tokio::test]
async fn it_should_write_text_and_audio_per_article() {
    let ctx = TestContext::new();
    let tts = Arc::new(MockTts::new(4500));
    let service = ctx.episode_service(Some(tts.clone()));
    let sources = write_series(
        &ctx,
        &[
            (1, "Setup", "<p>Install the tools.</p>"),
            (2, "Prompts", "<p>Write clear prompts.</p><pre><code class=\"language-python\">import os</code></pre>"),
        ],
    );

    let report = service.run(&sources, RunOptions::default()).await;

    assert_eq!(report.texts.len(), 2);
    assert!(report.stats.errors.is_empty());
    assert_eq!(report.stats.total_episodes, 2);

    let episodes = ctx.episodes();
    let day_one = episodes.text_path(1);
    assert_eq!(day_one, ctx.output_dir().join("text").join("day_01.txt"));
    let artifact = std::fs::read_to_string(&day_one).unwrap();
    assert!(artifact.starts_with("Title: Day 1: Setup\nDay: 1\nDate: Jan 1, 2026\n"));
    assert!(artifact.contains("Install the tools."));

    let day_two = report.texts[1].body_text();
    assert!(day_two.contains("Here we have some Python imports and setup code."));
    assert!(!day_two.contains("import os"));

    let audio = std::fs::read(ctx.output_dir().join("audio").join("day_02.mp3")).unwrap();
    assert_eq!(audio, day_two.as_bytes());
    assert_eq!(tts.requests().len(), 2);
}

#[tokio::test]
async fn it_should_keep_going_when_one_episode_fails() {
    let ctx = TestContext::new();
    let tts = Arc::new(MockTts::failing_on(4500, "EXPLODE"));
    let service = ctx.episode_service(Some(tts));
    let sources = write_series(
        &ctx,
        &[
            (1, "One", "<p>First article.</p>"),
            (2, "Two", "<p>This one will EXPLODE in synthesis.</p>"),
            (3, "Three", "<p>Third article.</p>"),
        ],
    );

    let report = service.run(&sources, RunOptions::default()).await;

    assert_eq!(report.texts.len(), 3);
    assert_eq!(report.stats.total_episodes, 2);
    assert_eq!(report.stats.errors.len(), 1);
    assert_eq!(report.stats.errors[0].index, 2);

    let episodes = ctx.episodes();
    assert!(episodes.audio_path(1, AudioFormat::Mp3).exists());
    assert!(!episodes.audio_path(2, AudioFormat::Mp3).exists());
    assert!(episodes.audio_path(3, AudioFormat::Mp3).exists());
    assert!(episodes.text_path(2).exists());
}

#[tokio::test]
async fn it_should_record_missing_source_as_error() {
    let ctx = TestContext::new();
    let service = ctx.episode_service(Some(Arc::new(MockTts::new(4500))));
    let mut sources = write_series(&ctx, &[(1, "One", "<p>Only real article.</p>")]);
    sources.push(ArticleSource::File(ctx.dir.path().join("missing.html")));

    let report = service.run(&sources, RunOptions::default()).await;

    assert_eq!(report.texts.len(), 1);
    assert_eq!(report.stats.errors.len(), 1);
    assert_eq!(report.stats.errors[0].index, 2);
    assert_eq!(report.stats.total_episodes, 1);
}

#[tokio::test]
async fn it_should_skip_audio_in_scrape_only_mode() {
    let ctx = TestContext::new();
    let tts = Arc::new(MockTts::new(4500));
    let service = ctx.episode_service(Some(tts.clone()));
    let sources = write_series(&ctx, &[(1, "One", "<p>Text only.</p>")]);

    let report = service
        .run(
            &sources,
            RunOptions {
                scrape_only: true,
                ..RunOptions::default()
            },
        )
        .await;

    assert_eq!(report.texts.len(), 1);
    assert!(ctx.episodes().text_path(1).exists());
    assert!(!ctx.output_dir().join("audio").exists());
    assert!(tts.requests().is_empty());
    assert_eq!(report.stats.total_episodes, 0);
}

#[tokio::test]
async fn it_should_only_process_requested_day() {
    let ctx = TestContext::new();
    let tts = Arc::new(MockTts::new(4500));
    let service = ctx.episode_service(Some(tts.clone()));
    let sources = write_series(
        &ctx,
        &[
            (4, "Four", "<p>Day four.</p>"),
            (5, "Five", "<p>Day five.</p>"),
            (6, "Six", "<p>Day six.</p>"),
        ],
    );

    let report = service
        .run(
            &sources,
            RunOptions {
                day: Some(5),
                ..RunOptions::default()
            },
        )
        .await;

    assert_eq!(report.texts.len(), 1);
    assert_eq!(report.texts[0].sequence_index(), 5);
    assert!(!ctx.episodes().text_path(4).exists());
    assert!(ctx.episodes().text_path(5).exists());
    assert_eq!(tts.requests().len(), 1);
}

#[tokio::test]
async fn it_should_stop_after_article_limit() {
    let ctx = TestContext::new();
    let tts = Arc::new(MockTts::new(4500));
    let service = ctx.episode_service(Some(tts.clone()));
    let mut sources = vec![ArticleSource::File(ctx.output_dir().join("missing.html"))];
    sources.extend(write_series(
        &ctx,
        &[
            (1, "One", "<p>First.</p>"),
            (2, "Two", "<p>Second.</p>"),
            (3, "Three", "<p>Third.</p>"),
        ],
    ));

    let report = service
        .run(
            &sources,
            RunOptions {
                limit: Some(2),
                ..RunOptions::default()
            },
        )
        .await;

    let indexes: Vec<u32> = report.texts.iter().map(|t| t.sequence_index()).collect();
    assert_eq!(indexes, vec![1, 2]);
    assert!(!ctx.episodes().text_path(3).exists());
    assert_eq!(tts.requests().len(), 2);
    assert_eq!(report.stats.errors.len(), 1);
}

#[tokio::test]
async fn it_should_generate_audio_from_saved_text() {
    let ctx = TestContext::new();
    let sources = write_series(
        &ctx,
        &[(1, "One", "<p>Saved first.</p>"), (2, "Two", "<p>Saved second.</p>")],
    );
    let scraped = ctx
        .episode_service(None)
        .run(&sources, RunOptions::default())
        .await;
    assert_eq!(scraped.texts.len(), 2);
    assert_eq!(scraped.stats.total_episodes, 0);

    let tts = Arc::new(MockTts::new(4500));
    let report = ctx.episode_service(Some(tts.clone())).run_from_cache(None).await;

    assert_eq!(report.texts.len(), 2);
    assert_eq!(report.stats.total_episodes, 2);
    assert!(report.stats.errors.is_empty());
    for (saved, reloaded) in scraped.texts.iter().zip(&report.texts) {
        assert_eq!(reloaded.title(), saved.title());
        assert_eq!(reloaded.body_text(), saved.body_text());
    }
    assert_eq!(tts.requests()[0], scraped.texts[0].body_text());
    assert!(ctx.episodes().audio_path(2, AudioFormat::Mp3).exists());
}

#[tokio::test]
async fn it_should_report_missing_cached_day() {
    let ctx = TestContext::new();
    let service = ctx.episode_service(Some(Arc::new(MockTts::new(4500))));

    let report = service.run_from_cache(Some(9)).await;

    assert!(report.texts.is_empty());
    assert_eq!(report.stats.errors.len(), 1);
    assert_eq!(report.stats.errors[0].index, 9);
}

#[tokio::test]
async fn it_should_save_generation_stats() {
    let ctx = TestContext::new();
    let service = ctx.episode_service(Some(Arc::new(MockTts::new(4500))));
    let sources = write_series(&ctx, &[(1, "One", "<p>Counted words here.</p>")]);

    let report = service.run(&sources, RunOptions::default()).await;
    let path = ctx.output_dir().join("generation_stats.json");
    report.stats.save(&path).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["total_episodes"], 1);
    assert_eq!(saved["total_characters"], report.texts[0].char_count());
    assert_eq!(saved["episodes"][0]["index"], 1);
    let expected_cost = report.texts[0].char_count() as f64 * PRO_TIER_COST_PER_CHARACTER;
    assert!((saved["estimated_cost_at_pro_tier"].as_f64().unwrap() - expected_cost).abs() < 1e-9);
    assert!(report.stats.summary().starts_with("Generated 1 episodes\n"));
}
