use crate::e2e::helpers::MockTts;

use podcast_generator::domain::synthesis::{
    estimate_minutes, split_into_chunks, SynthesisCoordinator, SynthesisCoordinatorApi,
    SynthesisError,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const TERMINATORS: [&str; 3] = [".", "!", "?"];

fn random_word(rng: &mut StdRng) -> String {
    let len = rng.random_range(1..9);
    (0..len)
        .map(|_| (b'a' + rng.random_range(0..26u8)) as char)
        .collect()
}

/// Paragraphs of short sentences, every sentence well under `max_chars`
fn random_text(rng: &mut StdRng) -> String {
    let paragraphs = rng.random_range(1..12);
    (0..paragraphs)
        .map(|_| {
            let sentences = rng.random_range(1..15);
            (0..sentences)
                .map(|_| {
                    let words = rng.random_range(1..10);
                    let body = (0..words)
                        .map(|_| random_word(rng))
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("{}{}", body, TERMINATORS[rng.random_range(0..3)])
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn twelve_thousand_chars() -> String {
    let paragraph = "Speech synthesis needs clean text. ".repeat(11);
    vec![paragraph.trim(); 31].join("\n\n")
}

#[test]
fn it_should_cover_text_in_order_within_limit() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let text = random_text(&mut rng);
        let max_chars = rng.random_range(80..600);

        let chunks = split_into_chunks(&text, max_chars);

        assert!(!chunks.is_empty());
        for (position, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order_index, position);
            assert!(
                chunk.text.chars().count() <= max_chars,
                "chunk {} has {} chars, limit {}",
                position,
                chunk.text.chars().count(),
                max_chars
            );
            assert!(!chunk.text.trim().is_empty());
        }

        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| words(&c.text)).collect();
        assert_eq!(rejoined, words(&text));
    }
}

#[test]
fn it_should_end_every_chunk_on_sentence_boundary() {
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..100 {
        let text = random_text(&mut rng);
        let chunks = split_into_chunks(&text, 150);

        for chunk in &chunks {
            let last = chunk.text.chars().last().unwrap();
            assert!(
                matches!(last, '.' | '!' | '?'),
                "chunk ends mid-sentence: {:?}",
                chunk.text
            );
        }
    }
}

#[test]
fn it_should_return_small_input_as_single_chunk() {
    let text = "  A short episode.\n\nWith two paragraphs.  ";

    let chunks = split_into_chunks(text, 4500);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text.trim());
}

#[test]
fn it_should_split_twelve_thousand_chars_into_three_chunks() {
    let text = twelve_thousand_chars();
    assert!(text.len() > 11_900 && text.len() < 12_100);

    let chunks = split_into_chunks(&text, 4500);

    assert_eq!(chunks.len(), 3);
    let paragraph_counts: Vec<usize> = chunks
        .iter()
        .map(|c| c.text.split("\n\n").count())
        .collect();
    assert_eq!(paragraph_counts, vec![11, 11, 9]);

    let total: f64 = chunks.iter().map(|c| estimate_minutes(&c.text)).sum();
    assert!((total - estimate_minutes(&text)).abs() < 1e-9);
}

#[tokio::test]
async fn it_should_synthesize_long_text_in_order_and_stitch() {
    let tts = Arc::new(MockTts::new(4500));
    let coordinator = SynthesisCoordinator::for_backend(tts.clone(), None, None);
    let text = twelve_thousand_chars();

    let result = coordinator.synthesize_long_text(&text).await.unwrap();

    let requests = tts.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(result.chunk_count, 3);
    assert_eq!(result.audio_data, requests.concat().into_bytes());
    assert_eq!(result.word_count, words(&text).len());
    assert!((result.duration_minutes - estimate_minutes(&text)).abs() < 1e-9);
    assert_eq!(
        result.char_count,
        requests.iter().map(|r| r.chars().count()).sum::<usize>()
    );
}

#[tokio::test]
async fn it_should_send_small_text_in_one_request() {
    let tts = Arc::new(MockTts::new(4500));
    let coordinator = SynthesisCoordinator::for_backend(tts.clone(), None, None);

    let result = coordinator
        .synthesize_long_text("  Hello listeners.  ")
        .await
        .unwrap();

    assert_eq!(tts.requests(), vec!["Hello listeners.".to_string()]);
    assert_eq!(result.chunk_count, 1);
    assert_eq!(result.audio_data, b"Hello listeners.".to_vec());
    assert_eq!(result.word_count, 2);
}

#[tokio::test]
async fn it_should_treat_empty_text_as_noop() {
    let tts = Arc::new(MockTts::new(4500));
    let coordinator = SynthesisCoordinator::for_backend(tts.clone(), None, None);

    let result = coordinator.synthesize_long_text(" \n\n ").await.unwrap();

    assert_eq!(result.chunk_count, 0);
    assert!(result.audio_data.is_empty());
    assert!(tts.requests().is_empty());
}

#[tokio::test]
async fn it_should_abort_on_first_failing_chunk() {
    let tts = Arc::new(MockTts::failing_on(40, "BROKEN"));
    let coordinator = SynthesisCoordinator::for_backend(tts.clone(), None, None);
    let text = "The first chunk is fine.\n\nThe BROKEN chunk fails here.\n\nNever sent at all.";

    let err = coordinator.synthesize_long_text(text).await.unwrap_err();

    match err {
        SynthesisError::Chunk { index, message } => {
            assert_eq!(index, 1);
            assert!(message.contains("503"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(tts.requests().len(), 2);
}

#[tokio::test]
async fn it_should_clamp_configured_limit_to_backend_limit() {
    let tts = Arc::new(MockTts::new(100));

    let wide = SynthesisCoordinator::for_backend(tts.clone(), None, Some(5000));
    let narrow = SynthesisCoordinator::for_backend(tts, None, Some(50));

    assert_eq!(wide.max_chars(), 100);
    assert_eq!(narrow.max_chars(), 50);
}
