// End-to-end tests for the article-to-podcast pipeline
//
// Every test runs against real file-backed repositories inside its own
// temporary directory. Network backends (TTS, language model) are replaced by
// in-process mocks from `helpers`, so the suite runs offline and in parallel.

mod helpers;
mod test_episodes;
mod test_summarizer;
mod test_synthesis;
