//! Length-bounded splitting of speech text.
//!
//! Units are packed greedily, coarsest first: paragraphs, then sentences of an
//! oversized paragraph, then words of an oversized sentence. A single word
//! longer than the limit is the only thing ever cut at a character offset.
//! Lengths are counted in chars, so a cut never lands inside a code point.

use once_cell::sync::Lazy;
use regex::Regex;

/// Speaking rate used for duration estimates
pub const WORDS_PER_MINUTE: f64 = 150.0;

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub order_index: usize,
    pub text: String,
}

/// Split text into ordered chunks of at most `max_chars` characters.
///
/// Empty or whitespace-only input yields no chunks. Input that already fits
/// yields exactly one chunk holding the trimmed text.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let max_chars = max_chars.max(1);
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![TextChunk {
            order_index: 0,
            text: text.to_string(),
        }];
    }

    let mut packer = Packer::new(max_chars);
    for paragraph in PARAGRAPH_BREAK.split(text).map(str::trim) {
        if paragraph.is_empty() {
            continue;
        }
        if char_len(paragraph) <= max_chars {
            packer.push(paragraph, PARAGRAPH_SEPARATOR);
            continue;
        }

        packer.close();
        for sentence in split_sentences(paragraph) {
            if char_len(sentence) <= max_chars {
                packer.push(sentence, SENTENCE_SEPARATOR);
                continue;
            }

            packer.close();
            for word in sentence.split_whitespace() {
                if char_len(word) <= max_chars {
                    packer.push(word, SENTENCE_SEPARATOR);
                    continue;
                }
                packer.close();
                for piece in char_pieces(word, max_chars) {
                    packer.push(piece, "");
                }
            }
        }
    }

    packer
        .finish()
        .into_iter()
        .enumerate()
        .map(|(order_index, text)| TextChunk { order_index, text })
        .collect()
}

/// Sentences of a paragraph, split after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        sentences.push(text[start..boundary.end()].trim());
        start = boundary.end();
    }
    sentences.push(text[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Spoken length estimate in minutes
pub fn estimate_minutes(text: &str) -> f64 {
    text.split_whitespace().count() as f64 / WORDS_PER_MINUTE
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut a string into pieces of at most `max_chars` characters
fn char_pieces(text: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            pieces.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

struct Packer {
    max_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Packer {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// Append a unit no longer than `max_chars`, closing the chunk on overflow
    fn push(&mut self, unit: &str, separator: &str) {
        let unit_len = char_len(unit);

        if !self.current.is_empty() {
            if self.current_len + char_len(separator) + unit_len <= self.max_chars {
                self.current.push_str(separator);
                self.current.push_str(unit);
                self.current_len += char_len(separator) + unit_len;
                return;
            }
            self.close();
        }

        self.current.push_str(unit);
        self.current_len = unit_len;
    }

    fn close(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.close();
        self.chunks
    }
}
