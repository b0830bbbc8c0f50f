//! Rewrites extracted text so a TTS voice reads it naturally.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_EXAMPLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Code Example:\s*(.*?)\]").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").unwrap());
static PATH_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)/(\w+)").unwrap());
static FILE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\.([A-Za-z]\w{1,3})(\s|$|\))").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Glyphs read aloud as words
const GLYPHS: [(&str, &str); 6] = [
    ("&", " and "),
    ("→", " leads to "),
    ("←", " back to "),
    ("✓", " check "),
    ("✗", " x "),
    ("•", ". "),
];

const QUOTES: [(char, char); 4] = [
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
];

/// Normalize text for speech.
///
/// Each surviving line becomes its own paragraph; the result has no empty
/// lines and is empty when nothing speakable remains.
pub fn normalize_for_speech(text: &str) -> String {
    let text = CODE_EXAMPLE_MARKER.replace_all(text, "$1");
    let text = text.replace(['[', ']'], "");

    let text = URL.replace_all(&text, "");
    let text = EMAIL.replace_all(&text, "");

    let mut text = text.into_owned();
    for (glyph, spoken) in GLYPHS {
        text = text.replace(glyph, spoken);
    }
    let text: String = text
        .chars()
        .map(|c| {
            QUOTES
                .iter()
                .find(|(curly, _)| *curly == c)
                .map_or(c, |(_, straight)| *straight)
        })
        .collect();

    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");

    let text = speak_paths(&text);
    let text = FILE_EXTENSION.replace_all(&text, " dot ${1}${2}");

    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EXCESS_SPACES.replace_all(&text, " ");

    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `src/main` → `src slash main`, repeated so chained segments all convert
fn speak_paths(text: &str) -> String {
    let mut current = text.to_string();
    while PATH_SEPARATOR.is_match(&current) {
        current = PATH_SEPARATOR
            .replace_all(&current, "$1 slash $2")
            .into_owned();
    }
    current
}
