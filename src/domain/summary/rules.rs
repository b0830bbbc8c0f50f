//! Rule-based code descriptions.
//!
//! Used whenever the language model is not selected or its call fails. Rules
//! are evaluated top to bottom and the first match wins, so the order of
//! [`RULES`] is part of the observable output.

use super::language::display_name;
use once_cell::sync::Lazy;
use regex::Regex;

/// Blocks longer than this many lines mention their length.
const LONG_BLOCK_LINES: usize = 10;

/// Headings listed before "and more" is appended.
const MAX_LISTED_SECTIONS: usize = 4;

const GIT_VERBS: [&str; 5] = ["commit", "checkout", "restore", "diff", "stash"];

static GIT_INVOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bgit\s+([a-z-]+)").unwrap());
static FUNCTION_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:def|function|fn|func)\s").unwrap());
static FUNCTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:def|function|fn|func)\s+([A-Za-z_]\w*)").unwrap());
static CLASS_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s").unwrap());
static CLASS_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_]\w*)").unwrap());
static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:##[ \t]*|^\*\*)([\w ]+)(?:\*\*)?").unwrap());

/// What the rule table decided a snippet is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    VersionControl,
    Function,
    Class,
    Template,
    Imports,
    MarkdownTemplate,
    Generic,
}

struct Snippet<'a> {
    code: &'a str,
    lowered: String,
    language: String,
    line_count: usize,
}

impl<'a> Snippet<'a> {
    fn new(code: &'a str, language: &str) -> Self {
        Self {
            code,
            lowered: code.to_lowercase(),
            language: display_name(language),
            line_count: code.trim().lines().count().max(1),
        }
    }
}

struct SummaryRule {
    kind: SnippetKind,
    matches: fn(&Snippet) -> bool,
    describe: fn(&Snippet) -> String,
}

static RULES: [SummaryRule; 6] = [
    SummaryRule {
        kind: SnippetKind::VersionControl,
        matches: is_git,
        describe: describe_git,
    },
    SummaryRule {
        kind: SnippetKind::Function,
        matches: is_function,
        describe: describe_function,
    },
    SummaryRule {
        kind: SnippetKind::Class,
        matches: is_class,
        describe: describe_class,
    },
    SummaryRule {
        kind: SnippetKind::Template,
        matches: is_template,
        describe: describe_template,
    },
    SummaryRule {
        kind: SnippetKind::Imports,
        matches: is_imports,
        describe: describe_imports,
    },
    SummaryRule {
        kind: SnippetKind::MarkdownTemplate,
        matches: is_markdown_template,
        describe: describe_sections,
    },
];

/// Classify a snippet without rendering a description.
pub fn classify(code: &str, language: &str) -> SnippetKind {
    let snippet = Snippet::new(code, language);
    RULES
        .iter()
        .find(|rule| (rule.matches)(&snippet))
        .map(|rule| rule.kind)
        .unwrap_or(SnippetKind::Generic)
}

/// One spoken sentence describing the snippet. Never empty.
pub fn rule_based_summary(code: &str, language: &str) -> String {
    let snippet = Snippet::new(code, language);
    match RULES.iter().find(|rule| (rule.matches)(&snippet)) {
        Some(rule) => (rule.describe)(&snippet),
        None => describe_generic(&snippet),
    }
}

fn is_git(s: &Snippet) -> bool {
    s.lowered.contains("git ")
}

fn is_function(s: &Snippet) -> bool {
    FUNCTION_KEYWORD.is_match(s.code)
}

fn is_class(s: &Snippet) -> bool {
    CLASS_KEYWORD.is_match(s.code)
}

fn is_template(s: &Snippet) -> bool {
    let trimmed = s.code.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

fn is_imports(s: &Snippet) -> bool {
    s.code.contains("import ") || s.code.contains("from ") || s.code.contains("require(")
}

fn is_markdown_template(s: &Snippet) -> bool {
    (s.code.contains("##") || s.code.contains("**")) && !section_headings(s.code).is_empty()
}

fn describe_git(s: &Snippet) -> String {
    let phrase = match dominant_git_verb(&s.lowered) {
        Some("commit") => "showing how to commit changes",
        Some("checkout") => "for switching branches",
        Some("restore") => "for restoring files",
        Some("diff") => "for viewing changes",
        Some("stash") => "for stashing changes",
        _ => "for Git operations",
    };
    format!("Here we have {} commands {}.", s.language, phrase)
}

/// Most frequent known verb among `git <verb>` invocations, ties going to the
/// earlier verb in [`GIT_VERBS`]. Falls back to a plain substring scan.
fn dominant_git_verb(lowered: &str) -> Option<&'static str> {
    let mut counts = [0usize; GIT_VERBS.len()];
    for cap in GIT_INVOCATION.captures_iter(lowered) {
        if let Some(pos) = GIT_VERBS.iter().position(|verb| *verb == &cap[1]) {
            counts[pos] += 1;
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (pos, count) in counts.iter().enumerate() {
        if *count > 0 && best.map_or(true, |(_, top)| *count > top) {
            best = Some((pos, *count));
        }
    }

    match best {
        Some((pos, _)) => Some(GIT_VERBS[pos]),
        None => GIT_VERBS.iter().copied().find(|verb| lowered.contains(verb)),
    }
}

fn describe_function(s: &Snippet) -> String {
    match capture(&FUNCTION_NAME, s.code) {
        Some(name) => format!("Next is a {} function called {}.", s.language, name),
        None => format!("Next is a {} function definition.", s.language),
    }
}

fn describe_class(s: &Snippet) -> String {
    match capture(&CLASS_NAME, s.code) {
        Some(name) => format!("Next is a {} class called {}.", s.language, name),
        None => format!("Next is a {} class definition.", s.language),
    }
}

fn describe_template(s: &Snippet) -> String {
    format!("Here is a {} template or configuration example.", s.language)
}

fn describe_imports(s: &Snippet) -> String {
    format!("Here we have some {} imports and setup code.", s.language)
}

fn describe_sections(s: &Snippet) -> String {
    let headings = section_headings(s.code);
    let mut sections = headings
        .iter()
        .take(MAX_LISTED_SECTIONS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if headings.len() > MAX_LISTED_SECTIONS {
        sections.push_str(", and more");
    }
    format!("Here is a template that includes sections for: {}.", sections)
}

fn describe_generic(s: &Snippet) -> String {
    if s.line_count > LONG_BLOCK_LINES {
        format!(
            "Here is a {} example spanning about {} lines.",
            s.language, s.line_count
        )
    } else if s.language == "code" {
        "Here is a code example.".to_string()
    } else {
        format!("Here is a {} code example.", s.language)
    }
}

fn section_headings(code: &str) -> Vec<String> {
    SECTION_HEADING
        .captures_iter(code)
        .map(|cap| cap[1].trim().to_string())
        .filter(|heading| !heading.is_empty())
        .collect()
}

fn capture(pattern: &Regex, code: &str) -> Option<String> {
    pattern.captures(code).map(|cap| cap[1].to_string())
}
