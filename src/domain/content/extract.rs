//! Markup → ordered speakable segments.
//!
//! Parsing never fails: `scraper` repairs malformed markup, and a page without
//! paragraph-like structure falls back to its bare text nodes.

use crate::domain::summary::CodeBlock;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Elements that never carry narration
const SKIPPED_TAGS: [&str; 9] = [
    "head", "script", "style", "nav", "footer", "header", "form", "img", "noscript",
];

/// Containers removed wholesale when they hold a subscription prompt
const PROMPT_CONTAINERS: [&str; 3] = ["div", "section", "aside"];

static SUBSCRIPTION_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Get new articles|Subscribe|Unsubscribe").unwrap());
static CODE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("code").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Paragraph(String),
    Heading(String),
    Code(CodeBlock),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    Paragraph,
    Heading,
}

/// Linearize markup into paragraphs, headings and code blocks, in document order.
pub fn extract_segments(markup: &str) -> Vec<Segment> {
    let document = Html::parse_document(markup);
    let removed = subscription_prompts(&document);

    let mut walker = Walker {
        removed,
        segments: Vec::new(),
        loose_text: Vec::new(),
        block: None,
        buffer: String::new(),
    };
    walker.walk(document.root_element());
    walker.flush();

    if walker.segments.is_empty() {
        return walker
            .loose_text
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Segment::Paragraph(t.to_string()))
            .collect();
    }
    walker.segments
}

/// Elements to drop because they wrap a newsletter prompt.
///
/// The text's parent is dropped through its nearest div/section/aside
/// ancestor when one exists.
fn subscription_prompts(document: &Html) -> Vec<ElementRef<'_>> {
    let mut removed = Vec::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !SUBSCRIPTION_PROMPT.is_match(text) {
            continue;
        }
        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if is_skipped(parent) {
            continue;
        }

        let container = parent
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| PROMPT_CONTAINERS.contains(&el.value().name()));

        let target = container.unwrap_or(parent);
        if !removed.contains(&target) {
            removed.push(target);
        }
    }

    removed
}

/// True when the element or one of its ancestors is never narrated
fn is_skipped(el: ElementRef<'_>) -> bool {
    SKIPPED_TAGS.contains(&el.value().name())
        || el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| SKIPPED_TAGS.contains(&ancestor.value().name()))
}

struct Walker<'a> {
    removed: Vec<ElementRef<'a>>,
    segments: Vec<Segment>,
    loose_text: Vec<String>,
    block: Option<BlockKind>,
    buffer: String,
}

impl<'a> Walker<'a> {
    fn walk(&mut self, element: ElementRef<'a>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.loose_text.push(text.to_string());
                if self.block.is_some() {
                    self.buffer.push_str(text);
                }
                continue;
            }

            let Some(el) = ElementRef::wrap(child) else {
                continue;
            };
            if self.removed.contains(&el) {
                continue;
            }

            let name = el.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }

            match name {
                "pre" => {
                    self.flush();
                    self.segments.push(Segment::Code(code_block(el)));
                }
                "p" | "li" | "h4" | "h5" | "h6" => self.nested_block(el, BlockKind::Paragraph),
                "h1" | "h2" | "h3" => self.nested_block(el, BlockKind::Heading),
                "br" => self.buffer.push(' '),
                _ => self.walk(el),
            }
        }
    }

    /// Walk a block element, keeping text of an enclosing block separate.
    fn nested_block(&mut self, el: ElementRef<'a>, kind: BlockKind) {
        self.flush();
        let outer = self.block.replace(kind);
        self.walk(el);
        self.flush();
        self.block = outer;
    }

    fn flush(&mut self) {
        let text = collapse_whitespace(&self.buffer);
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        match self.block {
            Some(BlockKind::Heading) => self.segments.push(Segment::Heading(text)),
            Some(BlockKind::Paragraph) => self.segments.push(Segment::Paragraph(text)),
            None => {}
        }
    }
}

fn code_block(pre: ElementRef<'_>) -> CodeBlock {
    match pre.select(&CODE_SELECTOR).next() {
        Some(code) => {
            let language = language_class(code)
                .or_else(|| language_class(pre))
                .unwrap_or_default();
            CodeBlock::new(code.text().collect::<String>(), language)
        }
        None => CodeBlock::new(pre.text().collect::<String>(), ""),
    }
}

/// Language from a `language-X` or `lang-X` class
fn language_class(el: ElementRef<'_>) -> Option<String> {
    el.value().classes().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .map(str::to_string)
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
