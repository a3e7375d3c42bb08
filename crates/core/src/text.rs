//! Article plaintext extraction from HTML.
//!
//! Highlights are located by searching the article's text, so this only has
//! to produce the readable body in document order, one block per paragraph.

use scraper::{ElementRef, Html, Selector};

const CONTAINERS: [&str; 4] = ["article", "main", "[role=main]", "body"];

const BLOCK_ELEMENTS: [&str; 13] = [
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
    "pre",
    "td",
    "th",
    "figcaption",
];

const SKIPPED_ELEMENTS: [&str; 9] = [
    "script", "style", "nav", "header", "footer", "aside", "noscript", "form", "template",
];

/// Extracts the readable text of an HTML page.
///
/// The first `article`, `main`, `[role=main]` or `body` element found is used
/// as the container. Block elements inside it become paragraphs separated by
/// blank lines; chrome such as navigation, scripts and footers is skipped.
/// When the container has no block elements its collapsed text is returned.
pub fn article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let container = CONTAINERS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|sel| document.select(&sel).next());

    let Some(container) = container else {
        return collapse_whitespace(&document.root_element().text().collect::<String>());
    };

    let mut blocks = Vec::new();
    collect_blocks(container, &mut blocks);

    if blocks.is_empty() {
        collapse_whitespace(&visible_text(container))
    } else {
        blocks.join("\n\n")
    }
}

fn collect_blocks(element: ElementRef<'_>, blocks: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();
        if SKIPPED_ELEMENTS.contains(&name) {
            continue;
        }

        if BLOCK_ELEMENTS.contains(&name) {
            let text = collapse_whitespace(&visible_text(child));
            if !text.is_empty() {
                blocks.push(text);
            }
        } else {
            collect_blocks(child, blocks);
        }
    }
}

/// Text of `element` without the contents of skipped descendants.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.children() {
        if let Some(child) = ElementRef::wrap(node) {
            let name = child.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            out.push_str(&visible_text(child));
            if name == "br" || BLOCK_ELEMENTS.contains(&name) {
                out.push(' ');
            }
        } else if let Some(text) = node.value().as_text() {
            out.push_str(text);
        }
    }
    out
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
