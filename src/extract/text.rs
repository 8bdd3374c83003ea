//! HTML text and link extraction
//!
//! Reduces a fetched page to the three things the engine cares about:
//! the Malayalam text content, the outbound links to follow, and any
//! linked PDF documents to hand to the ingestor. Parsing is html5ever
//! based and never fails: malformed markup degrades to a best-effort
//! tree, and a page without usable content simply produces empty output.

use crate::extract::script::malayalam_runs;
use crate::url::normalize_url;
use scraper::{Html, Node, Selector};
use url::Url;

/// Everything extracted from one page in a single parse
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Malayalam text content, script-filtered and space-joined
    pub text: String,

    /// Outbound page links, resolved absolute
    pub links: Vec<Url>,

    /// Links to PDF documents, kept out of the page frontier and
    /// handed to the ingestor instead
    pub pdf_links: Vec<Url>,
}

/// Parses an HTML document and extracts text, links, and PDF candidates.
///
/// Text handling follows the scrape pipeline's rules: `<style>` and
/// `<script>` subtrees are dropped wholesale (content and tag), the
/// remaining text nodes are joined with single spaces, and the result is
/// reduced to its Malayalam runs. The caller applies the minimum-length
/// policy; this function never errors.
pub fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let text = malayalam_runs(&visible_text(&document));
    let (links, pdf_links) = collect_links(&document, base_url);

    ParsedPage {
        text,
        links,
        pdf_links,
    }
}

/// Concatenates all text nodes outside style/script subtrees.
fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let skipped = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => matches!(element.name(), "style" | "script"),
                _ => false,
            });
            if skipped {
                continue;
            }

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }

    parts.join(" ")
}

/// Walks all anchors, resolving hrefs and splitting off PDF documents.
fn collect_links(document: &Html, base_url: &Url) -> (Vec<Url>, Vec<Url>) {
    let mut links = Vec::new();
    let mut pdf_links = Vec::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_href(href, base_url) {
                    if is_pdf_href(&resolved) {
                        pdf_links.push(resolved);
                    } else {
                        links.push(resolved);
                    }
                }
            }
        }
    }

    (links, pdf_links)
}

/// Returns true if the resolved URL points at a PDF document.
fn is_pdf_href(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Resolves an href against the page URL, filtering non-followable links.
///
/// Skipped: empty hrefs, fragment-only anchors, and the javascript:,
/// mailto:, tel:, and data: schemes. Anything that resolves to a
/// non-HTTP(S) URL is skipped as well.
fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if href.starts_with(scheme) {
            return None;
        }
    }

    let resolved = base_url.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => normalize_url(resolved.as_str()).ok(),
        _ => None,
    }
}
