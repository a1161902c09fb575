// src/annotate/links.rs
// =============================================================================
// This module finds the anchors that should become footnotes.
//
// An anchor is skipped when:
// - it has no href, or the href is empty
// - the href is a same-page anchor (#section)
// - the href is a javascript: pseudo-link
// - it wraps an image (a clickable picture, not a textual link)
// - it sits inside a <pre> or <code> block
//
// Everything else is eligible and numbered in document order.
//
// Rust concepts:
// - Enums as reasons: Exclusion says *why* an anchor was skipped
// - Result<T, E> for classification: Ok(href) or Err(reason)
// =============================================================================

use ego_tree::NodeId;
use log::debug;
use scraper::{ElementRef, Selector};

/// Why an anchor was not turned into a footnote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// href attribute is absent or empty
    MissingHref,
    /// href starts with '#'
    SamePageAnchor,
    /// href starts with "javascript:"
    ScriptLink,
    /// the anchor contains an <img>
    WrapsImage,
    /// the anchor is nested in <pre> or <code>
    InsideCode,
}

/// An anchor that will receive a footnote marker
#[derive(Debug, Clone)]
pub struct EligibleLink {
    /// Where the anchor lives in the container's tree
    pub node: NodeId,
    /// Visible text of the anchor, whitespace collapsed
    pub text: String,
    /// href exactly as written in the markup
    pub href: String,
}

// Builds a selector from a constant CSS string
// Our selectors are literals, so a parse failure is a programmer error
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("constant selector is valid")
}

/// Collects eligible anchors under `root`, in document (pre-order) order
pub fn collect_eligible(root: ElementRef<'_>) -> Vec<EligibleLink> {
    let anchors = selector("a");

    root.select(&anchors)
        .filter_map(|anchor| match classify(anchor) {
            Ok(href) => Some(EligibleLink {
                node: anchor.id(),
                text: visible_text(anchor),
                href: href.to_string(),
            }),
            Err(reason) => {
                debug!("skipping anchor {:?}: {:?}", anchor.value().attr("href"), reason);
                None
            }
        })
        .collect()
}

/// Decides whether an anchor is eligible
///
/// Returns the href on success, or the first rule that excludes it.
pub fn classify(anchor: ElementRef<'_>) -> Result<&str, Exclusion> {
    let href = match anchor.value().attr("href") {
        Some(href) if !href.is_empty() => href,
        _ => return Err(Exclusion::MissingHref),
    };

    if href.starts_with('#') {
        return Err(Exclusion::SamePageAnchor);
    }
    if href.starts_with("javascript:") {
        return Err(Exclusion::ScriptLink);
    }

    if anchor.select(&selector("img")).next().is_some() {
        return Err(Exclusion::WrapsImage);
    }

    let in_code = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| matches!(ancestor.value().name(), "pre" | "code"));
    if in_code {
        return Err(Exclusion::InsideCode);
    }

    Ok(href)
}

// Text the reader sees for the link, with runs of whitespace squeezed
fn visible_text(anchor: ElementRef<'_>) -> String {
    let raw: String = anchor.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
