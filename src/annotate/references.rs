// src/annotate/references.rs
// =============================================================================
// This module renders the markup the annotator inserts:
// - the inline superscript marker placed after each link: [n]
// - the reference block appended at the end of the article
//
// Styles are inline because rich-text editors drop <style> sheets on paste.
//
// A note on escaping:
// - Link text comes from the article and may contain '<' or '&', so it is
//   escaped before it goes into markup
// - The URL is inserted as-is. It must be a plain string, not markup
// =============================================================================

use serde::Serialize;

/// One line of the reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    /// 1-based footnote number, in document order
    pub index: usize,
    /// Text of the link as the reader saw it
    pub text: String,
    /// Link target, verbatim from the href
    pub url: String,
}

/// Markup for the inline marker that follows link number `index`
pub fn render_marker(index: usize) -> String {
    format!(r#"<sup style="margin-left: 2px; color: #999;">[{}]</sup>"#, index)
}

/// Markup for the trailing reference block
pub fn render_block(heading: &str, entries: &[ReferenceEntry]) -> String {
    let mut html = String::from(
        r#"<div class="references-section" style="margin-top: 40px; padding-top: 20px; border-top: 1px solid #eee;">"#,
    );

    html.push_str(&format!(
        r#"<h3 style="font-size: 16px; font-weight: bold; margin-bottom: 15px;">{}</h3>"#,
        escape_html(heading)
    ));

    html.push_str(r#"<ul style="padding-left: 0; list-style: none;">"#);
    for entry in entries {
        html.push_str(&render_item(entry));
    }
    html.push_str("</ul></div>");

    html
}

// One <li>: "[n] text: url"
// The span.li-text wrapper stops some editors from breaking the line
fn render_item(entry: &ReferenceEntry) -> String {
    format!(
        concat!(
            r#"<li style="font-size: 14px; color: #666; margin-bottom: 8px; line-height: 1.6; display: block;">"#,
            r#"<span class="li-text">"#,
            r#"<span style="color: #999; margin-right: 5px;">[{}]</span> "#,
            r#"{}: "#,
            r#"<span style="color: #333; word-break: break-all;">{}</span>"#,
            r#"</span></li>"#,
        ),
        entry.index,
        escape_html(&entry.text),
        entry.url
    )
}

/// Escapes the characters that are significant in HTML text
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
