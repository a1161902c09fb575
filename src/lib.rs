// src/lib.rs
// =============================================================================
// Library root: everything the footnote-publish binary is built from.
//
// Modules:
// - content: the article content buffer (parse, mutate, snapshot, restore)
// - annotate: turns eligible links into numbered footnotes
// - clipboard: rich-text clipboard access
// - notify: short-lived notifications
// - publish: the upload-then-copy flow against the preview server
// - cli: command-line definition
// =============================================================================

pub mod annotate;
pub mod cli;
pub mod clipboard;
pub mod content;
pub mod notify;
pub mod publish;
