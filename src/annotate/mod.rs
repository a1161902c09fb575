// src/annotate/mod.rs
// =============================================================================
// This module turns external links into footnotes.
//
// Submodules:
// - links: decides which anchors are eligible and collects them in order
// - references: the reference entry type and the markup we insert
// - annotator: LinkAnnotator, which ties the two together over a container
//
// Why footnotes?
// - Some editors (WeChat official accounts, for one) strip clickable links
// - Readers still need the URLs, so we number the links inline and list the
//   targets at the end of the article
// =============================================================================

mod annotator;
mod links;
mod references;

pub use annotator::{LinkAnnotator, DEFAULT_REFERENCE_HEADING};
pub use links::{classify, collect_eligible, EligibleLink, Exclusion};
pub use references::{escape_html, ReferenceEntry};
