// src/annotate/annotator.rs
// =============================================================================
// LinkAnnotator: numbers eligible links and appends the reference list.
//
// What happens on annotate():
// 1. Scan the container for eligible anchors (see links.rs)
// 2. Number them 1..N in document order
// 3. Insert a [n] superscript right after each anchor (the anchor itself
//    is left untouched)
// 4. If N > 0, append one reference block listing all N links
//
// Running it twice on the same content numbers the same anchors again and
// appends a second block. Callers that need a clean result restore the
// container first (see publish/flow.rs).
// =============================================================================

use log::debug;

use super::links::collect_eligible;
use super::references::{render_block, render_marker, ReferenceEntry};
use crate::content::{ContentContainer, ContentFormatter};

/// Heading shown above the reference list unless configured otherwise
pub const DEFAULT_REFERENCE_HEADING: &str = "reference links";

/// Turns external links into numbered footnotes
#[derive(Debug, Clone)]
pub struct LinkAnnotator {
    heading: String,
}

impl Default for LinkAnnotator {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_HEADING)
    }
}

impl LinkAnnotator {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
        }
    }

    /// Annotates `container` in place and returns the references it added
    ///
    /// With no eligible links the container is left exactly as it was.
    pub fn annotate(&self, container: &mut ContentContainer) -> Vec<ReferenceEntry> {
        let links = collect_eligible(container.root());

        let mut references = Vec::with_capacity(links.len());
        for (position, link) in links.into_iter().enumerate() {
            let index = position + 1;
            let inserted = container.insert_fragment_after(link.node, &render_marker(index));
            debug_assert!(inserted, "anchor was collected from this container");
            references.push(ReferenceEntry {
                index,
                text: link.text,
                url: link.href,
            });
        }

        if !references.is_empty() {
            container.append_fragment(&render_block(&self.heading, &references));
        }

        debug!("annotated {} link(s)", references.len());
        references
    }
}

impl ContentFormatter for LinkAnnotator {
    fn format(&self, container: &mut ContentContainer) {
        self.annotate(container);
    }
}
