// src/content/container.rs
// =============================================================================
// An owned, mutable HTML fragment: the "article content" area.
//
// How it works:
// - The markup is parsed as a fragment with scraper (html5ever underneath)
// - The parsed tree can be mutated in place (footnote markers, reference block)
// - The markup as last loaded is kept separately, so a snapshot taken after
//   annotation still restores the clean source
//
// Rust concepts:
// - ego_tree: scraper stores documents in an arena tree we can edit by NodeId
// - Recursion: copying a parsed fragment node-by-node into another tree
// - Snapshot keeps both the clean source and what was on screen, so a
//   restore can rebuild either one
// =============================================================================

use ego_tree::{NodeId, NodeMut, NodeRef};
use scraper::{ElementRef, Html, Node};

/// Saved content of a container, restorable with [`ContentContainer::restore`]
/// or [`ContentContainer::restore_displayed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Markup as last loaded
    source: String,
    /// Markup as shown when the snapshot was taken, mutations included
    displayed: String,
}

impl Snapshot {
    /// What the container showed when the snapshot was taken
    pub fn displayed(&self) -> &str {
        &self.displayed
    }
}

/// HTML fragment holding formatted article markup.
#[derive(Debug, Clone)]
pub struct ContentContainer {
    /// Markup exactly as it was last loaded, before any in-place mutation
    source: String,
    /// Parsed, possibly mutated tree
    document: Html,
}

impl ContentContainer {
    /// Parses `html` as a fragment and wraps it in a container
    pub fn from_html(html: &str) -> Self {
        Self {
            source: html.to_string(),
            document: Html::parse_fragment(html),
        }
    }

    /// Replaces the whole content, like assigning `innerHTML`
    pub fn set_inner_html(&mut self, html: &str) {
        *self = Self::from_html(html);
    }

    /// Serializes the current (possibly mutated) content
    pub fn inner_html(&self) -> String {
        self.root().inner_html()
    }

    /// Concatenated text of every text node, in document order
    pub fn text(&self) -> String {
        self.root().text().collect()
    }

    /// Number of direct children (elements and text nodes) of the container
    pub fn child_count(&self) -> usize {
        self.root().children().count()
    }

    /// The element every piece of content hangs off
    ///
    /// For a parsed fragment this is the synthetic <html> wrapper, so its
    /// inner HTML is exactly the fragment.
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Captures the content as last loaded and as currently shown
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            source: self.source.clone(),
            displayed: self.inner_html(),
        }
    }

    /// Reloads the clean source from a snapshot, discarding all mutations
    ///
    /// Annotations applied in place after loading are gone afterwards; run
    /// the formatter again to get them back.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.set_inner_html(&snapshot.source);
    }

    /// Puts back exactly what was shown when the snapshot was taken
    ///
    /// The clean source is kept too, so a later snapshot/restore still
    /// starts from unannotated markup.
    pub fn restore_displayed(&mut self, snapshot: Snapshot) {
        self.document = Html::parse_fragment(&snapshot.displayed);
        self.source = snapshot.source;
    }

    /// Parses `html` and inserts its top-level nodes right after `node`,
    /// keeping their order
    ///
    /// Returns false if `node` doesn't belong to this container.
    pub fn insert_fragment_after(&mut self, node: NodeId, html: &str) -> bool {
        let fragment = Html::parse_fragment(html);

        let mut previous = node;
        for child in fragment.root_element().children() {
            let Some(mut target) = self.document.tree.get_mut(previous) else {
                return false;
            };
            let mut inserted = target.insert_after(child.value().clone());
            graft(&mut inserted, child);
            previous = inserted.id();
        }

        true
    }

    /// Parses `html` and appends its top-level nodes at the end of the container
    pub fn append_fragment(&mut self, html: &str) {
        let fragment = Html::parse_fragment(html);
        let root_id = self.root().id();

        // The root always exists: it came from our own parse
        if let Some(mut root) = self.document.tree.get_mut(root_id) {
            for child in fragment.root_element().children() {
                let mut appended = root.append(child.value().clone());
                graft(&mut appended, child);
            }
        }
    }
}

// Copies every descendant of `src` (from another tree) under `dest`
fn graft(dest: &mut NodeMut<'_, Node>, src: NodeRef<'_, Node>) {
    for child in src.children() {
        let mut copy = dest.append(child.value().clone());
        graft(&mut copy, child);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a NodeId?
//    - ego_tree keeps every node in one Vec (an "arena")
//    - A NodeId is an index into it, so it stays valid while we insert
//      other nodes; that's why we can collect ids first and edit later
//
// 2. Why clone node values from the parsed fragment?
//    - The fragment is its own tree; nodes can't be moved between arenas
//    - Node is Clone, so graft() copies them one level at a time
//
// 3. Why keep `source` next to the parsed tree?
//    - Serializing the tree gives back the *mutated* markup
//    - Re-running a formatter needs the markup before annotations were added
// -----------------------------------------------------------------------------
