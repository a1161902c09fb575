// src/content/mod.rs
// =============================================================================
// This module owns the article content that gets annotated and copied.
//
// Submodules:
// - container: the HTML fragment buffer with save/restore snapshots
// - format: the pluggable formatting step run over a container
//
// The container is passed explicitly (&mut) to whoever mutates it. There is
// no page-global lookup: the publisher and the annotator both receive it.
// =============================================================================

mod container;
mod format;

pub use container::{ContentContainer, Snapshot};
pub use format::{ContentFormatter, NoopFormatter};
