// src/content/format.rs
// =============================================================================
// The formatting capability that other components may plug in.
//
// The publisher doesn't know how content gets formatted; it is handed
// something that implements ContentFormatter when it is built. If nothing is
// handed in, NoopFormatter leaves the content alone.
// =============================================================================

use super::ContentContainer;

/// A mutation step applied to content before it is shown or copied
pub trait ContentFormatter {
    fn format(&self, container: &mut ContentContainer);
}

/// Formatter that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFormatter;

impl ContentFormatter for NoopFormatter {
    fn format(&self, _container: &mut ContentContainer) {}
}
