use serde::Serialize;

use super::layout::Layout;
use super::trace::Trace;

/// A renderable scene: drawable layers plus layout metadata. Serializes
/// to JSON for whatever surface ends up displaying it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(layout: Layout) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    /// A valid, empty figure whose title explains why there is nothing to
    /// draw. The universal degraded output for incomplete tables.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Some(title.into()),
                ..Layout::default()
            },
        }
    }

    pub fn push(&mut self, trace: Trace) {
        self.data.push(trace);
    }
}
