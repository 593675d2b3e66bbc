use crate::graph::Position;

/// Spacing used by the vertical layout the converter assigns on load.
///
/// Blocks stack top to bottom. A container grows by the height of its body, and
/// nested nodes are placed relative to their container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub origin: Position,
    pub node_spacing: f64,
    pub child_offset: Position,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin: Position::new(0.0, 0.0),
            node_spacing: 150.0,
            child_offset: Position::new(24.0, 72.0),
        }
    }
}

impl LayoutOptions {
    pub fn with_node_spacing(mut self, node_spacing: f64) -> Self {
        self.node_spacing = node_spacing;
        self
    }

    pub(super) fn scope_start(&self, nested: bool) -> Position {
        if nested {
            self.child_offset
        } else {
            self.origin
        }
    }

    /// Vertical room taken by one node whose body is `inner_height` tall.
    pub(super) fn extent(&self, inner_height: f64) -> f64 {
        if inner_height > 0.0 {
            self.child_offset.y + inner_height
        } else {
            self.node_spacing
        }
    }
}
