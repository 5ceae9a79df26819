//! Layout output types.

/// What a laid-out box stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRole {
    /// The unbordered outer container owned by the root host.
    Root,
    /// A composite's bordered container.
    Composite,
    /// A leaf's bordered box around its label.
    Leaf,
}

/// One box in absolute terminal coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBox {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub role: BoxRole,
    pub label: Option<String>,
    /// Nesting depth, 0 for the root.
    pub depth: u16,
}

/// Result of a layout pass: boxes in paint order (parents before children).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedLayout {
    pub boxes: Vec<LayoutBox>,
    pub content_width: u16,
    pub content_height: u16,
}

impl ComputedLayout {
    pub fn new() -> Self {
        Self::default()
    }
}
