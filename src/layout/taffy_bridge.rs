//! Taffy Bridge - Lays the tree out as nested flexbox containers.
//!
//! Every composite becomes a bordered column container, every leaf a bordered
//! box around its measured label. The root is an unbordered column spanning
//! the available width. Taffy computes positions relative to the parent; the
//! result is flattened into absolute boxes in paint order (parents first).

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, NodeId, Rect, Size,
    Style, TaffyTree,
};

use crate::error::TreeError;
use crate::types::{Entries, Payload};

use super::text_measure::string_width;
use super::types::{BoxRole, ComputedLayout, LayoutBox};

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn cells(n: f32) -> LengthPercentage {
    LengthPercentage::Length(n)
}

/// Bordered box with one cell of horizontal padding.
fn framed_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        border: Rect {
            left: cells(1.0),
            right: cells(1.0),
            top: cells(1.0),
            bottom: cells(1.0),
        },
        padding: Rect {
            left: cells(1.0),
            right: cells(1.0),
            top: cells(0.0),
            bottom: cells(0.0),
        },
        ..Default::default()
    }
}

fn root_style(width: u16) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: Size {
            width: Dimension::Length(width as f32),
            height: Dimension::Auto,
        },
        ..Default::default()
    }
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Taffy node plus what it stands for, mirroring the entry structure.
struct BuiltNode {
    node: NodeId,
    role: BoxRole,
    label: Option<String>,
    children: Vec<BuiltNode>,
}

fn layout_err(err: taffy::TaffyError) -> TreeError {
    TreeError::Layout(format!("{err:?}"))
}

fn build_entries(
    tree: &mut TaffyTree<String>,
    entries: &Entries,
) -> Result<Vec<BuiltNode>, TreeError> {
    entries
        .iter()
        .map(|entry| match entry.payload() {
            Payload::Leaf(text) => {
                let node = tree
                    .new_leaf_with_context(framed_style(), text.clone())
                    .map_err(layout_err)?;
                Ok(BuiltNode {
                    node,
                    role: BoxRole::Leaf,
                    label: Some(text.clone()),
                    children: Vec::new(),
                })
            }
            Payload::Composite(children) => {
                let built = build_entries(tree, children)?;
                let ids: Vec<NodeId> = built.iter().map(|child| child.node).collect();
                let node = tree
                    .new_with_children(framed_style(), &ids)
                    .map_err(layout_err)?;
                Ok(BuiltNode {
                    node,
                    role: BoxRole::Composite,
                    label: Some(format!("#{}", entry.key())),
                    children: built,
                })
            }
        })
        .collect()
}

fn measure_label(
    known_dimensions: Size<Option<f32>>,
    _available_space: Size<AvailableSpace>,
    label: Option<&mut String>,
) -> Size<f32> {
    let Some(label) = label else {
        return Size::ZERO;
    };
    Size {
        width: known_dimensions
            .width
            .unwrap_or(string_width(label) as f32),
        height: known_dimensions.height.unwrap_or(1.0),
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Compute absolute boxes for `entries` laid out in `width` columns.
///
/// With `max_height` the root is limited to that many rows; otherwise the
/// height follows the content.
pub fn compute_layout(
    entries: &Entries,
    width: u16,
    max_height: Option<u16>,
) -> Result<ComputedLayout, TreeError> {
    let mut tree: TaffyTree<String> = TaffyTree::new();

    let built = build_entries(&mut tree, entries)?;
    let ids: Vec<NodeId> = built.iter().map(|child| child.node).collect();
    let root_node = tree
        .new_with_children(root_style(width), &ids)
        .map_err(layout_err)?;
    let root = BuiltNode {
        node: root_node,
        role: BoxRole::Root,
        label: None,
        children: built,
    };

    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: match max_height {
            Some(h) => AvailableSpace::Definite(h as f32),
            None => AvailableSpace::MaxContent,
        },
    };

    tree.compute_layout_with_measure(
        root_node,
        available,
        |known_dimensions, available_space, _node_id, context, _style| {
            measure_label(known_dimensions, available_space, context)
        },
    )
    .map_err(layout_err)?;

    let mut result = ComputedLayout::new();
    collect_boxes(&tree, &root, 0, 0, 0, &mut result.boxes)?;

    if let Some(root_box) = result.boxes.first() {
        result.content_width = root_box.width;
        result.content_height = match max_height {
            Some(h) => root_box.height.min(h),
            None => root_box.height,
        };
    }

    Ok(result)
}

fn collect_boxes(
    tree: &TaffyTree<String>,
    built: &BuiltNode,
    offset_x: u16,
    offset_y: u16,
    depth: u16,
    out: &mut Vec<LayoutBox>,
) -> Result<(), TreeError> {
    let layout = tree.layout(built.node).map_err(layout_err)?;
    let x = offset_x.saturating_add(layout.location.x.round() as u16);
    let y = offset_y.saturating_add(layout.location.y.round() as u16);

    out.push(LayoutBox {
        x,
        y,
        width: layout.size.width.round() as u16,
        height: layout.size.height.round() as u16,
        role: built.role,
        label: built.label.clone(),
        depth,
    });

    for child in &built.children {
        collect_boxes(tree, child, x, y, depth + 1, out)?;
    }
    Ok(())
}
