//! Node types stored in the tree arena.

use std::collections::BTreeMap;

use config::WidgetSpec;
use gridnest_ids::{EngineHandle, StableId, TransientId};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::HandlerTable;

new_key_type! {
    /// Address of a node in a [`Tree`](crate::Tree) arena.
    pub struct NodeId;
}

/// Layout configuration of a widget as the grid engine sees it.
///
/// This is the part of a widget that survives the engine's save/re-add
/// round trip. Stable identifiers are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    /// Engine id (the `gs-id` of the widget).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
    /// Free-form attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl From<&WidgetSpec> for WidgetLayout {
    fn from(spec: &WidgetSpec) -> Self {
        Self {
            id: spec.id.clone(),
            x: spec.x,
            y: spec.y,
            w: spec.w,
            h: spec.h,
            attrs: spec.attrs.clone(),
        }
    }
}

/// Widget-specific node data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetData {
    /// Engine-visible layout.
    pub layout: WidgetLayout,
    /// User-visible element identifier.
    pub element_id: Option<String>,
    /// Handle set while the engine manages this widget.
    pub engine_handle: Option<EngineHandle>,
    /// Whether drag/drop bindings are attached.
    pub drag_bound: bool,
}

/// Grid-specific node data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridData {
    /// Stable id of the widget this grid is nested under.
    pub sub_grid_id: Option<StableId>,
    /// Subscribed event handlers.
    pub handlers: HandlerTable,
    /// Class list; engines tag initialised grids here.
    pub classes: Vec<String>,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum NodeKind {
    Widget(WidgetData),
    Grid(GridData),
}

/// One element of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Assigned at construction, never reused.
    pub transient_id: TransientId,
    /// Identifier that reconciliation carries across moves.
    pub stable_id: Option<StableId>,
    /// Owning node, if attached.
    pub parent: Option<NodeId>,
    /// Ordered children; order is visual order.
    pub children: Vec<NodeId>,
    /// Kind-specific data.
    pub kind: NodeKind,
}

impl Node {
    /// True for widgets.
    pub fn is_widget(&self) -> bool {
        matches!(self.kind, NodeKind::Widget(_))
    }

    /// True for grid containers.
    pub fn is_grid(&self) -> bool {
        matches!(self.kind, NodeKind::Grid(_))
    }

    /// Widget data, if this is a widget.
    pub fn as_widget(&self) -> Option<&WidgetData> {
        match &self.kind {
            NodeKind::Widget(w) => Some(w),
            NodeKind::Grid(_) => None,
        }
    }

    /// Mutable widget data, if this is a widget.
    pub fn as_widget_mut(&mut self) -> Option<&mut WidgetData> {
        match &mut self.kind {
            NodeKind::Widget(w) => Some(w),
            NodeKind::Grid(_) => None,
        }
    }

    /// Grid data, if this is a grid.
    pub fn as_grid(&self) -> Option<&GridData> {
        match &self.kind {
            NodeKind::Grid(g) => Some(g),
            NodeKind::Widget(_) => None,
        }
    }

    /// Mutable grid data, if this is a grid.
    pub fn as_grid_mut(&mut self) -> Option<&mut GridData> {
        match &mut self.kind {
            NodeKind::Grid(g) => Some(g),
            NodeKind::Widget(_) => None,
        }
    }
}
