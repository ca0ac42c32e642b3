//! Contract with the grid engine that positions widgets and tracks drags.

use config::GridOptions;
use gridnest_ids::EngineHandle;
use serde::{Deserialize, Serialize};

use crate::{GridEvent, Handler, NodeId, Result, Tree, WidgetLayout};

/// Saved configuration of one widget, as produced by [`GridEngine::save`].
///
/// Nested grids are described by their widgets' configurations only; grid
/// identity and subscribed handlers are not part of what the engine saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Engine-visible layout.
    #[serde(flatten)]
    pub layout: WidgetLayout,
    /// Widgets of the nested grid, when the widget hosts one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_grid: Option<Vec<WidgetConfig>>,
}

/// Partial update applied through [`GridEngine::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetUpdate {
    /// New column.
    pub x: Option<u32>,
    /// New row.
    pub y: Option<u32>,
    /// New width.
    pub w: Option<u32>,
    /// New height.
    pub h: Option<u32>,
    /// Attributes to set.
    pub attrs: Vec<(String, String)>,
}

/// Operations consumed from the grid engine.
///
/// Each grid container has at most one engine instance, created by
/// [`init`](Self::init). All structural changes to engine-managed grids go
/// through these methods so the engine's own bookkeeping stays consistent
/// with the tree.
pub trait GridEngine {
    /// Create the engine instance for `grid`, adopting its current widgets.
    /// Initialising an already initialised grid is a no-op.
    fn init(&mut self, tree: &mut Tree, grid: NodeId, options: &GridOptions) -> Result<()>;

    /// Tear down the instance for `grid`. With `remove_dom` the grid also
    /// leaves the tree; otherwise its nodes are left in place.
    fn destroy(&mut self, tree: &mut Tree, grid: NodeId, remove_dom: bool);

    /// True when `grid` has an engine instance.
    fn is_initialized(&self, grid: NodeId) -> bool;

    /// Serialise the direct widgets of `grid`, in visual order.
    fn save(&self, tree: &Tree, grid: NodeId) -> Vec<WidgetConfig>;

    /// Build a fresh widget (and any nested grids) from `config` and append it.
    fn add_widget(&mut self, tree: &mut Tree, grid: NodeId, config: &WidgetConfig)
    -> Result<NodeId>;

    /// Adopt an existing widget node into `grid` at slot `at` (appending when
    /// `None`).
    fn make_widget(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        widget: NodeId,
        at: Option<usize>,
    ) -> Result<()>;

    /// Remove one of this grid's widgets from engine management. With
    /// `remove_dom` the widget also leaves the tree (it stays in the arena).
    /// Widgets that are not children of `grid` are ignored.
    fn remove_widget(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        widget: NodeId,
        remove_dom: bool,
        trigger_event: bool,
    );

    /// Apply a partial layout update.
    fn update(&mut self, tree: &mut Tree, widget: NodeId, update: &WidgetUpdate) -> Result<()>;

    /// Subscribe `handler` to `event` on `grid`, replacing any previous one.
    fn on(&mut self, tree: &mut Tree, grid: NodeId, event: GridEvent, handler: Handler)
    -> Result<()>;

    /// Unsubscribe `event` on `grid`.
    fn off(&mut self, tree: &mut Tree, grid: NodeId, event: GridEvent);

    /// Find the engine node tracking `el` by scanning the live node list.
    fn node_for_element(&self, grid: NodeId, el: NodeId) -> Option<EngineHandle>;

    /// Drop an engine node. Removals with `trigger_event` accumulate until the
    /// next [`trigger_remove_event`](Self::trigger_remove_event).
    fn remove_node(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        handle: EngineHandle,
        remove_dom: bool,
        trigger_event: bool,
    );

    /// Detach drag/drop bindings from a widget.
    fn release_drag_drop(&mut self, tree: &mut Tree, widget: NodeId);

    /// Fire `removed` for accumulated removals, if any.
    fn trigger_remove_event(&mut self, tree: &Tree, grid: NodeId);

    /// Fire `change` for accumulated changes, if any.
    fn trigger_change_event(&mut self, tree: &Tree, grid: NodeId);
}
