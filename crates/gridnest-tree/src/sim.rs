//! In-process grid engine with the same destructive move semantics as a
//! browser grid library: removal drops a widget's engine bookkeeping, and
//! re-adding from a saved configuration builds brand new nodes.

use std::{collections::HashMap, mem};

use config::GridOptions;
use gridnest_ids::EngineHandle;
use tracing::{debug, trace};

use crate::{
    Error, EventArgs, GridEngine, GridEvent, Handler, NodeId, Result, Tree, WidgetConfig,
    WidgetUpdate,
};

/// Prefix of the class every initialised grid receives.
pub const INSTANCE_CLASS_PREFIX: &str = "grid-stack-instance-";

/// Engine-side record of a managed widget.
#[derive(Debug, Clone, Copy)]
struct EngineNode {
    /// Handle mirrored onto the widget while it is managed.
    handle: EngineHandle,
    /// The widget node.
    el: NodeId,
}

/// Engine state for one grid.
#[derive(Debug)]
struct Instance {
    /// Sequence number, used for the instance class.
    number: u64,
    /// Options the instance was created with.
    options: GridOptions,
    /// Managed widgets.
    nodes: Vec<EngineNode>,
    /// Removals waiting for the next `removed` event.
    removed: Vec<NodeId>,
    /// Changes waiting for the next `change` event.
    dirty: Vec<NodeId>,
}

/// Deterministic, in-memory [`GridEngine`].
///
/// Every call is recorded by name so tests can assert which managed
/// operations a caller used.
#[derive(Debug, Default)]
pub struct SimEngine {
    /// One instance per initialised grid.
    instances: HashMap<NodeId, Instance>,
    /// Last instance number handed out.
    next_instance: u64,
    /// Names of engine calls, in order.
    calls: Vec<String>,
}

impl SimEngine {
    /// Create an engine with no instances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every engine call so far.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// True if any recorded call has the given name.
    pub fn calls_contains(&self, name: &str) -> bool {
        self.calls.iter().any(|c| c == name)
    }

    /// Number of recorded calls with the given name.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| *c == name).count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Widgets the instance for `grid` currently manages.
    pub fn managed(&self, grid: NodeId) -> Vec<NodeId> {
        self.instances
            .get(&grid)
            .map(|i| i.nodes.iter().map(|n| n.el).collect())
            .unwrap_or_default()
    }

    /// Drop the engine node for `widget` without touching the widget itself,
    /// leaving the widget's handle dangling. Models a partial teardown.
    pub fn forget(&mut self, grid: NodeId, widget: NodeId) {
        if let Some(inst) = self.instances.get_mut(&grid) {
            inst.nodes.retain(|n| n.el != widget);
        }
    }

    /// Record a call by name.
    fn record(&mut self, name: &str) {
        self.calls.push(name.to_string());
    }

    /// Deliver `event` to the handler subscribed on `grid`, if any.
    fn fire(tree: &Tree, grid: NodeId, event: GridEvent, widgets: Vec<NodeId>) {
        let handler: Option<Handler> = tree
            .grid(grid)
            .and_then(|g| g.handlers.get(&event))
            .cloned();
        if let Some(h) = handler {
            trace!(?grid, %event, count = widgets.len(), "event_fired");
            h.call(&EventArgs {
                event,
                grid,
                widgets,
            });
        }
    }

    /// Start managing a widget that is already a child of `grid`.
    fn adopt(&mut self, tree: &mut Tree, grid: NodeId, widget: NodeId) -> Result<()> {
        let inst = self
            .instances
            .get_mut(&grid)
            .ok_or(Error::NotInitialized(grid))?;
        let handle = EngineHandle::next();
        let data = tree.widget_mut(widget).ok_or(Error::NotAWidget(widget))?;
        data.engine_handle = Some(handle);
        data.drag_bound = !inst.options.static_grid;
        inst.nodes.push(EngineNode { handle, el: widget });
        inst.dirty.push(widget);
        Ok(())
    }

    /// Options of the instance for `grid`.
    fn options(&self, grid: NodeId) -> Result<GridOptions> {
        self.instances
            .get(&grid)
            .map(|i| i.options.clone())
            .ok_or(Error::NotInitialized(grid))
    }

    /// Save one widget, nested grid included.
    fn save_widget(&self, tree: &Tree, widget: NodeId) -> Option<WidgetConfig> {
        let data = tree.widget(widget)?;
        Some(WidgetConfig {
            layout: data.layout.clone(),
            sub_grid: tree.child_grid(widget).map(|g| self.save(tree, g)),
        })
    }
}

impl GridEngine for SimEngine {
    fn init(&mut self, tree: &mut Tree, grid: NodeId, options: &GridOptions) -> Result<()> {
        if !tree.node(grid)?.is_grid() {
            return Err(Error::NotAGrid(grid));
        }
        if self.instances.contains_key(&grid) {
            return Ok(());
        }
        self.record("init");
        self.next_instance += 1;
        let number = self.next_instance;
        self.instances.insert(
            grid,
            Instance {
                number,
                options: options.clone(),
                nodes: Vec::new(),
                removed: Vec::new(),
                dirty: Vec::new(),
            },
        );
        if let Some(data) = tree.grid_mut(grid) {
            data.classes.push(format!("{}{}", INSTANCE_CLASS_PREFIX, number));
        }
        let existing: Vec<NodeId> = tree.children(grid).to_vec();
        for widget in existing {
            self.adopt(tree, grid, widget)?;
        }
        debug!(?grid, number, "engine_init");
        Ok(())
    }

    fn destroy(&mut self, tree: &mut Tree, grid: NodeId, remove_dom: bool) {
        self.record("destroy");
        let Some(inst) = self.instances.remove(&grid) else {
            return;
        };
        for node in inst.nodes {
            if let Some(data) = tree.widget_mut(node.el) {
                data.engine_handle = None;
                data.drag_bound = false;
            }
        }
        if remove_dom {
            tree.detach(grid);
            tree.unmount_root(grid);
        }
        debug!(?grid, number = inst.number, remove_dom, "engine_destroy");
    }

    fn is_initialized(&self, grid: NodeId) -> bool {
        self.instances.contains_key(&grid)
    }

    fn save(&self, tree: &Tree, grid: NodeId) -> Vec<WidgetConfig> {
        tree.children(grid)
            .iter()
            .filter_map(|w| self.save_widget(tree, *w))
            .collect()
    }

    fn add_widget(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        config: &WidgetConfig,
    ) -> Result<NodeId> {
        let options = self.options(grid)?;
        self.record("add_widget");
        let widget = tree.create_widget(config.layout.clone());
        tree.insert_child(grid, widget, None)?;
        self.adopt(tree, grid, widget)?;
        if let Some(children) = &config.sub_grid {
            let sub = tree.create_grid();
            tree.insert_child(widget, sub, None)?;
            self.init(tree, sub, &options)?;
            for child in children {
                self.add_widget(tree, sub, child)?;
            }
        }
        debug!(?grid, ?widget, id = ?config.layout.id, "widget_added");
        Self::fire(tree, grid, GridEvent::Added, vec![widget]);
        Ok(widget)
    }

    fn make_widget(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        widget: NodeId,
        at: Option<usize>,
    ) -> Result<()> {
        if !self.instances.contains_key(&grid) {
            return Err(Error::NotInitialized(grid));
        }
        if !tree.node(widget)?.is_widget() {
            return Err(Error::NotAWidget(widget));
        }
        self.record("make_widget");
        let slot = tree.insert_child(grid, widget, at)?;
        self.adopt(tree, grid, widget)?;
        debug!(?grid, ?widget, slot, "widget_made");
        Self::fire(tree, grid, GridEvent::Added, vec![widget]);
        Ok(())
    }

    fn remove_widget(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        widget: NodeId,
        remove_dom: bool,
        trigger_event: bool,
    ) {
        self.record("remove_widget");
        if tree.parent(widget) != Some(grid) {
            debug!(?grid, ?widget, "remove_widget_not_our_child");
            return;
        }
        let handle = tree
            .widget(widget)
            .and_then(|w| w.engine_handle)
            .or_else(|| self.node_for_element(grid, widget));
        let Some(handle) = handle else {
            return;
        };
        if let Some(data) = tree.widget_mut(widget) {
            data.engine_handle = None;
        }
        self.release_drag_drop(tree, widget);
        self.remove_node(tree, grid, handle, remove_dom, trigger_event);
        if trigger_event {
            self.trigger_remove_event(tree, grid);
            self.trigger_change_event(tree, grid);
        }
    }

    fn update(&mut self, tree: &mut Tree, widget: NodeId, update: &WidgetUpdate) -> Result<()> {
        self.record("update");
        let data = tree.widget_mut(widget).ok_or(Error::NotAWidget(widget))?;
        let layout = &mut data.layout;
        if let Some(x) = update.x {
            layout.x = x;
        }
        if let Some(y) = update.y {
            layout.y = y;
        }
        if let Some(w) = update.w {
            layout.w = w;
        }
        if let Some(h) = update.h {
            layout.h = h;
        }
        for (k, v) in &update.attrs {
            layout.attrs.insert(k.clone(), v.clone());
        }
        if let Some(inst) = tree.parent(widget).and_then(|g| self.instances.get_mut(&g)) {
            inst.dirty.push(widget);
        }
        Ok(())
    }

    fn on(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        event: GridEvent,
        handler: Handler,
    ) -> Result<()> {
        self.record("on");
        let data = tree.grid_mut(grid).ok_or(Error::NotAGrid(grid))?;
        data.handlers.insert(event, handler);
        Ok(())
    }

    fn off(&mut self, tree: &mut Tree, grid: NodeId, event: GridEvent) {
        self.record("off");
        if let Some(data) = tree.grid_mut(grid) {
            data.handlers.remove(&event);
        }
    }

    fn node_for_element(&self, grid: NodeId, el: NodeId) -> Option<EngineHandle> {
        self.instances
            .get(&grid)?
            .nodes
            .iter()
            .find(|n| n.el == el)
            .map(|n| n.handle)
    }

    fn remove_node(
        &mut self,
        tree: &mut Tree,
        grid: NodeId,
        handle: EngineHandle,
        remove_dom: bool,
        trigger_event: bool,
    ) {
        self.record("remove_node");
        let Some(inst) = self.instances.get_mut(&grid) else {
            return;
        };
        let Some(pos) = inst.nodes.iter().position(|n| n.handle == handle) else {
            return;
        };
        let node = inst.nodes.remove(pos);
        if trigger_event {
            inst.removed.push(node.el);
            inst.dirty.push(node.el);
        }
        if let Some(data) = tree.widget_mut(node.el)
            && data.engine_handle == Some(handle)
        {
            data.engine_handle = None;
        }
        if remove_dom {
            tree.detach(node.el);
        }
        debug!(?grid, widget = ?node.el, remove_dom, "engine_node_removed");
    }

    fn release_drag_drop(&mut self, tree: &mut Tree, widget: NodeId) {
        if let Some(data) = tree.widget_mut(widget) {
            data.drag_bound = false;
        }
    }

    fn trigger_remove_event(&mut self, tree: &Tree, grid: NodeId) {
        let Some(inst) = self.instances.get_mut(&grid) else {
            return;
        };
        let removed = mem::take(&mut inst.removed);
        if !removed.is_empty() {
            Self::fire(tree, grid, GridEvent::Removed, removed);
        }
    }

    fn trigger_change_event(&mut self, tree: &Tree, grid: NodeId) {
        let Some(inst) = self.instances.get_mut(&grid) else {
            return;
        };
        let mut dirty = mem::take(&mut inst.dirty);
        dirty.dedup();
        if !dirty.is_empty() {
            Self::fire(tree, grid, GridEvent::Change, dirty);
        }
    }
}
