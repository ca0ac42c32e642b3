//! The host component wrapping one grid container.

use std::collections::BTreeMap;

use config::{GridOptions, ReconcileCfg};
use gridnest_reconcile::{ReconcileReport, Reconciler};
use gridnest_tree::{GridEngine, GridEvent, Handler, NodeId, Tree};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::{ComponentHandle, Error, Result};

/// Classes an engine leaves on a grid it was initialised on.
static INSTANCE_CLASS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"grid-stack-instance-\d*").ok());

/// What the host passes to a component.
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    /// Engine options.
    pub options: GridOptions,
    /// Handler per event; only events present here are subscribed.
    pub actions: BTreeMap<GridEvent, Handler>,
    /// Reconciliation settings for drag-end.
    pub reconcile: ReconcileCfg,
}

/// A drag-end signal delivered to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEndEvent {
    /// Node the drag ended on.
    pub target: NodeId,
    /// Set once a handler stops propagation.
    propagation_stopped: bool,
}

impl DragEndEvent {
    /// A fresh event for `target`.
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            propagation_stopped: false,
        }
    }

    /// Keep the event from reaching enclosing components.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// True once propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Lifecycle wrapper around one grid container and its engine instance.
#[derive(Debug)]
pub struct GridComponent {
    /// Registry handle.
    handle: ComponentHandle,
    /// The grid this component renders into.
    grid: NodeId,
    /// Host arguments.
    args: ComponentArgs,
    /// Events with a live subscription.
    subscribed: Vec<GridEvent>,
    /// Whether an engine instance exists.
    initialized: bool,
}

impl GridComponent {
    /// A component for `grid` that has not been mounted yet.
    pub fn new(grid: NodeId, args: ComponentArgs) -> Self {
        Self {
            handle: ComponentHandle::next(),
            grid,
            args,
            subscribed: Vec::new(),
            initialized: false,
        }
    }

    /// Registry handle.
    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    /// Grid container.
    pub fn grid(&self) -> NodeId {
        self.grid
    }

    /// Current engine options.
    pub fn options(&self) -> &GridOptions {
        &self.args.options
    }

    /// Events currently subscribed, in subscription order.
    pub fn subscribed(&self) -> &[GridEvent] {
        &self.subscribed
    }

    /// True while an engine instance exists.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The grid has been inserted into the tree: build the engine instance.
    pub fn did_insert(&mut self, tree: &mut Tree, engine: &mut dyn GridEngine) -> Result<()> {
        self.create(tree, engine)
    }

    /// Options changed: tear the instance down and build a new one.
    pub fn update_options(
        &mut self,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
        options: GridOptions,
    ) -> Result<()> {
        self.args.options = options;
        self.teardown(tree, engine);
        self.create(tree, engine)
    }

    /// The component is going away: unsubscribe and destroy the engine
    /// instance, leaving the grid's nodes for the host to remove.
    pub fn will_destroy(&mut self, tree: &mut Tree, engine: &mut dyn GridEngine) {
        self.teardown(tree, engine);
    }

    /// A drag ended inside this grid.
    ///
    /// Stops propagation, so enclosing components do not reconcile the same
    /// drag again, then reconciles around the closest widget to the target.
    pub fn dragend(
        &self,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
        event: &mut DragEndEvent,
    ) -> Result<ReconcileReport> {
        event.stop_propagation();
        self.ensure_mounted()?;
        let report = Reconciler::new(self.args.reconcile).dragend(tree, engine, event.target)?;
        debug!(handle = %self.handle, skipped = report.skipped, "component_dragend");
        Ok(report)
    }

    /// Adopt an existing widget node into this grid.
    pub fn add_widget(
        &self,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
        widget: NodeId,
    ) -> Result<()> {
        self.ensure_mounted()?;
        engine.make_widget(tree, self.grid, widget, None)?;
        Ok(())
    }

    /// Remove widgets from engine management.
    ///
    /// Unlike the engine's own removal this does not require the widgets to
    /// still be children of this grid. A widget whose engine handle was
    /// already cleared is found by scanning the engine's nodes; one the
    /// engine does not know at all is skipped. With `trigger_event`, one
    /// `removed` and one `change` notification cover the whole batch.
    /// Returns the number of widgets removed.
    pub fn remove_widget(
        &self,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
        widgets: &[NodeId],
        remove_dom: bool,
        trigger_event: bool,
    ) -> Result<usize> {
        self.ensure_mounted()?;
        let mut removed = 0;
        for &widget in widgets {
            let handle = tree
                .widget(widget)
                .and_then(|d| d.engine_handle)
                .or_else(|| engine.node_for_element(self.grid, widget));
            let Some(handle) = handle else {
                trace!(?widget, "remove_widget_unknown");
                continue;
            };
            if let Some(data) = tree.widget_mut(widget) {
                data.engine_handle = None;
            }
            engine.release_drag_drop(tree, widget);
            engine.remove_node(tree, self.grid, handle, remove_dom, trigger_event);
            if remove_dom && tree.parent(widget).is_some() {
                tree.detach(widget);
            }
            removed += 1;
        }
        if trigger_event {
            engine.trigger_remove_event(tree, self.grid);
            engine.trigger_change_event(tree, self.grid);
        }
        Ok(removed)
    }

    /// Fail unless an engine instance exists.
    fn ensure_mounted(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotMounted(self.handle))
        }
    }

    /// Build the engine instance and subscribe the host's actions.
    fn create(&mut self, tree: &mut Tree, engine: &mut dyn GridEngine) -> Result<()> {
        engine.init(tree, self.grid, &self.args.options)?;
        self.initialized = true;
        for event in GridEvent::ALL {
            if let Some(action) = self.args.actions.get(&event) {
                engine.on(tree, self.grid, event, action.clone())?;
                self.subscribed.push(event);
            }
        }
        debug!(handle = %self.handle, events = self.subscribed.len(), "component_created");
        Ok(())
    }

    /// Unsubscribe, destroy the instance without removing nodes, and strip
    /// the instance classes the engine leaves behind.
    fn teardown(&mut self, tree: &mut Tree, engine: &mut dyn GridEngine) {
        if !self.initialized {
            return;
        }
        for event in self.subscribed.drain(..) {
            engine.off(tree, self.grid, event);
        }
        engine.destroy(tree, self.grid, false);
        self.initialized = false;
        if let Some(re) = INSTANCE_CLASS.as_ref()
            && let Some(data) = tree.grid_mut(self.grid)
        {
            data.classes.retain(|c| !re.is_match(c));
        }
        debug!(handle = %self.handle, "component_torn_down");
    }
}
