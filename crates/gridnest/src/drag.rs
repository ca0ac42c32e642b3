use std::{collections::BTreeMap, fmt::Write};

use config::Layout;
use gridnest_component::{
    ComponentArgs, ComponentHandle, ComponentRegistry, DragEndEvent, GridComponent,
};
use gridnest_ids::StableId;
use gridnest_reconcile::ReconcileReport;
use gridnest_tree::{
    GridEngine, NodeId, SimEngine, Tree, WidgetConfig, WidgetUpdate, mount_layout, render_tree,
};
use thiserror::Error;
use tracing::debug;

/// Which widget to drag, and where to drop it.
#[derive(Debug, Clone)]
pub struct DragRequest {
    /// Stable id of the dragged widget.
    pub widget: StableId,
    /// Drop column; unchanged when `None`.
    pub x: Option<u32>,
    /// Drop row; unchanged when `None`.
    pub y: Option<u32>,
}

/// Everything a simulated drag produced.
#[derive(Debug)]
pub struct DragOutcome {
    /// The dragged widget.
    pub widget: StableId,
    /// Rendered tree before the drag.
    pub before: String,
    /// Rendered tree after reconciliation.
    pub after: String,
    /// Reconciliation summary.
    pub report: ReconcileReport,
    /// Engine-saved layout of every root grid afterwards.
    pub saved: Vec<Vec<WidgetConfig>>,
}

impl DragOutcome {
    /// Human-readable report.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "before:\n{}", self.before);
        let _ = writeln!(out, "after:\n{}", self.after);
        let r = &self.report;
        if r.skipped {
            let _ = writeln!(
                out,
                "{}: no nested grid, nothing to reconcile",
                self.widget
            );
        } else {
            let _ = writeln!(
                out,
                "{}: {} grids reattached, {}/{} leaves restored, {} truncated",
                self.widget, r.grids_reattached, r.restored, r.orphans, r.truncated
            );
        }
        out
    }
}

/// Failures of a simulated drag.
#[derive(Debug, Error)]
pub enum DragError {
    /// Mounting the layout failed.
    #[error(transparent)]
    Tree(#[from] gridnest_tree::Error),

    /// A component refused the operation.
    #[error(transparent)]
    Component(#[from] gridnest_component::Error),

    /// No widget has the requested stable id.
    #[error("no widget with stable id '{0}'")]
    UnknownWidget(StableId),

    /// No component manages a grid above the widget.
    #[error("no component manages widget '{0}'")]
    Unmanaged(StableId),
}

/// Mount `layout` with one component per root grid, move the requested
/// widget and deliver the drag-end to the component that owns it.
pub fn run(layout: &Layout, req: &DragRequest) -> Result<DragOutcome, DragError> {
    let mut tree = Tree::new();
    let mut engine = SimEngine::new();
    let roots = mount_layout(&mut tree, &mut engine, layout)?;
    let mut registry = ComponentRegistry::new();
    for root in &roots {
        let args = ComponentArgs {
            options: layout.options.clone(),
            actions: BTreeMap::new(),
            reconcile: layout.reconcile,
        };
        registry.mount(GridComponent::new(*root, args), &mut tree, &mut engine)?;
    }
    let render_all =
        |tree: &Tree| -> String { roots.iter().map(|r| render_tree(tree, *r)).collect() };
    let before = render_all(&tree);

    let widget = find_widget(&tree, &roots, &req.widget)
        .ok_or_else(|| DragError::UnknownWidget(req.widget.clone()))?;
    engine.update(
        &mut tree,
        widget,
        &WidgetUpdate {
            x: req.x,
            y: req.y,
            ..WidgetUpdate::default()
        },
    )?;
    let component = owning_component(&tree, &registry, widget)
        .and_then(|h| registry.get(h))
        .ok_or_else(|| DragError::Unmanaged(req.widget.clone()))?;
    debug!(widget = %req.widget, handle = %component.handle(), "drag_simulated");
    let mut event = DragEndEvent::new(widget);
    let report = component.dragend(&mut tree, &mut engine, &mut event)?;

    Ok(DragOutcome {
        widget: req.widget.clone(),
        before,
        after: render_all(&tree),
        report,
        saved: roots.iter().map(|r| engine.save(&tree, *r)).collect(),
    })
}

/// Find a widget by stable id below any of `roots`.
fn find_widget(tree: &Tree, roots: &[NodeId], id: &StableId) -> Option<NodeId> {
    roots
        .iter()
        .flat_map(|r| tree.widgets_in(*r))
        .find(|w| tree.stable_id(*w) == Some(id))
}

/// Component of the closest grid above `node` that has one.
fn owning_component(
    tree: &Tree,
    registry: &ComponentRegistry,
    node: NodeId,
) -> Option<ComponentHandle> {
    let mut cur = tree.parent(node);
    while let Some(n) = cur {
        if tree.is_grid(n)
            && let Some(handle) = registry.find_by_grid(n)
        {
            return Some(handle);
        }
        cur = tree.parent(n);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"(
        reconcile: (match_strategy: tagged),
        grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), w: 3, sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
                (id: Some("b"), stable_id: Some("b"), x: 1),
            ]))),
            (id: Some("w2"), stable_id: Some("w2"), x: 3),
        ])],
    )"#;

    fn request(widget: &str, x: u32) -> DragRequest {
        DragRequest {
            widget: StableId::new(widget),
            x: Some(x),
            y: None,
        }
    }

    #[test]
    fn drag_reports_reconciliation() {
        let layout = Layout::from_ron(LAYOUT).unwrap();
        let out = run(&layout, &request("w1", 5)).unwrap();
        assert!(!out.report.skipped);
        assert_eq!(out.report.restored, 2);
        assert!(out.after.contains("grid #g1"));
        assert!(out.after.contains("sub=w1"));
        let moved = out.saved[0]
            .iter()
            .find(|c| c.layout.id.as_deref() == Some("w1"))
            .unwrap();
        assert_eq!(moved.layout.x, 5);
        assert_eq!(moved.sub_grid.as_ref().map(Vec::len), Some(2));
        assert!(out.summary().contains("1 grids reattached, 2/2 leaves restored"));
    }

    #[test]
    fn leaf_drag_skips_reconciliation() {
        let layout = Layout::from_ron(LAYOUT).unwrap();
        let out = run(&layout, &request("w2", 0)).unwrap();
        assert!(out.report.skipped);
        assert!(out.summary().contains("nothing to reconcile"));
    }

    #[test]
    fn unknown_widget_is_an_error() {
        let layout = Layout::from_ron(LAYOUT).unwrap();
        let err = run(&layout, &request("nope", 0)).unwrap_err();
        assert_eq!(err.to_string(), "no widget with stable id 'nope'");
    }
}
