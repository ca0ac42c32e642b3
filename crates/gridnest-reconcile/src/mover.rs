//! Relocating a widget through the engine's managed remove and re-add.

use gridnest_ids::StableId;
use gridnest_tree::{GridEngine, HandlerTable, NodeId, Tree, WidgetConfig};
use tracing::{debug, warn};

use crate::{Error, IdentityLedger, Result};

/// Everything needed to restore a nested grid after its widget is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGrid {
    /// Stable id of the grid.
    pub stable_id: Option<StableId>,
    /// Handlers that were subscribed on it.
    pub handlers: HandlerTable,
    /// Its widgets, in visual order.
    pub children: Vec<SavedWidget>,
}

/// A widget's engine configuration plus the bookkeeping the engine drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedWidget {
    /// Stable id of the widget before the move.
    pub stable_id: Option<StableId>,
    /// Engine configuration, nested grids included.
    pub config: WidgetConfig,
    /// Saved state of the widget's nested grid.
    pub sub_grid: Option<SavedGrid>,
}

impl SavedWidget {
    /// Build the saved record of a live widget from its engine configuration.
    ///
    /// Tree children and configuration entries are paired in order, which
    /// holds for any configuration the engine saved from this tree.
    pub fn capture(tree: &Tree, widget: NodeId, config: &WidgetConfig) -> Self {
        let sub_grid = tree.child_grid(widget).map(|grid| {
            let configs = config.sub_grid.as_deref().unwrap_or_default();
            SavedGrid {
                stable_id: tree.stable_id(grid).cloned(),
                handlers: tree
                    .grid(grid)
                    .map(|g| g.handlers.clone())
                    .unwrap_or_default(),
                children: tree
                    .children(grid)
                    .iter()
                    .zip(configs)
                    .map(|(w, c)| Self::capture(tree, *w, c))
                    .collect(),
            }
        });
        Self {
            stable_id: tree.stable_id(widget).cloned(),
            config: config.clone(),
            sub_grid,
        }
    }
}

/// Result of [`move_widget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedWidget {
    /// The freshly built widget.
    pub widget: NodeId,
    /// What was saved from the widget it replaced.
    pub saved: SavedWidget,
}

/// Remove `widget` from `parent_grid` and add it back from its saved
/// configuration.
///
/// The rebuilt widget receives the stable id the ledger recorded for the
/// original, and its nested grid is linked back to it. Deeper grids are left
/// for [`reattach`](crate::reattach). The engine instances of grids in the
/// superseded subtree are destroyed and the subtree is disposed.
pub fn move_widget(
    tree: &mut Tree,
    engine: &mut dyn GridEngine,
    ledger: &IdentityLedger,
    widget: NodeId,
    parent_grid: NodeId,
) -> Result<MovedWidget> {
    let old_transient = tree.node(widget)?.transient_id;
    let slot = tree
        .children(parent_grid)
        .iter()
        .position(|c| *c == widget)
        .ok_or(Error::NotOwnedBy {
            widget,
            grid: parent_grid,
        })?;
    let configs = engine.save(tree, parent_grid);
    let config = configs.get(slot).ok_or(Error::MissingConfig(widget))?;
    let saved = SavedWidget::capture(tree, widget, config);

    engine.remove_widget(tree, parent_grid, widget, true, true);
    if tree.parent(widget).is_some() {
        warn!(?widget, "moved_widget_without_engine_binding");
        tree.detach(widget);
    }
    let fresh = engine.add_widget(tree, parent_grid, &saved.config)?;

    let stable = ledger.stable_for(old_transient).cloned();
    tree.set_stable_id(fresh, stable.clone());
    if let Some(grid) = tree.child_grid(fresh)
        && let Some(data) = tree.grid_mut(grid)
    {
        data.sub_grid_id = stable;
    }
    let stale: Vec<NodeId> = tree
        .descendants(widget)
        .into_iter()
        .filter(|n| tree.is_grid(*n))
        .collect();
    for grid in stale {
        engine.destroy(tree, grid, false);
    }
    tree.dispose(widget);
    debug!(old = ?widget, new = ?fresh, "widget_moved");
    Ok(MovedWidget {
        widget: fresh,
        saved,
    })
}
