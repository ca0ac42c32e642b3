//! Leaf widgets set aside while their ancestor moves, and put back afterwards.

use gridnest_ids::StableId;
use gridnest_tree::{GridEngine, NodeId, Tree};
use tracing::{debug, warn};

/// A leaf widget removed from its grid for the duration of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanRecord {
    /// The detached widget.
    pub widget: NodeId,
    /// Stable id of the grid it came from.
    pub owner: Option<StableId>,
    /// Slot it occupied when it was removed.
    pub slot: usize,
}

/// Outcome of [`reinsert_orphans`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReinsertOutcome {
    /// Orphans placed back into their grid.
    pub restored: usize,
    /// Orphans whose grid could not be resolved; they stay detached.
    pub unplaced: Vec<NodeId>,
}

/// Remove every leaf widget below `grid` through the engine, in document
/// order. Widgets hosting a nested grid stay in place.
pub fn extract_orphans(
    tree: &mut Tree,
    engine: &mut dyn GridEngine,
    grid: NodeId,
) -> Vec<OrphanRecord> {
    let leaves: Vec<NodeId> = tree
        .widgets_in(grid)
        .into_iter()
        .filter(|w| !tree.hosts_grid(*w))
        .collect();
    let mut out = Vec::with_capacity(leaves.len());
    for widget in leaves {
        let Some(owner) = tree.parent(widget) else {
            continue;
        };
        let Some(slot) = tree.index_in_parent(widget) else {
            continue;
        };
        engine.remove_widget(tree, owner, widget, true, true);
        if tree.parent(widget).is_some() {
            warn!(?widget, "orphan_without_engine_binding");
            tree.detach(widget);
        }
        out.push(OrphanRecord {
            widget,
            owner: tree.stable_id(owner).cloned(),
            slot,
        });
    }
    debug!(count = out.len(), "orphans_extracted");
    out
}

/// Put orphans back in reverse extraction order, resolving each owning grid
/// by stable id among the attached grids.
pub fn reinsert_orphans(
    tree: &mut Tree,
    engine: &mut dyn GridEngine,
    records: &[OrphanRecord],
) -> ReinsertOutcome {
    let mut outcome = ReinsertOutcome::default();
    for rec in records.iter().rev() {
        let Some(grid) = rec.owner.as_ref().and_then(|id| tree.find_grid(id)) else {
            warn!(widget = ?rec.widget, owner = ?rec.owner, "orphan_owner_unresolved");
            outcome.unplaced.push(rec.widget);
            continue;
        };
        match engine.make_widget(tree, grid, rec.widget, Some(rec.slot)) {
            Ok(()) => outcome.restored += 1,
            Err(e) => {
                warn!(widget = ?rec.widget, error = %e, "orphan_reinsert_failed");
                outcome.unplaced.push(rec.widget);
            }
        }
    }
    debug!(
        restored = outcome.restored,
        unplaced = outcome.unplaced.len(),
        "orphans_reinserted"
    );
    outcome
}
