//! Drag-end orchestration.

use config::ReconcileCfg;
use gridnest_tree::{GridEngine, NodeId, Tree};
use tracing::debug;

use crate::{
    Error, ReattachStats, Result, capture_identities, clear_grid_tags, extract_orphans,
    move_widget, reattach, reinsert_orphans, sweep_identifiers, tag_anonymous_grids,
};

/// Summary of one drag-end reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// True when the dragged widget hosts no nested grid and nothing ran.
    pub skipped: bool,
    /// The rebuilt widget.
    pub widget: Option<NodeId>,
    /// Widgets captured in the identity ledger.
    pub identities: usize,
    /// Leaf widgets set aside during the move.
    pub orphans: usize,
    /// Leaf widgets put back.
    pub restored: usize,
    /// Leaf widgets that could not be put back.
    pub unplaced: Vec<NodeId>,
    /// Nested grids whose bookkeeping was restored.
    pub grids_reattached: usize,
    /// Grid-bearing widgets skipped by pairing.
    pub truncated: usize,
}

/// Runs the reconciliation sequence for drag-end signals.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    /// Settings.
    cfg: ReconcileCfg,
}

impl Reconciler {
    /// Create a reconciler with the given settings.
    pub fn new(cfg: ReconcileCfg) -> Self {
        Self { cfg }
    }

    /// Active settings.
    pub fn cfg(&self) -> &ReconcileCfg {
        &self.cfg
    }

    /// Reconcile after a drag ends on `target`.
    ///
    /// The dragged widget is the closest widget at or above `target`. When it
    /// hosts no nested grid, nothing happens. Otherwise identities are
    /// captured, leaf widgets set aside, the widget moved through the engine,
    /// nested grids reattached, leaves put back and identifiers swept, in that
    /// order. Errors are only returned before the first mutation.
    pub fn dragend(
        &self,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
        target: NodeId,
    ) -> Result<ReconcileReport> {
        tree.node(target)?;
        let skipped = ReconcileReport {
            skipped: true,
            ..ReconcileReport::default()
        };
        let Some(widget) = tree.closest_widget(target) else {
            debug!(?target, "dragend_outside_widget");
            return Ok(skipped);
        };
        let Some(nested) = tree.child_grid(widget) else {
            debug!(?widget, "dragend_without_nested_grid");
            return Ok(skipped);
        };
        let parent = tree
            .parent(widget)
            .filter(|p| tree.is_grid(*p))
            .ok_or(Error::NoOwningGrid(widget))?;
        if !engine.is_initialized(parent) {
            return Err(gridnest_tree::Error::NotInitialized(parent).into());
        }

        let tags = tag_anonymous_grids(tree, widget);
        let ledger = capture_identities(tree, widget);
        debug!(?widget, identities = ledger.len(), "identities_captured");
        let orphans = extract_orphans(tree, engine, nested);
        let moved = move_widget(tree, engine, &ledger, widget, parent)?;
        let stats = tree
            .child_grid(moved.widget)
            .map(|g| reattach(tree, &moved.saved, g, self.cfg.match_strategy))
            .unwrap_or_default();
        debug!(grids = stats.grids, truncated = stats.truncated, "grids_reattached");
        let outcome = reinsert_orphans(tree, engine, &orphans);
        clear_grid_tags(tree, &tags);
        let swept = sweep_identifiers(tree, moved.widget, &ledger);
        debug!(widget = ?moved.widget, swept, "reconciled");

        let ReattachStats { grids, truncated } = stats;
        Ok(ReconcileReport {
            skipped: false,
            widget: Some(moved.widget),
            identities: ledger.len(),
            orphans: orphans.len(),
            restored: outcome.restored,
            unplaced: outcome.unplaced,
            grids_reattached: grids,
            truncated,
        })
    }
}
