//! Stable identity captured before a move.

use std::iter;

use gridnest_ids::{StableId, TransientId};
use gridnest_tree::{NodeId, Tree};
use tracing::trace;

/// One widget's identity at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// The widget node at capture time.
    pub widget: NodeId,
    /// Transient id of the widget when captured.
    pub transient_id: TransientId,
    /// Its stable id, if it had one.
    pub stable_id: Option<StableId>,
}

/// Identities of a widget subtree, in document order with the root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityLedger {
    /// Captured records.
    records: Vec<IdentityRecord>,
}

impl IdentityLedger {
    /// Records in capture order.
    pub fn records(&self) -> &[IdentityRecord] {
        &self.records
    }

    /// Number of captured widgets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record captured for a transient id.
    pub fn record_for(&self, transient: TransientId) -> Option<&IdentityRecord> {
        self.records.iter().find(|r| r.transient_id == transient)
    }

    /// Stable id recorded for a transient id.
    pub fn stable_for(&self, transient: TransientId) -> Option<&StableId> {
        self.record_for(transient).and_then(|r| r.stable_id.as_ref())
    }

    /// Stable id recorded at position `index` of the document-order walk.
    pub fn stable_at(&self, index: usize) -> Option<&StableId> {
        self.records.get(index).and_then(|r| r.stable_id.as_ref())
    }
}

/// Capture the identity of `root` and every widget below it.
///
/// Stale ids produce an empty ledger.
pub fn capture_identities(tree: &Tree, root: NodeId) -> IdentityLedger {
    let records = iter::once(root)
        .chain(tree.widgets_in(root))
        .filter_map(|w| {
            let node = tree.get(w)?;
            trace!(widget = ?w, transient = %node.transient_id, "identity_captured");
            Some(IdentityRecord {
                widget: w,
                transient_id: node.transient_id,
                stable_id: node.stable_id.clone(),
            })
        })
        .collect();
    IdentityLedger { records }
}
