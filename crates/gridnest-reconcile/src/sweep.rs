//! Final identifier pass over a moved subtree.

use std::iter;

use gridnest_ids::StableId;
use gridnest_tree::{NodeId, Tree};
use tracing::trace;

use crate::IdentityLedger;

/// Assign stable ids to `root` and every widget below it, and rewrite each
/// widget's element id from its engine id.
///
/// Widgets that kept their node through the move take the identity the
/// ledger recorded for them. Rebuilt widgets take, in document order, the
/// identities of the widgets they replaced: the ledger entries whose node no
/// longer exists. A leaf that could not be put back therefore never shifts
/// identities onto its neighbours. Rebuilt widgets past the end of those
/// entries lose their stable id. Returns the number of widgets visited.
pub fn sweep_identifiers(tree: &mut Tree, root: NodeId, ledger: &IdentityLedger) -> usize {
    let widgets: Vec<NodeId> = iter::once(root).chain(tree.widgets_in(root)).collect();
    let replaced: Vec<Option<StableId>> = ledger
        .records()
        .iter()
        .filter(|r| !tree.contains(r.widget))
        .map(|r| r.stable_id.clone())
        .collect();
    let mut replaced = replaced.into_iter();
    for widget in &widgets {
        let kept = tree
            .transient_id(*widget)
            .and_then(|t| ledger.record_for(t))
            .filter(|r| r.widget == *widget);
        let stable = match kept {
            Some(rec) => rec.stable_id.clone(),
            None => replaced.next().flatten(),
        };
        trace!(?widget, ?stable, "identifier_swept");
        tree.set_stable_id(*widget, stable);
        if let Some(data) = tree.widget_mut(*widget) {
            data.element_id = data.layout.id.clone();
        }
    }
    widgets.len()
}
