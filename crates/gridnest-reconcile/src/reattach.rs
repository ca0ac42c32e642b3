//! Restoring grid identity, parent links and handlers in a rebuilt subtree.

use config::MatchStrategy;
use gridnest_tree::{NodeId, Tree};
use tracing::{trace, warn};

use crate::SavedWidget;

/// Counters from a [`reattach`] walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReattachStats {
    /// Grids whose bookkeeping was restored.
    pub grids: usize,
    /// Saved or live grid-bearing widgets left without a partner.
    pub truncated: usize,
}

impl ReattachStats {
    /// Fold another walk's counters into this one.
    fn absorb(&mut self, other: Self) {
        self.grids += other.grids;
        self.truncated += other.truncated;
    }
}

/// Restore `grid`, the live grid nested in the rebuilt counterpart of
/// `saved`, and recurse into every nested grid below it.
///
/// The grid gets its saved stable id, a link to the owning widget's stable
/// id and its saved handler table. Grid-bearing children are paired
/// according to `strategy`; extras on either side are skipped.
pub fn reattach(
    tree: &mut Tree,
    saved: &SavedWidget,
    grid: NodeId,
    strategy: MatchStrategy,
) -> ReattachStats {
    let mut stats = ReattachStats::default();
    let Some(saved_grid) = &saved.sub_grid else {
        return stats;
    };
    tree.set_stable_id(grid, saved_grid.stable_id.clone());
    let Some(data) = tree.grid_mut(grid) else {
        return stats;
    };
    data.sub_grid_id = saved.stable_id.clone();
    data.handlers = saved_grid.handlers.clone();
    stats.grids += 1;
    trace!(?grid, stable = ?saved_grid.stable_id, "grid_reattached");

    let expected: Vec<&SavedWidget> = saved_grid
        .children
        .iter()
        .filter(|c| c.sub_grid.is_some())
        .collect();
    let live = tree.grid_bearing_children(grid);
    let pairs = pair(tree, &expected, &live, strategy);
    let unmatched = expected.len() + live.len() - 2 * pairs.len();
    if unmatched > 0 {
        warn!(
            ?grid,
            saved = expected.len(),
            live = live.len(),
            "reattach_truncated"
        );
        stats.truncated += unmatched;
    }
    for (child_saved, widget) in pairs {
        if let Some(child_grid) = tree.child_grid(widget) {
            stats.absorb(reattach(tree, child_saved, child_grid, strategy));
        }
    }
    stats
}

/// Pair saved grid-bearing widgets with live ones.
fn pair<'a>(
    tree: &Tree,
    expected: &[&'a SavedWidget],
    live: &[NodeId],
    strategy: MatchStrategy,
) -> Vec<(&'a SavedWidget, NodeId)> {
    match strategy {
        MatchStrategy::Positional => expected.iter().copied().zip(live.iter().copied()).collect(),
        MatchStrategy::Tagged => {
            let mut used = vec![false; expected.len()];
            let mut out = Vec::new();
            let mut untagged = Vec::new();
            for &widget in live {
                let tag = tree.widget(widget).and_then(|d| d.layout.id.as_deref());
                let hit = tag.and_then(|t| {
                    expected
                        .iter()
                        .enumerate()
                        .position(|(i, s)| !used[i] && s.config.layout.id.as_deref() == Some(t))
                });
                match hit {
                    Some(i) => {
                        used[i] = true;
                        out.push((expected[i], widget));
                    }
                    None => untagged.push(widget),
                }
            }
            let rest = expected
                .iter()
                .zip(&used)
                .filter(|(_, u)| !**u)
                .map(|(s, _)| *s);
            out.extend(rest.zip(untagged));
            out
        }
    }
}
