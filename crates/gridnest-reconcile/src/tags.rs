//! Temporary identifiers for nested grids that have none.

use gridnest_ids::StableId;
use gridnest_tree::{NodeId, Tree};
use tracing::debug;

/// Prefix of the temporary stable ids given to anonymous grids.
pub const GRID_TAG_PREFIX: &str = "gridnest-anon-";

/// Give every grid below `root` that lacks a stable id a temporary one, so
/// leaves set aside from it can find its rebuilt counterpart. Returns the
/// tags handed out.
pub fn tag_anonymous_grids(tree: &mut Tree, root: NodeId) -> Vec<StableId> {
    let grids: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|n| tree.is_grid(*n) && tree.stable_id(*n).is_none())
        .collect();
    let mut tags = Vec::with_capacity(grids.len());
    for grid in grids {
        let Some(transient) = tree.transient_id(grid) else {
            continue;
        };
        let tag = StableId::new(format!("{GRID_TAG_PREFIX}{transient}"));
        tree.set_stable_id(grid, Some(tag.clone()));
        tags.push(tag);
    }
    if !tags.is_empty() {
        debug!(count = tags.len(), "anonymous_grids_tagged");
    }
    tags
}

/// Strip `tags` from whichever attached grids carry them.
pub fn clear_grid_tags(tree: &mut Tree, tags: &[StableId]) {
    for tag in tags {
        if let Some(grid) = tree.find_grid(tag) {
            tree.set_stable_id(grid, None);
        }
    }
}
