//! Plain-text dump of a subtree, one node per line.

use std::fmt::Write;

use crate::{NodeId, NodeKind, Tree};

/// Render the subtree rooted at `root` as an indented outline.
///
/// Each line shows the node kind, its stable id (`#id`, or `#-` when unset)
/// and transient id. Widgets add their engine id and geometry; grids add the
/// widget they are nested under and the events they subscribe.
pub fn render_tree(tree: &Tree, root: NodeId) -> String {
    let mut out = String::new();
    render_node(tree, root, 0, &mut out);
    out
}

/// Append one node and its subtree.
fn render_node(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let stable = node.stable_id.as_ref().map_or("-", |s| s.as_str());
    let indent = "  ".repeat(depth);
    match &node.kind {
        NodeKind::Widget(w) => {
            let l = &w.layout;
            let _ = write!(
                out,
                "{indent}widget #{stable} {} ({},{} {}x{}) [{}]",
                l.id.as_deref().unwrap_or("-"),
                l.x,
                l.y,
                l.w,
                l.h,
                node.transient_id
            );
        }
        NodeKind::Grid(g) => {
            let _ = write!(out, "{indent}grid #{stable} [{}]", node.transient_id);
            if let Some(sub) = &g.sub_grid_id {
                let _ = write!(out, " sub={sub}");
            }
            if !g.handlers.is_empty() {
                let names: Vec<&str> = g.handlers.keys().map(|e| e.as_str()).collect();
                let _ = write!(out, " on={}", names.join(","));
            }
        }
    }
    out.push('\n');
    for child in &node.children {
        render_node(tree, *child, depth + 1, out);
    }
}
