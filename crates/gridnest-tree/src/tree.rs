//! Arena of widgets and grid containers.

use std::iter;

use gridnest_ids::{StableId, TransientId};
use slotmap::SlotMap;
use tracing::trace;

use crate::{Error, GridData, Node, NodeId, NodeKind, Result, WidgetData, WidgetLayout};

/// Owned, addressable tree of nested grids.
///
/// Nodes live in a slot map and reference each other by [`NodeId`]. A node is
/// *attached* when following its parents ends at one of the mounted roots;
/// detached nodes stay addressable until [`Tree::dispose`] frees them.
#[derive(Debug, Default)]
pub struct Tree {
    /// Node storage.
    nodes: SlotMap<NodeId, Node>,
    /// Mounted top-level grids, in mount order.
    roots: Vec<NodeId>,
    /// Source of transient ids.
    next_transient: u64,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next transient id.
    fn transient(&mut self) -> TransientId {
        self.next_transient += 1;
        TransientId::new(self.next_transient)
    }

    /// Insert a detached node of the given kind.
    fn create(&mut self, kind: NodeKind) -> NodeId {
        let transient_id = self.transient();
        let id = self.nodes.insert(Node {
            transient_id,
            stable_id: None,
            parent: None,
            children: Vec::new(),
            kind,
        });
        trace!(?id, %transient_id, "node_created");
        id
    }

    /// Create a detached, empty grid container.
    pub fn create_grid(&mut self) -> NodeId {
        self.create(NodeKind::Grid(GridData::default()))
    }

    /// Create a detached widget with the given layout.
    pub fn create_widget(&mut self, layout: WidgetLayout) -> NodeId {
        self.create(NodeKind::Widget(WidgetData {
            layout,
            ..WidgetData::default()
        }))
    }

    /// Mount a detached grid as a top-level root.
    pub fn mount_root(&mut self, grid: NodeId) -> Result<()> {
        let node = self.node(grid)?;
        if !node.is_grid() {
            return Err(Error::NotAGrid(grid));
        }
        if node.parent.is_some() {
            self.detach(grid);
        }
        if !self.roots.contains(&grid) {
            self.roots.push(grid);
        }
        Ok(())
    }

    /// Remove a grid from the mounted roots. The subtree stays in the arena.
    pub fn unmount_root(&mut self, grid: NodeId) {
        self.roots.retain(|r| *r != grid);
    }

    /// Mounted roots.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node, failing on stale ids.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::UnknownNode(id))
    }

    /// Mutable lookup, failing on stale ids.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::UnknownNode(id))
    }

    /// Widget data of `id`, if it is a live widget.
    pub fn widget(&self, id: NodeId) -> Option<&WidgetData> {
        self.nodes.get(id).and_then(Node::as_widget)
    }

    /// Mutable widget data of `id`, if it is a live widget.
    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut WidgetData> {
        self.nodes.get_mut(id).and_then(Node::as_widget_mut)
    }

    /// Grid data of `id`, if it is a live grid.
    pub fn grid(&self, id: NodeId) -> Option<&GridData> {
        self.nodes.get(id).and_then(Node::as_grid)
    }

    /// Mutable grid data of `id`, if it is a live grid.
    pub fn grid_mut(&mut self, id: NodeId) -> Option<&mut GridData> {
        self.nodes.get_mut(id).and_then(Node::as_grid_mut)
    }

    /// True when `id` is a live widget.
    pub fn is_widget(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_widget)
    }

    /// True when `id` is a live grid.
    pub fn is_grid(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_grid)
    }

    /// Transient id of a live node.
    pub fn transient_id(&self, id: NodeId) -> Option<TransientId> {
        self.nodes.get(id).map(|n| n.transient_id)
    }

    /// Stable id of a live node.
    pub fn stable_id(&self, id: NodeId) -> Option<&StableId> {
        self.nodes.get(id).and_then(|n| n.stable_id.as_ref())
    }

    /// Overwrite the stable id of a live node. No-op for stale ids.
    pub fn set_stable_id(&mut self, id: NodeId, stable: Option<StableId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.stable_id = stable;
        }
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Ordered children; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// True when `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// True when the node hangs below a mounted root (or is one).
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if !self.nodes.contains_key(cur) {
                return false;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return self.roots.contains(&cur),
            }
        }
    }

    /// Attach `child` under `parent` at `at` (appending when `None` or past the
    /// end). The child is detached from any previous parent first. Returns the
    /// slot the child landed in.
    ///
    /// Grids own widgets; widgets own at most one grid.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        at: Option<usize>,
    ) -> Result<usize> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        match (&parent_node.kind, &child_node.kind) {
            (NodeKind::Grid(_), NodeKind::Widget(_)) => {}
            (NodeKind::Grid(_), NodeKind::Grid(_)) => return Err(Error::NotAWidget(child)),
            (NodeKind::Widget(_), NodeKind::Grid(_)) => {
                if let Some(existing) = parent_node.children.first().copied()
                    && existing != child
                {
                    return Err(Error::GridAlreadyNested {
                        widget: parent,
                        existing,
                    });
                }
            }
            (NodeKind::Widget(_), NodeKind::Widget(_)) => return Err(Error::NotAGrid(child)),
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::Cycle { child, parent });
        }
        self.detach(child);
        self.roots.retain(|r| *r != child);

        let siblings = &mut self.nodes[parent].children;
        let slot = at.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(slot, child);
        self.nodes[child].parent = Some(parent);
        Ok(slot)
    }

    /// Detach a node from its parent, returning the parent and the slot it
    /// occupied. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let siblings = &mut self.nodes[parent].children;
        let slot = siblings.iter().position(|c| *c == id)?;
        siblings.remove(slot);
        self.nodes[id].parent = None;
        Some((parent, slot))
    }

    /// Detach and free a node and its whole subtree.
    pub fn dispose(&mut self, id: NodeId) {
        if !self.nodes.contains_key(id) {
            return;
        }
        self.detach(id);
        self.roots.retain(|r| *r != id);
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(n) {
                stack.extend(node.children);
            }
        }
    }

    /// Pre-order walk of every node below `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Every widget below `id` in document order, excluding `id` itself.
    pub fn widgets_in(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.is_widget(*n))
            .collect()
    }

    /// The grid nested directly inside a widget.
    pub fn child_grid(&self, widget: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(widget)?;
        if !node.is_widget() {
            return None;
        }
        node.children.iter().copied().find(|c| self.is_grid(*c))
    }

    /// True when a widget hosts a nested grid.
    pub fn hosts_grid(&self, widget: NodeId) -> bool {
        self.child_grid(widget).is_some()
    }

    /// Direct child widgets of a grid that host a nested grid, in order.
    pub fn grid_bearing_children(&self, grid: NodeId) -> Vec<NodeId> {
        self.children(grid)
            .iter()
            .copied()
            .filter(|c| self.hosts_grid(*c))
            .collect()
    }

    /// Nearest widget at or above `id`.
    pub fn closest_widget(&self, id: NodeId) -> Option<NodeId> {
        self.closest(id, Node::is_widget)
    }

    /// Nearest grid at or above `id`.
    pub fn closest_grid(&self, id: NodeId) -> Option<NodeId> {
        self.closest(id, Node::is_grid)
    }

    /// Nearest node at or above `id` satisfying `pred`.
    fn closest(&self, id: NodeId, pred: fn(&Node) -> bool) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.nodes.get(n)?;
            if pred(node) {
                return Some(n);
            }
            cur = node.parent;
        }
        None
    }

    /// Find an attached grid by stable id, searching roots in document order.
    pub fn find_grid(&self, stable: &StableId) -> Option<NodeId> {
        self.roots.iter().find_map(|root| {
            iter::once(*root)
                .chain(self.descendants(*root))
                .find(|n| self.is_grid(*n) && self.stable_id(*n) == Some(stable))
        })
    }
}
