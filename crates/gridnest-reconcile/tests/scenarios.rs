use std::{cell::Cell, rc::Rc};

use config::{Layout, ReconcileCfg};
use gridnest_ids::StableId;
use gridnest_reconcile::Reconciler;
use gridnest_tree::{
    GridEngine, GridEvent, Handler, NodeId, SimEngine, Tree, WidgetUpdate, mount_layout,
};

struct Fixture {
    tree: Tree,
    engine: SimEngine,
    root: NodeId,
}

impl Fixture {
    fn new(src: &str) -> Self {
        let layout = Layout::from_ron(src).unwrap();
        let mut tree = Tree::new();
        let mut engine = SimEngine::new();
        let roots = mount_layout(&mut tree, &mut engine, &layout).unwrap();
        Self {
            tree,
            engine,
            root: roots[0],
        }
    }

    fn widget(&self, stable: &str) -> NodeId {
        let sid = StableId::new(stable);
        self.tree
            .widgets_in(self.root)
            .into_iter()
            .find(|w| self.tree.stable_id(*w) == Some(&sid))
            .unwrap()
    }

    fn grid(&self, stable: &str) -> NodeId {
        self.tree.find_grid(&StableId::new(stable)).unwrap()
    }

    fn stable_ids(&self, grid: NodeId) -> Vec<Option<String>> {
        self.tree
            .children(grid)
            .iter()
            .map(|c| self.tree.stable_id(*c).map(|s| s.as_str().to_string()))
            .collect()
    }

    fn drag(&mut self, stable: &str, x: u32) -> gridnest_reconcile::ReconcileReport {
        let w = self.widget(stable);
        self.engine
            .update(
                &mut self.tree,
                w,
                &WidgetUpdate {
                    x: Some(x),
                    ..WidgetUpdate::default()
                },
            )
            .unwrap();
        Reconciler::default()
            .dragend(&mut self.tree, &mut self.engine, w)
            .unwrap()
    }

    /// Every nested grid points back at the widget hosting it.
    fn assert_links(&self) {
        for w in self.tree.widgets_in(self.root) {
            if let Some(g) = self.tree.child_grid(w) {
                assert_eq!(
                    self.tree.grid(g).unwrap().sub_grid_id.as_ref(),
                    self.tree.stable_id(w),
                    "grid {:?} under widget {:?}",
                    self.tree.stable_id(g),
                    self.tree.stable_id(w)
                );
            }
        }
    }
}

fn s(id: &str) -> Option<String> {
    Some(id.to_string())
}

#[test]
fn flat_grid_drag_is_a_no_op() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1")),
            (id: Some("w2"), stable_id: Some("w2"), x: 1),
            (id: Some("w3"), stable_id: Some("w3"), x: 2),
        ])])"#,
    );
    let before = f.tree.children(f.root).to_vec();
    f.engine.clear_calls();
    let report = f.drag("w2", 5);
    assert!(report.skipped);
    assert_eq!(f.tree.children(f.root), before.as_slice());
    assert_eq!(f.stable_ids(f.root), vec![s("w1"), s("w2"), s("w3")]);
    assert!(!f.engine.calls_contains("remove_widget"));
    assert!(!f.engine.calls_contains("add_widget"));
}

#[test]
fn single_nested_grid_keeps_identity_and_leaves() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), w: 4, h: 3, sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
                (id: Some("b"), stable_id: Some("b"), x: 1),
            ]))),
        ])])"#,
    );
    let old_w1 = f.widget("w1");
    let old_g1 = f.grid("g1");
    let leaves = f.tree.children(old_g1).to_vec();
    let hits = Rc::new(Cell::new(0));
    let handler = {
        let hits = hits.clone();
        Handler::new(move |_| hits.set(hits.get() + 1))
    };
    f.engine
        .on(&mut f.tree, old_g1, GridEvent::Added, handler.clone())
        .unwrap();

    let report = f.drag("w1", 2);
    assert!(!report.skipped);
    assert_eq!(report.orphans, 2);
    assert_eq!(report.restored, 2);
    assert!(report.unplaced.is_empty());
    assert_eq!(report.grids_reattached, 1);

    let w1 = report.widget.unwrap();
    assert_ne!(w1, old_w1);
    assert!(!f.tree.contains(old_w1));
    assert!(!f.tree.contains(old_g1));
    assert_eq!(f.tree.stable_id(w1), Some(&StableId::new("w1")));
    let g1 = f.grid("g1");
    assert_eq!(f.tree.child_grid(w1), Some(g1));
    assert_eq!(
        f.tree.grid(g1).unwrap().sub_grid_id,
        Some(StableId::new("w1"))
    );
    assert_eq!(f.tree.children(g1), leaves.as_slice());
    assert_eq!(f.stable_ids(g1), vec![s("a"), s("b")]);
    assert_eq!(
        f.tree.grid(g1).unwrap().handlers.get(&GridEvent::Added),
        Some(&handler)
    );
    // Reinserting both leaves fires the restored `added` handler.
    assert_eq!(hits.get(), 2);
    f.assert_links();
}

#[test]
fn two_levels_of_nesting_are_restored() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("w2"), stable_id: Some("w2"), sub_grid: Some((id: Some("g2"), widgets: [
                    (id: Some("c"), stable_id: Some("c")),
                ]))),
                (id: Some("d"), stable_id: Some("d"), x: 2),
            ]))),
            (id: Some("w3"), stable_id: Some("w3"), x: 6),
        ])])"#,
    );
    let report = f.drag("w1", 0);
    assert_eq!(report.grids_reattached, 2);
    assert_eq!(report.truncated, 0);

    let w1 = report.widget.unwrap();
    let g1 = f.grid("g1");
    let g2 = f.grid("g2");
    assert_eq!(f.tree.child_grid(w1), Some(g1));
    assert_eq!(f.stable_ids(g1), vec![s("w2"), s("d")]);
    let w2 = f.widget("w2");
    assert_eq!(f.tree.child_grid(w2), Some(g2));
    assert_eq!(
        f.tree.grid(g2).unwrap().sub_grid_id,
        Some(StableId::new("w2"))
    );
    assert_eq!(f.stable_ids(g2), vec![s("c")]);
    assert_eq!(
        f.tree.widget(w2).unwrap().element_id.as_deref(),
        Some("w2")
    );
    f.assert_links();
}

#[test]
fn leaves_keep_order_among_grid_bearing_siblings() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
                (id: Some("x"), stable_id: Some("x"), sub_grid: Some((id: Some("gx")))),
                (id: Some("b"), stable_id: Some("b")),
                (id: Some("y"), stable_id: Some("y"), sub_grid: Some((id: Some("gy"), widgets: [
                    (id: Some("c"), stable_id: Some("c")),
                ]))),
            ]))),
        ])])"#,
    );
    let report = f.drag("w1", 1);
    assert_eq!(report.orphans, 3);
    assert_eq!(report.grids_reattached, 3);
    let g1 = f.grid("g1");
    assert_eq!(f.tree.children(g1).len(), 4);
    assert_eq!(f.stable_ids(g1), vec![s("a"), s("x"), s("b"), s("y")]);
    assert_eq!(f.stable_ids(f.grid("gy")), vec![s("c")]);
    assert!(f.tree.children(f.grid("gx")).is_empty());
    f.assert_links();
}

#[test]
fn layout_survives_the_move() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), x: 1, y: 2, w: 5, h: 4,
             attrs: {"title": "Sales", "color": "blue"},
             sub_grid: Some((id: Some("g1"), widgets: [(id: Some("a"), stable_id: Some("a"), w: 2)]))),
        ])])"#,
    );
    let before = f.tree.widget(f.widget("w1")).unwrap().layout.clone();
    let report = f.drag("w1", 7);
    let after = &f.tree.widget(report.widget.unwrap()).unwrap().layout;
    assert_eq!(after.x, 7);
    assert_eq!((after.y, after.w, after.h), (before.y, before.w, before.h));
    assert_eq!(after.attrs, before.attrs);
    assert_eq!(after.id, before.id);
    assert_eq!(f.tree.widget(f.widget("a")).unwrap().layout.w, 2);
}

#[test]
fn deep_nesting_restores_every_link() {
    let depth = 6;
    let mut src = String::from(r#"(id: Some("leaf"), stable_id: Some("leaf"))"#);
    for i in (0..depth).rev() {
        src = format!(
            r#"(id: Some("w{i}"), stable_id: Some("w{i}"), sub_grid: Some((id: Some("g{i}"), widgets: [
                {src},
                (id: Some("l{i}"), stable_id: Some("l{i}")),
            ])))"#
        );
    }
    let mut f = Fixture::new(&format!(r#"(grids: [(id: Some("root"), widgets: [{src}])])"#));
    let before = f.tree.widgets_in(f.root).len();
    let report = f.drag("w0", 3);
    assert_eq!(report.grids_reattached, depth);
    assert_eq!(report.orphans, depth + 1);
    assert_eq!(f.tree.widgets_in(f.root).len(), before);
    for i in 0..depth {
        let g = f.grid(&format!("g{i}"));
        let owner = f.tree.parent(g).unwrap();
        assert_eq!(f.tree.stable_id(owner), Some(&StableId::new(format!("w{i}"))));
        assert_eq!(
            f.stable_ids(g).last().cloned().flatten(),
            Some(format!("l{i}"))
        );
    }
    f.assert_links();
}

#[test]
fn repeated_drags_converge() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("w2"), stable_id: Some("w2"), sub_grid: Some((id: Some("g2"), widgets: [
                    (id: Some("c"), stable_id: Some("c")),
                ]))),
            ]))),
        ])])"#,
    );
    f.drag("w1", 1);
    let once = gridnest_tree::render_tree(&f.tree, f.root);
    f.drag("w1", 1);
    let twice = gridnest_tree::render_tree(&f.tree, f.root);
    // Transient ids change on every rebuild; everything else must not.
    let strip = |s: &str| -> Vec<String> {
        s.lines()
            .map(|l| {
                l.split(' ')
                    .filter(|tok| !tok.starts_with("[t"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    };
    assert_eq!(strip(&once), strip(&twice));
}

#[test]
fn dragend_resolves_target_inside_widget() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
            ]))),
        ])])"#,
    );
    // A drag that ends on the nested grid resolves to its hosting widget.
    let target = f.grid("g1");
    let report = Reconciler::new(ReconcileCfg::default())
        .dragend(&mut f.tree, &mut f.engine, target)
        .unwrap();
    assert!(!report.skipped);
    assert_eq!(
        f.tree.stable_id(report.widget.unwrap()),
        Some(&StableId::new("w1"))
    );
    // A target on the root grid has no widget to move.
    let root = f.root;
    let report = Reconciler::default()
        .dragend(&mut f.tree, &mut f.engine, root)
        .unwrap();
    assert!(report.skipped);
}

#[test]
fn detached_widget_is_a_precondition_error() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1")))),
        ])])"#,
    );
    let w1 = f.widget("w1");
    f.tree.detach(w1);
    let err = Reconciler::default()
        .dragend(&mut f.tree, &mut f.engine, w1)
        .unwrap_err();
    assert_eq!(err, gridnest_reconcile::Error::NoOwningGrid(w1));
    assert!(f.tree.contains(w1));
}

#[test]
fn anonymous_nested_grid_keeps_every_leaf() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((widgets: [
                (id: Some("a"), stable_id: Some("a")),
                (id: Some("x"), stable_id: Some("x"), sub_grid: Some((id: Some("gx"), widgets: [
                    (id: Some("c"), stable_id: Some("c")),
                ]))),
            ]))),
        ])])"#,
    );
    let report = f.drag("w1", 2);
    assert_eq!(report.orphans, 2);
    assert_eq!(report.restored, 2);
    assert!(report.unplaced.is_empty());

    let walk: Vec<Option<String>> = f
        .tree
        .widgets_in(f.root)
        .iter()
        .map(|w| f.tree.stable_id(*w).map(|s| s.as_str().to_string()))
        .collect();
    assert_eq!(walk, vec![s("w1"), s("a"), s("x"), s("c")]);
    let w1 = report.widget.unwrap();
    let inner = f.tree.child_grid(w1).unwrap();
    assert_eq!(f.tree.stable_id(inner), None);
    assert_eq!(f.stable_ids(inner), vec![s("a"), s("x")]);
    assert_eq!(
        f.tree.grid(f.grid("gx")).unwrap().sub_grid_id,
        Some(StableId::new("x"))
    );
    f.assert_links();
}

#[test]
fn superseded_grids_release_their_engine_instances() {
    let mut f = Fixture::new(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
            ]))),
        ])])"#,
    );
    f.engine.clear_calls();
    for round in 1..=3 {
        let old_g1 = f.grid("g1");
        f.drag("w1", round);
        assert!(!f.engine.is_initialized(old_g1));
        assert!(f.engine.is_initialized(f.grid("g1")));
    }
    assert_eq!(f.engine.call_count("destroy"), 3);
    assert_eq!(f.engine.call_count("init"), 3);
}
