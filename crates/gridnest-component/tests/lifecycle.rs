use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use config::{GridOptions, Layout};
use gridnest_component::{ComponentArgs, ComponentRegistry, DragEndEvent, Error, GridComponent};
use gridnest_ids::StableId;
use gridnest_tree::{
    GridEngine, GridEvent, Handler, INSTANCE_CLASS_PREFIX, NodeId, SimEngine, Tree,
    WidgetLayout, mount_layout,
};

type Log = Rc<RefCell<Vec<(GridEvent, usize)>>>;

/// Actions recording `(event, widget count)` for the given events.
fn recording(events: &[GridEvent]) -> (BTreeMap<GridEvent, Handler>, Log) {
    let log: Log = Rc::default();
    let actions = events
        .iter()
        .map(|e| {
            let sink = log.clone();
            let h = Handler::new(move |args| {
                sink.borrow_mut().push((args.event, args.widgets.len()))
            });
            (*e, h)
        })
        .collect();
    (actions, log)
}

/// A mounted root grid holding three leaf widgets, not yet under an engine.
fn flat() -> (Tree, SimEngine, NodeId, Vec<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.create_grid();
    tree.mount_root(root).unwrap();
    let widgets = ["a", "b", "c"]
        .iter()
        .map(|id| {
            let w = tree.create_widget(WidgetLayout {
                id: Some(id.to_string()),
                w: 1,
                h: 1,
                ..WidgetLayout::default()
            });
            tree.insert_child(root, w, None).unwrap();
            w
        })
        .collect();
    (tree, SimEngine::new(), root, widgets)
}

fn instance_classes(tree: &Tree, grid: NodeId) -> Vec<String> {
    tree.grid(grid)
        .unwrap()
        .classes
        .iter()
        .filter(|c| c.starts_with(INSTANCE_CLASS_PREFIX))
        .cloned()
        .collect()
}

#[test]
fn mount_subscribes_supplied_actions_and_teardown_undoes_it() {
    let (mut tree, mut engine, root, widgets) = flat();
    let (actions, _) = recording(&[GridEvent::Resizestop, GridEvent::Added, GridEvent::Change]);
    let mut registry = ComponentRegistry::new();
    let component = GridComponent::new(
        root,
        ComponentArgs {
            actions,
            ..ComponentArgs::default()
        },
    );
    let handle = registry.mount(component, &mut tree, &mut engine).unwrap();

    let c = registry.get(handle).unwrap();
    assert!(c.is_initialized());
    assert_eq!(
        c.subscribed(),
        &[GridEvent::Added, GridEvent::Change, GridEvent::Resizestop]
    );
    assert_eq!(registry.find_by_grid(root), Some(handle));
    assert_eq!(tree.grid(root).unwrap().handlers.len(), 3);
    assert_eq!(instance_classes(&tree, root).len(), 1);
    assert_eq!(engine.managed(root), widgets);

    registry.destroy(handle, &mut tree, &mut engine).unwrap();
    assert!(registry.is_empty());
    assert_eq!(engine.call_count("off"), 3);
    assert!(!engine.is_initialized(root));
    assert!(tree.grid(root).unwrap().handlers.is_empty());
    assert!(instance_classes(&tree, root).is_empty());
    assert_eq!(tree.children(root), widgets.as_slice());
    assert!(tree.is_attached(root));

    assert_eq!(
        registry.destroy(handle, &mut tree, &mut engine),
        Err(Error::UnknownComponent(handle))
    );
}

#[test]
fn option_change_rebuilds_the_instance() {
    let (mut tree, mut engine, root, _) = flat();
    let (actions, _) = recording(&[GridEvent::Dragstop]);
    let mut component = GridComponent::new(
        root,
        ComponentArgs {
            actions,
            ..ComponentArgs::default()
        },
    );
    component.did_insert(&mut tree, &mut engine).unwrap();
    let first = instance_classes(&tree, root);

    let options = GridOptions {
        column: 6,
        static_grid: true,
        ..GridOptions::default()
    };
    component
        .update_options(&mut tree, &mut engine, options.clone())
        .unwrap();
    assert_eq!(component.options(), &options);
    assert_eq!(engine.call_count("init"), 2);
    assert_eq!(engine.call_count("destroy"), 1);
    let second = instance_classes(&tree, root);
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);
    assert_eq!(component.subscribed(), &[GridEvent::Dragstop]);
    let w = tree.children(root)[0];
    assert!(!tree.widget(w).unwrap().drag_bound);
}

#[test]
fn removing_a_widget_with_a_cleared_handle_leaves_siblings_alone() {
    let (mut tree, mut engine, root, widgets) = flat();
    let (actions, log) = recording(&[GridEvent::Removed, GridEvent::Change]);
    let mut component = GridComponent::new(
        root,
        ComponentArgs {
            actions,
            ..ComponentArgs::default()
        },
    );
    component.did_insert(&mut tree, &mut engine).unwrap();
    engine.trigger_change_event(&tree, root);
    log.borrow_mut().clear();

    let [a, b, c] = [widgets[0], widgets[1], widgets[2]];
    tree.widget_mut(b).unwrap().engine_handle = None;
    let removed = component
        .remove_widget(&mut tree, &mut engine, &[b], true, true)
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(tree.children(root), &[a, c]);
    assert_eq!(engine.managed(root), vec![a, c]);
    assert!(tree.widget(a).unwrap().engine_handle.is_some());
    assert!(tree.widget(c).unwrap().drag_bound);
    assert_eq!(
        *log.borrow(),
        vec![(GridEvent::Removed, 1), (GridEvent::Change, 1)]
    );
}

#[test]
fn removing_unknown_widgets_is_a_no_op() {
    let (mut tree, mut engine, root, widgets) = flat();
    let mut component = GridComponent::new(root, ComponentArgs::default());
    component.did_insert(&mut tree, &mut engine).unwrap();
    let ghost = widgets[1];
    engine.forget(root, ghost);
    tree.widget_mut(ghost).unwrap().engine_handle = None;

    let removed = component
        .remove_widget(&mut tree, &mut engine, &[ghost], true, true)
        .unwrap();
    assert_eq!(removed, 0);
    assert_eq!(tree.children(root), widgets.as_slice());
}

#[test]
fn batch_removal_notifies_once() {
    let (mut tree, mut engine, root, widgets) = flat();
    let (actions, log) = recording(&[GridEvent::Removed]);
    let mut component = GridComponent::new(
        root,
        ComponentArgs {
            actions,
            ..ComponentArgs::default()
        },
    );
    component.did_insert(&mut tree, &mut engine).unwrap();
    let removed = component
        .remove_widget(&mut tree, &mut engine, &widgets, false, true)
        .unwrap();
    assert_eq!(removed, 3);
    assert_eq!(*log.borrow(), vec![(GridEvent::Removed, 3)]);
    // Without `remove_dom` the nodes stay where they are.
    assert_eq!(tree.children(root), widgets.as_slice());
    assert!(engine.managed(root).is_empty());
}

#[test]
fn add_widget_adopts_an_existing_node() {
    let (mut tree, mut engine, root, _) = flat();
    let (actions, log) = recording(&[GridEvent::Added]);
    let mut component = GridComponent::new(
        root,
        ComponentArgs {
            actions,
            ..ComponentArgs::default()
        },
    );
    let w = tree.create_widget(WidgetLayout::default());
    assert_eq!(
        component.add_widget(&mut tree, &mut engine, w),
        Err(Error::NotMounted(component.handle()))
    );
    component.did_insert(&mut tree, &mut engine).unwrap();
    component.add_widget(&mut tree, &mut engine, w).unwrap();
    assert_eq!(tree.parent(w), Some(root));
    assert!(engine.managed(root).contains(&w));
    assert_eq!(*log.borrow(), vec![(GridEvent::Added, 1)]);
}

#[test]
fn dragend_stops_propagation_and_reconciles() {
    let layout = Layout::from_ron(
        r#"(grids: [(id: Some("root"), widgets: [
            (id: Some("w1"), stable_id: Some("w1"), sub_grid: Some((id: Some("g1"), widgets: [
                (id: Some("a"), stable_id: Some("a")),
            ]))),
        ])])"#,
    )
    .unwrap();
    let mut tree = Tree::new();
    let mut engine = SimEngine::new();
    let root = mount_layout(&mut tree, &mut engine, &layout).unwrap()[0];
    let mut registry = ComponentRegistry::new();
    let handle = registry
        .mount(
            GridComponent::new(root, ComponentArgs::default()),
            &mut tree,
            &mut engine,
        )
        .unwrap();

    let w1 = tree.children(root)[0];
    let mut event = DragEndEvent::new(w1);
    let report = registry
        .get(handle)
        .unwrap()
        .dragend(&mut tree, &mut engine, &mut event)
        .unwrap();
    assert!(event.propagation_stopped());
    let moved = report.widget.unwrap();
    let g1 = tree.find_grid(&StableId::new("g1")).unwrap();
    assert_eq!(tree.child_grid(moved), Some(g1));
    assert_eq!(
        tree.grid(g1).unwrap().sub_grid_id,
        Some(StableId::new("w1"))
    );

    let unmounted = GridComponent::new(root, ComponentArgs::default());
    let mut event = DragEndEvent::new(moved);
    assert_eq!(
        unmounted.dragend(&mut tree, &mut engine, &mut event),
        Err(Error::NotMounted(unmounted.handle()))
    );
}
