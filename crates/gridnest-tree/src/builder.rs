//! Mounting a declarative [`Layout`] into a live tree.

use config::{GridOptions, GridSpec, Layout};
use tracing::debug;

use crate::{GridEngine, NodeId, Result, Tree, WidgetConfig, WidgetLayout};

/// Mount every top-level grid of `layout`, initialising an engine instance
/// per grid. Returns the mounted roots in layout order.
///
/// Grids get the stable id from the layout. Widgets get their stable id and
/// an element id equal to their engine id. A nested grid additionally records
/// the stable id of the widget it is nested under.
pub fn mount_layout(
    tree: &mut Tree,
    engine: &mut dyn GridEngine,
    layout: &Layout,
) -> Result<Vec<NodeId>> {
    let mut roots = Vec::with_capacity(layout.grids.len());
    for spec in &layout.grids {
        let grid = tree.create_grid();
        tree.mount_root(grid)?;
        mount_grid(tree, engine, grid, spec, &layout.options)?;
        roots.push(grid);
    }
    debug!(roots = roots.len(), nodes = tree.len(), "layout_mounted");
    Ok(roots)
}

/// Populate an empty, attached grid from `spec`.
fn mount_grid(
    tree: &mut Tree,
    engine: &mut dyn GridEngine,
    grid: NodeId,
    spec: &GridSpec,
    options: &GridOptions,
) -> Result<()> {
    tree.set_stable_id(grid, spec.id.clone());
    engine.init(tree, grid, options)?;
    for w in &spec.widgets {
        let layout = WidgetLayout::from(w);
        let element_id = layout.id.clone();
        let widget = engine.add_widget(
            tree,
            grid,
            &WidgetConfig {
                layout,
                sub_grid: None,
            },
        )?;
        tree.set_stable_id(widget, w.stable_id.clone());
        if let Some(data) = tree.widget_mut(widget) {
            data.element_id = element_id;
        }
        if let Some(sub) = &w.sub_grid {
            let nested = tree.create_grid();
            tree.insert_child(widget, nested, None)?;
            mount_grid(tree, engine, nested, sub, options)?;
            if let Some(data) = tree.grid_mut(nested) {
                data.sub_grid_id = w.stable_id.clone();
            }
        }
    }
    Ok(())
}
