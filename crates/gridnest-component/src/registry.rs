//! Explicit registry of live grid components.

use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use gridnest_tree::{GridEngine, NodeId, Tree};
use tracing::debug;

use crate::{Error, GridComponent, Result};

/// Opaque handle naming a component instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentHandle(u64);

impl ComponentHandle {
    /// Allocate a process-unique handle.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gridnest-{}", self.0)
    }
}

/// Owns every registered component, keyed by handle.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Registered components.
    components: BTreeMap<ComponentHandle, GridComponent>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component, replacing any previous one with the same handle.
    pub fn register(&mut self, component: GridComponent) -> ComponentHandle {
        let handle = component.handle();
        debug!(%handle, grid = ?component.grid(), "component_registered");
        self.components.insert(handle, component);
        handle
    }

    /// Remove a component without tearing it down.
    pub fn unregister(&mut self, handle: ComponentHandle) -> Option<GridComponent> {
        let out = self.components.remove(&handle);
        if out.is_some() {
            debug!(%handle, "component_unregistered");
        }
        out
    }

    /// Look up a component.
    pub fn get(&self, handle: ComponentHandle) -> Option<&GridComponent> {
        self.components.get(&handle)
    }

    /// Look up a component mutably.
    pub fn get_mut(&mut self, handle: ComponentHandle) -> Option<&mut GridComponent> {
        self.components.get_mut(&handle)
    }

    /// Component managing `grid`, if any.
    pub fn find_by_grid(&self, grid: NodeId) -> Option<ComponentHandle> {
        self.components
            .values()
            .find(|c| c.grid() == grid)
            .map(GridComponent::handle)
    }

    /// Registered handles, oldest first.
    pub fn handles(&self) -> Vec<ComponentHandle> {
        self.components.keys().copied().collect()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Register `component` and build its engine instance.
    pub fn mount(
        &mut self,
        component: GridComponent,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
    ) -> Result<ComponentHandle> {
        let handle = self.register(component);
        self.get_mut(handle)
            .ok_or(Error::UnknownComponent(handle))?
            .did_insert(tree, engine)?;
        Ok(handle)
    }

    /// Unregister a component and tear it down, leaving its nodes in place.
    pub fn destroy(
        &mut self,
        handle: ComponentHandle,
        tree: &mut Tree,
        engine: &mut dyn GridEngine,
    ) -> Result<()> {
        let mut component = self
            .unregister(handle)
            .ok_or(Error::UnknownComponent(handle))?;
        component.will_destroy(tree, engine);
        Ok(())
    }
}
