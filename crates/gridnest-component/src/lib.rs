//! Host component for nested grids.
//!
//! A [`GridComponent`] wraps one grid container: it builds the engine
//! instance once the grid is in the tree, subscribes the host's event
//! actions, rebuilds on option changes, and tears down without removing
//! nodes. Drag-end signals run reconciliation. Components live in a
//! [`ComponentRegistry`] owned by whoever drives the tree.

mod component;
mod error;
mod registry;

pub use component::{ComponentArgs, DragEndEvent, GridComponent};
pub use error::{Error, Result};
pub use registry::{ComponentHandle, ComponentRegistry};
