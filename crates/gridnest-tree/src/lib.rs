//! Arena tree of nested grid containers and the engine contract that manages
//! them.
//!
//! A [`Tree`] holds two kinds of node: grid containers, whose children are
//! widgets, and widgets, which may host exactly one nested grid. Child order
//! is visual order, and every walk in this crate is a pre-order (document
//! order) walk.
//!
//! Structural changes to engine-managed grids go through a [`GridEngine`].
//! [`SimEngine`] is the in-process implementation used by the CLI and tests.

mod builder;
mod engine;
mod error;
mod event;
mod node;
mod render;
mod sim;
mod tree;

pub use builder::mount_layout;
pub use engine::{GridEngine, WidgetConfig, WidgetUpdate};
pub use error::{Error, Result};
pub use event::{EventArgs, GridEvent, Handler, HandlerTable};
pub use node::{GridData, Node, NodeId, NodeKind, WidgetData, WidgetLayout};
pub use render::render_tree;
pub use sim::{INSTANCE_CLASS_PREFIX, SimEngine};
pub use tree::Tree;
