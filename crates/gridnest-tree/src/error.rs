//! Error types for tree and engine operations.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::NodeId;

/// Convenient result type for tree and engine operations.
pub type Result<T> = StdResult<T, Error>;

/// Structural errors raised by the tree or the grid engine.
///
/// These describe misuse of the API (stale ids, wrong node kinds). They are
/// checked before any mutation takes place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The id does not name a live node.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// A widget was required.
    #[error("node {0:?} is not a widget")]
    NotAWidget(NodeId),

    /// A grid container was required.
    #[error("node {0:?} is not a grid")]
    NotAGrid(NodeId),

    /// Widgets host at most one grid.
    #[error("widget {widget:?} already hosts grid {existing:?}")]
    GridAlreadyNested {
        /// Widget that was asked to host a second grid.
        widget: NodeId,
        /// Grid it already hosts.
        existing: NodeId,
    },

    /// Attaching would make a node its own ancestor.
    #[error("cannot attach {child:?} below its descendant {parent:?}")]
    Cycle {
        /// Node being attached.
        child: NodeId,
        /// Intended parent.
        parent: NodeId,
    },

    /// The grid has no engine instance.
    #[error("grid {0:?} has no engine instance")]
    NotInitialized(NodeId),
}
