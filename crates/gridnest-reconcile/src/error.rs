//! Precondition errors for reconciliation.

use std::result::Result as StdResult;

use gridnest_tree::NodeId;
use thiserror::Error;

/// Convenient result type for reconciliation.
pub type Result<T> = StdResult<T, Error>;

/// Reasons a reconciliation refuses to start.
///
/// All of these are detected before the tree is touched. Once a
/// reconciliation is under way, degraded situations are logged and reported
/// instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Tree or engine misuse.
    #[error(transparent)]
    Tree(#[from] gridnest_tree::Error),

    /// The dragged widget is not owned by a grid container.
    #[error("widget {0:?} has no owning grid")]
    NoOwningGrid(NodeId),

    /// The widget is not a direct child of the given grid.
    #[error("widget {widget:?} is not a child of grid {grid:?}")]
    NotOwnedBy {
        /// Widget being moved.
        widget: NodeId,
        /// Grid it was expected in.
        grid: NodeId,
    },

    /// The engine's saved layout has no entry for the widget.
    #[error("no saved configuration for widget {0:?}")]
    MissingConfig(NodeId),
}
