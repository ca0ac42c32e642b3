//! Component errors.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::ComponentHandle;

/// Convenient result type for component operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised by a [`GridComponent`](crate::GridComponent).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Tree or engine misuse.
    #[error(transparent)]
    Tree(#[from] gridnest_tree::Error),

    /// Reconciliation refused to start.
    #[error(transparent)]
    Reconcile(#[from] gridnest_reconcile::Error),

    /// The component has no engine instance yet (or any more).
    #[error("component {0} is not mounted")]
    NotMounted(ComponentHandle),

    /// No component is registered under the handle.
    #[error("no component registered as {0}")]
    UnknownComponent(ComponentHandle),
}
