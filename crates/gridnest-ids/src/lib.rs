//! Shared identifiers for nodes in a gridnest tree.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

/// Identifier stored as node metadata that survives a destroy/recreate cycle.
///
/// Stable identifiers are assigned by the host (or by reconciliation) and are
/// never produced by the grid engine. The engine only ever sees the layout
/// configuration of a widget, so a stable identifier is lost on every managed
/// re-add unless it is written back explicitly.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(String);

impl StableId {
    /// Construct a stable identifier from any string-like value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StableId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StableId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier assigned to a node every time it is constructed.
///
/// Transient identifiers are monotonic within a tree and are invalidated by
/// any destroy/recreate cycle: a re-added widget never reuses the identifier of
/// the node it replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransientId(u64);

impl TransientId {
    /// Wrap a raw counter value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Handle the grid engine attaches to a widget while it manages it.
///
/// The handle is cleared when the widget leaves engine management, which can
/// happen before the widget leaves the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineHandle(u64);

/// Process-wide source of engine handles.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

impl EngineHandle {
    /// Allocate a fresh, never reused handle.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<TransientId> for u64 {
    fn from(value: TransientId) -> Self {
        value.get()
    }
}
