//! Grid events and handler tables.

use std::{collections::BTreeMap, fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Events a grid engine instance emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum GridEvent {
    Added,
    Change,
    Disable,
    Dragstart,
    Drag,
    Dragstop,
    Dropped,
    Enable,
    Removed,
    Resizestart,
    Resize,
    Resizestop,
}

impl GridEvent {
    /// Every event, in the order the host component subscribes them.
    pub const ALL: [Self; 12] = [
        Self::Added,
        Self::Change,
        Self::Disable,
        Self::Dragstart,
        Self::Drag,
        Self::Dragstop,
        Self::Dropped,
        Self::Enable,
        Self::Removed,
        Self::Resizestart,
        Self::Resize,
        Self::Resizestop,
    ];

    /// Engine-facing event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Change => "change",
            Self::Disable => "disable",
            Self::Dragstart => "dragstart",
            Self::Drag => "drag",
            Self::Dragstop => "dragstop",
            Self::Dropped => "dropped",
            Self::Enable => "enable",
            Self::Removed => "removed",
            Self::Resizestart => "resizestart",
            Self::Resize => "resize",
            Self::Resizestop => "resizestop",
        }
    }
}

impl fmt::Display for GridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown grid event '{}'", s))
    }
}

/// Payload delivered to an event handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventArgs {
    /// Event being delivered.
    pub event: GridEvent,
    /// Grid the engine instance belongs to.
    pub grid: NodeId,
    /// Widgets the event concerns, in the order the engine processed them.
    pub widgets: Vec<NodeId>,
}

/// A subscribed event handler.
///
/// Handlers compare by identity, so a table restored from a saved copy is
/// equal to the original only when it holds the very same closures.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&EventArgs)>);

impl Handler {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&EventArgs) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, args: &EventArgs) {
        (self.0)(args);
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handler {}

/// Event name to handler mapping held by every grid container.
pub type HandlerTable = BTreeMap<GridEvent, Handler>;
