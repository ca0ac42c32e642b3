//! Structural reconciliation of nested grids.
//!
//! A grid engine moves a widget by removing its subtree and building a fresh
//! one from saved configuration. Nested grids inside the widget come back
//! without their stable ids, their links to the widgets that host them and
//! their subscribed handlers, and leaf widgets inside them come back as new
//! nodes. This crate restores all of that around a move:
//!
//! 1. [`capture_identities`] records the stable id of every widget in the
//!    moved subtree.
//! 2. [`extract_orphans`] sets aside every leaf widget below the moved one.
//!    Nested grids without a stable id are tagged first
//!    ([`tag_anonymous_grids`]) so the leaves can find them again.
//! 3. [`move_widget`] relocates the widget through the engine.
//! 4. [`reattach`] restores nested grid bookkeeping, recursively.
//! 5. [`reinsert_orphans`] puts the leaves back where they were, and the
//!    temporary grid tags are removed.
//! 6. [`sweep_identifiers`] assigns final identifiers.
//!
//! [`Reconciler::dragend`] runs the sequence.

mod error;
mod ledger;
mod mover;
mod orphan;
mod reattach;
mod reconciler;
mod sweep;
mod tags;

pub use error::{Error, Result};
pub use ledger::{IdentityLedger, IdentityRecord, capture_identities};
pub use mover::{MovedWidget, SavedGrid, SavedWidget, move_widget};
pub use orphan::{OrphanRecord, ReinsertOutcome, extract_orphans, reinsert_orphans};
pub use reattach::{ReattachStats, reattach};
pub use reconciler::{ReconcileReport, Reconciler};
pub use sweep::sweep_identifiers;
pub use tags::{GRID_TAG_PREFIX, clear_grid_tags, tag_anonymous_grids};
