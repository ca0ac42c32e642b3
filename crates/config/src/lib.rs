//! Layout fixtures, grid options and reconciliation settings used by gridnest.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod layout;
mod loader;
mod options;

pub use error::Error;
pub use layout::{GridSpec, Layout, WidgetSpec};
pub use loader::load_from_path;
pub use options::{GridOptions, MatchStrategy, ReconcileCfg};

/// Determine the preferred user layout path (`~/.gridnest/layout.ron`).
pub fn default_layout_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".gridnest");
    p.push("layout.ron");
    p
}

/// Resolve the effective layout path using the default policy.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.gridnest/layout.ron` when it exists.
/// 3) Else return a clear "no layout found" error.
pub fn resolve_layout_path(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let preferred = default_layout_path();
    if preferred.exists() {
        return Ok(preferred);
    }

    Err(Error::Read {
        path: Some(preferred),
        message: "No layout found. Pass a layout path or create ~/.gridnest/layout.ron"
            .to_string(),
    })
}
