//! Parse and load layout files.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{Error, Layout, error::excerpt_at};

/// Load and validate a `Layout` from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Layout, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported layout format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let layout = parse_layout(&source).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), grids = layout.grid_count(), "layout_loaded");
    Ok(layout)
}

/// Parse and validate layout text.
pub(crate) fn parse_layout(source: &str) -> Result<Layout, Error> {
    let layout: Layout = ron::from_str(source).map_err(|e| {
        let line = e.span.start.line;
        let col = e.span.start.col;
        Error::Parse {
            path: None,
            line,
            col,
            message: e.code.to_string(),
            excerpt: excerpt_at(source, line, col),
        }
    })?;
    layout.validate()?;
    Ok(layout)
}
