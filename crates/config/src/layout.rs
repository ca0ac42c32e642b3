//! Declarative layout fixtures.

use std::collections::{BTreeMap, HashSet};

use gridnest_ids::StableId;
use serde::{Deserialize, Serialize};

use crate::{Error, GridOptions, ReconcileCfg};

/// A complete layout: options plus the top-level grids to mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Options applied to every grid instance.
    #[serde(default)]
    pub options: GridOptions,
    /// Reconciliation settings.
    #[serde(default)]
    pub reconcile: ReconcileCfg,
    /// Top-level grids, in mount order.
    pub grids: Vec<GridSpec>,
}

/// One grid container and its widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    /// Stable identifier of the grid.
    #[serde(default)]
    pub id: Option<StableId>,
    /// Widgets in visual order.
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
}

/// One widget and, optionally, the grid nested inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetSpec {
    /// Engine-visible id, carried through the widget's layout config.
    #[serde(default)]
    pub id: Option<String>,
    /// Stable identifier stored as node metadata.
    #[serde(default)]
    pub stable_id: Option<StableId>,
    /// Column.
    #[serde(default)]
    pub x: u32,
    /// Row.
    #[serde(default)]
    pub y: u32,
    /// Width in columns.
    #[serde(default = "one")]
    pub w: u32,
    /// Height in rows.
    #[serde(default = "one")]
    pub h: u32,
    /// Free-form attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Nested grid.
    #[serde(default)]
    pub sub_grid: Option<GridSpec>,
}

/// Default widget extent.
fn one() -> u32 {
    1
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self {
            id: None,
            stable_id: None,
            x: 0,
            y: 0,
            w: 1,
            h: 1,
            attrs: BTreeMap::new(),
            sub_grid: None,
        }
    }
}

impl Layout {
    /// Parse a layout from RON text and validate it.
    pub fn from_ron(source: &str) -> Result<Self, Error> {
        crate::loader::parse_layout(source)
    }

    /// Check the structural rules a mounted tree relies on.
    ///
    /// Grid stable ids must be unique across the whole layout, and the widgets
    /// of any single grid must not repeat a stable id.
    pub fn validate(&self) -> Result<(), Error> {
        let mut grid_ids = HashSet::new();
        for grid in &self.grids {
            validate_grid(grid, &mut grid_ids)?;
        }
        Ok(())
    }

    /// Count every grid in the layout, nested ones included.
    pub fn grid_count(&self) -> usize {
        fn count(grid: &GridSpec) -> usize {
            1 + grid
                .widgets
                .iter()
                .filter_map(|w| w.sub_grid.as_ref())
                .map(count)
                .sum::<usize>()
        }
        self.grids.iter().map(count).sum()
    }
}

/// Validate one grid and recurse into its nested grids.
fn validate_grid<'a>(grid: &'a GridSpec, seen: &mut HashSet<&'a StableId>) -> Result<(), Error> {
    if let Some(id) = &grid.id
        && !seen.insert(id)
    {
        return Err(Error::Validation {
            path: None,
            message: format!("duplicate grid id '{}'", id),
        });
    }
    let mut siblings = HashSet::new();
    for widget in &grid.widgets {
        if let Some(sid) = &widget.stable_id
            && !siblings.insert(sid)
        {
            let owner = grid.id.as_ref().map_or("<anonymous>", StableId::as_str);
            return Err(Error::Validation {
                path: None,
                message: format!("duplicate widget id '{}' in grid '{}'", sid, owner),
            });
        }
        if let Some(sub) = &widget.sub_grid {
            validate_grid(sub, seen)?;
        }
    }
    Ok(())
}
