use serde::{Deserialize, Serialize};

/// Options handed to the grid engine when a grid instance is created.
///
/// These mirror the knobs the engine understands; gridnest itself only reads
/// `static_grid` (which suppresses drag/drop bindings on managed widgets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridOptions {
    /// Number of columns in the grid.
    pub column: u16,
    /// Height of one row in pixels.
    pub cell_height: u32,
    /// Gap between widgets in pixels.
    pub margin: u32,
    /// Allow widgets to float instead of packing upwards.
    pub float: bool,
    /// Animate layout changes.
    pub animate: bool,
    /// Disable dragging and resizing entirely.
    pub static_grid: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            column: 12,
            cell_height: 70,
            margin: 10,
            float: false,
            animate: true,
            static_grid: false,
        }
    }
}

/// How the reattachment walker pairs saved nested-grid widgets with live ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Pair the n-th saved grid-bearing child with the n-th live one.
    #[default]
    Positional,
    /// Pair by the engine id each widget carries through its layout config,
    /// falling back to position for widgets without one.
    Tagged,
}

/// Settings for drag-end reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileCfg {
    /// Pairing used when descending into nested grids.
    pub match_strategy: MatchStrategy,
}
