use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use placement::*;
pub use roman::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod geometry;
mod placement;
mod roman;
mod types;

/// Construction parameters for a [`MineField`].
///
/// `fields` is an approximate target; the geometry derives the nearest size
/// parameter and the exact cell count from it. The mine count is the ratio
/// applied to the exact count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub fields: CellCount,
    pub mine_ratio: f64,
    pub geometry: Geometry,
    pub roman_digits: bool,
}

impl GameConfig {
    pub fn new(fields: CellCount, mine_ratio: f64, geometry: Geometry) -> Self {
        Self {
            fields,
            mine_ratio,
            geometry,
            roman_digits: false,
        }
    }

    pub fn with_roman_digits(mut self) -> Self {
        self.roman_digits = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.fields == 0 {
            return Err(GameError::InvalidFieldCount);
        }
        if !(self.mine_ratio > 0.0 && self.mine_ratio < 1.0) {
            return Err(GameError::InvalidMineRatio(self.mine_ratio));
        }
        Ok(())
    }

    /// Mine count for a board of `cell_count` cells, kept inside
    /// `[1, cell_count - 1]` so a game is neither empty nor unwinnable by
    /// construction alone.
    pub(crate) fn mine_count(&self, cell_count: CellCount) -> CellCount {
        let wanted = (self.mine_ratio * cell_count as f64).round() as CellCount;
        let mines = wanted.clamp(1, (cell_count - 1).max(1));
        if mines != wanted {
            log::warn!("clamped mine count from {wanted} to {mines} on {cell_count} cells");
        }
        mines
    }
}
