use serde::{Deserialize, Serialize};

/// Authoritative cell content. `Count(0)` doubles as the pre-placement
/// sentinel, since numbering only exists once mines have been placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Count(u8),
    Mine,
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Player-visible state, tracked in a map parallel to the board values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagState {
    Hidden,
    Flagged,
    Revealed,
}

impl FlagState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for FlagState {
    fn default() -> Self {
        Self::Hidden
    }
}
