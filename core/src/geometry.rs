use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor list; a triangular cell has at most 12 neighbors plus itself.
pub type NeighborList = SmallVec<[Coord2; 13]>;

/// Board tessellation. Determines the coordinate layout and the adjacency
/// rule; fixed for the lifetime of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    Triangular,
    Square,
    /// Four-quadrant Cairo-style layout on a dense square grid.
    Pentagonal,
    Hexagonal,
}

const SQUARE_OFFSETS: [(Axis, Axis); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const HEX_OFFSETS: [(Axis, Axis); 6] = [(-1, -1), (-1, 1), (0, -2), (0, 2), (1, -1), (1, 1)];

// An up-pointing triangle shares edges with the row below, a down-pointing
// one with the row above; the rest are corner contacts along the same row
// and the edge-sharing row.
const TRI_UP_OFFSETS: [(Axis, Axis); 12] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (1, -2),
    (1, -1),
    (1, 0),
    (1, 1),
    (1, 2),
];

const TRI_DOWN_OFFSETS: [(Axis, Axis); 12] = [
    (-1, -2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (1, -1),
    (1, 0),
    (1, 1),
];

const PENTA_Q1_OFFSETS: [(Axis, Axis); 7] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, 0),
    (1, 1),
];

const PENTA_Q2_OFFSETS: [(Axis, Axis); 7] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
];

const PENTA_Q3_OFFSETS: [(Axis, Axis); 7] = [
    (-1, -1),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const PENTA_Q4_OFFSETS: [(Axis, Axis); 7] = [
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Orientation of a triangular cell, from the row/column parity rule.
/// Renderers use the same rule to pick the clip direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriOrientation {
    Up,
    Down,
}

impl TriOrientation {
    pub fn of((row, col): Coord2) -> Self {
        if row.rem_euclid(2) == col.rem_euclid(2) {
            Self::Up
        } else {
            Self::Down
        }
    }

    const fn offsets(self) -> &'static [(Axis, Axis)] {
        match self {
            Self::Up => &TRI_UP_OFFSETS,
            Self::Down => &TRI_DOWN_OFFSETS,
        }
    }
}

/// Which quadrant pentagon occupies a pentagonal-grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PentaQuadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl PentaQuadrant {
    pub fn of((row, col): Coord2) -> Self {
        match (row.rem_euclid(2) == 0, col.rem_euclid(2) == 0) {
            (true, true) => Self::Q2,
            (true, false) => Self::Q3,
            (false, true) => Self::Q1,
            (false, false) => Self::Q4,
        }
    }

    const fn offsets(self) -> &'static [(Axis, Axis)] {
        match self {
            Self::Q1 => &PENTA_Q1_OFFSETS,
            Self::Q2 => &PENTA_Q2_OFFSETS,
            Self::Q3 => &PENTA_Q3_OFFSETS,
            Self::Q4 => &PENTA_Q4_OFFSETS,
        }
    }
}

impl Geometry {
    /// Numeric form codes used by the settings form (number of polygon sides).
    pub const fn from_form(form: u8) -> Result<Self> {
        match form {
            3 => Ok(Self::Triangular),
            4 => Ok(Self::Square),
            5 => Ok(Self::Pentagonal),
            6 => Ok(Self::Hexagonal),
            other => Err(GameError::UnknownForm(other)),
        }
    }

    pub const fn form(self) -> u8 {
        match self {
            Self::Triangular => 3,
            Self::Square => 4,
            Self::Pentagonal => 5,
            Self::Hexagonal => 6,
        }
    }

    /// Lowercase shape key, usable as a translation lookup key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangular => "triangular",
            Self::Square => "quadratic",
            Self::Pentagonal => "egyptian",
            Self::Hexagonal => "hexagonal",
        }
    }

    /// Size parameter whose exact cell count best approximates `fields`.
    pub fn size_for(self, fields: CellCount) -> Axis {
        let fields = fields as f64;
        let size = match self {
            Self::Triangular | Self::Square | Self::Pentagonal => fields.sqrt().round(),
            Self::Hexagonal => (0.5 + (0.25 + (fields - 1.0) / 3.0).sqrt()).round(),
        };
        (size as Axis).max(1)
    }

    /// Exact number of cells for a given size parameter: `size²` for the
    /// dense shapes, the centered hexagonal number for hexagons.
    pub const fn cell_count(self, size: Axis) -> CellCount {
        match self {
            Self::Triangular | Self::Square | Self::Pentagonal => (size * size) as CellCount,
            Self::Hexagonal => (3 * size * (size - 1) + 1) as CellCount,
        }
    }

    pub fn rows(self, size: Axis) -> RangeInclusive<Axis> {
        match self {
            Self::Hexagonal => (1 - size)..=(size - 1),
            _ => 0..=(size - 1),
        }
    }

    pub fn row_cols(self, size: Axis, row: Axis) -> impl Iterator<Item = Axis> {
        let (start, end, step) = match self {
            Self::Triangular => (-row, row, 1),
            Self::Square | Self::Pentagonal => (0, size - 1, 1),
            Self::Hexagonal => (2 + row.abs() - 2 * size, 2 * size - 2 - row.abs(), 2),
        };
        (start..=end).step_by(step as usize)
    }

    /// Enumerates the full coordinate set, rows ascending then columns
    /// ascending. Placement relies on this order being deterministic.
    pub fn coords(self, size: Axis) -> impl Iterator<Item = Coord2> {
        self.rows(size)
            .flat_map(move |row| self.row_cols(size, row).map(move |col| (row, col)))
    }

    /// Closed-form membership test for the coordinate set of `coords`.
    pub fn contains(self, size: Axis, (row, col): Coord2) -> bool {
        match self {
            Self::Square | Self::Pentagonal => {
                row >= 0 && row < size && col >= 0 && col < size
            }
            Self::Triangular => row >= 0 && row < size && col >= -row && col <= row,
            Self::Hexagonal => {
                row.abs() < size
                    && col >= 2 + row.abs() - 2 * size
                    && col <= 2 * size - 2 - row.abs()
                    && (col - row).rem_euclid(2) == 0
            }
        }
    }

    /// Valid neighbors of `coord`, boundary-clipped; off-board candidates are
    /// silently dropped. With `include_self` this is the safe zone used for
    /// mine placement.
    pub fn neighbors(self, size: Axis, coord: Coord2, include_self: bool) -> NeighborList {
        let offsets: &[(Axis, Axis)] = match self {
            Self::Square => &SQUARE_OFFSETS,
            Self::Hexagonal => &HEX_OFFSETS,
            Self::Triangular => TriOrientation::of(coord).offsets(),
            Self::Pentagonal => PentaQuadrant::of(coord).offsets(),
        };

        let mut list = NeighborList::new();
        list.extend(
            offsets
                .iter()
                .map(|&delta| offset(coord, delta))
                .filter(|&candidate| self.contains(size, candidate)),
        );
        if include_self && self.contains(size, coord) {
            list.push(coord);
        }
        list
    }
}
