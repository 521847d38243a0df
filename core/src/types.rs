/// Signed coordinate axis; triangular and hexagonal rows hold negative
/// column indices, and hexagonal row indices are themselves signed.
pub type Axis = i32;

/// Area dimension, used for mine/cell counts.
pub type CellCount = u32;

/// Board position as `(row, col)`.
pub type Coord2 = (Axis, Axis);

pub const fn offset((row, col): Coord2, (dr, dc): (Axis, Axis)) -> Coord2 {
    (row + dr, col + dc)
}
