use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Terminal win/loss determination; monotonic once decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Undetermined,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::Undetermined
    }
}

/// A single game board from construction to the end of the game.
///
/// Mines are not placed at construction; the first [`reveal`](Self::reveal)
/// samples them from outside the safe zone around the clicked cell, so the
/// opening move is always a zero. All state is plain data, so a session
/// store can serialize the whole field opaquely between requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineField {
    geometry: Geometry,
    size: Axis,
    cell_count: CellCount,
    mine_count: CellCount,
    roman_digits: bool,
    board: BTreeMap<Coord2, CellValue>,
    flags: BTreeMap<Coord2, FlagState>,
    mines_placed: bool,
    outcome: Outcome,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    seed: u64,
}

impl MineField {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Like [`new`](Self::new) but with a caller-chosen placement seed, so
    /// the first reveal produces a reproducible layout.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let geometry = config.geometry;
        let size = geometry.size_for(config.fields);
        let cell_count = geometry.cell_count(size);
        let mine_count = config.mine_count(cell_count);

        Ok(Self {
            geometry,
            size,
            cell_count,
            mine_count,
            roman_digits: config.roman_digits,
            board: geometry
                .coords(size)
                .map(|coord| (coord, CellValue::default()))
                .collect(),
            flags: geometry
                .coords(size)
                .map(|coord| (coord, FlagState::default()))
                .collect(),
            mines_placed: false,
            outcome: Outcome::default(),
            started_at: Utc::now(),
            ended_at: None,
            seed,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn size(&self) -> Axis {
        self.size
    }

    pub fn cell_count(&self) -> CellCount {
        self.cell_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn roman_digits(&self) -> bool {
        self.roman_digits
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn cell_at(&self, coord: Coord2) -> Option<(CellValue, FlagState)> {
        Some((*self.board.get(&coord)?, self.flags[&coord]))
    }

    /// Full board walk for the rendering layer, rows ascending.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellValue, FlagState)> + '_ {
        self.board
            .iter()
            .map(|(&coord, &value)| (coord, value, self.flags[&coord]))
    }

    /// How many flags are still unspent; negative when over-flagged.
    pub fn flags_remaining(&self) -> i64 {
        let flagged = self
            .flags
            .values()
            .filter(|state| state.is_flagged())
            .count() as i64;
        self.mine_count as i64 - flagged
    }

    /// Seconds since construction, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u32 {
        (self.ended_at.unwrap_or_else(Utc::now) - self.started_at)
            .num_seconds()
            .max(0) as u32
    }

    /// Adjacency count as the renderer should print it.
    pub fn display_count(&self, count: u8) -> String {
        if self.roman_digits {
            romanise(count.into()).unwrap()
        } else {
            count.to_string()
        }
    }

    /// Key into the result screen's board-size vocabulary.
    pub fn size_class(&self) -> &'static str {
        match self.cell_count {
            ..=19 => "micro",
            ..=25 => "mini",
            ..=36 => "small",
            ..=64 => "moderate",
            ..=100 => "medium",
            ..=144 => "large",
            ..=225 => "immense",
            _ => "extreme",
        }
    }

    /// Key into the result screen's mine-density vocabulary.
    pub fn density_class(&self) -> &'static str {
        let density = self.mine_count as f64 / self.cell_count as f64;
        if density < 0.1 {
            "low"
        } else if density < 0.2 {
            "medium"
        } else if density < 0.3 {
            "high"
        } else if density < 0.4 {
            "bosnia"
        } else {
            "berlin"
        }
    }

    /// Reveals the cell at `(row, col)`, placing mines first if this is the
    /// opening move and flood-filling when the cell's count is zero.
    ///
    /// Off-board coordinates, flagged or already-revealed cells, and moves
    /// after the game has ended are no-ops; stale links from an outdated
    /// client view must not corrupt state. Returns `false` only when the
    /// board has too few cells outside the safe zone for the requested mine
    /// count, in which case nothing is mutated.
    pub fn reveal(&mut self, row: Axis, col: Axis) -> bool {
        let coord = (row, col);
        let Some(&state) = self.flags.get(&coord) else {
            return true;
        };
        if self.outcome.is_decided() || state != FlagState::Hidden {
            return true;
        }

        if !self.mines_placed {
            let placed = placement::place_mines(
                &mut self.board,
                self.geometry,
                self.size,
                self.mine_count,
                coord,
                self.seed,
            );
            if !placed {
                return false;
            }
            self.mines_placed = true;
        }

        self.flags.insert(coord, FlagState::Revealed);
        if self.board[&coord].is_blank() {
            self.flood_reveal(coord);
        }
        self.evaluate_outcome();
        true
    }

    /// Toggles a flag at `(row, col)`. Revealed cells, off-board coordinates
    /// and finished games are left alone.
    pub fn flag(&mut self, row: Axis, col: Axis) {
        let coord = (row, col);
        if self.outcome.is_decided() {
            return;
        }
        let Some(&state) = self.flags.get(&coord) else {
            return;
        };
        match state {
            FlagState::Hidden => {
                self.flags.insert(coord, FlagState::Flagged);
            }
            FlagState::Flagged => {
                self.flags.insert(coord, FlagState::Hidden);
            }
            FlagState::Revealed => {}
        }
    }

    /// Opens the connected zero-region around `start` plus its one-cell
    /// border, using an explicit work queue so the depth is independent of
    /// board size. Flagged cells block the fill.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = self
            .geometry
            .neighbors(self.size, start, false)
            .into_iter()
            .filter(|pos| self.flags[pos] == FlagState::Hidden)
            .collect();

        while let Some(coord) = to_visit.pop_front() {
            if !visited.insert(coord) {
                continue;
            }
            if self.flags[&coord] != FlagState::Hidden {
                continue;
            }

            self.flags.insert(coord, FlagState::Revealed);
            log::trace!("flood revealed {coord:?}");

            if self.board[&coord].is_blank() {
                to_visit.extend(
                    self.geometry
                        .neighbors(self.size, coord, false)
                        .into_iter()
                        .filter(|pos| self.flags[pos] == FlagState::Hidden)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// Runs after every successful reveal. Loss is checked before win: a
    /// revealed mine ends the game no matter what else is on the board.
    fn evaluate_outcome(&mut self) {
        if self.outcome.is_decided() {
            return;
        }

        let lost = self
            .board
            .iter()
            .any(|(coord, value)| value.is_mine() && self.flags[coord].is_revealed());
        let won = !lost
            && self
                .board
                .iter()
                .all(|(coord, value)| value.is_mine() || self.flags[coord].is_revealed());

        if lost {
            self.outcome = Outcome::Lost;
        } else if won {
            self.outcome = Outcome::Won;
        } else {
            return;
        }

        let now = Utc::now();
        self.ended_at = Some(now);
        log::debug!("game {:?} at {}", self.outcome, now);
        self.reveal_all_mines();
    }

    fn reveal_all_mines(&mut self) {
        let mines: Vec<Coord2> = self
            .board
            .iter()
            .filter(|(_, value)| value.is_mine())
            .map(|(&coord, _)| coord)
            .collect();
        for coord in mines {
            self.flags.insert(coord, FlagState::Revealed);
        }
    }

    #[cfg(test)]
    pub(crate) fn force_mines(&mut self, mines: &[Coord2]) {
        placement::apply_mines(&mut self.board, self.geometry, self.size, mines);
        self.mine_count = mines.len() as CellCount;
        self.mines_placed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Geometry::*;

    fn field(geometry: Geometry, fields: CellCount, ratio: f64) -> MineField {
        MineField::with_seed(GameConfig::new(fields, ratio, geometry), 7).unwrap()
    }

    fn field_with_mines(geometry: Geometry, fields: CellCount, mines: &[Coord2]) -> MineField {
        let mut field = field(geometry, fields, 0.2);
        field.force_mines(mines);
        field
    }

    #[test]
    fn square_scenario_sizes_and_safe_first_reveal() {
        let mut field = field(Square, 16, 0.1);
        assert_eq!(field.size(), 4);
        assert_eq!(field.cell_count(), 16);
        assert_eq!(field.mine_count(), 2);

        assert!(field.reveal(0, 0));
        assert!(field.mines_placed());

        // the trigger and its whole neighborhood stay mine-free, so the
        // opening cell is always a zero
        assert_eq!(field.cell_at((0, 0)).unwrap().0, CellValue::Count(0));
        for coord in Square.neighbors(4, (0, 0), true) {
            let (value, state) = field.cell_at(coord).unwrap();
            assert!(!value.is_mine());
            assert!(state.is_revealed());
        }
        let mines = field
            .iter_cells()
            .filter(|(_, value, _)| value.is_mine())
            .count();
        assert_eq!(mines, 2);
    }

    #[test]
    fn hexagonal_scenario_has_seven_cells() {
        let field = field(Hexagonal, 7, 0.2);
        assert_eq!(field.size(), 2);
        assert_eq!(field.cell_count(), 7);
        assert_eq!(field.iter_cells().count(), 7);
    }

    #[test]
    fn reveal_out_of_board_is_a_noop() {
        let mut field = field(Square, 16, 0.1);
        assert!(field.reveal(-3, 99));
        assert!(!field.mines_placed());
        assert!(field.iter_cells().all(|(_, _, state)| state == FlagState::Hidden));
    }

    #[test]
    fn reveal_on_flagged_cell_is_a_noop() {
        let mut field = field(Square, 16, 0.1);
        field.flag(1, 1);
        assert!(field.reveal(1, 1));
        assert!(!field.mines_placed());
        assert_eq!(field.cell_at((1, 1)).unwrap().1, FlagState::Flagged);
    }

    #[test]
    fn reveal_is_idempotent_on_revealed_cells() {
        let mut field = field(Square, 36, 0.1);
        assert!(field.reveal(0, 0));
        let snapshot = field.clone();
        assert!(field.reveal(0, 0));
        assert_eq!(field, snapshot);
    }

    #[test]
    fn infeasible_density_fails_without_mutation() {
        // 4 cells, ratio rounds to 2 but the safe zone around any cell
        // covers the whole board
        let mut field = field(Square, 4, 0.4);
        let snapshot = field.clone();
        assert!(!field.reveal(0, 0));
        assert_eq!(field, snapshot);
        assert!(!field.mines_placed());
    }

    #[test]
    fn flag_cycles_hidden_and_flagged_only() {
        let mut field = field(Square, 16, 0.1);
        field.flag(2, 2);
        assert_eq!(field.cell_at((2, 2)).unwrap().1, FlagState::Flagged);
        field.flag(2, 2);
        assert_eq!(field.cell_at((2, 2)).unwrap().1, FlagState::Hidden);

        field.flag(-1, 0); // off-board, ignored

        assert!(field.reveal(0, 0));
        let (_, state) = field.cell_at((0, 0)).unwrap();
        assert!(state.is_revealed());
        field.flag(0, 0);
        assert!(field.cell_at((0, 0)).unwrap().1.is_revealed());
    }

    #[test]
    fn flags_remaining_tracks_toggles() {
        let mut field = field(Square, 16, 0.1);
        assert_eq!(field.flags_remaining(), 2);
        field.flag(0, 0);
        field.flag(0, 1);
        field.flag(0, 2);
        assert_eq!(field.flags_remaining(), -1);
        field.flag(0, 2);
        assert_eq!(field.flags_remaining(), 0);
    }

    #[test]
    fn flood_fill_opens_everything_but_the_mine_and_wins() {
        let mut field = field_with_mines(Square, 16, &[(3, 3)]);
        assert!(field.reveal(0, 0));

        assert_eq!(field.outcome(), Outcome::Won);
        assert!(field.ended_at().is_some());
        // every cell revealed, the mine included (end-of-game sweep)
        assert!(field.iter_cells().all(|(_, _, state)| state.is_revealed()));
        assert_eq!(field.cell_at((2, 2)).unwrap().0, CellValue::Count(1));
    }

    #[test]
    fn flood_fill_does_not_cross_flags() {
        let mut field = field_with_mines(Square, 16, &[(3, 3)]);
        field.flag(1, 1);
        assert!(field.reveal(0, 0));

        // the flagged cell blocks the cascade and also blocks the win
        assert_eq!(field.outcome(), Outcome::Undetermined);
        assert_eq!(field.cell_at((1, 1)).unwrap().1, FlagState::Flagged);
        let hidden: Vec<Coord2> = field
            .iter_cells()
            .filter(|(_, _, state)| *state == FlagState::Hidden)
            .map(|(coord, _, _)| coord)
            .collect();
        assert_eq!(hidden, vec![(3, 3)]);

        // unflag and reveal to finish the fill
        field.flag(1, 1);
        assert!(field.reveal(1, 1));
        assert_eq!(field.outcome(), Outcome::Won);
    }

    #[test]
    fn hexagonal_flood_fill_wins_from_a_zero_cell() {
        let mut field = field_with_mines(Hexagonal, 7, &[(1, 1)]);
        assert!(field.reveal(-1, -1));

        assert_eq!(field.outcome(), Outcome::Won);
        assert_eq!(field.cell_at((0, 0)).unwrap().0, CellValue::Count(1));
        assert_eq!(field.cell_at((0, -2)).unwrap().0, CellValue::Count(0));
    }

    #[test]
    fn triangular_flood_fill_respects_orientation_adjacency() {
        // mine in the bottom-right corner of a size-4 triangle board
        let mut field = field_with_mines(Triangular, 16, &[(3, 3)]);
        assert!(field.reveal(0, 0));

        assert_eq!(field.outcome(), Outcome::Won);
        // corner contact along the row: (3, 1) sees the mine, (3, -3) does not
        assert_eq!(field.cell_at((3, 1)).unwrap().0, CellValue::Count(1));
        assert_eq!(field.cell_at((3, -3)).unwrap().0, CellValue::Count(0));
    }

    #[test]
    fn revealing_a_mine_loses_and_uncovers_all_mines() {
        let mut field = field_with_mines(Square, 36, &[(4, 4), (5, 0)]);
        assert!(field.reveal(4, 4));

        assert_eq!(field.outcome(), Outcome::Lost);
        assert!(field.ended_at().is_some());
        assert!(field.cell_at((4, 4)).unwrap().1.is_revealed());
        assert!(field.cell_at((5, 0)).unwrap().1.is_revealed());
    }

    #[test]
    fn outcome_is_monotonic_after_loss() {
        let mut field = field_with_mines(Square, 16, &[(3, 3)]);
        assert!(field.reveal(3, 3));
        assert_eq!(field.outcome(), Outcome::Lost);

        let ended_at = field.ended_at();
        assert!(field.reveal(0, 0));
        field.flag(0, 1);
        assert_eq!(field.outcome(), Outcome::Lost);
        assert_eq!(field.ended_at(), ended_at);
        assert_eq!(field.cell_at((0, 0)).unwrap().1, FlagState::Hidden);
        assert_eq!(field.cell_at((0, 1)).unwrap().1, FlagState::Hidden);
    }

    #[test]
    fn same_seed_reproduces_the_same_game() {
        let config = GameConfig::new(64, 0.15, Pentagonal);
        let mut first = MineField::with_seed(config, 1234).unwrap();
        let mut second = MineField::with_seed(config, 1234).unwrap();

        assert!(first.reveal(3, 3));
        assert!(second.reveal(3, 3));

        let first_cells: Vec<_> = first.iter_cells().collect();
        let second_cells: Vec<_> = second.iter_cells().collect();
        assert_eq!(first_cells, second_cells);
    }

    #[test]
    fn display_count_honors_the_roman_flag() {
        let plain = field(Square, 16, 0.1);
        assert_eq!(plain.display_count(3), "3");

        let roman = MineField::with_seed(
            GameConfig::new(16, 0.1, Square).with_roman_digits(),
            7,
        )
        .unwrap();
        assert_eq!(roman.display_count(3), "III");
        assert_eq!(roman.display_count(0), "O");
    }

    #[test]
    fn classification_keys_follow_the_thresholds() {
        assert_eq!(field(Square, 16, 0.1).size_class(), "micro");
        assert_eq!(field(Square, 36, 0.1).size_class(), "small");
        assert_eq!(field(Square, 144, 0.1).size_class(), "large");
        assert_eq!(field(Square, 256, 0.1).size_class(), "extreme");

        assert_eq!(field(Square, 100, 0.05).density_class(), "low");
        assert_eq!(field(Square, 100, 0.25).density_class(), "high");
        assert_eq!(field(Square, 100, 0.45).density_class(), "berlin");
    }

    #[test]
    fn elapsed_secs_freezes_at_game_end() {
        let mut field = field_with_mines(Square, 16, &[(3, 3)]);
        assert!(field.reveal(3, 3));
        let first = field.elapsed_secs();
        let second = field.elapsed_secs();
        assert_eq!(first, second);
    }
}
