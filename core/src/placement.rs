use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::*;

/// Uniform without-replacement sampler behind mine placement, split out so
/// tests can drive it with a fixed seed.
#[derive(Clone, Debug)]
pub struct MineSampler {
    rng: SmallRng,
}

impl MineSampler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws `count` distinct coordinates uniformly from `candidates`.
    /// `count` must not exceed the candidate pool.
    pub fn draw(&mut self, candidates: &[Coord2], count: usize) -> Vec<Coord2> {
        rand::seq::index::sample(&mut self.rng, candidates.len(), count)
            .iter()
            .map(|i| candidates[i])
            .collect()
    }
}

/// Deferred placement, run on the first reveal. Samples mines from every
/// cell outside the trigger's safe zone and then numbers the rest of the
/// board. Returns `false` without touching `board` when the candidate pool
/// cannot hold `mine_count` mines.
pub(crate) fn place_mines(
    board: &mut BTreeMap<Coord2, CellValue>,
    geometry: Geometry,
    size: Axis,
    mine_count: CellCount,
    trigger: Coord2,
    seed: u64,
) -> bool {
    let safe_zone = geometry.neighbors(size, trigger, true);
    let candidates: Vec<Coord2> = board
        .keys()
        .copied()
        .filter(|coord| !safe_zone.contains(coord))
        .collect();

    if candidates.len() <= mine_count as usize {
        log::warn!(
            "cannot fit {} mines into {} cells outside the safe zone around {:?}",
            mine_count,
            candidates.len(),
            trigger
        );
        return false;
    }

    let mut sampler = MineSampler::from_seed(seed);
    let mines = sampler.draw(&candidates, mine_count as usize);
    apply_mines(board, geometry, size, &mines);
    log::debug!("placed {mine_count} mines after first reveal at {trigger:?}");
    true
}

/// Marks `mines` on the board and rewrites every other cell with its exact
/// adjacent-mine count.
pub(crate) fn apply_mines(
    board: &mut BTreeMap<Coord2, CellValue>,
    geometry: Geometry,
    size: Axis,
    mines: &[Coord2],
) {
    for &coord in mines {
        board.insert(coord, CellValue::Mine);
    }

    let counts: Vec<(Coord2, u8)> = board
        .iter()
        .filter(|(_, value)| !value.is_mine())
        .map(|(&coord, _)| {
            let count = geometry
                .neighbors(size, coord, false)
                .iter()
                .filter(|pos| board[*pos].is_mine())
                .count() as u8;
            (coord, count)
        })
        .collect();
    for (coord, count) in counts {
        board.insert(coord, CellValue::Count(count));
    }
}
