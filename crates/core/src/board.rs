//! Board module - the 5x6 orb grid
//!
//! Cells live in a flat row-major array (`row * COLS + col`). Row 0 is the top
//! of the board. Under normal gravity orbs settle toward the bottom row and new
//! orbs enter from the top; inverted gravity mirrors both.
//!
//! All randomness (fills, skyfall, boss targeting) is drawn from the board's
//! [`OrbSource`], so a seeded source replays a battle exactly.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use arrayvec::ArrayVec;

use crate::cell::OrbCell;
use crate::rng::{OrbBias, OrbSource, RandomOrbs};
use crate::types::{
    GridPos, Gravity, OrbType, BOARD_COLS, BOARD_ROWS, CASCADE_MIN, CELL_COUNT, CHAIN_BASIC,
    NEIGHBORS,
};

const ROWS: usize = BOARD_ROWS as usize;
const COLS: usize = BOARD_COLS as usize;

/// Ordered cell positions; a board never holds more than [`CELL_COUNT`]
pub type ChainPath = ArrayVec<GridPos, CELL_COUNT>;

/// Orb layout given as rows from top to bottom
pub type OrbLayout = [[OrbType; COLS]; ROWS];

/// A connected same-type group found after skyfall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeGroup {
    pub orb: OrbType,
    pub cells: ChainPath,
}

/// One orb sliding from `from` to `to` during gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrbMove {
    pub from: GridPos,
    pub to: GridPos,
}

/// The orb board
#[derive(Debug, Clone)]
pub struct Board<S = RandomOrbs> {
    cells: [OrbCell; CELL_COUNT],
    gravity: Gravity,
    source: S,
}

impl<S: OrbSource> Board<S> {
    /// Create a board with every cell empty
    pub fn new(source: S) -> Self {
        let mut cells = [OrbCell::empty(GridPos::new(0, 0)); CELL_COUNT];
        for (idx, cell) in cells.iter_mut().enumerate() {
            *cell = OrbCell::empty(Self::pos_of(idx));
        }
        Self {
            cells,
            gravity: Gravity::Normal,
            source,
        }
    }

    /// Create a board from a fixed layout
    pub fn from_rows(rows: OrbLayout, source: S) -> Self {
        let mut board = Self::new(source);
        for (r, row) in rows.iter().enumerate() {
            for (c, &orb) in row.iter().enumerate() {
                board.cells[r * COLS + c].fill(orb);
            }
        }
        board
    }

    #[inline(always)]
    fn flat_index(pos: GridPos) -> Option<usize> {
        if !pos.in_bounds() {
            return None;
        }
        Some(pos.row as usize * COLS + pos.col as usize)
    }

    #[inline(always)]
    fn pos_of(idx: usize) -> GridPos {
        GridPos::new((idx / COLS) as i8, (idx % COLS) as i8)
    }

    pub fn rows(&self) -> u8 {
        BOARD_ROWS
    }

    pub fn cols(&self) -> u8 {
        BOARD_COLS
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[OrbCell] {
        &self.cells
    }

    /// Cell at `pos`, or None if out of bounds
    pub fn cell(&self, pos: GridPos) -> Option<&OrbCell> {
        Self::flat_index(pos).map(|idx| &self.cells[idx])
    }

    /// Cell at (row, col), or None if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<&OrbCell> {
        self.cell(GridPos::new(row, col))
    }

    fn cell_mut(&mut self, pos: GridPos) -> Option<&mut OrbCell> {
        Self::flat_index(pos).map(move |idx| &mut self.cells[idx])
    }

    /// Put a fresh orb at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: GridPos, orb: OrbType) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.fill(orb);
                true
            }
            None => false,
        }
    }

    /// Lock the orb at `pos` for `turns`. Returns false for empty or
    /// out-of-bounds cells, and for a zero-turn lock.
    pub fn lock_at(&mut self, pos: GridPos, turns: u8) -> bool {
        if turns == 0 {
            return false;
        }
        match self.cell_mut(pos) {
            Some(cell) if !cell.is_empty() => {
                cell.lock(turns);
                true
            }
            _ => false,
        }
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Refill every cell with a random orb, dropping all locks and selection.
    ///
    /// With a bias, each cell rolls against its strength before falling back
    /// to a uniform pick.
    pub fn random_fill(&mut self, bias: Option<OrbBias>) {
        for idx in 0..CELL_COUNT {
            let orb = self.source.next_orb_biased(bias);
            self.cells[idx].fill(orb);
        }
    }

    /// Whether the cell at `pos` may join a chain. False when out of bounds.
    pub fn can_be_chained(&self, pos: GridPos) -> bool {
        self.cell(pos).is_some_and(OrbCell::can_be_chained)
    }

    pub(crate) fn set_selected(&mut self, pos: GridPos, selected: bool) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_selected(selected);
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        for cell in &mut self.cells {
            cell.set_selected(false);
        }
    }

    /// Check a full chain path: at least [`CHAIN_BASIC`] long, every cell
    /// chainable, one orb type, no repeats and each step orthogonally adjacent.
    pub fn validate_chain(&self, path: &[GridPos]) -> bool {
        if path.len() < CHAIN_BASIC {
            return false;
        }
        let Some(first) = self.cell(path[0]) else {
            return false;
        };
        let orb = first.orb();

        let mut seen = [false; CELL_COUNT];
        for (i, &pos) in path.iter().enumerate() {
            let Some(idx) = Self::flat_index(pos) else {
                return false;
            };
            let cell = &self.cells[idx];
            if seen[idx] || !cell.can_be_chained() || cell.orb() != orb {
                return false;
            }
            if i > 0 && !path[i - 1].is_adjacent(pos) {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    /// Empty the given cells. Returns the orb type of the first in-bounds,
    /// non-empty cell, or None when nothing was removed.
    pub fn eliminate(&mut self, positions: &[GridPos]) -> Option<OrbType> {
        let mut removed = None;
        for &pos in positions {
            let Some(cell) = self.cell_mut(pos) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            if removed.is_none() {
                removed = Some(cell.orb());
            }
            cell.clear();
        }
        removed
    }

    /// Compact every column toward the gravity side, keeping orb order, then
    /// fill the remaining gaps with new orbs. Locked orbs fall like any other.
    ///
    /// Returns the moves of surviving orbs in column order.
    pub fn apply_gravity(&mut self) -> Vec<OrbMove> {
        let mut moves = Vec::new();
        for col in 0..BOARD_COLS as i8 {
            self.settle_column(col, &mut moves);
        }
        moves
    }

    fn settle_column(&mut self, col: i8, moves: &mut Vec<OrbMove>) {
        // Rows ordered from the side orbs settle on to the side they enter from.
        let order: ArrayVec<i8, ROWS> = match self.gravity {
            Gravity::Normal => (0..ROWS as i8).rev().collect(),
            Gravity::Inverted => (0..ROWS as i8).collect(),
        };

        let mut write = 0;
        for read in 0..order.len() {
            let from = GridPos::new(order[read], col);
            let src = self[from];
            if src.is_empty() {
                continue;
            }
            if read != write {
                let to = GridPos::new(order[write], col);
                let to_idx = to.row as usize * COLS + col as usize;
                let from_idx = from.row as usize * COLS + col as usize;
                self.cells[to_idx].receive(&src);
                self.cells[from_idx].clear();
                moves.push(OrbMove { from, to });
            }
            write += 1;
        }

        for &row in &order[write..] {
            let orb = self.source.next_orb();
            self.cells[row as usize * COLS + col as usize].fill(orb);
        }
    }

    /// Collect positions reachable from `start` through cells accepted by
    /// `walkable`, marking them in `visited`.
    fn flood_fill(
        &self,
        start: GridPos,
        visited: &mut [bool; CELL_COUNT],
        walkable: impl Fn(&OrbCell) -> bool,
    ) -> ChainPath {
        let mut group = ChainPath::new();
        let Some(start_idx) = Self::flat_index(start) else {
            return group;
        };
        let mut stack: ArrayVec<GridPos, CELL_COUNT> = ArrayVec::new();
        visited[start_idx] = true;
        stack.push(start);

        while let Some(pos) = stack.pop() {
            group.push(pos);
            for (d_row, d_col) in NEIGHBORS {
                let Some(idx) = Self::flat_index(pos.offset(d_row, d_col)) else {
                    continue;
                };
                if visited[idx] || !walkable(&self.cells[idx]) {
                    continue;
                }
                visited[idx] = true;
                stack.push(Self::pos_of(idx));
            }
        }
        group
    }

    /// Find every 4-connected same-type group of at least [`CASCADE_MIN`]
    /// orbs. Locked orbs count toward groups; empty cells never do.
    ///
    /// Groups come out in row-major order of their first scanned cell.
    pub fn find_cascade_matches(&self) -> Vec<CascadeGroup> {
        let mut visited = [false; CELL_COUNT];
        let mut groups = Vec::new();

        for idx in 0..CELL_COUNT {
            let cell = self.cells[idx];
            if visited[idx] || cell.is_empty() {
                continue;
            }
            let orb = cell.orb();
            let cells = self.flood_fill(cell.pos(), &mut visited, |c| {
                !c.is_empty() && c.orb() == orb
            });
            if cells.len() >= CASCADE_MIN {
                groups.push(CascadeGroup { orb, cells });
            }
        }
        groups
    }

    /// Pick up to `count` distinct cells accepted by `eligible`, drawing
    /// without replacement from the row-major candidate list.
    fn pick_targets(&mut self, count: usize, eligible: impl Fn(&OrbCell) -> bool) -> Vec<GridPos> {
        let mut candidates: Vec<GridPos> = self
            .cells
            .iter()
            .filter(|c| eligible(c))
            .map(OrbCell::pos)
            .collect();

        let mut picked = Vec::with_capacity(count.min(candidates.len()));
        while picked.len() < count && !candidates.is_empty() {
            let i = self.source.pick_index(candidates.len());
            picked.push(candidates.remove(i));
        }
        picked
    }

    /// Lock up to `count` random unlocked orbs for `turns` turns. Zero turns
    /// locks nothing.
    pub fn lock_random(&mut self, count: usize, turns: u8) -> Vec<GridPos> {
        if turns == 0 {
            return Vec::new();
        }
        let picked = self.pick_targets(count, |c| !c.is_empty() && !c.is_locked());
        for &pos in &picked {
            if let Some(cell) = self.cell_mut(pos) {
                cell.lock(turns);
            }
        }
        picked
    }

    /// Turn up to `count` random unlocked orbs into `target`. Orbs that
    /// already are `target` are never picked.
    pub fn convert_random(&mut self, count: usize, target: OrbType) -> Vec<GridPos> {
        let picked = self.pick_targets(count, |c| {
            !c.is_empty() && !c.is_locked() && c.orb() != target
        });
        for &pos in &picked {
            if let Some(cell) = self.cell_mut(pos) {
                cell.set_orb(target);
            }
        }
        picked
    }

    /// Count down every lock by one turn. Returns the cells that unlocked.
    pub fn tick_all_locks(&mut self) -> Vec<GridPos> {
        self.cells
            .iter_mut()
            .filter_map(|cell| cell.tick_lock().then(|| cell.pos()))
            .collect()
    }

    /// Positions of chainable orbs of type `orb`, row-major
    pub fn chainable_cells_of_type(&self, orb: OrbType) -> Vec<GridPos> {
        self.cells
            .iter()
            .filter(|c| c.can_be_chained() && c.orb() == orb)
            .map(OrbCell::pos)
            .collect()
    }

    /// Number of orbs of each type currently on the board
    pub fn count_orb_types(&self) -> BTreeMap<OrbType, usize> {
        let mut counts = BTreeMap::new();
        for cell in self.cells.iter().filter(|c| !c.is_empty()) {
            *counts.entry(cell.orb()).or_insert(0) += 1;
        }
        counts
    }

    /// Longest simple same-type path starting at (row, col) through unlocked
    /// orbs. Neighbors are tried up, down, left, right; the first longest path
    /// found wins. Empty for out-of-bounds, empty or locked starts.
    pub fn longest_chain_from(&self, row: i8, col: i8) -> ChainPath {
        let start = GridPos::new(row, col);
        let mut best = ChainPath::new();
        let Some(start_idx) = Self::flat_index(start) else {
            return best;
        };
        let first = self.cells[start_idx];
        if first.is_empty() || first.is_locked() {
            return best;
        }
        let orb = first.orb();
        let walkable = |c: &OrbCell| !c.is_empty() && !c.is_locked() && c.orb() == orb;

        // No path can be longer than the component it lives in.
        let reachable = self
            .flood_fill(start, &mut [false; CELL_COUNT], walkable)
            .len();

        let mut on_path = [false; CELL_COUNT];
        let mut path = ChainPath::new();
        // Next neighbor to try at each depth.
        let mut next_dir: ArrayVec<usize, CELL_COUNT> = ArrayVec::new();
        path.push(start);
        next_dir.push(0);
        on_path[start_idx] = true;
        best.clone_from(&path);

        while let Some(&top) = path.last() {
            if best.len() == reachable {
                break;
            }
            let depth = path.len() - 1;
            let dir = next_dir[depth];
            if dir == NEIGHBORS.len() {
                path.pop();
                next_dir.pop();
                if let Some(idx) = Self::flat_index(top) {
                    on_path[idx] = false;
                }
                continue;
            }
            next_dir[depth] += 1;

            let (d_row, d_col) = NEIGHBORS[dir];
            let next = top.offset(d_row, d_col);
            let Some(idx) = Self::flat_index(next) else {
                continue;
            };
            if on_path[idx] || !walkable(&self.cells[idx]) {
                continue;
            }
            on_path[idx] = true;
            path.push(next);
            next_dir.push(0);
            if path.len() > best.len() {
                best.clone_from(&path);
            }
        }
        best
    }

    /// Write a compact orb grid: 0 = empty, otherwise orb discriminant + 1
    pub fn write_u8_grid(&self, out: &mut [[u8; COLS]; ROWS]) {
        for (idx, cell) in self.cells.iter().enumerate() {
            out[idx / COLS][idx % COLS] = if cell.is_empty() {
                0
            } else {
                cell.orb() as u8 + 1
            };
        }
    }

    /// Row-major lock grid, remaining turns per cell
    pub fn write_lock_grid(&self, out: &mut [[u8; COLS]; ROWS]) {
        for (idx, cell) in self.cells.iter().enumerate() {
            out[idx / COLS][idx % COLS] = cell.lock_turns_remaining();
        }
    }
}

impl Default for Board<RandomOrbs> {
    fn default() -> Self {
        Self::new(RandomOrbs::default())
    }
}

/// # Panics
///
/// Panics if `pos` is out of bounds. Use [`Board::cell`] for a checked lookup.
impl<S: OrbSource> Index<GridPos> for Board<S> {
    type Output = OrbCell;

    fn index(&self, pos: GridPos) -> &OrbCell {
        match Self::flat_index(pos) {
            Some(idx) => &self.cells[idx],
            None => panic!("grid position {} is off the board", pos),
        }
    }
}

impl<S: OrbSource> fmt::Display for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cell) in self.cells.iter().enumerate() {
            let symbol = if cell.is_empty() {
                '.'
            } else if cell.is_locked() {
                '#'
            } else {
                cell.orb().symbol()
            };
            let col = idx % COLS;
            if col > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", symbol)?;
            if col == COLS - 1 && idx + 1 < CELL_COUNT {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedOrbs;
    use crate::types::OrbType::*;
    use crate::types::STANDARD_ORBS;

    /// Layout with no two equal orbs orthogonally adjacent
    fn no_match_rows() -> OrbLayout {
        let mut rows = [[Water; COLS]; ROWS];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, orb) in row.iter_mut().enumerate() {
                *orb = STANDARD_ORBS[(2 * r + c) % 6];
            }
        }
        rows
    }

    fn scripted(rows: OrbLayout, refill: Vec<OrbType>) -> Board<ScriptedOrbs> {
        Board::from_rows(rows, ScriptedOrbs::new(refill))
    }

    fn p(row: i8, col: i8) -> GridPos {
        GridPos::new(row, col)
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(ScriptedOrbs::cycling());
        assert!(board.cells().iter().all(OrbCell::is_empty));
        assert_eq!(board.rows(), 5);
        assert_eq!(board.cols(), 6);
        assert_eq!(board.gravity(), Gravity::Normal);
        for (idx, cell) in board.cells().iter().enumerate() {
            assert_eq!(cell.pos(), Board::<ScriptedOrbs>::pos_of(idx));
        }
    }

    #[test]
    fn random_fill_fills_every_cell() {
        let mut board = Board::new(RandomOrbs::seeded(5));
        board.random_fill(None);
        assert!(board.cells().iter().all(|c| !c.is_empty() && c.orb().is_standard()));
    }

    #[test]
    fn random_fill_with_full_bias() {
        let mut board = Board::new(RandomOrbs::seeded(5));
        board.random_fill(Some(OrbBias::new(Heart, 1.0)));
        assert!(board.cells().iter().all(|c| c.orb() == Heart));
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let board = scripted(no_match_rows(), vec![Water]);
        assert!(board.get(-1, 0).is_none());
        assert!(board.get(0, 6).is_none());
        assert!(board.get(5, 0).is_none());
        assert_eq!(board.get(4, 5).map(OrbCell::orb), Some(Fire));
        assert!(!board.can_be_chained(p(9, 9)));
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let board = scripted(no_match_rows(), vec![Water]);
        let _ = board[p(5, 0)];
    }

    #[test]
    fn validate_chain_accepts_adjacent_same_type_path() {
        let mut rows = no_match_rows();
        rows[0][1] = Water;
        rows[0][2] = Water;
        let board = scripted(rows, vec![Water]);
        assert!(board.validate_chain(&[p(0, 0), p(0, 1), p(0, 2)]));
        // Too short.
        assert!(!board.validate_chain(&[p(0, 0), p(0, 1)]));
        // Not adjacent.
        assert!(!board.validate_chain(&[p(0, 0), p(0, 2), p(0, 1)]));
        // Repeated cell.
        assert!(!board.validate_chain(&[p(0, 0), p(0, 1), p(0, 0)]));
        // Mixed types.
        assert!(!board.validate_chain(&[p(0, 0), p(0, 1), p(1, 1)]));
        // Off the board.
        assert!(!board.validate_chain(&[p(0, 0), p(0, 1), p(-1, 1)]));
    }

    #[test]
    fn validate_chain_rejects_locked_cells() {
        let mut rows = no_match_rows();
        rows[0][1] = Water;
        rows[0][2] = Water;
        let mut board = scripted(rows, vec![Water]);
        assert!(board.lock_at(p(0, 2), 1));
        assert!(!board.validate_chain(&[p(0, 0), p(0, 1), p(0, 2)]));
    }

    #[test]
    fn eliminate_reports_first_removed_orb() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        assert_eq!(board.eliminate(&[p(0, 1), p(0, 0)]), Some(Fire));
        assert!(board[p(0, 1)].is_empty());
        assert!(board[p(0, 0)].is_empty());
        // Already empty.
        assert_eq!(board.eliminate(&[p(0, 1)]), None);
        assert_eq!(board.eliminate(&[]), None);
    }

    #[test]
    fn eliminate_clears_locks() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.lock_at(p(2, 2), 3);
        board.eliminate(&[p(2, 2)]);
        assert!(!board[p(2, 2)].is_locked());
    }

    #[test]
    fn gravity_compacts_down_and_fills_from_top() {
        let mut board = scripted(no_match_rows(), vec![Heart, Dark]);
        let above = board[p(2, 0)].orb();
        let top = board[p(0, 0)].orb();
        board.eliminate(&[p(3, 0), p(4, 0)]);

        let moves = board.apply_gravity();
        assert_eq!(
            moves,
            vec![
                OrbMove { from: p(2, 0), to: p(4, 0) },
                OrbMove { from: p(1, 0), to: p(3, 0) },
                OrbMove { from: p(0, 0), to: p(2, 0) },
            ]
        );
        assert_eq!(board[p(4, 0)].orb(), above);
        assert_eq!(board[p(2, 0)].orb(), top);
        // Fill starts at the lowest gap and works toward the top.
        assert_eq!(board[p(1, 0)].orb(), Heart);
        assert_eq!(board[p(0, 0)].orb(), Dark);
        assert!(board.cells().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn inverted_gravity_compacts_up_and_fills_from_bottom() {
        let mut board = scripted(no_match_rows(), vec![Light, Wood]);
        board.set_gravity(Gravity::Inverted);
        let below = board[p(2, 3)].orb();
        board.eliminate(&[p(0, 3), p(1, 3)]);

        board.apply_gravity();
        assert_eq!(board[p(0, 3)].orb(), below);
        assert_eq!(board[p(3, 3)].orb(), Light);
        assert_eq!(board[p(4, 3)].orb(), Wood);
    }

    #[test]
    fn gravity_carries_locks_with_the_orb() {
        let mut board = scripted(no_match_rows(), vec![Heart]);
        board.lock_at(p(3, 1), 2);
        board.eliminate(&[p(4, 1)]);
        board.apply_gravity();
        assert!(board[p(4, 1)].is_locked());
        assert_eq!(board[p(4, 1)].lock_turns_remaining(), 2);
        assert!(!board[p(3, 1)].is_locked());
    }

    #[test]
    fn gravity_on_full_board_moves_nothing() {
        let mut board = scripted(no_match_rows(), vec![Heart]);
        let before = board.to_string();
        assert!(board.apply_gravity().is_empty());
        assert_eq!(board.to_string(), before);
        assert_eq!(board.source().drawn(), 0);
    }

    #[test]
    fn no_cascades_on_checkerboard_layout() {
        let board = scripted(no_match_rows(), vec![Water]);
        assert!(board.find_cascade_matches().is_empty());
    }

    #[test]
    fn cascade_groups_are_four_connected() {
        let mut rows = no_match_rows();
        // L-shaped Dark group of four.
        rows[0][0] = Dark;
        rows[1][0] = Dark;
        rows[2][0] = Dark;
        rows[2][1] = Dark;
        // Diagonal pair does not connect.
        rows[4][4] = Water;
        rows[3][5] = Water;
        let board = scripted(rows, vec![Water]);

        let groups = board.find_cascade_matches();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].orb, Dark);
        let mut cells: Vec<_> = groups[0].cells.iter().copied().collect();
        cells.sort();
        assert_eq!(cells, vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1)]);
    }

    #[test]
    fn cascade_groups_include_locked_orbs_and_skip_empties() {
        let mut rows = no_match_rows();
        rows[4][0] = Light;
        rows[4][1] = Light;
        rows[4][2] = Light;
        let mut board = scripted(rows, vec![Water]);
        board.lock_at(p(4, 1), 2);
        assert_eq!(board.find_cascade_matches().len(), 1);

        board.eliminate(&[p(4, 2)]);
        assert!(board.find_cascade_matches().is_empty());
    }

    #[test]
    fn lock_random_takes_distinct_unlocked_cells() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        let locked = board.lock_random(3, 2);
        assert_eq!(locked, vec![p(0, 0), p(0, 1), p(0, 2)]);
        assert!(locked.iter().all(|&pos| board[pos].is_locked()));

        // Already-locked cells are skipped next time.
        let again = board.lock_random(1, 2);
        assert_eq!(again, vec![p(0, 3)]);
    }

    #[test]
    fn lock_random_caps_at_available_cells() {
        let mut board = Board::new(RandomOrbs::seeded(11));
        board.random_fill(None);
        let locked = board.lock_random(100, 1);
        assert_eq!(locked.len(), CELL_COUNT);
        assert!(board.lock_random(1, 1).is_empty());
    }

    #[test]
    fn convert_random_skips_target_type_and_locked() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.lock_at(p(0, 1), 1);
        // (0,0) is already Water, (0,1) is locked.
        let converted = board.convert_random(2, Water);
        assert_eq!(converted, vec![p(0, 2), p(0, 3)]);
        assert_eq!(board[p(0, 2)].orb(), Water);
        assert_eq!(board[p(0, 1)].orb(), Fire);
    }

    #[test]
    fn tick_all_locks_reports_expired() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.lock_at(p(1, 1), 1);
        board.lock_at(p(2, 2), 2);
        assert_eq!(board.tick_all_locks(), vec![p(1, 1)]);
        assert_eq!(board.tick_all_locks(), vec![p(2, 2)]);
        assert!(board.tick_all_locks().is_empty());
    }

    #[test]
    fn zero_turn_locks_are_refused() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        assert!(!board.lock_at(p(1, 1), 0));
        assert!(board.lock_random(3, 0).is_empty());
        assert!(board.cells().iter().all(|c| !c.is_locked()));
    }

    #[test]
    fn lock_grid_reports_remaining_turns() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.lock_at(p(1, 1), 3);
        board.lock_at(p(2, 2), 1);
        let mut grid = [[0u8; COLS]; ROWS];
        board.write_lock_grid(&mut grid);
        assert_eq!(grid[1][1], 3);
        assert_eq!(grid[2][2], 1);
        assert_eq!(grid.iter().flatten().filter(|&&t| t > 0).count(), 2);

        board.tick_all_locks();
        board.write_lock_grid(&mut grid);
        assert_eq!(grid[1][1], 2);
        assert_eq!(grid[2][2], 0);
    }

    #[test]
    fn chainable_cells_and_counts() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        assert_eq!(board.chainable_cells_of_type(Water).len(), 5);
        board.lock_at(p(0, 0), 1);
        assert_eq!(board.chainable_cells_of_type(Water).len(), 4);

        board.eliminate(&[p(0, 1)]);
        let counts = board.count_orb_types();
        assert_eq!(counts.get(&Fire), Some(&4));
        assert_eq!(counts.get(&Water), Some(&5));
        assert_eq!(counts.values().sum::<usize>(), CELL_COUNT - 1);
    }

    #[test]
    fn longest_chain_follows_the_snake() {
        let mut rows = no_match_rows();
        // U-shape of Heart: (3,0) (4,0) (4,1) (4,2) (3,2)
        rows[3][0] = Heart;
        rows[4][0] = Heart;
        rows[4][1] = Heart;
        rows[4][2] = Heart;
        rows[3][2] = Heart;
        rows[3][1] = Water;
        let board = scripted(rows, vec![Water]);

        let path = board.longest_chain_from(3, 0);
        assert_eq!(
            path.as_slice(),
            &[p(3, 0), p(4, 0), p(4, 1), p(4, 2), p(3, 2)]
        );
        assert!(board.validate_chain(&path));

        // From the middle only one arm can be walked.
        assert_eq!(board.longest_chain_from(4, 1).len(), 3);
    }

    #[test]
    fn longest_chain_edge_cases() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        assert!(board.longest_chain_from(-1, 0).is_empty());
        assert_eq!(board.longest_chain_from(0, 0).as_slice(), &[p(0, 0)]);
        board.lock_at(p(0, 0), 1);
        assert!(board.longest_chain_from(0, 0).is_empty());
        board.eliminate(&[p(1, 1)]);
        assert!(board.longest_chain_from(1, 1).is_empty());
    }

    #[test]
    fn display_renders_symbol_grid() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.eliminate(&[p(0, 0)]);
        board.lock_at(p(0, 1), 1);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], ". # G L D H");
        assert_eq!(lines[1], "G L D H W F");
    }

    #[test]
    fn u8_grid_marks_empty_as_zero() {
        let mut board = scripted(no_match_rows(), vec![Water]);
        board.eliminate(&[p(2, 3)]);
        let mut grid = [[0u8; COLS]; ROWS];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[2][3], 0);
        assert_eq!(grid[0][0], Water as u8 + 1);
        assert!(grid.iter().flatten().filter(|&&v| v == 0).count() == 1);
    }
}
