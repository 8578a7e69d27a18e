use std::hash::Hasher;

use crate::types::{BoardState, Gravity, BOARD_COLS, BOARD_ROWS};

pub type OrbGrid = [[u8; BOARD_COLS as usize]; BOARD_ROWS as usize];

/// 64-bit FNV-1a
#[derive(Debug, Clone, Copy)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Plain-data copy of the board and trackers.
///
/// Orb codes: 0 = empty, otherwise the orb's declaration index + 1.
/// Lock grid: remaining lock turns, 0 = unlocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSnapshot {
    pub orbs: OrbGrid,
    pub locks: OrbGrid,
    /// FNV-1a over `orbs`, row-major
    pub board_hash: u64,
    pub gravity: Gravity,
    pub state: BoardState,
    pub ap: u32,
    pub ap_max: u32,
    pub combo: u32,
    pub combo_total: u32,
    pub gauge: f32,
}

impl BoardSnapshot {
    pub fn hash_grid(grid: &OrbGrid) -> u64 {
        let mut h = Fnv1aHasher::new();
        for row in grid {
            h.write(row);
        }
        h.finish()
    }

    pub fn clear(&mut self) {
        self.orbs = [[0u8; BOARD_COLS as usize]; BOARD_ROWS as usize];
        self.locks = [[0u8; BOARD_COLS as usize]; BOARD_ROWS as usize];
        self.board_hash = Self::hash_grid(&self.orbs);
        self.gravity = Gravity::Normal;
        self.state = BoardState::Idle;
        self.ap = 0;
        self.ap_max = 0;
        self.combo = 0;
        self.combo_total = 0;
        self.gauge = 0.0;
    }

    pub fn playable(&self) -> bool {
        self.state.accepts_input() && self.ap > 0
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        let mut s = Self {
            orbs: [[0u8; BOARD_COLS as usize]; BOARD_ROWS as usize],
            locks: [[0u8; BOARD_COLS as usize]; BOARD_ROWS as usize],
            board_hash: 0,
            gravity: Gravity::Normal,
            state: BoardState::Idle,
            ap: 0,
            ap_max: 0,
            combo: 0,
            combo_total: 0,
            gauge: 0.0,
        };
        s.clear();
        s
    }
}
